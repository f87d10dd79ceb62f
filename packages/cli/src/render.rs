//! Plain-text rendering of dashboard snapshots.

use std::fmt::Write as _;

use crime_stats_analytics_models::{CategoryStats, HeatmapSummary, ProjectionMatrix};
use crime_stats_dashboard::DashboardSnapshot;
use crime_stats_dataset_models::{CrimeRecord, format_number};
use crime_stats_geography_models::GeoPoint;

const RULE_WIDTH: usize = 72;

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

/// Shortens `s` to at most `max` characters, marking the cut with `...`.
fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Dataset header, filter line, and every aggregate total.
#[must_use]
pub fn format_summary(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let agg = &snapshot.aggregate;

    let _ = writeln!(out, "Dataset: {}", snapshot.source_name);
    let _ = writeln!(
        out,
        "Filter:  year={} category={}",
        snapshot.filter.year(),
        snapshot.filter.crime_category()
    );
    let _ = writeln!(out, "{}", snapshot.result_summary());
    let _ = writeln!(out, "Total incidents: {}", format_number(agg.grand_total));

    let _ = writeln!(out, "\n{:<48} TOTAL", "CATEGORY");
    let _ = writeln!(out, "{}", rule());
    for category in &agg.by_category {
        let _ = writeln!(
            out,
            "{:<48} {}",
            clip(&category.name, 47),
            format_number(category.total)
        );
    }

    let _ = writeln!(out, "\n{:<48} TOTAL", "YEAR");
    let _ = writeln!(out, "{}", rule());
    for year in &agg.by_year {
        let _ = writeln!(out, "{:<48} {}", year.year, format_number(year.total));
    }

    if !agg.by_region.is_empty() {
        let _ = writeln!(out, "\n{:<48} TOTAL", "REGION");
        let _ = writeln!(out, "{}", rule());
        for (region, total) in &agg.by_region {
            let _ = writeln!(out, "{region:<48} {}", format_number(*total));
        }
    }

    let _ = writeln!(out, "\n{:<4} {:<43} TOTAL", "#", "TOP LOCATIONS");
    let _ = writeln!(out, "{}", rule());
    for (rank, location) in agg.top_locations.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<4} {:<43} {}",
            rank + 1,
            clip(&location.name, 43),
            format_number(location.count)
        );
    }

    out
}

/// Heatmap as a table: one row per location, one column per category.
#[must_use]
pub fn format_matrix(matrix: &ProjectionMatrix, summary: &HeatmapSummary) -> String {
    const CELL: usize = 12;
    let mut out = String::new();

    let _ = write!(out, "{:<20}", "LOCATION");
    for category in &matrix.categories {
        let _ = write!(out, " {:>CELL$}", clip(category, CELL));
    }
    let _ = writeln!(out, " {:>CELL$}", "TOTAL");
    let _ = writeln!(out, "{}", "-".repeat(20 + (CELL + 1) * (matrix.categories.len() + 1)));

    for (l, location) in matrix.locations.iter().enumerate() {
        let _ = write!(out, "{:<20}", clip(location, 20));
        for c in 0..matrix.categories.len() {
            let _ = write!(out, " {:>CELL$}", format_number(matrix.get(c, l)));
        }
        let _ = writeln!(out, " {:>CELL$}", format_number(matrix.location_total(l)));
    }

    let _ = writeln!(out, "\nTotal incidents:    {}", format_number(summary.total));
    let _ = writeln!(
        out,
        "Average per record: {:.1}",
        summary.average_per_record
    );
    let _ = writeln!(
        out,
        "Top crime type:     {}",
        summary.top_crime_type.as_deref().unwrap_or("-")
    );

    out
}

/// Map markers, one line each.
#[must_use]
pub fn format_markers(points: &[GeoPoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<22} {:<22} {:<9} {:>8} {:>9} {:>9}",
        "DISTRICT", "REGION", "TIER", "TOTAL", "LAT", "LNG"
    );
    let _ = writeln!(out, "{}", rule());
    for point in points {
        let _ = writeln!(
            out,
            "{:<22} {:<22} {:<9} {:>8} {:>9.4} {:>9.4}",
            clip(&point.location_id, 22),
            clip(&point.region, 22),
            point.intensity_tier.as_ref(),
            format_number(point.total_count),
            point.coordinates.lat,
            point.coordinates.lng
        );
    }
    let _ = writeln!(out, "\n{} district(s) with data", points.len());
    out
}

/// Statistics panel: total, average (one decimal), and max per category.
#[must_use]
pub fn format_stats(stats: &[CategoryStats]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<40} {:>10} {:>10} {:>10}",
        "CATEGORY", "TOTAL", "AVERAGE", "MAX"
    );
    let _ = writeln!(out, "{}", rule());
    for stat in stats {
        let _ = writeln!(
            out,
            "{:<40} {:>10} {:>10.1} {:>10}",
            clip(&stat.category, 40),
            format_number(stat.total),
            stat.average,
            format_number(stat.max)
        );
    }
    out
}

/// Every record of one district, for the marker drill-down.
#[must_use]
pub fn format_district_records(
    point: &GeoPoint,
    categories: &[String],
    records: &[&CrimeRecord],
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}) - {} incidents, {} intensity",
        point.location_id,
        point.region,
        format_number(point.total_count),
        point.intensity_tier
    );
    let _ = writeln!(out, "{}", rule());
    for record in records {
        let _ = writeln!(out, "{} {}", record.location, record.year);
        for (name, value) in categories.iter().zip(record.values()) {
            let _ = writeln!(out, "    {:<48} {value}", clip(name, 48));
        }
    }
    out
}
