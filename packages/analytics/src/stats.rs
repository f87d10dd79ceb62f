//! Statistics panel, heatmap summary, and filter-control options.

use std::collections::BTreeSet;

use crime_stats_analytics_models::{CategoryStats, HeatmapSummary, LocationTotal};
use crime_stats_dataset_models::RecordSet;

use crate::matrix;

#[allow(clippy::cast_precision_loss)]
fn per_record(total: f64, records: &RecordSet) -> f64 {
    if records.is_empty() {
        0.0
    } else {
        total / records.len() as f64
    }
}

/// Total, per-record average, and maximum of every category.
#[must_use]
pub fn category_stats(records: &RecordSet) -> Vec<CategoryStats> {
    records
        .categories()
        .iter()
        .enumerate()
        .map(|(idx, category)| {
            let (total, max) = records.iter().map(|r| r.count_at(idx)).fold(
                (0.0_f64, 0.0_f64),
                |(total, max), value| (total + value, max.max(value)),
            );
            CategoryStats {
                category: category.clone(),
                total,
                average: per_record(total, records),
                max,
            }
        })
        .collect()
}

/// Headline figures of the heatmap view.
#[must_use]
pub fn heatmap_summary(records: &RecordSet) -> HeatmapSummary {
    let matrix = matrix::project(records);

    let category_totals: Vec<f64> = matrix.values.iter().map(|row| row.iter().sum()).collect();
    let total: f64 = category_totals.iter().sum();

    // strictly greater, so the first category in header order wins ties
    let mut top: Option<(usize, f64)> = None;
    for (idx, &value) in category_totals.iter().enumerate() {
        if value > top.map_or(0.0, |(_, best)| best) {
            top = Some((idx, value));
        }
    }

    HeatmapSummary {
        total,
        average_per_record: per_record(total, records),
        top_crime_type: top.map(|(idx, _)| matrix.categories[idx].clone()),
        location_totals: matrix
            .locations
            .iter()
            .enumerate()
            .map(|(l, location)| LocationTotal {
                location: location.clone(),
                total: matrix.location_total(l),
            })
            .collect(),
    }
}

/// Distinct numeric years of `records`, most recent first.
#[must_use]
pub fn available_years(records: &RecordSet) -> Vec<i64> {
    let years: BTreeSet<i64> = records.iter().filter_map(|r| r.year.as_year()).collect();
    years.into_iter().rev().collect()
}

/// Category field names of `records`, in header order.
#[must_use]
pub fn available_categories(records: &RecordSet) -> Vec<String> {
    records.categories().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{record, scenario, set};
    use crime_stats_dataset_models::{CategoryValue, CrimeRecord, YearValue};

    #[test]
    fn category_stats_of_scenario() {
        let stats = category_stats(&scenario());

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].category, "Assault");
        assert!((stats[0].total - 13.0).abs() < f64::EPSILON);
        assert!((stats[0].average - 13.0 / 3.0).abs() < 1e-9);
        assert!((stats[0].max - 10.0).abs() < f64::EPSILON);
        assert!((stats[1].max - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn category_stats_of_empty_set_are_zero() {
        let stats = category_stats(&set(&["A"], Vec::new()));
        assert_eq!(stats.len(), 1);
        assert!(stats[0].average.abs() < f64::EPSILON);
        assert!(stats[0].max.abs() < f64::EPSILON);
    }

    #[test]
    fn heatmap_summary_of_scenario() {
        let summary = heatmap_summary(&scenario());

        assert!((summary.total - 20.0).abs() < f64::EPSILON);
        assert!((summary.average_per_record - 20.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.top_crime_type.as_deref(), Some("Assault"));
        assert_eq!(summary.location_totals.len(), 2);
        assert_eq!(summary.location_totals[0].location, "A");
        assert!((summary.location_totals[0].total - 20.0).abs() < f64::EPSILON);
        assert!(summary.location_totals[1].total.abs() < f64::EPSILON);
    }

    #[test]
    fn top_crime_type_first_wins_ties_and_is_none_when_nothing_counted() {
        let tied = set(&["A", "B"], vec![record("X", 2020, &[4.0, 4.0])]);
        assert_eq!(heatmap_summary(&tied).top_crime_type.as_deref(), Some("A"));

        let zeros = set(&["A", "B"], vec![record("X", 2020, &[0.0, 0.0])]);
        assert_eq!(heatmap_summary(&zeros).top_crime_type, None);

        let empty = set(&["A"], Vec::new());
        let summary = heatmap_summary(&empty);
        assert_eq!(summary.top_crime_type, None);
        assert!(summary.average_per_record.abs() < f64::EPSILON);
    }

    #[test]
    fn available_years_are_distinct_numeric_and_descending() {
        let mut records = vec![
            record("A", 2019, &[1.0]),
            record("B", 2021, &[1.0]),
            record("C", 2019, &[1.0]),
            record("D", 2020, &[1.0]),
        ];
        records.push(CrimeRecord::new(
            "E".into(),
            YearValue::Text("FY22".into()),
            vec![CategoryValue::Count(1.0)],
        ));

        assert_eq!(available_years(&set(&["A"], records)), vec![2021, 2020, 2019]);
    }

    #[test]
    fn available_categories_follow_header_order() {
        assert_eq!(available_categories(&scenario()), vec!["Assault", "Rape"]);
    }
}
