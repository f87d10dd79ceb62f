//! The projection bundle handed to presentation.

use crime_stats_analytics::{filter, matrix};
use crime_stats_analytics_models::{AggregateResult, CategoryStats, HeatmapSummary, ProjectionMatrix};
use crime_stats_dataset_models::{FilterSpec, RecordSet};
use crime_stats_geography::DistrictTable;
use crime_stats_geography_models::GeoPoint;
use serde::{Deserialize, Serialize};

/// Every view's data for one dataset and filter, computed from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// Name of the active dataset.
    pub source_name: String,
    /// Filter the projections were computed under.
    pub filter: FilterSpec,
    /// Records in the active dataset.
    pub total_records: usize,
    /// Records that passed the filter.
    pub filtered_records: usize,
    /// Year filter options, most recent first.
    pub available_years: Vec<i64>,
    /// Crime-category filter options, in header order.
    pub available_categories: Vec<String>,
    /// Totals of the filtered records.
    pub aggregate: AggregateResult,
    /// Heatmap matrix of the filtered records.
    pub matrix: ProjectionMatrix,
    /// Heatmap headline figures.
    pub heatmap: HeatmapSummary,
    /// Map markers of the filtered records.
    pub geo_points: Vec<GeoPoint>,
    /// Statistics panel entries.
    pub category_stats: Vec<CategoryStats>,
}

impl DashboardSnapshot {
    /// Filters `records` and runs every projection over the result.
    #[must_use]
    pub fn compute(
        source_name: &str,
        records: &RecordSet,
        spec: &FilterSpec,
        districts: &DistrictTable,
    ) -> Self {
        let filtered = filter::apply(records, spec);

        Self {
            source_name: source_name.to_string(),
            filter: spec.clone(),
            total_records: records.len(),
            filtered_records: filtered.len(),
            available_years: crime_stats_analytics::available_years(records),
            available_categories: crime_stats_analytics::available_categories(records),
            aggregate: crime_stats_analytics::aggregate(&filtered, districts),
            matrix: matrix::project(&filtered),
            heatmap: crime_stats_analytics::heatmap_summary(&filtered),
            geo_points: crime_stats_geography::project(&filtered, districts),
            category_stats: crime_stats_analytics::category_stats(&filtered),
        }
    }

    /// `"Showing X of Y records"` line for the filter panel.
    #[must_use]
    pub fn result_summary(&self) -> String {
        format!(
            "Showing {} of {} records",
            self.filtered_records, self.total_records
        )
    }
}
