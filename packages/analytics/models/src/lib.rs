#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types of the aggregation, matrix, and statistics projections.
//!
//! These are plain value objects: they hold no reference back to the record
//! set they were computed from and serialize to camelCase JSON for
//! presentation.

use std::collections::BTreeMap;

use crime_stats_dataset_models::YearValue;
use serde::{Deserialize, Serialize};

/// Total of one crime category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// Category field name.
    pub name: String,
    /// Sum of the category's numeric values.
    pub total: f64,
}

/// Total of all categories for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearTotal {
    /// The year, numeric or literal text.
    pub year: YearValue,
    /// Sum over every category of the records in that year.
    pub total: f64,
}

/// Total of all categories for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationTotal {
    /// Location as it appears in the data.
    pub location: String,
    /// Sum over every category of the location's records.
    pub total: f64,
}

/// One entry of the top-locations ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedLocation {
    /// Display name: the lower-cased location with its first character
    /// upper-cased.
    pub name: String,
    /// Sum over every category of all records of the location, matched
    /// case-insensitively.
    pub count: f64,
}

/// Totals along every axis of a record set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    /// Sum of every numeric value.
    pub grand_total: f64,
    /// Per-category totals in header order.
    pub by_category: Vec<CategoryTotal>,
    /// Per-year totals ordered by year, numeric years first.
    pub by_year: Vec<YearTotal>,
    /// Per-region totals ordered by region name. Records whose location has
    /// no district are absent.
    pub by_region: BTreeMap<String, f64>,
    /// Highest-total locations, at most five.
    pub top_locations: Vec<RankedLocation>,
}

impl AggregateResult {
    /// Total of a category by exact name.
    #[must_use]
    pub fn category_total(&self, name: &str) -> Option<f64> {
        self.by_category
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.total)
    }

    /// Total of a year.
    #[must_use]
    pub fn year_total(&self, year: &YearValue) -> Option<f64> {
        self.by_year
            .iter()
            .find(|y| &y.year == year)
            .map(|y| y.total)
    }
}

/// Dense category × location matrix.
///
/// `values[c][l]` is the total of `categories[c]` at `locations[l]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionMatrix {
    /// Category axis, in header order.
    pub categories: Vec<String>,
    /// Location axis, in first-seen order over the unfiltered dataset.
    pub locations: Vec<String>,
    /// One row per category, one column per location.
    pub values: Vec<Vec<f64>>,
}

impl ProjectionMatrix {
    /// `(categories, locations)`.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.categories.len(), self.locations.len())
    }

    /// Value at a category and location index, `0.0` when out of range.
    #[must_use]
    pub fn get(&self, category: usize, location: usize) -> f64 {
        self.values
            .get(category)
            .and_then(|row| row.get(location))
            .copied()
            .unwrap_or(0.0)
    }

    /// Sum of a location's column.
    #[must_use]
    pub fn location_total(&self, location: usize) -> f64 {
        self.values
            .iter()
            .filter_map(|row| row.get(location))
            .sum()
    }

    /// Largest cell, `0.0` for an empty matrix.
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.values.iter().flatten().copied().fold(0.0, f64::max)
    }

    /// Sum of every cell.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.values.iter().flatten().sum()
    }
}

/// Statistics panel entry for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    /// Category field name.
    pub category: String,
    /// Sum over all records.
    pub total: f64,
    /// `total` divided by the number of records, `0.0` for an empty set.
    pub average: f64,
    /// Largest single value.
    pub max: f64,
}

/// Headline figures shown above the heatmap.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapSummary {
    /// Sum of every numeric value.
    pub total: f64,
    /// `total` divided by the number of records.
    pub average_per_record: f64,
    /// Category with the strictly greatest total; `None` when nothing was
    /// counted.
    pub top_crime_type: Option<String>,
    /// Per-location totals in matrix location-axis order.
    pub location_totals: Vec<LocationTotal>,
}
