//! Matrix projector: dense category × location totals for the heatmap.
//!
//! The location axis is the full location universe of the dataset a set was
//! derived from, so a location filtered out of the current view keeps an
//! all-zero column instead of disappearing.

use std::collections::HashMap;

use crime_stats_analytics_models::ProjectionMatrix;
use crime_stats_dataset_models::RecordSet;

/// Projects `records` into a category × location matrix.
#[must_use]
pub fn project(records: &RecordSet) -> ProjectionMatrix {
    let categories = records.categories().to_vec();
    let locations = records.known_locations().to_vec();

    let column: HashMap<&str, usize> = locations
        .iter()
        .enumerate()
        .map(|(i, loc)| (loc.as_str(), i))
        .collect();

    let mut values = vec![vec![0.0_f64; locations.len()]; categories.len()];
    for record in records {
        let Some(&l) = column.get(record.location.as_str()) else {
            continue;
        };
        for (row, value) in values.iter_mut().zip(record.values()) {
            row[l] += value.numeric();
        }
    }

    log::debug!(
        "Projected {} x {} matrix from {} records",
        categories.len(),
        locations.len(),
        records.len()
    );

    ProjectionMatrix {
        categories,
        locations,
        values,
    }
}
