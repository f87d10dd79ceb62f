//! Geo projection: per-district crime totals bucketed into intensity tiers.
//!
//! Iteration is driven by the district table, not by the records, so a
//! location missing from the table never reaches the map. Districts with no
//! matching records are left out entirely rather than emitted as zero points.

use std::collections::BTreeMap;

use crime_stats_dataset_models::RecordSet;
use crime_stats_geography_models::{GeoPoint, IntensityTier};

use crate::DistrictTable;

/// Projects a record set onto the districts of `districts`.
#[must_use]
pub fn project(records: &RecordSet, districts: &DistrictTable) -> Vec<GeoPoint> {
    // lower-cased location -> summed total; a key exists iff a record matched
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for record in records {
        *totals.entry(record.location.to_lowercase()).or_insert(0.0) += record.total();
    }

    let points: Vec<GeoPoint> = districts
        .districts()
        .iter()
        .filter_map(|district| {
            let total = *totals.get(&district.name.to_lowercase())?;
            Some(GeoPoint {
                location_id: district.name.clone(),
                coordinates: district.coordinates(),
                region: district.region.clone(),
                intensity_tier: IntensityTier::for_total(total),
                total_count: total,
            })
        })
        .collect();

    log::debug!(
        "Projected {} of {} districts from {} records",
        points.len(),
        districts.len(),
        records.len()
    );

    points
}
