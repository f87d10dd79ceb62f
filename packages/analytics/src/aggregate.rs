//! Aggregation engine: grand, per-category, per-year, and per-region totals
//! plus the top-locations ranking.

use std::collections::BTreeMap;

use crime_stats_analytics_models::{AggregateResult, CategoryTotal, RankedLocation, YearTotal};
use crime_stats_dataset_models::{RecordSet, YearValue};
use crime_stats_geography::DistrictTable;

/// Length of the top-locations ranking.
pub const TOP_LOCATIONS: usize = 5;

/// Computes every total of `records`.
///
/// Regions are resolved through `districts`; a location without a district
/// still counts toward every other total.
#[must_use]
pub fn aggregate(records: &RecordSet, districts: &DistrictTable) -> AggregateResult {
    let mut by_category = vec![0.0_f64; records.categories().len()];
    let mut by_year: BTreeMap<YearValue, f64> = BTreeMap::new();
    let mut by_region: BTreeMap<String, f64> = BTreeMap::new();
    let mut unmatched = 0_usize;

    for record in records {
        for (slot, value) in by_category.iter_mut().zip(record.values()) {
            *slot += value.numeric();
        }

        let total = record.total();
        *by_year.entry(record.year.clone()).or_insert(0.0) += total;

        match districts.region_of(&record.location) {
            Some(region) => *by_region.entry(region.to_string()).or_insert(0.0) += total,
            None => unmatched += 1,
        }
    }

    if unmatched > 0 {
        log::debug!("{unmatched} record(s) have no district and were left out of region totals");
    }

    let grand_total = by_category.iter().sum();

    AggregateResult {
        grand_total,
        by_category: records
            .categories()
            .iter()
            .zip(by_category)
            .map(|(name, total)| CategoryTotal {
                name: name.clone(),
                total,
            })
            .collect(),
        by_year: by_year
            .into_iter()
            .map(|(year, total)| YearTotal { year, total })
            .collect(),
        by_region,
        top_locations: top_locations(records, TOP_LOCATIONS),
    }
}

/// Ranks locations (case-insensitively grouped) by their total, descending.
/// Ties keep first-seen order.
fn top_locations(records: &RecordSet, limit: usize) -> Vec<RankedLocation> {
    let mut groups: Vec<(String, f64)> = Vec::new();
    let mut index: BTreeMap<String, usize> = BTreeMap::new();

    for record in records {
        let key = record.location.to_lowercase();
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, 0.0));
            groups.len() - 1
        });
        groups[slot].1 += record.total();
    }

    groups.sort_by(|a, b| b.1.total_cmp(&a.1));

    groups
        .into_iter()
        .take(limit)
        .map(|(key, count)| RankedLocation {
            name: capitalize_first(&key),
            count,
        })
        .collect()
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{record, scenario, set};
    use crime_stats_dataset_models::{CategoryValue, CrimeRecord};
    use crime_stats_geography_models::District;

    fn districts() -> DistrictTable {
        DistrictTable::new(vec![
            District {
                name: "Pune".into(),
                lat: 18.52,
                lng: 73.86,
                region: "Western Maharashtra".into(),
            },
            District {
                name: "Nagpur".into(),
                lat: 21.15,
                lng: 79.09,
                region: "Vidarbha".into(),
            },
        ])
    }

    #[test]
    fn scenario_totals() {
        let result = aggregate(&scenario(), &districts());

        assert!((result.grand_total - 20.0).abs() < f64::EPSILON);
        assert_eq!(result.category_total("Assault"), Some(13.0));
        assert_eq!(result.category_total("Rape"), Some(7.0));
        assert_eq!(result.year_total(&YearValue::Year(2020)), Some(15.0));
        assert_eq!(result.year_total(&YearValue::Year(2021)), Some(5.0));
        assert_eq!(
            result.top_locations[0],
            RankedLocation {
                name: "A".into(),
                count: 20.0
            }
        );
    }

    #[test]
    fn category_totals_sum_to_grand_total() {
        let records = set(
            &["A", "B", "C"],
            vec![
                record("Pune", 2019, &[1.5, 2.0, 0.0]),
                record("Nagpur", 2020, &[4.0, 0.0, 9.0]),
                CrimeRecord::new(
                    "Pune".into(),
                    YearValue::Text("FY21".into()),
                    vec![
                        CategoryValue::Text("n/a".into()),
                        CategoryValue::Count(3.0),
                        CategoryValue::Text(String::new()),
                    ],
                ),
            ],
        );
        let result = aggregate(&records, &districts());

        let sum: f64 = result.by_category.iter().map(|c| c.total).sum();
        assert!((sum - result.grand_total).abs() < f64::EPSILON);
        assert!((result.grand_total - 19.5).abs() < f64::EPSILON);
        assert_eq!(result.year_total(&YearValue::Text("FY21".into())), Some(3.0));
        assert_eq!(
            result.by_year.last().map(|y| &y.year),
            Some(&YearValue::Text("FY21".into()))
        );
    }

    #[test]
    fn unknown_locations_count_everywhere_but_regions() {
        let records = set(
            &["A"],
            vec![
                record("pune", 2020, &[10.0]),
                record("Unknown Village", 2020, &[7.0]),
            ],
        );
        let result = aggregate(&records, &districts());

        assert!((result.grand_total - 17.0).abs() < f64::EPSILON);
        assert_eq!(result.by_region.len(), 1);
        assert_eq!(result.by_region.get("Western Maharashtra"), Some(&10.0));
        assert!(
            result
                .top_locations
                .iter()
                .any(|l| l.name == "Unknown village")
        );
    }

    #[test]
    fn top_locations_group_case_insensitively_and_keep_tie_order() {
        let records = set(
            &["A"],
            vec![
                record("pune", 2020, &[5.0]),
                record("Nagpur", 2020, &[8.0]),
                record("PUNE", 2021, &[3.0]),
                record("Thane", 2020, &[8.0]),
                record("Akola", 2020, &[1.0]),
                record("Beed", 2020, &[2.0]),
                record("Latur", 2020, &[0.0]),
            ],
        );
        let result = aggregate(&records, &districts());

        let names: Vec<&str> = result
            .top_locations
            .iter()
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(names, vec!["Pune", "Nagpur", "Thane", "Beed", "Akola"]);
        assert_eq!(result.top_locations.len(), TOP_LOCATIONS);
    }

    #[test]
    fn output_is_identical_across_runs() {
        let records = scenario();
        assert_eq!(
            aggregate(&records, &districts()),
            aggregate(&records, &districts())
        );
    }

    #[test]
    fn empty_set_aggregates_to_zero() {
        let records = set(&["A", "B"], Vec::new());
        let result = aggregate(&records, &districts());

        assert!(result.grand_total.abs() < f64::EPSILON);
        assert_eq!(result.by_category.len(), 2);
        assert!(result.by_year.is_empty());
        assert!(result.top_locations.is_empty());
    }

    #[test]
    fn capitalizes_only_the_first_character() {
        assert_eq!(capitalize_first("navi mumbai"), "Navi mumbai");
        assert_eq!(capitalize_first(""), "");
    }
}
