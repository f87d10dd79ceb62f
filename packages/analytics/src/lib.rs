#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Projections over a [`RecordSet`](crime_stats_dataset_models::RecordSet).
//!
//! Every function here is total: it takes an immutable record set and
//! returns a freshly computed value object. Nothing is cached, so a filter
//! change simply recomputes everything downstream of [`filter::apply`].

pub mod aggregate;
pub mod filter;
pub mod matrix;
pub mod stats;

pub use aggregate::{TOP_LOCATIONS, aggregate};
pub use stats::{available_categories, available_years, category_stats, heatmap_summary};

#[cfg(test)]
pub(crate) mod test_support {
    use crime_stats_dataset_models::{CategoryValue, CrimeRecord, RecordSet, YearValue};

    pub fn record(location: &str, year: i64, values: &[f64]) -> CrimeRecord {
        CrimeRecord::new(
            location.to_string(),
            YearValue::Year(year),
            values.iter().copied().map(CategoryValue::Count).collect(),
        )
    }

    pub fn set(categories: &[&str], records: Vec<CrimeRecord>) -> RecordSet {
        RecordSet::new(
            categories.iter().map(ToString::to_string).collect(),
            records,
        )
        .unwrap()
    }

    /// `Location,Year,Assault,Rape / A,2020,10,5 / B,2020,0,0 / A,2021,3,2`
    pub fn scenario() -> RecordSet {
        set(
            &["Assault", "Rape"],
            vec![
                record("A", 2020, &[10.0, 5.0]),
                record("B", 2020, &[0.0, 0.0]),
                record("A", 2021, &[3.0, 2.0]),
            ],
        )
    }
}
