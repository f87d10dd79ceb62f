#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! District reference table and geo intensity projection.
//!
//! The default table of Maharashtra districts is baked into the binary at
//! compile time via [`include_str!`]. A replacement table with the same TOML
//! shape can be loaded from disk with [`load_district_table`].

pub mod projection;

use std::collections::BTreeMap;
use std::path::Path;

use crime_stats_geography_models::District;
use serde::Deserialize;
use thiserror::Error;

pub use projection::project;

/// Embedded default district table.
const DEFAULT_DISTRICTS_TOML: &str = include_str!("../districts/maharashtra.toml");

/// Errors that can occur while loading a district table.
#[derive(Debug, Error)]
pub enum GeographyError {
    /// The table file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The table is not valid TOML or does not have the expected shape.
    #[error("District table parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The table parsed but contains no districts.
    #[error("District table is empty")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct DistrictTableFile {
    #[serde(default)]
    districts: Vec<District>,
}

/// Ordered, read-only list of districts with case-insensitive name lookup.
///
/// When two rows share a name (ignoring case) lookups resolve to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictTable {
    districts: Vec<District>,
    index: BTreeMap<String, usize>,
}

impl DistrictTable {
    /// Builds a table from districts in display order.
    #[must_use]
    pub fn new(districts: Vec<District>) -> Self {
        let mut index = BTreeMap::new();
        for (i, district) in districts.iter().enumerate() {
            index.entry(district.name.to_lowercase()).or_insert(i);
        }
        Self { districts, index }
    }

    /// Finds a district by exact, case-insensitive name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&District> {
        self.index
            .get(&name.to_lowercase())
            .map(|&i| &self.districts[i])
    }

    /// Region of the district with this name, if any.
    #[must_use]
    pub fn region_of(&self, name: &str) -> Option<&str> {
        self.find(name).map(|d| d.region.as_str())
    }

    /// Districts in table order.
    #[must_use]
    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    /// Number of districts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.districts.len()
    }

    /// Whether the table has no districts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }
}

/// Parses a district table from TOML (`[[districts]]` entries with `name`,
/// `lat`, `lng`, `region`).
///
/// # Errors
///
/// Returns [`GeographyError::Toml`] if the document is malformed and
/// [`GeographyError::Empty`] if it lists no districts.
pub fn parse_district_toml(toml_str: &str) -> Result<DistrictTable, GeographyError> {
    let file: DistrictTableFile = toml::from_str(toml_str)?;
    if file.districts.is_empty() {
        return Err(GeographyError::Empty);
    }
    Ok(DistrictTable::new(file.districts))
}

/// Loads a district table from a TOML file on disk.
///
/// # Errors
///
/// Returns [`GeographyError`] if the file cannot be read or parsed.
pub fn load_district_table(path: &Path) -> Result<DistrictTable, GeographyError> {
    let contents = std::fs::read_to_string(path)?;
    let table = parse_district_toml(&contents)?;
    log::info!(
        "Loaded {} districts from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}

/// Returns the embedded default district table.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (this is a compile-time
/// guarantee since the table is embedded).
#[must_use]
pub fn default_district_table() -> DistrictTable {
    parse_district_toml(DEFAULT_DISTRICTS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse maharashtra.toml: {e}"))
}
