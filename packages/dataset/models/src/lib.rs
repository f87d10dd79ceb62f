#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canonical crime record, grid, and filter types.
//!
//! Every ingested dataset flows through the same two shapes: a [`Grid`] of
//! type-coerced cells straight out of the schema inferencer, and a
//! [`RecordSet`] of [`CrimeRecord`]s produced by the normalizer. All derived
//! projections are computed from a [`RecordSet`] plus a [`FilterSpec`].

pub mod filter;

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use filter::{FilterSpec, Selection};

/// Header name of the mandatory location column.
pub const LOCATION_FIELD: &str = "Location";

/// Header name of the optional year column.
pub const YEAR_FIELD: &str = "Year";

/// Renders a number without a trailing `.0` when it holds an integral value.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// A single cell after type coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// The cell held a plain numeric literal.
    Number(f64),
    /// Anything else, including the empty string.
    Text(String),
}

impl CellValue {
    /// An empty text cell, used to pad short rows.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Returns the numeric value, if the cell was coerced to a number.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Whether the cell is empty text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// How a row was fitted to the header width when pushed into a [`Grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFit {
    /// The row already had one cell per header.
    Exact,
    /// The row was short and this many empty cells were appended.
    Padded(usize),
    /// The row was long and this many trailing cells were dropped.
    Truncated(usize),
}

/// Header names plus rows of cells aligned positionally to them.
///
/// Every row holds exactly `headers().len()` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    /// Creates an empty grid with the given header row.
    #[must_use]
    pub const fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding short rows with empty cells and dropping cells
    /// past the last header.
    pub fn push_row(&mut self, mut cells: Vec<CellValue>) -> RowFit {
        let width = self.headers.len();
        let fit = match cells.len() {
            n if n == width => RowFit::Exact,
            n if n < width => {
                cells.resize(width, CellValue::empty());
                RowFit::Padded(width - n)
            }
            n => {
                cells.truncate(width);
                RowFit::Truncated(n - width)
            }
        };
        self.rows.push(cells);
        fit
    }

    /// Header names in column order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows in input order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Position of the column with exactly this header name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the grid has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The `Year` of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearValue {
    /// A numeric year, truncated to an integer.
    Year(i64),
    /// A year cell that was not numeric, kept verbatim.
    Text(String),
}

impl YearValue {
    /// Returns the integer year, if the cell was numeric.
    #[must_use]
    pub const fn as_year(&self) -> Option<i64> {
        match self {
            Self::Year(y) => Some(*y),
            Self::Text(_) => None,
        }
    }
}

impl std::fmt::Display for YearValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Year(y) => write!(f, "{y}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// The value of one crime-category field in a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryValue {
    /// A finite, non-negative count.
    Count(f64),
    /// A cell that could not be used as a count. Contributes zero to sums.
    Text(String),
}

impl CategoryValue {
    /// The value as it participates in sums: the count, or `0.0` for text.
    #[must_use]
    pub const fn numeric(&self) -> f64 {
        match self {
            Self::Count(n) => *n,
            Self::Text(_) => 0.0,
        }
    }
}

impl std::fmt::Display for CategoryValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count(n) => f.write_str(&format_number(*n)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One row of crime data: a location, a year, and one value per category
/// field of the owning [`RecordSet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeRecord {
    /// Location identifier (police station, district, area).
    pub location: String,
    /// Year the counts belong to.
    pub year: YearValue,
    values: Vec<CategoryValue>,
}

impl CrimeRecord {
    /// Creates a record. `values` must line up with the category list of the
    /// [`RecordSet`] it is added to.
    #[must_use]
    pub const fn new(location: String, year: YearValue, values: Vec<CategoryValue>) -> Self {
        Self {
            location,
            year,
            values,
        }
    }

    /// Category values in category order.
    #[must_use]
    pub fn values(&self) -> &[CategoryValue] {
        &self.values
    }

    /// Numeric value of the category at `index`, `0.0` when out of range or
    /// non-numeric.
    #[must_use]
    pub fn count_at(&self, index: usize) -> f64 {
        self.values.get(index).map_or(0.0, CategoryValue::numeric)
    }

    /// Sum of every numeric category value.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.values.iter().map(CategoryValue::numeric).sum()
    }
}

/// Error returned when a record does not have one value per category field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMismatchError {
    /// Location of the offending record.
    pub location: String,
    /// Number of category fields in the set.
    pub expected: usize,
    /// Number of values the record carried.
    pub actual: usize,
}

impl std::fmt::Display for ShapeMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "record for '{}' has {} category values, expected {}",
            self.location, self.actual, self.expected
        )
    }
}

impl std::error::Error for ShapeMismatchError {}

/// An immutable set of [`CrimeRecord`]s sharing one category field list.
///
/// Besides its records, a set remembers every location (first-seen order)
/// of the dataset it was originally built from, so subsets derived through
/// [`RecordSet::subset`] still know the full location universe.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    categories: Arc<[String]>,
    known_locations: Arc<[String]>,
    records: Vec<CrimeRecord>,
}

impl RecordSet {
    /// Builds a record set.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeMismatchError`] if any record does not carry exactly
    /// one value per category.
    pub fn new(
        categories: Vec<String>,
        records: Vec<CrimeRecord>,
    ) -> Result<Self, ShapeMismatchError> {
        if let Some(bad) = records.iter().find(|r| r.values.len() != categories.len()) {
            return Err(ShapeMismatchError {
                location: bad.location.clone(),
                expected: categories.len(),
                actual: bad.values.len(),
            });
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut known_locations: Vec<String> = Vec::new();
        for record in &records {
            if seen.insert(record.location.as_str()) {
                known_locations.push(record.location.clone());
            }
        }

        Ok(Self {
            categories: categories.into(),
            known_locations: known_locations.into(),
            records,
        })
    }

    /// Crime-category field names in header order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Every distinct location of the originating dataset, in first-seen
    /// order, whether or not it survives in this set.
    #[must_use]
    pub fn known_locations(&self) -> &[String] {
        &self.known_locations
    }

    /// Records in input order.
    #[must_use]
    pub fn records(&self) -> &[CrimeRecord] {
        &self.records
    }

    /// Iterates over the records in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, CrimeRecord> {
        self.records.iter()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of a category field by exact name.
    #[must_use]
    pub fn category_index(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == name)
    }

    /// Derives a new set holding the records that satisfy `keep`, in their
    /// original order. The category list and location universe are shared.
    #[must_use]
    pub fn subset<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&CrimeRecord) -> bool,
    {
        Self {
            categories: Arc::clone(&self.categories),
            known_locations: Arc::clone(&self.known_locations),
            records: self.records.iter().filter(|&r| keep(r)).cloned().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a CrimeRecord;
    type IntoIter = std::slice::Iter<'a, CrimeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
