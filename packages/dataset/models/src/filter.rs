//! Declarative year and crime-category filter.
//!
//! A [`FilterSpec`] is never edited in place: every control change produces
//! a new value through [`FilterSpec::with_year`] or
//! [`FilterSpec::with_crime_category`].

use serde::{Deserialize, Serialize};

/// Literal used for "no restriction" in both filter fields.
pub const ALL: &str = "all";

/// One filter field: either unrestricted or restricted to a single value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    /// No restriction.
    #[default]
    All,
    /// Restrict to exactly this value (a year literal or a category name).
    Only(String),
}

impl Selection {
    /// Parses a control value. Exactly `"all"` selects everything; anything
    /// else, including `"All"`, is kept verbatim so a category header of that
    /// name stays selectable.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }

    /// Returns the selected value, or `None` for [`Selection::All`].
    #[must_use]
    pub fn as_only(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Only(v) => Some(v),
        }
    }

    /// Whether this is [`Selection::All`].
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(v) => f.write_str(v),
        }
    }
}

impl std::str::FromStr for Selection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Selection> for String {
    fn from(value: Selection) -> Self {
        value.to_string()
    }
}

/// The year / crime-category filter applied before every projection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    year: Selection,
    crime_category: Selection,
}

impl FilterSpec {
    /// Creates a filter from both selections.
    #[must_use]
    pub const fn new(year: Selection, crime_category: Selection) -> Self {
        Self {
            year,
            crime_category,
        }
    }

    /// The `{all, all}` filter.
    #[must_use]
    pub fn reset() -> Self {
        Self::default()
    }

    /// Year selection.
    #[must_use]
    pub const fn year(&self) -> &Selection {
        &self.year
    }

    /// Crime-category selection.
    #[must_use]
    pub const fn crime_category(&self) -> &Selection {
        &self.crime_category
    }

    /// A copy of this filter with a different year selection.
    #[must_use]
    pub fn with_year(&self, year: Selection) -> Self {
        Self {
            year,
            crime_category: self.crime_category.clone(),
        }
    }

    /// A copy of this filter with a different crime-category selection.
    #[must_use]
    pub fn with_crime_category(&self, crime_category: Selection) -> Self {
        Self {
            year: self.year.clone(),
            crime_category,
        }
    }

    /// Whether the filter keeps every record.
    #[must_use]
    pub const fn is_identity(&self) -> bool {
        self.year.is_all() && self.crime_category.is_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_exact_sentinel_selects_everything() {
        assert_eq!(Selection::parse("all"), Selection::All);
        assert_eq!(Selection::parse("All"), Selection::Only("All".into()));
        assert_eq!(Selection::parse(" ALL "), Selection::Only(" ALL ".into()));
        assert_eq!(Selection::parse("2020"), Selection::Only("2020".into()));
    }

    #[test]
    fn with_methods_leave_the_original_untouched() {
        let base = FilterSpec::default();
        let by_year = base.with_year(Selection::parse("2020"));
        let both = by_year.with_crime_category(Selection::parse("Assault"));

        assert!(base.is_identity());
        assert_eq!(by_year.year(), &Selection::Only("2020".into()));
        assert!(by_year.crime_category().is_all());
        assert_eq!(both.year(), by_year.year());
        assert_eq!(both.crime_category().as_only(), Some("Assault"));
        assert_eq!(FilterSpec::reset(), base);
    }

    #[test]
    fn serializes_as_plain_strings() {
        let spec = FilterSpec::new(Selection::parse("2020"), Selection::All);
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"{"year":"2020","crimeCategory":"all"}"#);

        let back: FilterSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }
}
