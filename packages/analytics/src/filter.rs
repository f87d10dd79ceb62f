//! Filter engine.
//!
//! Year and crime-category restrictions compose with AND. The input set is
//! never touched; the result shares its category list and location
//! universe.

use crime_stats_dataset_models::{CrimeRecord, FilterSpec, RecordSet, Selection};

/// Applies `spec` to `records`, preserving input order.
#[must_use]
pub fn apply(records: &RecordSet, spec: &FilterSpec) -> RecordSet {
    if spec.is_identity() {
        return records.clone();
    }

    let year = match spec.year() {
        Selection::All => YearMatch::Any,
        Selection::Only(raw) => raw
            .trim()
            .parse::<i64>()
            .map_or(YearMatch::Nothing, YearMatch::Exactly),
    };

    // An unknown category name keeps nothing, since every value counts as 0.
    let category = match spec.crime_category() {
        Selection::All => CategoryMatch::Any,
        Selection::Only(name) => records
            .category_index(name)
            .map_or(CategoryMatch::Nothing, CategoryMatch::Positive),
    };

    let filtered = records.subset(|record| year.matches(record) && category.matches(record));

    log::debug!(
        "Filter year={} category={} kept {} of {} records",
        spec.year(),
        spec.crime_category(),
        filtered.len(),
        records.len()
    );

    filtered
}

#[derive(Clone, Copy)]
enum YearMatch {
    Any,
    Exactly(i64),
    Nothing,
}

impl YearMatch {
    fn matches(self, record: &CrimeRecord) -> bool {
        match self {
            Self::Any => true,
            Self::Exactly(year) => record.year.as_year() == Some(year),
            Self::Nothing => false,
        }
    }
}

#[derive(Clone, Copy)]
enum CategoryMatch {
    Any,
    Positive(usize),
    Nothing,
}

impl CategoryMatch {
    fn matches(self, record: &CrimeRecord) -> bool {
        match self {
            Self::Any => true,
            Self::Positive(idx) => record.count_at(idx) > 0.0,
            Self::Nothing => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{record, scenario, set};
    use crime_stats_dataset_models::{CategoryValue, YearValue};

    fn only(value: &str) -> Selection {
        Selection::Only(value.to_string())
    }

    #[test]
    fn identity_filter_returns_input() {
        let records = scenario();
        assert_eq!(apply(&records, &FilterSpec::default()), records);
    }

    #[test]
    fn year_filter_keeps_matching_records_in_order() {
        let records = scenario();
        let filtered = apply(&records, &FilterSpec::default().with_year(only("2020")));

        assert_eq!(filtered.len(), 2);
        let total: f64 = filtered.iter().map(CrimeRecord::total).sum();
        assert!((total - 15.0).abs() < f64::EPSILON);
        let locations: Vec<&str> = filtered.iter().map(|r| r.location.as_str()).collect();
        assert_eq!(locations, vec!["A", "B"]);
    }

    #[test]
    fn year_selection_is_trimmed_and_unparseable_matches_nothing() {
        let records = scenario();
        let spec = FilterSpec::default();
        assert_eq!(apply(&records, &spec.with_year(only(" 2021 "))).len(), 1);
        assert!(apply(&records, &spec.with_year(only("twenty"))).is_empty());
        assert!(apply(&records, &spec.with_year(only("1999"))).is_empty());
    }

    #[test]
    fn text_years_never_match_a_specific_year() {
        let records = set(
            &["A"],
            vec![CrimeRecord::new(
                "X".into(),
                YearValue::Text("2020".into()),
                vec![CategoryValue::Count(1.0)],
            )],
        );
        let filtered = apply(&records, &FilterSpec::default().with_year(only("2020")));
        assert!(filtered.is_empty());
    }

    #[test]
    fn category_filter_requires_a_positive_value() {
        let records = set(
            &["Assault", "Rape"],
            vec![
                record("A", 2020, &[10.0, 5.0]),
                record("B", 2020, &[0.0, 4.0]),
                CrimeRecord::new(
                    "C".into(),
                    YearValue::Year(2020),
                    vec![CategoryValue::Text("n/a".into()), CategoryValue::Count(1.0)],
                ),
            ],
        );
        let filtered = apply(
            &records,
            &FilterSpec::default().with_crime_category(only("Assault")),
        );
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.records()[0].location, "A");
    }

    #[test]
    fn category_named_all_is_selectable() {
        let records = set(
            &["All", "Rape"],
            vec![record("A", 2020, &[3.0, 0.0]), record("B", 2020, &[0.0, 1.0])],
        );
        let spec = FilterSpec::default().with_crime_category(Selection::parse("All"));

        let filtered = apply(&records, &spec);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.records()[0].location, "A");
    }

    #[test]
    fn unknown_category_matches_nothing() {
        let filtered = apply(
            &scenario(),
            &FilterSpec::default().with_crime_category(only("Burglary")),
        );
        assert!(filtered.is_empty());
    }

    #[test]
    fn filters_compose_and_leave_input_untouched() {
        let records = scenario();
        let before = records.clone();
        let spec = FilterSpec::new(only("2020"), only("Assault"));

        let filtered = apply(&records, &spec);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.records()[0].location, "A");
        assert_eq!(records, before);
        assert!(
            filtered
                .iter()
                .all(|r| records.records().contains(r))
        );
    }
}
