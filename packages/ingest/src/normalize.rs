//! Record normalization: [`Grid`] to canonical [`RecordSet`].

use crime_stats_dataset_models::{
    CategoryValue, CellValue, CrimeRecord, Grid, LOCATION_FIELD, RecordSet, YEAR_FIELD, YearValue,
};

use crate::IngestError;

/// Converts an inferred grid into canonical records.
///
/// Every header other than `Location` and `Year` becomes a category field,
/// in header order. Blank and repeated header names are skipped.
///
/// # Errors
///
/// Returns [`IngestError::SchemaViolation`] if there is no `Location`
/// column (matched case-sensitively).
pub fn normalize(grid: &Grid) -> Result<RecordSet, IngestError> {
    let location_idx = grid
        .column_index(LOCATION_FIELD)
        .ok_or_else(|| IngestError::SchemaViolation {
            message: format!(
                "missing required '{LOCATION_FIELD}' column (found: {})",
                grid.headers().join(", ")
            ),
        })?;
    let year_idx = grid.column_index(YEAR_FIELD);
    if year_idx.is_none() {
        log::debug!("No '{YEAR_FIELD}' column; every record gets an empty year");
    }

    let mut categories: Vec<String> = Vec::new();
    let mut category_columns: Vec<usize> = Vec::new();
    for (idx, header) in grid.headers().iter().enumerate() {
        if header == LOCATION_FIELD || header == YEAR_FIELD {
            continue;
        }
        if header.is_empty() {
            log::warn!("Skipping column {} with a blank header", idx + 1);
            continue;
        }
        if categories.contains(header) {
            log::warn!("Skipping repeated category column '{header}'");
            continue;
        }
        categories.push(header.clone());
        category_columns.push(idx);
    }

    let records: Vec<CrimeRecord> = grid
        .rows()
        .iter()
        .map(|row| {
            let location = row[location_idx].to_string();
            let year = year_idx
                .map_or_else(|| YearValue::Text(String::new()), |i| year_of(&row[i]));
            let values = category_columns
                .iter()
                .map(|&i| category_value(&row[i]))
                .collect();
            CrimeRecord::new(location, year, values)
        })
        .collect();

    log::debug!(
        "Normalized {} records with {} categories",
        records.len(),
        categories.len()
    );

    // Every record was built from `category_columns`, so shapes always match.
    RecordSet::new(categories, records).map_err(|e| IngestError::SchemaViolation {
        message: e.to_string(),
    })
}

#[allow(clippy::cast_possible_truncation)]
fn year_of(cell: &CellValue) -> YearValue {
    match cell {
        CellValue::Number(n) if n.is_finite() => YearValue::Year(n.trunc() as i64),
        other => YearValue::Text(other.to_string()),
    }
}

/// Only finite, non-negative numbers are counts. Negative numbers are kept
/// as text and so contribute 0 to every total instead of reducing it.
fn category_value(cell: &CellValue) -> CategoryValue {
    match cell {
        CellValue::Number(n) if n.is_finite() && *n >= 0.0 => CategoryValue::Count(*n),
        other => CategoryValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SourceKind, infer};

    fn normalize_csv(input: &str) -> Result<RecordSet, IngestError> {
        normalize(&infer(input.as_bytes(), SourceKind::CSV)?)
    }

    #[test]
    fn builds_records_in_header_order() {
        let set = normalize_csv(
            "Location,Year,Assault,Rape\nA,2020,10,5\nB,2020,0,0\nA,2021,3,2\n",
        )
        .unwrap();

        assert_eq!(set.categories(), ["Assault", "Rape"]);
        assert_eq!(set.len(), 3);
        let first = &set.records()[0];
        assert_eq!(first.location, "A");
        assert_eq!(first.year, YearValue::Year(2020));
        assert_eq!(
            first.values(),
            [CategoryValue::Count(10.0), CategoryValue::Count(5.0)]
        );
        assert_eq!(set.known_locations(), ["A", "B"]);
    }

    #[test]
    fn year_column_is_optional_and_may_appear_anywhere() {
        let set = normalize_csv("Assault,Location\n4,Pune\n").unwrap();
        assert_eq!(set.categories(), ["Assault"]);
        assert_eq!(set.records()[0].year, YearValue::Text(String::new()));
        assert_eq!(set.records()[0].location, "Pune");
    }

    #[test]
    fn missing_location_is_a_schema_violation() {
        assert!(matches!(
            normalize_csv("District,Year,Assault\nA,2020,1\n"),
            Err(IngestError::SchemaViolation { .. })
        ));
        assert!(matches!(
            normalize_csv("location,Year,Assault\nA,2020,1\n"),
            Err(IngestError::SchemaViolation { .. })
        ));
    }

    #[test]
    fn short_row_fields_become_zero_contributing_text() {
        let set = normalize_csv("Location,Year,Assault,Rape\nC,2022,7\n").unwrap();
        let record = &set.records()[0];
        assert_eq!(record.values()[1], CategoryValue::Text(String::new()));
        assert!((record.total() - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_and_text_counts_contribute_zero() {
        let set = normalize_csv("Location,Year,A,B,C\nX,2020,-4,n/a,2.5\n").unwrap();
        let record = &set.records()[0];
        assert_eq!(record.values()[0], CategoryValue::Text("-4".into()));
        assert_eq!(record.values()[1], CategoryValue::Text("n/a".into()));
        assert!((record.total() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn numeric_years_are_truncated_and_text_years_kept() {
        let set = normalize_csv("Location,Year,A\nX,2020.7,1\nY,FY21,1\n").unwrap();
        assert_eq!(set.records()[0].year, YearValue::Year(2020));
        assert_eq!(set.records()[1].year, YearValue::Text("FY21".into()));
    }

    #[test]
    fn numeric_locations_render_without_fraction() {
        let set = normalize_csv("Location,Year,A\n12,2020,1\n").unwrap();
        assert_eq!(set.records()[0].location, "12");
    }

    #[test]
    fn repeated_and_blank_category_headers_are_skipped() {
        let set = normalize_csv("Location,A,,A,B\nX,1,2,3,4\n").unwrap();
        assert_eq!(set.categories(), ["A", "B"]);
        assert_eq!(
            set.records()[0].values(),
            [CategoryValue::Count(1.0), CategoryValue::Count(4.0)]
        );
    }

    #[test]
    fn survives_serialization_round_trip() {
        let original = normalize_csv(
            "Location,Year,Assault on Women (354),Rape (376/511)\n\
             \"Pune, City\",2019,12,3\n\
             Nagpur,2020,0,7.5\n\
             Pune,2020,4,1\n",
        )
        .unwrap();

        let mut writer = csv::Writer::from_writer(Vec::new());
        let mut header = vec![LOCATION_FIELD.to_string(), YEAR_FIELD.to_string()];
        header.extend(original.categories().iter().cloned());
        writer.write_record(&header).unwrap();
        for record in &original {
            let mut row = vec![record.location.clone(), record.year.to_string()];
            row.extend(record.values().iter().map(ToString::to_string));
            writer.write_record(&row).unwrap();
        }
        let bytes = writer.into_inner().unwrap();

        let reparsed = normalize(&infer(&bytes, SourceKind::CSV).unwrap()).unwrap();
        assert_eq!(reparsed, original);
    }
}
