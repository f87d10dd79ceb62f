//! Schema inference: raw upload bytes to a [`Grid`] of coerced cells.
//!
//! Delimited text goes through the `csv` crate one line at a time (flexible
//! record lengths, quoted fields honoured within a line); workbooks go through `calamine` and only the
//! first sheet is read. Both paths apply the same cell coercion rule.

use std::io::Cursor;
use std::sync::LazyLock;

use calamine::{Data, Reader as _, open_workbook_auto_from_rs};
use crime_stats_dataset_models::{CellValue, Grid, RowFit};
use regex::Regex;

use crate::{IngestError, SourceKind};

/// A plain numeric literal: optional sign, digits, optional decimal part.
/// Period is the only decimal separator.
static NUMERIC_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)$").unwrap_or_else(|_| unreachable!())
});

/// Coerces one text cell. Surrounding whitespace is trimmed.
#[must_use]
pub fn coerce_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if NUMERIC_LITERAL.is_match(trimmed)
        && let Ok(n) = trimmed.parse::<f64>()
    {
        return CellValue::Number(n);
    }
    CellValue::Text(trimmed.to_string())
}

/// Parses raw upload bytes into a grid.
///
/// # Errors
///
/// Returns [`IngestError::MalformedSource`] if the input has no header row
/// plus at least one data row, or cannot be read as the given kind.
pub fn infer(input: &[u8], kind: SourceKind) -> Result<Grid, IngestError> {
    let (headers, rows) = match kind {
        SourceKind::Delimited { delimiter } => read_delimited(input, delimiter)?,
        SourceKind::Spreadsheet => read_spreadsheet(input)?,
    };

    let mut grid = Grid::new(headers);
    let mut padded = 0_usize;
    let mut truncated = 0_usize;
    for row in rows {
        match grid.push_row(row) {
            RowFit::Exact => {}
            RowFit::Padded(_) => padded += 1,
            RowFit::Truncated(_) => truncated += 1,
        }
    }

    if padded > 0 {
        log::debug!("Padded {padded} short row(s) with empty cells");
    }
    if truncated > 0 {
        log::debug!("Dropped cells past the last header in {truncated} row(s)");
    }
    log::debug!(
        "Inferred grid: {} columns, {} rows",
        grid.headers().len(),
        grid.len()
    );

    Ok(grid)
}

type RawRows = (Vec<String>, Vec<Vec<CellValue>>);

fn read_delimited(input: &[u8], delimiter: u8) -> Result<RawRows, IngestError> {
    let text = String::from_utf8_lossy(input);
    let mut builder = csv::ReaderBuilder::new();
    builder.delimiter(delimiter).has_headers(false).flexible(true);

    // Each input line is exactly one row. Quotes are honoured within a line
    // but never carry a field across a line break.
    let mut lines: Vec<Vec<String>> = Vec::new();
    for (number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut reader = builder.from_reader(line.as_bytes());
        let Some(result) = reader.records().next() else {
            continue;
        };
        let record = result.map_err(|e| IngestError::MalformedSource {
            message: format!("could not read line {}: {e}", number + 1),
        })?;
        let fields: Vec<String> = record.iter().map(ToString::to_string).collect();
        if fields.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        lines.push(fields);
    }

    let mut lines = lines.into_iter();
    let header_line = lines.next().ok_or_else(too_short)?;
    let headers = clean_headers(header_line);

    let rows: Vec<Vec<CellValue>> = lines
        .map(|fields| fields.iter().map(|f| coerce_cell(f)).collect())
        .collect();
    if rows.is_empty() {
        return Err(too_short());
    }

    Ok((headers, rows))
}

fn read_spreadsheet(input: &[u8]) -> Result<RawRows, IngestError> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(input)).map_err(|e| IngestError::MalformedSource {
            message: format!("could not open workbook: {e}"),
        })?;

    let sheet_count = workbook.sheet_names().len();
    if sheet_count > 1 {
        log::debug!("Workbook has {sheet_count} sheets; reading only the first");
    }

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::MalformedSource {
            message: "workbook contains no sheets".to_string(),
        })?
        .map_err(|e| IngestError::MalformedSource {
            message: format!("could not read first sheet: {e}"),
        })?;

    let mut rows = range
        .rows()
        .filter(|row| !row.iter().all(|cell| matches!(cell, Data::Empty)));

    let header_row = rows.next().ok_or_else(too_short)?;
    let headers = clean_headers(header_row.iter().map(ToString::to_string).collect());

    let rows: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(spreadsheet_cell).collect())
        .collect();
    if rows.is_empty() {
        return Err(too_short());
    }

    Ok((headers, rows))
}

/// Converts one workbook cell. Numeric cells stay numeric, string cells go
/// through [`coerce_cell`], everything else becomes its text rendering.
#[allow(clippy::cast_precision_loss)]
fn spreadsheet_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => coerce_cell(s),
        Data::Empty => CellValue::empty(),
        other => CellValue::Text(other.to_string()),
    }
}

/// Trims header names and drops trailing blank headers.
fn clean_headers(raw: Vec<String>) -> Vec<String> {
    let mut headers: Vec<String> = raw
        .into_iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    while headers.last().is_some_and(String::is_empty) {
        headers.pop();
    }
    headers
}

fn too_short() -> IngestError {
    IngestError::MalformedSource {
        message: "file must contain a header row and at least one data row".to_string(),
    }
}
