//! The reference dataset shipped with the binary.

use crate::{Dataset, IngestError, SourceKind, load_bytes, null_progress};

/// Name the bundled dataset is reported under.
pub const BUNDLED_DATASET_NAME: &str = "maharashtra_crime_data.csv";

const BUNDLED_CSV: &str = include_str!("../data/maharashtra_crime_data.csv");

/// Parses the bundled dataset through the same inference and normalization
/// path as an upload.
///
/// # Errors
///
/// Returns [`IngestError`] if the embedded file is malformed.
pub fn bundled_dataset() -> Result<Dataset, IngestError> {
    load_bytes(
        BUNDLED_DATASET_NAME,
        BUNDLED_CSV.as_bytes(),
        SourceKind::CSV,
        &null_progress(),
    )
}
