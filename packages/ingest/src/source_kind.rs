//! Accepted upload types and pre-read validation.
//!
//! Everything here runs before a single byte of content is read: an upload
//! is accepted or rejected purely from its file name and size.

use std::path::Path;

use crate::{IngestConfig, IngestError};

/// How the bytes of an upload are to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Line-oriented delimited text.
    Delimited {
        /// Field separator byte.
        delimiter: u8,
    },
    /// A workbook; only the first sheet is read.
    Spreadsheet,
}

impl SourceKind {
    /// Comma-separated text.
    pub const CSV: Self = Self::Delimited { delimiter: b',' };

    /// Tab-separated text.
    pub const TSV: Self = Self::Delimited { delimiter: b'\t' };

    /// Maps a file extension (case-insensitive, without the dot) to a kind.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "txt" => Some(Self::CSV),
            "tsv" | "tab" => Some(Self::TSV),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Spreadsheet),
            _ => None,
        }
    }

    /// Determines the kind of an upload from its file name.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::UnsupportedSourceType`] if the extension is
    /// missing or not one of the accepted types.
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| IngestError::UnsupportedSourceType {
                message: format!(
                    "{}: please upload a spreadsheet (.xlsx, .xls, .ods) or a delimited text file (.csv, .tsv)",
                    path.display()
                ),
            })
    }
}

/// Rejects uploads larger than the configured limit.
///
/// # Errors
///
/// Returns [`IngestError::UnsupportedSourceType`] if `size` exceeds
/// `config.max_upload_bytes`.
pub fn check_size(size: u64, config: &IngestConfig) -> Result<(), IngestError> {
    if size > config.max_upload_bytes {
        return Err(IngestError::UnsupportedSourceType {
            message: format!(
                "file size {} exceeds the {} limit",
                format_file_size(size),
                format_file_size(config.max_upload_bytes)
            ),
        });
    }
    Ok(())
}

/// Validates an upload's name and size, returning how to parse it.
///
/// # Errors
///
/// Returns [`IngestError::UnsupportedSourceType`] if either check fails.
pub fn validate_upload(
    path: &Path,
    size: u64,
    config: &IngestConfig,
) -> Result<SourceKind, IngestError> {
    let kind = SourceKind::from_path(path)?;
    check_size(size, config)?;
    Ok(kind)
}

/// Formats a byte count for display, e.g. `1.5 KB` or `10 MB`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    let mut unit = 0;
    let mut divisor: u64 = 1;
    while unit + 1 < UNITS.len() && bytes >= divisor * 1024 {
        divisor *= 1024;
        unit += 1;
    }

    let scaled = bytes as f64 / divisor as f64;
    let rounded = (scaled * 100.0).round() / 100.0;

    format!("{rounded} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_extensions() {
        assert_eq!(SourceKind::from_extension("CSV"), Some(SourceKind::CSV));
        assert_eq!(SourceKind::from_extension("tsv"), Some(SourceKind::TSV));
        assert_eq!(
            SourceKind::from_extension("xlsx"),
            Some(SourceKind::Spreadsheet)
        );
        assert_eq!(SourceKind::from_extension("xls"), Some(SourceKind::Spreadsheet));
        assert_eq!(SourceKind::from_extension("pdf"), None);
    }

    #[test]
    fn rejects_unknown_or_missing_extensions() {
        assert!(matches!(
            SourceKind::from_path(Path::new("report.pdf")),
            Err(IngestError::UnsupportedSourceType { .. })
        ));
        assert!(matches!(
            SourceKind::from_path(Path::new("README")),
            Err(IngestError::UnsupportedSourceType { .. })
        ));
    }

    #[test]
    fn rejects_oversized_uploads() {
        let config = IngestConfig::default();
        assert!(validate_upload(Path::new("a.csv"), config.max_upload_bytes, &config).is_ok());
        assert!(matches!(
            validate_upload(Path::new("a.csv"), config.max_upload_bytes + 1, &config),
            Err(IngestError::UnsupportedSourceType { .. })
        ));
    }

    #[test]
    fn formats_file_sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10 MB");
    }
}
