#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ingestion of crime datasets: upload validation, schema inference, and
//! normalization into a [`RecordSet`].
//!
//! The only asynchronous step is reading an upload into memory
//! ([`load_path`]). Everything after that runs synchronously on the fully
//! resident bytes through [`load_bytes`], which is also the path taken by the
//! bundled reference dataset.

pub mod bundled;
pub mod inference;
pub mod normalize;
pub mod progress;
pub mod source_kind;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crime_stats_dataset_models::RecordSet;
use thiserror::Error;

pub use bundled::{BUNDLED_DATASET_NAME, bundled_dataset};
pub use inference::infer;
pub use normalize::normalize;
pub use progress::{NullProgress, ProgressCallback, null_progress};
pub use source_kind::{SourceKind, check_size, format_file_size, validate_upload};

/// Default upload size limit: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Environment variable that overrides [`IngestConfig::max_upload_bytes`].
pub const MAX_UPLOAD_BYTES_ENV: &str = "CRIME_STATS_MAX_UPLOAD_BYTES";

/// Number of progress stages reported by [`load_path`].
const LOAD_STAGES: u64 = 3;

/// Errors that terminate the ingestion of one upload.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The content could not be parsed, or holds fewer than two rows.
    #[error("Malformed source: {message}")]
    MalformedSource {
        /// Human-readable description of what went wrong.
        message: String,
    },

    /// The content parsed but lacks a required column.
    #[error("Schema violation: {message}")]
    SchemaViolation {
        /// Human-readable description of what went wrong.
        message: String,
    },

    /// The upload was rejected by extension or size before being read.
    #[error("Unsupported source: {message}")]
    UnsupportedSourceType {
        /// Human-readable description of what went wrong.
        message: String,
    },

    /// Reading the upload failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Upload limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestConfig {
    /// Largest accepted upload, in bytes.
    pub max_upload_bytes: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl IngestConfig {
    /// Builds a config from the environment, falling back to defaults for
    /// unset or unparseable values.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(MAX_UPLOAD_BYTES_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(bytes) => config.max_upload_bytes = bytes,
                Err(e) => log::warn!(
                    "Ignoring {MAX_UPLOAD_BYTES_ENV}={raw:?}: {e}; using {}",
                    format_file_size(config.max_upload_bytes)
                ),
            }
        }
        config
    }
}

/// A normalized dataset together with the name it was loaded from.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// File name of the upload, or the bundled dataset's name.
    pub source_name: String,
    /// The normalized records.
    pub records: RecordSet,
}

/// Runs inference and normalization over bytes already in memory.
///
/// # Errors
///
/// Returns [`IngestError::MalformedSource`] or
/// [`IngestError::SchemaViolation`] if the content cannot be turned into
/// records.
pub fn load_bytes(
    source_name: &str,
    bytes: &[u8],
    kind: SourceKind,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Dataset, IngestError> {
    progress.set_message(format!("Inferring schema of {source_name}"));
    let grid = infer(bytes, kind)?;
    progress.inc(1);

    progress.set_message(format!("Normalizing {} rows", grid.len()));
    let records = normalize(&grid)?;
    progress.inc(1);

    Ok(Dataset {
        source_name: source_name.to_string(),
        records,
    })
}

/// Validates, reads, and ingests an upload from disk.
///
/// The extension and size are checked before any content is read.
///
/// # Errors
///
/// Returns [`IngestError::UnsupportedSourceType`] for rejected uploads,
/// [`IngestError::Io`] if the file cannot be read, and the errors of
/// [`load_bytes`] for unusable content.
pub async fn load_path(
    path: &Path,
    config: &IngestConfig,
    progress: Arc<dyn ProgressCallback>,
) -> Result<Dataset, IngestError> {
    let start = Instant::now();
    let source_name = path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    );

    progress.set_total(LOAD_STAGES);
    let result = read_and_load(path, &source_name, config, &progress).await;

    match &result {
        Ok(dataset) => {
            let elapsed = start.elapsed();
            progress.finish(format!(
                "{source_name}: {} records",
                dataset.records.len()
            ));
            log::debug!(
                "Loaded {source_name} in {:.2}s ({} records, {} categories)",
                elapsed.as_secs_f64(),
                dataset.records.len(),
                dataset.records.categories().len()
            );
        }
        Err(_) => progress.finish_and_clear(),
    }

    result
}

async fn read_and_load(
    path: &Path,
    source_name: &str,
    config: &IngestConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Dataset, IngestError> {
    let kind = SourceKind::from_path(path)?;
    let size = tokio::fs::metadata(path).await?.len();
    check_size(size, config)?;

    progress.set_message(format!("Reading {source_name} ({})", format_file_size(size)));
    let bytes = tokio::fs::read(path).await?;
    progress.inc(1);

    load_bytes(source_name, &bytes, kind, progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Default)]
    struct CountingProgress {
        total: AtomicU64,
        done: AtomicU64,
        finished: AtomicU64,
        cleared: AtomicU64,
    }

    impl ProgressCallback for CountingProgress {
        fn set_total(&self, total: u64) {
            self.total.store(total, Ordering::Relaxed);
        }
        fn inc(&self, delta: u64) {
            self.done.fetch_add(delta, Ordering::Relaxed);
        }
        fn set_message(&self, _msg: String) {}
        fn finish(&self, _msg: String) {
            self.finished.fetch_add(1, Ordering::Relaxed);
        }
        fn finish_and_clear(&self) {
            self.cleared.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("crime_stats_ingest_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn default_config_allows_ten_mebibytes() {
        assert_eq!(IngestConfig::default().max_upload_bytes, 10_485_760);
    }

    #[test]
    fn load_bytes_runs_inference_and_normalization() {
        let dataset = load_bytes(
            "inline.csv",
            b"Location,Year,Assault\nA,2020,4\n",
            SourceKind::CSV,
            &null_progress(),
        )
        .unwrap();

        assert_eq!(dataset.source_name, "inline.csv");
        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.records.categories(), ["Assault"]);
    }

    #[tokio::test]
    async fn load_path_reads_a_csv_upload() {
        let path = temp_file(
            "upload.csv",
            b"Location,Year,Assault,Rape\nA,2020,10,5\nB,2020,0,0\nA,2021,3,2\n",
        );
        let progress = Arc::new(CountingProgress::default());

        let dataset = load_path(&path, &IngestConfig::default(), progress.clone())
            .await
            .unwrap();

        assert_eq!(dataset.source_name, "upload.csv");
        assert_eq!(dataset.records.len(), 3);
        assert_eq!(progress.total.load(Ordering::Relaxed), LOAD_STAGES);
        assert_eq!(progress.done.load(Ordering::Relaxed), LOAD_STAGES);
        assert_eq!(progress.finished.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn load_path_rejects_before_reading() {
        let path = temp_file("notes.pdf", b"Location,Year\nA,2020\n");
        let progress = Arc::new(CountingProgress::default());

        let err = load_path(&path, &IngestConfig::default(), progress.clone())
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::UnsupportedSourceType { .. }));
        assert_eq!(progress.done.load(Ordering::Relaxed), 0);
        assert_eq!(progress.cleared.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn load_path_rejects_oversized_uploads() {
        let path = temp_file("big.csv", b"Location,Year,A\nA,2020,1\n");
        let config = IngestConfig {
            max_upload_bytes: 4,
        };

        let err = load_path(&path, &config, null_progress()).await.unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedSourceType { .. }));
    }

    #[tokio::test]
    async fn load_path_reports_missing_files_as_io_errors() {
        let path = std::env::temp_dir().join("crime_stats_ingest_missing").join("gone.csv");

        let err = load_path(&path, &IngestConfig::default(), null_progress())
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Io(_)));
    }
}
