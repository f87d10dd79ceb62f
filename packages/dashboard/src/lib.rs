#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard session: the active dataset, the current filter, and the
//! outcome of the last upload.
//!
//! A session only ever holds one dataset. A successful upload replaces it
//! wholesale; a failed one leaves it active and records an [`UploadNotice`].

pub mod snapshot;

use crime_stats_dataset_models::{CrimeRecord, FilterSpec};
use crime_stats_geography::DistrictTable;
use crime_stats_ingest::{Dataset, IngestError};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use snapshot::DashboardSnapshot;

/// Which stage rejected an upload.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum NoticeKind {
    /// Wrong extension or too large.
    Rejected,
    /// Content could not be parsed.
    Malformed,
    /// Parsed, but the required columns are missing.
    Schema,
    /// The file could not be read.
    Io,
}

impl From<&IngestError> for NoticeKind {
    fn from(err: &IngestError) -> Self {
        match err {
            IngestError::UnsupportedSourceType { .. } => Self::Rejected,
            IngestError::MalformedSource { .. } => Self::Malformed,
            IngestError::SchemaViolation { .. } => Self::Schema,
            IngestError::Io(_) => Self::Io,
        }
    }
}

/// A dismissible message about a failed upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadNotice {
    /// Failure category.
    pub kind: NoticeKind,
    /// Error text shown to the user.
    pub message: String,
}

/// The active dataset plus the current filter.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    dataset: Dataset,
    filter: FilterSpec,
    notice: Option<UploadNotice>,
}

impl DashboardSession {
    /// Starts a session on `dataset` with the default filter.
    #[must_use]
    pub fn new(dataset: Dataset) -> Self {
        log::info!(
            "Active dataset: {} ({} records)",
            dataset.source_name,
            dataset.records.len()
        );
        Self {
            dataset,
            filter: FilterSpec::default(),
            notice: None,
        }
    }

    /// Starts a session on the bundled reference dataset.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] if the bundled dataset cannot be parsed.
    pub fn with_bundled() -> Result<Self, IngestError> {
        Ok(Self::new(crime_stats_ingest::bundled_dataset()?))
    }

    /// The active dataset.
    #[must_use]
    pub const fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The current filter.
    #[must_use]
    pub const fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// Replaces the current filter.
    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.filter = filter;
    }

    /// Resets the filter to `{all, all}`.
    pub fn reset_filter(&mut self) {
        self.filter = FilterSpec::reset();
    }

    /// The notice left by the last failed upload, if not yet dismissed.
    #[must_use]
    pub const fn notice(&self) -> Option<&UploadNotice> {
        self.notice.as_ref()
    }

    /// Clears the upload notice.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Installs the outcome of an upload.
    ///
    /// On success the dataset is replaced, the filter is reset (category
    /// names may differ) and any notice is cleared. On failure the previous
    /// dataset and filter stay active and a notice is recorded. Returns
    /// whether the upload was installed.
    pub fn install(&mut self, result: Result<Dataset, IngestError>) -> bool {
        match result {
            Ok(dataset) => {
                log::info!(
                    "Installed dataset {} ({} records, {} categories)",
                    dataset.source_name,
                    dataset.records.len(),
                    dataset.records.categories().len()
                );
                self.dataset = dataset;
                self.filter = FilterSpec::reset();
                self.notice = None;
                true
            }
            Err(e) => {
                log::warn!(
                    "Upload rejected, keeping {}: {e}",
                    self.dataset.source_name
                );
                self.notice = Some(UploadNotice {
                    kind: NoticeKind::from(&e),
                    message: e.to_string(),
                });
                false
            }
        }
    }

    /// Records of the active, unfiltered dataset whose location equals
    /// `name` case-insensitively.
    #[must_use]
    pub fn district_records(&self, name: &str) -> Vec<&CrimeRecord> {
        let name = name.to_lowercase();
        self.dataset
            .records
            .iter()
            .filter(|r| r.location.to_lowercase() == name)
            .collect()
    }

    /// Computes every projection for the active dataset and filter.
    #[must_use]
    pub fn snapshot(&self, districts: &DistrictTable) -> DashboardSnapshot {
        DashboardSnapshot::compute(
            &self.dataset.source_name,
            &self.dataset.records,
            &self.filter,
            districts,
        )
    }
}
