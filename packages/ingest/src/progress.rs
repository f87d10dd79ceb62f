//! Progress reporting for the ingestion pipeline.
//!
//! The pipeline only knows about the [`ProgressCallback`] trait; binaries
//! decide how to render it (an `indicatif` bar, a log line, or nothing).

use std::sync::Arc;

/// Receives stage-level progress from the ingestion pipeline.
pub trait ProgressCallback: Send + Sync {
    /// Set the total number of stages (enables percentage display).
    fn set_total(&self, total: u64);

    /// Advance progress by `delta` stages.
    fn inc(&self, delta: u64);

    /// Update the message shown next to the indicator.
    fn set_message(&self, msg: String);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);

    /// Mark progress as complete and remove the indicator.
    fn finish_and_clear(&self);
}

/// A [`ProgressCallback`] that ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
    fn finish_and_clear(&self) {}
}

/// Returns a shared [`NullProgress`] instance.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
