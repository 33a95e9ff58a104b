//! Sync summary and reporting

use crate::core::state::run::RunCounts;
use std::time::Duration;
use uuid::Uuid;

/// Aggregate result of a sync run
#[derive(Debug, Clone, Default)]
pub struct SyncSummary {
    /// Run record this summary belongs to
    pub run_id: Option<Uuid>,

    /// Records taken from the feed
    pub fetched: u64,

    /// New tenders
    pub inserted: u64,

    /// Existing tenders refreshed
    pub updated: u64,

    /// Records that could not be persisted
    pub errors: u64,

    /// Pages requested
    pub pages: u64,

    /// Wall-clock duration
    pub duration: Duration,
}

impl SyncSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_run_id(mut self, run_id: Uuid) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Counters in the shape stored on the run record
    pub fn counts(&self) -> RunCounts {
        RunCounts {
            fetched: self.fetched,
            inserted: self.inserted,
            updated: self.updated,
            errors: self.errors,
        }
    }

    /// Check if every record was persisted
    pub fn is_successful(&self) -> bool {
        self.errors == 0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = ?self.run_id,
            fetched = self.fetched,
            inserted = self.inserted,
            updated = self.updated,
            errors = self.errors,
            pages = self.pages,
            duration_secs = self.duration.as_secs_f64(),
            "Sync completed"
        );

        if self.errors > 0 {
            tracing::warn!(errors = self.errors, "Sync completed with record errors");
        }
    }
}
