//! Per-record persistence with failure isolation

use crate::adapters::database::traits::{TenderStore, WriteKind};
use crate::domain::{Ocid, TenderRow};
use std::sync::Arc;

/// Result of persisting one row
///
/// Failures are values, not errors, so one bad record never stops a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    Error(String),
}

/// Writes tender rows through a [`TenderStore`]
pub struct Upserter {
    store: Arc<dyn TenderStore + Send + Sync>,
    dry_run: bool,
}

impl Upserter {
    pub fn new(store: Arc<dyn TenderStore + Send + Sync>) -> Self {
        Self {
            store,
            dry_run: false,
        }
    }

    /// Report `Inserted` for every valid row without writing
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Insert or update one row keyed on `ocid`
    pub async fn upsert(&self, row: &TenderRow) -> UpsertOutcome {
        if let Err(e) = Ocid::new(row.ocid.as_str()) {
            tracing::warn!(
                release_id = ?row.release_id,
                "Skipping release without ocid"
            );
            return UpsertOutcome::Error(e);
        }

        if self.dry_run {
            tracing::debug!(ocid = %row.ocid, "DRY RUN: Would upsert tender");
            return UpsertOutcome::Inserted;
        }

        match self.store.upsert_tender(row).await {
            Ok(WriteKind::Inserted) => UpsertOutcome::Inserted,
            Ok(WriteKind::Updated) => UpsertOutcome::Updated,
            Err(e) => {
                tracing::error!(ocid = %row.ocid, error = %e, "Failed to upsert tender");
                UpsertOutcome::Error(e.to_string())
            }
        }
    }
}
