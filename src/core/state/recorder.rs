//! Run recorder
//!
//! Persists [`SyncRun`] records through a [`RunStore`]. Telemetry writes are
//! best effort: a failed write is logged as a warning and never fails the
//! run it describes.

use crate::adapters::database::traits::RunStore;
use crate::core::state::run::{RunCounts, RunParameters, SyncRun};
use crate::domain::Result;
use std::sync::Arc;

/// Creates and finalizes sync run records
pub struct RunRecorder {
    store: Arc<dyn RunStore + Send + Sync>,
    dry_run: bool,
}

impl RunRecorder {
    pub fn new(store: Arc<dyn RunStore + Send + Sync>) -> Self {
        Self {
            store,
            dry_run: false,
        }
    }

    /// Log runs instead of writing them
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Start a run and record it as `created`
    pub async fn start(&self, params: RunParameters) -> SyncRun {
        let run = SyncRun::start(params);

        if self.dry_run {
            tracing::info!(run_id = %run.id, "DRY RUN: Would record sync run start");
            return run;
        }

        if let Err(e) = self.store.create_run(&run).await {
            tracing::warn!(run_id = %run.id, error = %e, "Failed to record sync run start");
        } else {
            tracing::debug!(run_id = %run.id, "Sync run recorded");
        }

        run
    }

    /// Finalize a run as `completed`
    pub async fn complete(&self, run: SyncRun, counts: RunCounts) -> SyncRun {
        let run = run.complete(counts);
        self.persist_final(&run).await;
        run
    }

    /// Finalize a run as `error`
    pub async fn fail(&self, run: SyncRun, counts: RunCounts, message: &str) -> SyncRun {
        let run = run.fail(counts, message);
        self.persist_final(&run).await;
        run
    }

    /// Most recent runs, newest first
    pub async fn recent_runs(&self, limit: usize) -> Result<Vec<SyncRun>> {
        self.store.recent_runs(limit).await
    }

    async fn persist_final(&self, run: &SyncRun) {
        if self.dry_run {
            tracing::info!(
                run_id = %run.id,
                status = %run.status,
                "DRY RUN: Would record sync run result"
            );
            return;
        }

        if let Err(e) = self.store.finalize_run(run).await {
            tracing::warn!(
                run_id = %run.id,
                status = %run.status,
                error = %e,
                "Failed to record sync run result"
            );
        }
    }
}
