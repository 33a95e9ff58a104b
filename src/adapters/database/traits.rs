//! Database abstraction traits
//!
//! This module defines the traits that storage adapters implement to work
//! with Tenderflow. The pipeline depends only on these traits; PostgreSQL is
//! the production implementation.

use crate::core::state::run::SyncRun;
use crate::domain::{Result, TenderRow};
use async_trait::async_trait;

/// Which branch of the insert-or-update fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Inserted,
    Updated,
}

/// Storage for tender rows
#[async_trait]
pub trait TenderStore: Send + Sync {
    /// Insert or update one row keyed on `ocid`
    ///
    /// On conflict every derived field is overwritten and `synced_at` /
    /// `updated_at` are refreshed; `ocid` itself is never changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn upsert_tender(&self, row: &TenderRow) -> Result<WriteKind>;

    /// Try to take the run-scoped mutual-exclusion lock
    ///
    /// Returns `false` if another session holds it.
    async fn try_lock_run(&self, lock_name: &str) -> Result<bool>;

    /// Release a lock taken with [`TenderStore::try_lock_run`]
    async fn unlock_run(&self, lock_name: &str) -> Result<()>;

    /// Storage name for logging
    fn database_name(&self) -> &str;
}

/// Storage for sync run audit records
#[async_trait]
pub trait RunStore: Send + Sync {
    /// Persist a newly started run
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    async fn create_run(&self, run: &SyncRun) -> Result<()>;

    /// Persist the final state of a run
    ///
    /// Writes the run even if [`RunStore::create_run`] never succeeded.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn finalize_run(&self, run: &SyncRun) -> Result<()>;

    /// Most recent runs, newest first
    async fn recent_runs(&self, limit: usize) -> Result<Vec<SyncRun>>;
}
