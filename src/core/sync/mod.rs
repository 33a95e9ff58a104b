//! Sync orchestration
//!
//! - [`coordinator`] - page loop, limit, politeness delay, run lock and run record
//! - [`upsert`] - per-record writes with failure isolation
//! - [`summary`] - aggregate counts

pub mod coordinator;
pub mod summary;
pub mod upsert;

pub use coordinator::{SyncCoordinator, SyncOptions};
pub use summary::SyncSummary;
pub use upsert::{UpsertOutcome, Upserter};
