//! PostgreSQL row models
//!
//! Conversions between domain types and their column representation.

use crate::core::state::run::{RunCounts, RunParameters, RunStatus, SyncRun};
use crate::domain::{Result, TenderflowError};
use chrono::{DateTime, Utc};
use tokio_postgres::Row;
use uuid::Uuid;

/// Sync run row
///
/// This structure maps to the `sync_runs` table in PostgreSQL.
#[derive(Debug, Clone)]
pub struct PostgreSQLSyncRun {
    pub id: Uuid,
    pub window_days: i32,
    pub full_resync: bool,
    pub record_limit: Option<i64>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: String,
    pub fetched: i64,
    pub inserted: i64,
    pub updated: i64,
    pub errors: i64,
    pub error_message: Option<String>,
}

impl PostgreSQLSyncRun {
    /// Convert from the domain run
    pub fn from_domain(run: &SyncRun) -> Self {
        Self {
            id: run.id,
            window_days: clamp_i32(run.params.window_days as u64),
            full_resync: run.params.full_resync,
            record_limit: run.params.limit.map(clamp_i64),
            started_at: run.started_at,
            completed_at: run.completed_at,
            status: run.status.as_str().to_string(),
            fetched: clamp_i64(run.counts.fetched),
            inserted: clamp_i64(run.counts.inserted),
            updated: clamp_i64(run.counts.updated),
            errors: clamp_i64(run.counts.errors),
            error_message: run.error_message.clone(),
        }
    }

    /// Read a row selected with `SELECT * FROM sync_runs`
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            window_days: row.get("window_days"),
            full_resync: row.get("full_resync"),
            record_limit: row.get("record_limit"),
            started_at: row.get("started_at"),
            completed_at: row.get("completed_at"),
            status: row.get("status"),
            fetched: row.get("fetched"),
            inserted: row.get("inserted"),
            updated: row.get("updated"),
            errors: row.get("errors"),
            error_message: row.get("error_message"),
        }
    }

    /// Convert to the domain run
    pub fn to_domain(&self) -> Result<SyncRun> {
        let status = RunStatus::parse(&self.status).ok_or_else(|| {
            TenderflowError::Database(format!(
                "Unknown status '{}' on sync run {}",
                self.status, self.id
            ))
        })?;

        Ok(SyncRun {
            id: self.id,
            params: RunParameters {
                window_days: self.window_days.max(0) as u32,
                full_resync: self.full_resync,
                limit: self.record_limit.map(|l| l.max(0) as u64),
            },
            started_at: self.started_at,
            completed_at: self.completed_at,
            status,
            counts: RunCounts {
                fetched: self.fetched.max(0) as u64,
                inserted: self.inserted.max(0) as u64,
                updated: self.updated.max(0) as u64,
                errors: self.errors.max(0) as u64,
            },
            error_message: self.error_message.clone(),
        })
    }
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn clamp_i32(value: u64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
