//! Sync run audit record
//!
//! One [`SyncRun`] is written per pipeline invocation: created when the run
//! starts and finalized exactly once when it ends, successfully or not.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Longest error message stored on a run
pub const MAX_ERROR_MESSAGE_CHARS: usize = 2000;

/// Run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Run started and has not been finalized
    Created,
    /// Run reached the end of the feed or its record limit
    Completed,
    /// Run aborted on a fatal error
    Error,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Created => "created",
            RunStatus::Completed => "completed",
            RunStatus::Error => "error",
        }
    }

    /// Parse a stored status value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "created" => Some(RunStatus::Created),
            "completed" => Some(RunStatus::Completed),
            "error" => Some(RunStatus::Error),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunStatus::Created)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved input parameters of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParameters {
    /// Incremental window in days
    pub window_days: u32,

    /// Whether the time filter was dropped
    pub full_resync: bool,

    /// Optional record limit
    pub limit: Option<u64>,
}

/// Aggregate record counters
///
/// On every finished run `fetched == inserted + updated + errors`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounts {
    pub fetched: u64,
    pub inserted: u64,
    pub updated: u64,
    pub errors: u64,
}

impl RunCounts {
    /// Whether every fetched record was accounted for by exactly one outcome
    pub fn is_consistent(&self) -> bool {
        self.fetched == self.inserted + self.updated + self.errors
    }
}

/// One pipeline invocation's audit record
///
/// # Examples
///
/// ```
/// use tenderflow::core::state::run::{RunCounts, RunParameters, RunStatus, SyncRun};
///
/// let run = SyncRun::start(RunParameters { window_days: 7, full_resync: false, limit: None });
/// assert_eq!(run.status, RunStatus::Created);
///
/// let counts = RunCounts { fetched: 2, inserted: 2, updated: 0, errors: 0 };
/// let run = run.complete(counts);
/// assert_eq!(run.status, RunStatus::Completed);
/// assert!(run.completed_at.is_some());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRun {
    pub id: Uuid,
    pub params: RunParameters,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: RunStatus,
    pub counts: RunCounts,
    pub error_message: Option<String>,
}

impl SyncRun {
    /// A new run in `created` state
    pub fn start(params: RunParameters) -> Self {
        Self {
            id: Uuid::new_v4(),
            params,
            started_at: Utc::now(),
            completed_at: None,
            status: RunStatus::Created,
            counts: RunCounts::default(),
            error_message: None,
        }
    }

    /// Finalize as `completed`
    pub fn complete(self, counts: RunCounts) -> Self {
        Self {
            completed_at: Some(Utc::now()),
            status: RunStatus::Completed,
            counts,
            error_message: None,
            ..self
        }
    }

    /// Finalize as `error` with the counts reached before the failure
    pub fn fail(self, counts: RunCounts, message: &str) -> Self {
        Self {
            completed_at: Some(Utc::now()),
            status: RunStatus::Error,
            counts,
            error_message: Some(truncate_message(message)),
            ..self
        }
    }

    /// Wall-clock duration of a finalized run
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.completed_at.map(|done| done - self.started_at)
    }
}

fn truncate_message(message: &str) -> String {
    match message.char_indices().nth(MAX_ERROR_MESSAGE_CHARS) {
        Some((idx, _)) => message[..idx].to_string(),
        None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> RunParameters {
        RunParameters {
            window_days: 7,
            full_resync: false,
            limit: Some(50),
        }
    }

    #[test]
    fn test_start_is_created() {
        let run = SyncRun::start(params());
        assert_eq!(run.status, RunStatus::Created);
        assert!(run.completed_at.is_none());
        assert_eq!(run.counts, RunCounts::default());
        assert!(run.duration().is_none());
    }

    #[test]
    fn test_fail_keeps_identity_and_counts() {
        let run = SyncRun::start(params());
        let id = run.id;
        let counts = RunCounts {
            fetched: 3,
            inserted: 2,
            updated: 0,
            errors: 1,
        };

        let run = run.fail(counts, "Feed returned HTTP 500: boom");
        assert_eq!(run.id, id);
        assert_eq!(run.status, RunStatus::Error);
        assert_eq!(run.counts, counts);
        assert_eq!(
            run.error_message.as_deref(),
            Some("Feed returned HTTP 500: boom")
        );
        assert!(run.duration().is_some());
    }

    #[test]
    fn test_error_message_truncated() {
        let run = SyncRun::start(params()).fail(RunCounts::default(), &"x".repeat(5000));
        assert_eq!(
            run.error_message.map(|m| m.chars().count()),
            Some(MAX_ERROR_MESSAGE_CHARS)
        );
    }

    #[test]
    fn test_status_parse_round_trip() {
        for status in [RunStatus::Created, RunStatus::Completed, RunStatus::Error] {
            assert_eq!(RunStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RunStatus::parse("running"), None);
        assert!(!RunStatus::Created.is_terminal());
        assert!(RunStatus::Error.is_terminal());
    }

    #[test]
    fn test_counts_consistency() {
        let mut counts = RunCounts {
            fetched: 5,
            inserted: 3,
            updated: 1,
            errors: 1,
        };
        assert!(counts.is_consistent());
        counts.fetched = 6;
        assert!(!counts.is_consistent());
    }
}
