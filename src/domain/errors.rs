//! Domain error types
//!
//! This module defines the error hierarchy for Tenderflow.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Tenderflow error type
///
/// This is the primary error type used throughout the application.
/// Only conditions that abort a run are represented here; per-record
/// persistence failures are reported as upsert outcomes instead.
#[derive(Debug, Error)]
pub enum TenderflowError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Release feed errors
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(String),

    /// Another run holds the pipeline lock
    #[error("Another sync run holds the lock '{0}'")]
    RunLocked(String),

    /// The run was stopped by a shutdown signal or its deadline
    #[error("Sync interrupted: {0}")]
    Interrupted(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Release feed errors
///
/// Errors that occur when reading pages from the release feed.
/// Rate limiting is handled inside the fetch loop and only surfaces here
/// once the retry budget is spent.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Failed to reach the feed
    #[error("Failed to connect to feed: {0}")]
    ConnectionFailed(String),

    /// Non-success response other than rate limiting
    #[error("Feed returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Rate limiting persisted past the retry budget
    #[error("Rate limit not lifted after {attempts} attempts ({waited_secs}s waited)")]
    RateLimitExhausted { attempts: u32, waited_secs: u64 },

    /// Body could not be decoded as a release package
    #[error("Invalid response from feed: {0}")]
    InvalidResponse(String),

    /// Shutdown requested while waiting on the feed
    #[error("Fetch cancelled")]
    Cancelled,
}

impl FeedError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            FeedError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for TenderflowError {
    fn from(err: std::io::Error) -> Self {
        TenderflowError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for TenderflowError {
    fn from(err: serde_json::Error) -> Self {
        TenderflowError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for TenderflowError {
    fn from(err: toml::de::Error) -> Self {
        TenderflowError::Configuration(format!("TOML parse error: {err}"))
    }
}
