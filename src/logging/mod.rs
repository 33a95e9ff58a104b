//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console output
//! - Configurable log levels (overridable with `RUST_LOG`)
//! - Optional JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use tenderflow::logging::init_logging;
//! use tenderflow::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_console_logging, init_logging, LoggingGuard};

/// Log the outcome of one processed page
///
/// # Example
///
/// ```no_run
/// use tenderflow::log_page_processed;
///
/// log_page_processed!(3, 100, true);
/// ```
#[macro_export]
macro_rules! log_page_processed {
    ($page:expr, $records:expr, $has_next:expr) => {
        tracing::info!(
            page = $page,
            records = $records,
            has_next = $has_next,
            "Processed page"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use tenderflow::log_error_with_context;
/// use tenderflow::domain::TenderflowError;
///
/// let error = TenderflowError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use tenderflow::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, "Connection timeout");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = %$reason,
            "Retrying request"
        );
    };
}
