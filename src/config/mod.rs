//! Configuration management for Tenderflow.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Tenderflow uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `TENDERFLOW_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tenderflow::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("tenderflow.toml")?;
//!
//! println!("Feed: {}", config.feed.endpoint);
//! println!("Window: {} days", config.sync.window_days);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`FeedConfig`] - Release feed endpoint, paging, [`RateLimitConfig`] and [`RetryConfig`]
//! - [`SyncConfig`] - Run parameters (window, full resync, limit, lock, deadline)
//! - [`DatabaseConfig`] - PostgreSQL connection and pool settings
//! - [`LoggingConfig`] - Optional JSON file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [feed]
//! endpoint = "https://www.find-tender.service.gov.uk/api/1.0/ocdsReleasePackages"
//!
//! [sync]
//! window_days = 7
//!
//! [database]
//! connection_string = "${DATABASE_URL}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, DatabaseConfig, FeedConfig, LoggingConfig, RateLimitConfig, RetryConfig,
    SyncConfig, TenderflowConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
