//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Tenderflow configuration file.

use super::{EXIT_CONFIG, EXIT_SUCCESS};
use crate::adapters::postgresql::client::redact_connection_string;
use crate::config::{load_config, TenderflowConfig};
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading already validates, so a file that loads is valid.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        print_summary(&config);
        println!();
        Ok(EXIT_SUCCESS)
    }
}

fn print_summary(config: &TenderflowConfig) {
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  Feed Endpoint: {}", config.feed.endpoint);
    println!("  Page Size: {}", config.feed.page_size);
    println!("  Page Delay: {}ms", config.feed.page_delay_ms);
    println!(
        "  Rate Limit: {} attempts, {}s total backoff",
        config.feed.rate_limit.max_attempts, config.feed.rate_limit.max_total_backoff_secs
    );
    if config.sync.full_resync {
        println!("  Window: full resync");
    } else {
        println!("  Window: {} day(s)", config.sync.window_days);
    }
    match config.sync.limit {
        Some(limit) => println!("  Record Limit: {limit}"),
        None => println!("  Record Limit: none"),
    }
    if config.sync.run_lock {
        println!("  Run Lock: {}", config.sync.lock_name);
    } else {
        println!("  Run Lock: disabled");
    }
    println!(
        "  PostgreSQL Connection: {}",
        redact_connection_string(config.database.connection_string.expose_secret().as_ref())
    );
    println!("  Max Connections: {}", config.database.max_connections);
    println!("  SSL Mode: {}", config.database.ssl_mode);
}
