//! Sync command implementation
//!
//! This module implements the `sync` command: one ingestion run from the
//! release feed into PostgreSQL.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_SUCCESS};
use crate::config::{load_config, TenderflowConfig};
use crate::core::shutdown::ShutdownSignal;
use crate::core::sync::SyncCoordinator;
use crate::domain::TenderflowError;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the sync command
#[derive(Args, Debug, Default)]
pub struct SyncArgs {
    /// Only fetch releases updated within the last N days
    #[arg(long, value_name = "N")]
    pub days: Option<u32>,

    /// Fetch the whole feed with no time filter
    #[arg(long, conflicts_with = "days")]
    pub full: bool,

    /// Stop after N records
    #[arg(long, value_name = "N")]
    pub limit: Option<u64>,

    /// Fetch and transform without writing to the database
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    /// Apply CLI overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut TenderflowConfig) {
        if let Some(days) = self.days {
            tracing::info!(days, "Overriding window from CLI");
            config.sync.window_days = days;
        }
        if self.full {
            tracing::info!("Enabling full resync from CLI");
            config.sync.full_resync = true;
        }
        if let Some(limit) = self.limit {
            tracing::info!(limit, "Overriding record limit from CLI");
            config.sync.limit = Some(limit);
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.sync.dry_run = true;
        }
    }

    /// Execute the sync command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting sync command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        self.apply(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG);
        }

        if config.sync.dry_run {
            println!("🔍 DRY RUN MODE - No data will be written to the database");
            println!();
        }

        let coordinator =
            match SyncCoordinator::connect(&config, ShutdownSignal::new(shutdown_signal)).await {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to initialize sync");
                    eprintln!("Failed to initialize sync: {e}");
                    return Ok(EXIT_FATAL);
                }
            };

        println!("🚀 Starting sync...");
        let summary = match coordinator.run().await {
            Ok(s) => s,
            Err(TenderflowError::RunLocked(lock)) => {
                eprintln!("Another sync is already running (lock '{lock}')");
                return Ok(EXIT_FATAL);
            }
            Err(e) => {
                eprintln!("Sync failed: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        println!();
        println!("📊 Sync Summary:");
        if let Some(run_id) = summary.run_id {
            println!("  Run: {run_id}");
        }
        println!("  Pages: {}", summary.pages);
        println!("  Fetched: {}", summary.fetched);
        println!("  Inserted: {}", summary.inserted);
        println!("  Updated: {}", summary.updated);
        println!("  Errors: {}", summary.errors);
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!();

        if summary.is_successful() {
            println!("✅ Sync completed successfully!");
        } else {
            println!("⚠️  Sync completed with {} record error(s)", summary.errors);
        }

        Ok(EXIT_SUCCESS)
    }
}
