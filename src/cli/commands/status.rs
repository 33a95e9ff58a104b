//! Status command implementation
//!
//! This module implements the `status` command for displaying recent
//! sync runs.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_SUCCESS};
use crate::adapters::database::open_run_store;
use crate::config::{load_config, TenderflowConfig};
use crate::core::state::{RunRecorder, RunStatus, SyncRun};
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Number of runs to show
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking sync status");

        println!("📊 Sync Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        self.show(&config).await
    }

    /// Print recent runs from the configured database
    ///
    /// Read-only: no schema bootstrap is attempted.
    async fn show(&self, config: &TenderflowConfig) -> anyhow::Result<i32> {
        let runs = match open_run_store(&config.database).await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to connect to database");
                println!("   Error: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        let recent = match RunRecorder::new(runs).recent_runs(self.limit).await {
            Ok(r) => r,
            Err(e) => {
                println!("❌ Failed to load sync runs");
                println!("   Error: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        if recent.is_empty() {
            println!("No sync history found.");
            println!("Run 'tenderflow sync' to start ingesting releases.");
            return Ok(EXIT_SUCCESS);
        }

        println!("Last {} run(s):", recent.len());
        println!();
        println!(
            "{:<38} {:<20} {:<14} {:>8} {:>8} {:>8} {:>7} {:>9}",
            "Run", "Started", "Status", "Fetched", "Inserted", "Updated", "Errors", "Duration"
        );
        println!("{}", "-".repeat(120));

        for run in &recent {
            println!("{}", format_run(run));
            if let Some(message) = &run.error_message {
                println!("    {message}");
            }
        }

        println!();
        Ok(EXIT_SUCCESS)
    }
}

fn format_run(run: &SyncRun) -> String {
    let status = match run.status {
        RunStatus::Completed => "✅ completed",
        RunStatus::Error => "❌ error",
        RunStatus::Created => "🔄 running",
    };

    let duration = run
        .duration()
        .map(|d| format!("{}s", d.num_seconds()))
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{:<38} {:<20} {:<14} {:>8} {:>8} {:>8} {:>7} {:>9}",
        run.id,
        run.started_at.format("%Y-%m-%d %H:%M:%S"),
        status,
        run.counts.fetched,
        run.counts.inserted,
        run.counts.updated,
        run.counts.errors,
        duration
    )
}
