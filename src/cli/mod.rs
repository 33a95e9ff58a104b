//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Tenderflow using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Tenderflow - OCDS release feed to PostgreSQL sync
#[derive(Parser, Debug)]
#[command(name = "tenderflow")]
#[command(version, about, long_about = None)]
#[command(author = "Tenderflow Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "tenderflow.toml", env = "TENDERFLOW_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TENDERFLOW_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch recent releases and upsert them into the tenders table
    Sync(commands::sync::SyncArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show recent sync runs
    Status(commands::status::StatusArgs),
}
