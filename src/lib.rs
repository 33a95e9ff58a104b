// Tenderflow - OCDS Release Feed to PostgreSQL Sync
// Copyright (c) 2025 Tenderflow Contributors
// Licensed under the MIT License

//! # Tenderflow - OCDS Release Feed to PostgreSQL Sync
//!
//! Tenderflow pulls recently updated procurement releases from a paginated
//! Open Contracting (OCDS) release-package feed and keeps a `tenders` table
//! in PostgreSQL current, one row per contracting process (`ocid`).
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Fetching** release pages with cursor pagination and bounded rate-limit retry
//! - **Transforming** releases into flat tender rows with stage, slug, CPV codes and region
//! - **Upserting** rows keyed on `ocid` with per-record failure isolation
//! - **Recording** every run in `sync_runs` with its parameters and counts
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (sync, transform, state)
//! - [`adapters`] - External integrations (release feed, PostgreSQL)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tenderflow::config::load_config;
//! use tenderflow::core::shutdown::ShutdownSignal;
//! use tenderflow::core::sync::SyncCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("tenderflow.toml")?;
//!
//!     let coordinator = SyncCoordinator::connect(&config, ShutdownSignal::never()).await?;
//!     let summary = coordinator.run().await?;
//!
//!     println!("Synced {} releases", summary.fetched);
//!     Ok(())
//! }
//! ```
//!
//! ## Incremental Sync
//!
//! By default only releases updated in the last `sync.window_days` days are
//! requested. `sync.full_resync` drops the filter. Re-ingesting a release is
//! an update of the existing row, never a duplicate.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
