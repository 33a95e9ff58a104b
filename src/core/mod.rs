//! Core business logic for Tenderflow.
//!
//! # Modules
//!
//! - [`sync`] - Run orchestration, per-record upserts and the run summary
//! - [`transform`] - Release to tender row mapping (stage, slug, CPV, region)
//! - [`state`] - Sync run records and the run recorder
//! - [`shutdown`] - Cooperative cancellation
//!
//! # Sync Workflow
//!
//! 1. **Lock**: Take the advisory lock so runs never overlap
//! 2. **Record**: Create the `sync_runs` row
//! 3. **Fetch**: Read a page from the release feed
//! 4. **Transform**: Map each release to a tender row
//! 5. **Upsert**: Insert or update on `ocid`, counting the outcome
//! 6. **Advance**: Follow `links.next` after a short delay
//! 7. **Finalize**: Mark the run `completed` or `error` with its counts
//!
//! # Example
//!
//! ```rust,no_run
//! use tenderflow::config::load_config;
//! use tenderflow::core::shutdown::ShutdownSignal;
//! use tenderflow::core::sync::SyncCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("tenderflow.toml")?;
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let coordinator = SyncCoordinator::connect(&config, ShutdownSignal::new(shutdown_rx)).await?;
//! let summary = coordinator.run().await?;
//!
//! println!("fetched {} inserted {} updated {}", summary.fetched, summary.inserted, summary.updated);
//! # Ok(())
//! # }
//! ```

pub mod shutdown;
pub mod state;
pub mod sync;
pub mod transform;
