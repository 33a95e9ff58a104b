//! PostgreSQL database integration
//!
//! This module provides the production storage for tender rows and sync
//! run records.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
pub use models::PostgreSQLSyncRun;
