//! Database abstraction layer
//!
//! This module provides a trait-based abstraction for persistence so the
//! pipeline can run against PostgreSQL in production and an in-memory store
//! in tests.

pub mod factory;
pub mod traits;

pub use factory::{create_postgres_adapter, create_stores, open_run_store, Stores};
pub use traits::{RunStore, TenderStore, WriteKind};
