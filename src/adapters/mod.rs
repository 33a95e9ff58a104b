//! External system integrations for Tenderflow.
//!
//! - [`feed`] - OCDS release-package feed over HTTP
//! - [`database`] - Storage traits and the store factory
//! - [`postgresql`] - PostgreSQL implementation of the stores
//!
//! The orchestrator depends only on [`feed::ReleaseFeed`],
//! [`database::TenderStore`] and [`database::RunStore`], so tests run it
//! against in-memory implementations.

pub mod database;
pub mod feed;
pub mod postgresql;
