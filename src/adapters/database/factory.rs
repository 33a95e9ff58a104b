//! Storage factory
//!
//! Builds the PostgreSQL-backed stores from configuration. Only the sync
//! path bootstraps the schema.

use crate::adapters::database::traits::{RunStore, TenderStore};
use crate::adapters::postgresql::adapter::PostgreSQLAdapter;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::config::DatabaseConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Tender store and run store sharing one connection pool
pub type Stores = (
    Arc<dyn TenderStore + Send + Sync>,
    Arc<dyn RunStore + Send + Sync>,
);

/// Connect to PostgreSQL and return the adapter
///
/// # Errors
///
/// Returns an error if the pool cannot be created or the connection test fails.
pub async fn create_postgres_adapter(config: &DatabaseConfig) -> Result<Arc<PostgreSQLAdapter>> {
    tracing::info!("Creating PostgreSQL client");
    let client = PostgreSQLClient::new(config.clone()).await?;
    client.test_connection().await?;
    Ok(Arc::new(PostgreSQLAdapter::new(client)))
}

/// Create both stores and make sure the schema exists
///
/// # Errors
///
/// Returns an error if the database is unreachable or the migration fails.
pub async fn create_stores(config: &DatabaseConfig) -> Result<Stores> {
    let adapter = create_postgres_adapter(config).await?;
    adapter.client().ensure_schema().await?;

    let tenders: Arc<dyn TenderStore + Send + Sync> = adapter.clone();
    let runs: Arc<dyn RunStore + Send + Sync> = adapter;
    Ok((tenders, runs))
}

/// Connect a run store for reading, without touching the schema
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn open_run_store(config: &DatabaseConfig) -> Result<Arc<dyn RunStore + Send + Sync>> {
    let runs: Arc<dyn RunStore + Send + Sync> = create_postgres_adapter(config).await?;
    Ok(runs)
}
