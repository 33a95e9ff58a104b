//! PostgreSQL adapter implementing the storage traits

use crate::adapters::database::traits::{RunStore, TenderStore, WriteKind};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::PostgreSQLSyncRun;
use crate::core::state::run::SyncRun;
use crate::domain::{Result, TenderRow};
use async_trait::async_trait;
use std::sync::Arc;

/// Insert-or-update keyed on `ocid`
///
/// `xmax` is zero only for a tuple created by this statement, so it tells
/// the insert branch from the update branch without a second query.
const UPSERT_TENDER: &str = r#"
    INSERT INTO tenders (
        ocid, release_id, title, slug, description, status, stage,
        buyer_name, buyer_id,
        value_amount, value_currency, value_min, value_max,
        published_at, tender_start, tender_end, contract_start, contract_end,
        cpv_codes, region, raw_payload, synced_at, updated_at
    )
    VALUES (
        $1, $2, $3, $4, $5, $6, $7,
        $8, $9,
        $10, $11, $12, $13,
        $14, $15, $16, $17, $18,
        $19, $20, $21, $22, $23
    )
    ON CONFLICT (ocid) DO UPDATE SET
        release_id = EXCLUDED.release_id,
        title = EXCLUDED.title,
        slug = EXCLUDED.slug,
        description = EXCLUDED.description,
        status = EXCLUDED.status,
        stage = EXCLUDED.stage,
        buyer_name = EXCLUDED.buyer_name,
        buyer_id = EXCLUDED.buyer_id,
        value_amount = EXCLUDED.value_amount,
        value_currency = EXCLUDED.value_currency,
        value_min = EXCLUDED.value_min,
        value_max = EXCLUDED.value_max,
        published_at = EXCLUDED.published_at,
        tender_start = EXCLUDED.tender_start,
        tender_end = EXCLUDED.tender_end,
        contract_start = EXCLUDED.contract_start,
        contract_end = EXCLUDED.contract_end,
        cpv_codes = EXCLUDED.cpv_codes,
        region = EXCLUDED.region,
        raw_payload = EXCLUDED.raw_payload,
        synced_at = EXCLUDED.synced_at,
        updated_at = EXCLUDED.updated_at
    RETURNING (xmax = 0) AS inserted
"#;

const INSERT_RUN: &str = r#"
    INSERT INTO sync_runs (
        id, window_days, full_resync, record_limit, started_at, completed_at,
        status, fetched, inserted, updated, errors, error_message
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
"#;

const FINALIZE_RUN: &str = r#"
    INSERT INTO sync_runs (
        id, window_days, full_resync, record_limit, started_at, completed_at,
        status, fetched, inserted, updated, errors, error_message
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
    ON CONFLICT (id) DO UPDATE SET
        completed_at = EXCLUDED.completed_at,
        status = EXCLUDED.status,
        fetched = EXCLUDED.fetched,
        inserted = EXCLUDED.inserted,
        updated = EXCLUDED.updated,
        errors = EXCLUDED.errors,
        error_message = EXCLUDED.error_message
"#;

/// PostgreSQL implementation of the storage traits
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    /// Create a new PostgreSQL adapter
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }

    async fn write_run(&self, statement: &str, run: &SyncRun) -> Result<()> {
        let pg = PostgreSQLSyncRun::from_domain(run);
        self.client
            .execute(
                statement,
                &[
                    &pg.id,
                    &pg.window_days,
                    &pg.full_resync,
                    &pg.record_limit,
                    &pg.started_at,
                    &pg.completed_at,
                    &pg.status,
                    &pg.fetched,
                    &pg.inserted,
                    &pg.updated,
                    &pg.errors,
                    &pg.error_message,
                ],
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl TenderStore for PostgreSQLAdapter {
    async fn upsert_tender(&self, row: &TenderRow) -> Result<WriteKind> {
        let stage = row.stage.as_str();

        let result = self
            .client
            .query_one(
                UPSERT_TENDER,
                &[
                    &row.ocid,
                    &row.release_id,
                    &row.title,
                    &row.slug,
                    &row.description,
                    &row.status,
                    &stage,
                    &row.buyer_name,
                    &row.buyer_id,
                    &row.value_amount,
                    &row.value_currency,
                    &row.value_min,
                    &row.value_max,
                    &row.published_at,
                    &row.tender_start,
                    &row.tender_end,
                    &row.contract_start,
                    &row.contract_end,
                    &row.cpv_codes,
                    &row.region,
                    &row.raw_payload,
                    &row.synced_at,
                    &row.updated_at,
                ],
            )
            .await?;

        let inserted: bool = result.get("inserted");
        tracing::trace!(ocid = %row.ocid, inserted = inserted, "Tender upserted");

        Ok(if inserted {
            WriteKind::Inserted
        } else {
            WriteKind::Updated
        })
    }

    async fn try_lock_run(&self, lock_name: &str) -> Result<bool> {
        self.client.try_advisory_lock(lock_name).await
    }

    async fn unlock_run(&self, lock_name: &str) -> Result<()> {
        self.client.release_advisory_lock(lock_name).await
    }

    fn database_name(&self) -> &str {
        "postgresql"
    }
}

#[async_trait]
impl RunStore for PostgreSQLAdapter {
    async fn create_run(&self, run: &SyncRun) -> Result<()> {
        tracing::debug!(run_id = %run.id, "Recording sync run start");
        self.write_run(INSERT_RUN, run).await
    }

    async fn finalize_run(&self, run: &SyncRun) -> Result<()> {
        tracing::debug!(run_id = %run.id, status = %run.status, "Recording sync run end");
        self.write_run(FINALIZE_RUN, run).await
    }

    async fn recent_runs(&self, limit: usize) -> Result<Vec<SyncRun>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = self
            .client
            .query(
                "SELECT * FROM sync_runs ORDER BY started_at DESC LIMIT $1",
                &[&limit],
            )
            .await?;

        rows.iter()
            .map(|row| PostgreSQLSyncRun::from_row(row).to_domain())
            .collect()
    }
}
