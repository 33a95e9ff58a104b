//! Sync coordinator - main orchestrator for the ingestion run
//!
//! Drives fetch → transform → upsert page by page, strictly sequentially,
//! and records the run. The next page is never requested before every
//! record of the current one has been written.

use crate::adapters::database::create_stores;
use crate::adapters::database::traits::{RunStore, TenderStore};
use crate::adapters::feed::{FeedClient, ReleaseFeed};
use crate::config::TenderflowConfig;
use crate::core::shutdown::ShutdownSignal;
use crate::core::state::{RunParameters, RunRecorder};
use crate::core::sync::summary::SyncSummary;
use crate::core::sync::upsert::{UpsertOutcome, Upserter};
use crate::core::transform::{transform_release, TransformOptions};
use crate::domain::{FeedError, ReleasePackage, Result, TenderflowError};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Run parameters resolved from configuration and CLI flags
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Incremental window in days
    pub window_days: u32,

    /// Drop the time filter
    pub full_resync: bool,

    /// Stop after this many records
    pub limit: Option<u64>,

    /// Pause between pages
    pub page_delay: Duration,

    /// Abort the run after this long
    pub max_run_time: Option<Duration>,

    /// Advisory lock to hold for the run, if any
    pub lock_name: Option<String>,

    /// Skip all writes
    pub dry_run: bool,

    pub transform: TransformOptions,
}

impl SyncOptions {
    pub fn from_config(config: &TenderflowConfig) -> Self {
        Self {
            window_days: config.sync.window_days,
            full_resync: config.sync.full_resync,
            limit: config.sync.limit,
            page_delay: Duration::from_millis(config.feed.page_delay_ms),
            max_run_time: config.sync.max_run_seconds.map(Duration::from_secs),
            lock_name: config
                .sync
                .run_lock
                .then(|| config.sync.lock_name.clone()),
            dry_run: config.sync.dry_run,
            transform: TransformOptions::from_config(config),
        }
    }

    /// Parameters recorded on the run
    pub fn parameters(&self) -> RunParameters {
        RunParameters {
            window_days: self.window_days,
            full_resync: self.full_resync,
            limit: self.limit,
        }
    }

    /// Lower bound of the incremental window, `None` for a full resync
    pub fn updated_since(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.full_resync {
            None
        } else {
            Some(now - ChronoDuration::days(i64::from(self.window_days)))
        }
    }

    fn limit_reached(&self, fetched: u64) -> bool {
        self.limit.is_some_and(|limit| fetched >= limit)
    }
}

/// Sync coordinator
pub struct SyncCoordinator {
    feed: Arc<dyn ReleaseFeed>,
    tenders: Arc<dyn TenderStore + Send + Sync>,
    upserter: Upserter,
    recorder: RunRecorder,
    options: SyncOptions,
    shutdown: ShutdownSignal,
}

impl SyncCoordinator {
    /// Create a coordinator over explicit collaborators
    pub fn new(
        feed: Arc<dyn ReleaseFeed>,
        tenders: Arc<dyn TenderStore + Send + Sync>,
        runs: Arc<dyn RunStore + Send + Sync>,
        options: SyncOptions,
    ) -> Self {
        Self {
            upserter: Upserter::new(tenders.clone()).with_dry_run(options.dry_run),
            recorder: RunRecorder::new(runs).with_dry_run(options.dry_run),
            feed,
            tenders,
            options,
            shutdown: ShutdownSignal::never(),
        }
    }

    /// Build the HTTP feed client and PostgreSQL stores from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the database
    /// cannot be reached or migrated.
    pub async fn connect(config: &TenderflowConfig, shutdown: ShutdownSignal) -> Result<Self> {
        let feed = FeedClient::new(config.feed.clone())?.with_shutdown(shutdown.clone());
        let (tenders, runs) = create_stores(&config.database).await?;

        Ok(Self::new(Arc::new(feed), tenders, runs, SyncOptions::from_config(config))
            .with_shutdown(shutdown))
    }

    /// Stop between records and pages when shutdown is requested
    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Execute one sync run
    ///
    /// Takes the run lock, records the run, processes pages until the feed
    /// is exhausted or the limit is hit, then finalizes the run record.
    ///
    /// # Errors
    ///
    /// - [`TenderflowError::RunLocked`] if another run holds the lock; no
    ///   run record is created
    /// - [`TenderflowError::Feed`] on a fatal feed error
    /// - [`TenderflowError::Interrupted`] on shutdown or deadline
    ///
    /// In the last two cases the run record is finalized as `error` first.
    pub async fn run(&self) -> Result<SyncSummary> {
        let started = Instant::now();

        if let Some(lock_name) = &self.options.lock_name {
            if self.options.dry_run {
                tracing::debug!(lock = %lock_name, "DRY RUN: Skipping run lock");
            } else if !self.tenders.try_lock_run(lock_name).await? {
                tracing::warn!(lock = %lock_name, "Another sync run is in progress");
                return Err(TenderflowError::RunLocked(lock_name.clone()));
            }
        }

        let result = self.run_recorded(started).await;

        if let Some(lock_name) = &self.options.lock_name {
            if !self.options.dry_run {
                if let Err(e) = self.tenders.unlock_run(lock_name).await {
                    tracing::warn!(lock = %lock_name, error = %e, "Failed to release run lock");
                }
            }
        }

        result
    }

    async fn run_recorded(&self, started: Instant) -> Result<SyncSummary> {
        let params = self.options.parameters();
        tracing::info!(
            feed = %self.feed.endpoint(),
            store = %self.tenders.database_name(),
            window_days = params.window_days,
            full_resync = params.full_resync,
            limit = ?params.limit,
            dry_run = self.options.dry_run,
            "Starting sync run"
        );

        let run = self.recorder.start(params).await;
        let mut summary = SyncSummary::new().with_run_id(run.id);

        match self.process_pages(&mut summary, started).await {
            Ok(()) => {
                self.recorder.complete(run, summary.counts()).await;
                let summary = summary.with_duration(started.elapsed());
                summary.log_summary();
                Ok(summary)
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Sync run aborted");
                tracing::warn!(
                    fetched = summary.fetched,
                    inserted = summary.inserted,
                    updated = summary.updated,
                    errors = summary.errors,
                    "Counts at abort"
                );
                self.recorder
                    .fail(run, summary.counts(), &e.to_string())
                    .await;
                Err(e)
            }
        }
    }

    async fn process_pages(&self, summary: &mut SyncSummary, started: Instant) -> Result<()> {
        let updated_since = self.options.updated_since(Utc::now());
        let deadline = self.options.max_run_time.map(|max| started + max);
        let mut shutdown = self.shutdown.clone();
        let mut next_page: Option<String> = None;

        loop {
            self.check_interrupted(&shutdown, deadline)?;

            let page = self
                .fetch_page(next_page.as_deref(), updated_since, deadline)
                .await?;
            summary.pages += 1;

            let mut limit_reached = false;
            for release in &page.releases {
                if self.options.limit_reached(summary.fetched) {
                    limit_reached = true;
                    break;
                }
                self.check_interrupted(&shutdown, deadline)?;

                let row = transform_release(release, &self.options.transform, Utc::now());
                summary.fetched += 1;

                let outcome = match within_deadline(deadline, self.upserter.upsert(&row)).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        summary.errors += 1;
                        return Err(e);
                    }
                };
                match outcome {
                    UpsertOutcome::Inserted => summary.inserted += 1,
                    UpsertOutcome::Updated => summary.updated += 1,
                    UpsertOutcome::Error(_) => summary.errors += 1,
                }
            }
            limit_reached |= self.options.limit_reached(summary.fetched);

            crate::log_page_processed!(
                summary.pages,
                page.releases.len(),
                page.next_page.is_some()
            );

            next_page = match page.next_page {
                Some(next) if !limit_reached => Some(next),
                _ => break,
            };

            if !self.options.page_delay.is_zero()
                && !within_deadline(deadline, shutdown.sleep(self.options.page_delay)).await?
            {
                return Err(TenderflowError::Interrupted(
                    "shutdown requested".to_string(),
                ));
            }
        }

        if self.options.limit_reached(summary.fetched) {
            tracing::info!(limit = ?self.options.limit, "Record limit reached");
        }
        Ok(())
    }

    async fn fetch_page(
        &self,
        next_page: Option<&str>,
        updated_since: Option<DateTime<Utc>>,
        deadline: Option<Instant>,
    ) -> Result<ReleasePackage> {
        let fetch = self.feed.fetch_page(next_page, updated_since);

        match within_deadline(deadline, fetch).await? {
            Ok(page) => Ok(page),
            Err(FeedError::Cancelled) => Err(TenderflowError::Interrupted(
                "shutdown requested".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    fn check_interrupted(&self, shutdown: &ShutdownSignal, deadline: Option<Instant>) -> Result<()> {
        if shutdown.is_triggered() {
            return Err(TenderflowError::Interrupted(
                "shutdown requested".to_string(),
            ));
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(deadline_exceeded());
        }
        Ok(())
    }
}

fn deadline_exceeded() -> TenderflowError {
    TenderflowError::Interrupted("maximum run time exceeded".to_string())
}

/// Await `fut`, giving up once the run deadline passes
async fn within_deadline<F: Future>(deadline: Option<Instant>, fut: F) -> Result<F::Output> {
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, fut)
            .await
            .map_err(|_| deadline_exceeded()),
        None => Ok(fut.await),
    }
}
