//! Shared fixtures for integration tests
//!
//! In-memory implementations of the storage and feed seams so the
//! orchestrator can be exercised without PostgreSQL or HTTP.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tenderflow::adapters::database::{RunStore, TenderStore, WriteKind};
use tenderflow::adapters::feed::ReleaseFeed;
use tenderflow::core::state::SyncRun;
use tenderflow::domain::{FeedError, Release, ReleasePackage, Result, TenderRow, TenderflowError};

/// Tender and run storage backed by hash maps
#[derive(Default)]
pub struct InMemoryStore {
    pub tenders: Mutex<HashMap<String, TenderRow>>,
    pub runs: Mutex<HashMap<uuid::Uuid, SyncRun>>,
    /// Rows with these ocids fail to write
    pub failing_ocids: HashSet<String>,
    /// Lock already held by another session
    pub lock_held: bool,
    /// Run writes fail
    pub runs_unavailable: bool,
    /// Each tender write takes this long
    pub write_delay: Duration,
    pub lock_calls: AtomicUsize,
    pub unlock_calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(ocids: &[&str]) -> Self {
        Self {
            failing_ocids: ocids.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn tender(&self, ocid: &str) -> Option<TenderRow> {
        self.tenders.lock().unwrap().get(ocid).cloned()
    }

    pub fn tender_count(&self) -> usize {
        self.tenders.lock().unwrap().len()
    }

    pub fn all_runs(&self) -> Vec<SyncRun> {
        self.runs.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl TenderStore for InMemoryStore {
    async fn upsert_tender(&self, row: &TenderRow) -> Result<WriteKind> {
        if !self.write_delay.is_zero() {
            tokio::time::sleep(self.write_delay).await;
        }
        if self.failing_ocids.contains(&row.ocid) {
            return Err(TenderflowError::Database(format!(
                "constraint violation for {}",
                row.ocid
            )));
        }

        let previous = self
            .tenders
            .lock()
            .unwrap()
            .insert(row.ocid.clone(), row.clone());

        Ok(match previous {
            Some(_) => WriteKind::Updated,
            None => WriteKind::Inserted,
        })
    }

    async fn try_lock_run(&self, _lock_name: &str) -> Result<bool> {
        self.lock_calls.fetch_add(1, Ordering::SeqCst);
        Ok(!self.lock_held)
    }

    async fn unlock_run(&self, _lock_name: &str) -> Result<()> {
        self.unlock_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn database_name(&self) -> &str {
        "memory"
    }
}

#[async_trait]
impl RunStore for InMemoryStore {
    async fn create_run(&self, run: &SyncRun) -> Result<()> {
        if self.runs_unavailable {
            return Err(TenderflowError::Database("sync_runs unavailable".to_string()));
        }
        self.runs.lock().unwrap().insert(run.id, run.clone());
        Ok(())
    }

    async fn finalize_run(&self, run: &SyncRun) -> Result<()> {
        if self.runs_unavailable {
            return Err(TenderflowError::Database("sync_runs unavailable".to_string()));
        }
        self.runs.lock().unwrap().insert(run.id, run.clone());
        Ok(())
    }

    async fn recent_runs(&self, limit: usize) -> Result<Vec<SyncRun>> {
        let mut runs = self.all_runs();
        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        runs.truncate(limit);
        Ok(runs)
    }
}

/// One scripted response of a [`ScriptedFeed`]
pub enum Step {
    Page(ReleasePackage),
    Fail(FeedError),
    /// Hang for this long, then serve an empty page
    Stall(Duration),
}

/// Feed that replays a fixed list of responses
pub struct ScriptedFeed {
    steps: Mutex<Vec<Step>>,
    pub calls: AtomicUsize,
    pub requested: Mutex<Vec<(Option<String>, Option<DateTime<Utc>>)>>,
}

impl ScriptedFeed {
    pub fn new(steps: Vec<Step>) -> Self {
        let mut steps = steps;
        steps.reverse();
        Self {
            steps: Mutex::new(steps),
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Feed of consecutive pages linked with `page-N` cursors
    pub fn pages(pages: Vec<Vec<Value>>) -> Self {
        let count = pages.len();
        let steps = pages
            .into_iter()
            .enumerate()
            .map(|(i, releases)| Step::Page(page(releases, (i + 1 < count).then(|| format!("page-{}", i + 2)))))
            .collect();
        Self::new(steps)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReleaseFeed for ScriptedFeed {
    async fn fetch_page(
        &self,
        next_page: Option<&str>,
        updated_since: Option<DateTime<Utc>>,
    ) -> std::result::Result<ReleasePackage, FeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested
            .lock()
            .unwrap()
            .push((next_page.map(str::to_string), updated_since));

        let step = self.steps.lock().unwrap().pop();
        match step {
            Some(Step::Page(page)) => Ok(page),
            Some(Step::Fail(e)) => Err(e),
            Some(Step::Stall(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(ReleasePackage::default())
            }
            None => Ok(ReleasePackage::default()),
        }
    }

    fn endpoint(&self) -> &str {
        "scripted"
    }
}

/// Release package with the given releases and next link
pub fn page(releases: Vec<Value>, next: Option<String>) -> ReleasePackage {
    ReleasePackage {
        releases: releases.into_iter().map(Release::from_value).collect(),
        next_page: next,
    }
}

/// Minimal tender-stage release
pub fn release(ocid: &str, title: &str) -> Value {
    json!({
        "ocid": ocid,
        "id": format!("{ocid}-r1"),
        "date": "2025-03-01T09:00:00Z",
        "tag": ["tender"],
        "buyer": { "id": "GB-GOV-1", "name": "Department for Testing" },
        "tender": {
            "title": title,
            "status": "active",
            "value": { "amount": 50000, "currency": "GBP" },
            "items": [{
                "classification": { "scheme": "CPV", "id": "72000000" },
                "deliveryAddresses": [{ "region": "UKI" }]
            }]
        }
    })
}

/// `count` releases numbered from `start`
pub fn releases(start: usize, count: usize) -> Vec<Value> {
    (start..start + count)
        .map(|n| release(&format!("ocds-test-{n:04}"), &format!("Tender {n}")))
        .collect()
}
