//! Integration tests for the sync pipeline
//!
//! These tests verify that:
//! - Pagination follows next links and stops when they run out
//! - The record limit stops fetching early
//! - One failing record does not stop the run
//! - Re-ingesting a release updates rather than duplicates
//! - Every run is recorded with counts that add up

mod common;

use common::{page, release, releases, InMemoryStore, ScriptedFeed, Step};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tenderflow::core::shutdown::ShutdownSignal;
use tenderflow::core::state::RunStatus;
use tenderflow::core::sync::{SyncCoordinator, SyncOptions};
use tenderflow::core::transform::TransformOptions;
use tenderflow::domain::{FeedError, Stage, TenderflowError};
use tokio::sync::watch;

fn options() -> SyncOptions {
    SyncOptions {
        window_days: 7,
        full_resync: false,
        limit: None,
        page_delay: Duration::ZERO,
        max_run_time: None,
        lock_name: Some("tenderflow-sync".to_string()),
        dry_run: false,
        transform: TransformOptions::default(),
    }
}

fn coordinator(
    feed: &Arc<ScriptedFeed>,
    store: &Arc<InMemoryStore>,
    options: SyncOptions,
) -> SyncCoordinator {
    SyncCoordinator::new(feed.clone(), store.clone(), store.clone(), options)
}

#[tokio::test]
async fn test_three_pages_fetched_in_three_calls() {
    let feed = Arc::new(ScriptedFeed::pages(vec![
        releases(0, 10),
        releases(10, 10),
        releases(20, 5),
    ]));
    let store = Arc::new(InMemoryStore::new());

    let summary = coordinator(&feed, &store, options()).run().await.unwrap();

    assert_eq!(feed.call_count(), 3);
    assert_eq!(summary.pages, 3);
    assert_eq!(summary.fetched, 25);
    assert_eq!(summary.inserted, 25);
    assert_eq!(store.tender_count(), 25);

    let requested = feed.requested.lock().unwrap();
    assert_eq!(requested[0].0, None);
    assert_eq!(requested[1].0.as_deref(), Some("page-2"));
    assert_eq!(requested[2].0.as_deref(), Some("page-3"));
}

#[tokio::test]
async fn test_limit_stops_before_second_fetch() {
    let feed = Arc::new(ScriptedFeed::pages(vec![releases(0, 10), releases(10, 10)]));
    let store = Arc::new(InMemoryStore::new());
    let opts = limited(5);

    let summary = coordinator(&feed, &store, opts).run().await.unwrap();

    assert_eq!(feed.call_count(), 1);
    assert_eq!(summary.fetched, 5);
    assert_eq!(store.tender_count(), 5);
}

#[tokio::test]
async fn test_limit_on_page_boundary_does_not_fetch_next_page() {
    let feed = Arc::new(ScriptedFeed::pages(vec![releases(0, 10), releases(10, 10)]));
    let store = Arc::new(InMemoryStore::new());

    let summary = coordinator(&feed, &store, limited(10)).run().await.unwrap();

    assert_eq!(feed.call_count(), 1);
    assert_eq!(summary.fetched, 10);
}

fn limited(limit: u64) -> SyncOptions {
    SyncOptions {
        limit: Some(limit),
        ..options()
    }
}

#[tokio::test]
async fn test_failing_record_is_counted_and_skipped() {
    let feed = Arc::new(ScriptedFeed::pages(vec![releases(1, 5)]));
    let store = Arc::new(InMemoryStore::failing(&["ocds-test-0003"]));

    let summary = coordinator(&feed, &store, options()).run().await.unwrap();

    assert_eq!(summary.fetched, 5);
    assert_eq!(summary.inserted, 4);
    assert_eq!(summary.errors, 1);
    for persisted in ["ocds-test-0001", "ocds-test-0002", "ocds-test-0004", "ocds-test-0005"] {
        assert!(store.tender(persisted).is_some(), "{persisted} missing");
    }
    assert!(store.tender("ocds-test-0003").is_none());

    let runs = store.all_runs();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, RunStatus::Completed);
    assert_eq!(runs[0].counts.errors, 1);
}

#[tokio::test]
async fn test_reingesting_updates_existing_row() {
    let store = Arc::new(InMemoryStore::new());

    let first = Arc::new(ScriptedFeed::pages(vec![vec![release("ocds-x", "Original")]]));
    coordinator(&first, &store, options()).run().await.unwrap();
    let synced_first = store.tender("ocds-x").unwrap().synced_at;

    tokio::time::sleep(Duration::from_millis(5)).await;

    let second = Arc::new(ScriptedFeed::pages(vec![vec![release("ocds-x", "Revised")]]));
    let summary = coordinator(&second, &store, options()).run().await.unwrap();

    assert_eq!(summary.inserted, 0);
    assert_eq!(summary.updated, 1);
    assert_eq!(store.tender_count(), 1);

    let row = store.tender("ocds-x").unwrap();
    assert_eq!(row.title, "Revised");
    assert!(row.synced_at > synced_first);
}

#[tokio::test]
async fn test_end_to_end_two_releases() {
    let feed = Arc::new(ScriptedFeed::pages(vec![vec![
        release("ocds-b5fd17-0001", "Road Maintenance Services"),
        release("ocds-b5fd17-0002", "Road Maintenance Services"),
    ]]));
    let store = Arc::new(InMemoryStore::new());
    let opts = SyncOptions {
        full_resync: true,
        ..options()
    };

    let summary = coordinator(&feed, &store, opts).run().await.unwrap();
    assert!(summary.is_successful());
    assert_eq!(
        (summary.fetched, summary.inserted, summary.updated, summary.errors),
        (2, 2, 0, 0)
    );
    assert!(feed.requested.lock().unwrap()[0].1.is_none());

    let first = store.tender("ocds-b5fd17-0001").unwrap();
    let second = store.tender("ocds-b5fd17-0002").unwrap();
    assert_eq!(first.stage, Stage::Tender);
    assert_eq!(first.cpv_codes, vec!["72000000".to_string()]);
    assert_eq!(first.region.as_deref(), Some("UKI"));
    assert_eq!(first.buyer_name.as_deref(), Some("Department for Testing"));
    assert_ne!(first.slug, second.slug);

    let runs = store.all_runs();
    assert_eq!(runs.len(), 1);
    let run = &runs[0];
    assert_eq!(Some(run.id), summary.run_id);
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.counts.fetched, 2);
    assert_eq!(run.counts.inserted, 2);
    assert!(run.completed_at.is_some());
    assert!(run.error_message.is_none());
}

#[tokio::test]
async fn test_counts_add_up() {
    let store = Arc::new(InMemoryStore::failing(&["ocds-test-0003"]));
    store
        .tenders
        .lock()
        .unwrap()
        .insert("ocds-test-0001".to_string(), seed_row("ocds-test-0001"));

    let feed = Arc::new(ScriptedFeed::pages(vec![releases(0, 4), releases(4, 4)]));
    let summary = coordinator(&feed, &store, options()).run().await.unwrap();

    assert_eq!(summary.fetched, 8);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.inserted, 6);
    assert!(summary.counts().is_consistent());
}

fn seed_row(ocid: &str) -> tenderflow::domain::TenderRow {
    let release = tenderflow::domain::Release::from_value(release(ocid, "Seed"));
    tenderflow::core::transform::transform_release(
        &release,
        &TransformOptions::default(),
        chrono::Utc::now(),
    )
}

#[tokio::test]
async fn test_fatal_feed_error_finalizes_run_as_error() {
    let feed = Arc::new(ScriptedFeed::new(vec![
        Step::Page(page(releases(0, 3), Some("page-2".to_string()))),
        Step::Fail(FeedError::Http {
            status: 500,
            body: "Internal Server Error".to_string(),
        }),
    ]));
    let store = Arc::new(InMemoryStore::new());

    let result = coordinator(&feed, &store, options()).run().await;

    assert!(matches!(
        result,
        Err(TenderflowError::Feed(FeedError::Http { status: 500, .. }))
    ));

    let runs = store.all_runs();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, RunStatus::Error);
    assert_eq!(runs[0].counts.fetched, 3);
    assert!(runs[0].error_message.as_deref().unwrap().contains("500"));
    assert_eq!(store.unlock_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_locked_run_creates_no_record() {
    let feed = Arc::new(ScriptedFeed::pages(vec![releases(0, 3)]));
    let store = Arc::new(InMemoryStore {
        lock_held: true,
        ..Default::default()
    });

    let result = coordinator(&feed, &store, options()).run().await;

    assert!(matches!(result, Err(TenderflowError::RunLocked(ref name)) if name == "tenderflow-sync"));
    assert_eq!(feed.call_count(), 0);
    assert!(store.all_runs().is_empty());
    assert_eq!(store.unlock_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_lock_disabled_skips_locking() {
    let feed = Arc::new(ScriptedFeed::pages(vec![releases(0, 1)]));
    let store = Arc::new(InMemoryStore {
        lock_held: true,
        ..Default::default()
    });
    let opts = SyncOptions {
        lock_name: None,
        ..options()
    };

    coordinator(&feed, &store, opts).run().await.unwrap();
    assert_eq!(store.lock_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_shutdown_interrupts_and_records_error() {
    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();

    let feed = Arc::new(ScriptedFeed::pages(vec![releases(0, 3)]));
    let store = Arc::new(InMemoryStore::new());

    let result = coordinator(&feed, &store, options())
        .with_shutdown(ShutdownSignal::new(rx))
        .run()
        .await;

    assert!(matches!(result, Err(TenderflowError::Interrupted(_))));
    assert_eq!(feed.call_count(), 0);
    let runs = store.all_runs();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, RunStatus::Error);
}

#[tokio::test]
async fn test_shutdown_during_page_delay() {
    let (tx, rx) = watch::channel(false);
    let feed = Arc::new(ScriptedFeed::pages(vec![releases(0, 2), releases(2, 2)]));
    let store = Arc::new(InMemoryStore::new());
    let opts = SyncOptions {
        page_delay: Duration::from_secs(30),
        ..options()
    };

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let _ = tx.send(true);
    });

    let result = coordinator(&feed, &store, opts)
        .with_shutdown(ShutdownSignal::new(rx))
        .run()
        .await;

    assert!(matches!(result, Err(TenderflowError::Interrupted(_))));
    assert_eq!(feed.call_count(), 1);
    assert_eq!(store.tender_count(), 2);
}

#[tokio::test]
async fn test_run_record_failure_does_not_fail_run() {
    let feed = Arc::new(ScriptedFeed::pages(vec![releases(0, 2)]));
    let store = Arc::new(InMemoryStore {
        runs_unavailable: true,
        ..Default::default()
    });

    let summary = coordinator(&feed, &store, options()).run().await.unwrap();

    assert_eq!(summary.inserted, 2);
    assert!(store.all_runs().is_empty());
}

#[tokio::test]
async fn test_window_applied_unless_full_resync() {
    let feed = Arc::new(ScriptedFeed::pages(vec![releases(0, 1)]));
    let store = Arc::new(InMemoryStore::new());
    coordinator(&feed, &store, options()).run().await.unwrap();

    let since = feed.requested.lock().unwrap()[0].1.unwrap();
    let age = chrono::Utc::now() - since;
    assert!(age >= chrono::Duration::days(7));
    assert!(age < chrono::Duration::days(7) + chrono::Duration::minutes(1));

    let feed = Arc::new(ScriptedFeed::pages(vec![releases(0, 1)]));
    let opts = SyncOptions {
        full_resync: true,
        ..options()
    };
    coordinator(&feed, &store, opts).run().await.unwrap();
    assert!(feed.requested.lock().unwrap()[0].1.is_none());
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let feed = Arc::new(ScriptedFeed::pages(vec![releases(0, 3)]));
    let store = Arc::new(InMemoryStore::new());
    let opts = SyncOptions {
        dry_run: true,
        ..options()
    };

    let summary = coordinator(&feed, &store, opts).run().await.unwrap();

    assert_eq!(summary.fetched, 3);
    assert_eq!(store.tender_count(), 0);
    assert!(store.all_runs().is_empty());
    assert_eq!(store.lock_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_feed_completes() {
    let feed = Arc::new(ScriptedFeed::pages(vec![vec![]]));
    let store = Arc::new(InMemoryStore::new());

    let summary = coordinator(&feed, &store, options()).run().await.unwrap();

    assert_eq!(summary.fetched, 0);
    assert_eq!(summary.pages, 1);
    assert_eq!(store.all_runs()[0].status, RunStatus::Completed);
}

fn deadline_after(max_run_time: Duration) -> SyncOptions {
    SyncOptions {
        max_run_time: Some(max_run_time),
        ..options()
    }
}

#[tokio::test]
async fn test_stalled_feed_hits_run_deadline() {
    let feed = Arc::new(ScriptedFeed::new(vec![
        Step::Page(page(releases(0, 3), Some("page-2".to_string()))),
        Step::Stall(Duration::from_secs(30)),
    ]));
    let store = Arc::new(InMemoryStore::new());
    let started = std::time::Instant::now();

    let result = coordinator(&feed, &store, deadline_after(Duration::from_millis(300)))
        .run()
        .await;

    assert!(matches!(result, Err(TenderflowError::Interrupted(_))));
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(feed.call_count(), 2);

    let runs = store.all_runs();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, RunStatus::Error);
    assert_eq!(runs[0].counts.fetched, 3);
    assert_eq!(runs[0].counts.inserted, 3);
    assert!(runs[0]
        .error_message
        .as_deref()
        .unwrap()
        .contains("maximum run time"));
    assert_eq!(store.unlock_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_page_delay_cut_short_by_run_deadline() {
    let feed = Arc::new(ScriptedFeed::pages(vec![releases(0, 2), releases(2, 2)]));
    let store = Arc::new(InMemoryStore::new());
    let opts = SyncOptions {
        page_delay: Duration::from_secs(30),
        ..deadline_after(Duration::from_millis(200))
    };
    let started = std::time::Instant::now();

    let result = coordinator(&feed, &store, opts).run().await;

    assert!(matches!(result, Err(TenderflowError::Interrupted(_))));
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(feed.call_count(), 1);

    let runs = store.all_runs();
    assert_eq!(runs[0].status, RunStatus::Error);
    assert_eq!(runs[0].counts.fetched, 2);
}

#[tokio::test]
async fn test_slow_write_hits_run_deadline() {
    let feed = Arc::new(ScriptedFeed::pages(vec![releases(0, 3)]));
    let store = Arc::new(InMemoryStore {
        write_delay: Duration::from_secs(30),
        ..Default::default()
    });
    let started = std::time::Instant::now();

    let result = coordinator(&feed, &store, deadline_after(Duration::from_millis(200)))
        .run()
        .await;

    assert!(matches!(result, Err(TenderflowError::Interrupted(_))));
    assert!(started.elapsed() < Duration::from_secs(10));

    let runs = store.all_runs();
    assert_eq!(runs[0].status, RunStatus::Error);
    assert_eq!(runs[0].counts.fetched, 1);
    assert_eq!(runs[0].counts.errors, 1);
    assert_eq!(store.tender_count(), 0);
}
