//! Unit tests for the expired record sweeper

use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::errors::DomainError;
use crate::services::verification::{ExpiredRecordSweeper, SweepResult};

use super::mocks::MockRecordStore;

#[tokio::test]
async fn test_run_once_reports_purged() {
    let store = Arc::new(MockRecordStore::new());
    store.purge_count.store(3, Ordering::SeqCst);

    let sweeper = ExpiredRecordSweeper::new(store, 300);
    assert_eq!(sweeper.run_once().await.unwrap(), SweepResult { purged: 3 });
}

#[tokio::test]
async fn test_run_once_store_failure() {
    let sweeper = ExpiredRecordSweeper::new(Arc::new(MockRecordStore::failing()), 300);
    let err = sweeper.run_once().await.unwrap_err();
    assert!(matches!(err, DomainError::StoreUnavailable { .. }));
}

#[tokio::test]
async fn test_disabled_sweeper_does_not_start() {
    let sweeper = Arc::new(ExpiredRecordSweeper::new(Arc::new(MockRecordStore::new()), 0));
    assert!(!sweeper.is_enabled());
    assert!(sweeper.start_background_task().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_background_task_runs_on_interval() {
    let store = Arc::new(MockRecordStore::new());
    let sweeper = Arc::new(ExpiredRecordSweeper::new(store.clone(), 60));

    let handle = sweeper.start_background_task().unwrap();
    tokio::time::sleep(std::time::Duration::from_secs(125)).await;

    assert_eq!(store.call_count(), 2);
    handle.abort();
}
