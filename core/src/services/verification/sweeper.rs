//! Background purge of physically expired verification records
//!
//! Expiry is enforced lazily on confirmation; the sweeper only reclaims
//! space in stores that have no native expiry (the in-memory store).

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::errors::{DomainError, DomainResult};

use super::traits::RecordStore;

/// Periodically calls [`RecordStore::purge_expired`]
pub struct ExpiredRecordSweeper<S: RecordStore + ?Sized + 'static> {
    store: Arc<S>,
    interval_seconds: u64,
}

impl<S: RecordStore + ?Sized + 'static> ExpiredRecordSweeper<S> {
    /// Create a sweeper; an interval of 0 disables it
    pub fn new(store: Arc<S>, interval_seconds: u64) -> Self {
        Self {
            store,
            interval_seconds,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.interval_seconds > 0
    }

    /// Run a single sweep cycle
    pub async fn run_once(&self) -> DomainResult<SweepResult> {
        let purged = self
            .store
            .purge_expired()
            .await
            .map_err(DomainError::store_unavailable)?;

        if purged > 0 {
            info!(purged = purged, event = "records_swept", "Purged expired verification records");
        } else {
            debug!(event = "records_swept", "No expired verification records to purge");
        }

        Ok(SweepResult { purged })
    }

    /// Start the sweeper as a background task
    ///
    /// Returns `None` when disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.is_enabled() {
            warn!("Expired record sweeper is disabled");
            return None;
        }

        let interval = Duration::from_secs(self.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                interval_seconds = self.interval_seconds,
                "Expired record sweeper started"
            );

            let mut interval_timer = tokio::time::interval(interval);
            // The first tick completes immediately
            interval_timer.tick().await;

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_once().await {
                    error!(error = %e, event = "sweep_failed", "Expired record sweep failed");
                }
            }
        }))
    }
}

/// Result of a sweep cycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepResult {
    /// Number of records removed
    pub purged: usize,
}
