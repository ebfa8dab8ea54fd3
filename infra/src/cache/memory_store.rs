//! In-memory record store
//!
//! Entries carry a storage deadline that is enforced on read and by
//! [`RecordStore::purge_expired`]. Per-key atomicity comes from the map lock.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use ev_core::services::verification::RecordStore;
use ev_core::services::{SystemTimeProvider, TimeProvider};

#[derive(Debug, Clone)]
struct Entry {
    document: String,
    expires_at: DateTime<Utc>,
}

/// Process-local [`RecordStore`]
pub struct MemoryRecordStore {
    entries: RwLock<HashMap<String, Entry>>,
    clock: Arc<dyn TimeProvider>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemTimeProvider))
    }

    /// Use an explicit time source for storage deadlines
    pub fn with_clock(clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of entries currently held, including ones past their deadline
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.document.clone()))
    }

    async fn set_with_expiry(&self, key: &str, document: &str, ttl_seconds: u64) -> Result<(), String> {
        let ttl = i64::try_from(ttl_seconds).map_err(|_| format!("TTL too large: {}", ttl_seconds))?;
        let entry = Entry {
            document: document.to_string(),
            expires_at: self.clock.now() + Duration::seconds(ttl),
        };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, String> {
        let now = self.clock.now();
        Ok(self
            .entries
            .write()
            .await
            .remove(key)
            .is_some_and(|entry| entry.expires_at > now))
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, String> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let matches = entries
            .get(key)
            .is_some_and(|entry| entry.expires_at > now && entry.document == expected);
        if matches {
            entries.remove(key);
        }
        Ok(matches)
    }

    async fn purge_expired(&self) -> Result<usize, String> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        let purged = before - entries.len();
        debug!(purged = purged, remaining = entries.len(), "Purged in-memory records");
        Ok(purged)
    }
}
