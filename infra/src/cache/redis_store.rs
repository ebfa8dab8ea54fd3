//! Redis-backed record store

use async_trait::async_trait;

use ev_core::services::verification::RecordStore;

use super::redis_client::RedisClient;

/// [`RecordStore`] over a [`RedisClient`]
#[derive(Clone)]
pub struct RedisRecordStore {
    client: RedisClient,
}

impl RedisRecordStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecordStore for RedisRecordStore {
    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        self.client.get(key).await.map_err(|e| e.to_string())
    }

    async fn set_with_expiry(&self, key: &str, document: &str, ttl_seconds: u64) -> Result<(), String> {
        self.client
            .set_with_expiry(key, document, ttl_seconds)
            .await
            .map_err(|e| e.to_string())
    }

    async fn delete(&self, key: &str) -> Result<bool, String> {
        self.client.delete(key).await.map_err(|e| e.to_string())
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, String> {
        self.client
            .compare_and_delete(key, expected)
            .await
            .map_err(|e| e.to_string())
    }
}
