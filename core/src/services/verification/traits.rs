//! Traits for record store and notifier integration

use async_trait::async_trait;
use serde::Serialize;

/// Key-value storage for verification documents
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the document stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>, String>;

    /// Store `document` under `key`, overwriting any previous value; the
    /// entry is physically removed after `ttl_seconds`
    async fn set_with_expiry(&self, key: &str, document: &str, ttl_seconds: u64)
        -> Result<(), String>;

    /// Remove `key`; returns whether something was deleted
    async fn delete(&self, key: &str) -> Result<bool, String>;

    /// Atomically remove `key` only if its current value equals `expected`
    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, String>;

    /// Physically remove entries past their storage TTL; returns the number removed
    async fn purge_expired(&self) -> Result<usize, String> {
        Ok(0)
    }
}

/// Outgoing verification email
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Email delivery
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send the message; returns the provider's message id
    async fn send(&self, message: &EmailMessage) -> Result<String, String>;
}
