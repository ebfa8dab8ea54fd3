//! Code store: per-email verification records over a [`RecordStore`]

use std::sync::Arc;

use ev_shared::email::mask_email;

use crate::domain::entities::verification_record::VerificationRecord;
use crate::errors::{DomainError, DomainResult};

use super::traits::RecordStore;

/// A record together with the exact document it was read from or written as.
///
/// The document is what conditional deletes compare against, so a record that
/// was overwritten in the meantime is never removed by mistake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub record: VerificationRecord,
    document: String,
}

impl StoredRecord {
    pub fn document(&self) -> &str {
        &self.document
    }
}

/// Keyed access to verification records
pub struct CodeStore<S: RecordStore + ?Sized> {
    store: Arc<S>,
    key_prefix: String,
    storage_ttl_seconds: u64,
}

impl<S: RecordStore + ?Sized> CodeStore<S> {
    /// Create a code store
    ///
    /// # Arguments
    ///
    /// * `store` - Backing record store
    /// * `key_prefix` - Namespace for keys (`{prefix}:{email}`)
    /// * `storage_ttl_seconds` - Physical lifetime of written records
    pub fn new(store: Arc<S>, key_prefix: impl Into<String>, storage_ttl_seconds: u64) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
            storage_ttl_seconds,
        }
    }

    /// Storage key for a normalized email
    pub fn key_for(&self, email: &str) -> String {
        format!("{}:{}", self.key_prefix, email)
    }

    /// Write `record` under `email`, replacing any pending record
    pub async fn put(&self, email: &str, record: &VerificationRecord) -> DomainResult<StoredRecord> {
        let document = serde_json::to_string(record).map_err(|e| {
            DomainError::store_unavailable(format!("Failed to encode verification record: {}", e))
        })?;

        self.store
            .set_with_expiry(&self.key_for(email), &document, self.storage_ttl_seconds)
            .await
            .map_err(|e| {
                tracing::error!(
                    email = %mask_email(email),
                    error = %e,
                    event = "record_store_write_failed",
                    "Failed to store verification record"
                );
                DomainError::store_unavailable(e)
            })?;

        Ok(StoredRecord {
            record: record.clone(),
            document,
        })
    }

    /// Read the record for `email`, or `NotFound`
    pub async fn get(&self, email: &str) -> DomainResult<StoredRecord> {
        let document = self
            .store
            .get(&self.key_for(email))
            .await
            .map_err(|e| {
                tracing::error!(
                    email = %mask_email(email),
                    error = %e,
                    event = "record_store_read_failed",
                    "Failed to read verification record"
                );
                DomainError::store_unavailable(e)
            })?
            .ok_or(DomainError::NotFound)?;

        let record: VerificationRecord = serde_json::from_str(&document).map_err(|e| {
            tracing::error!(
                email = %mask_email(email),
                error = %e,
                event = "record_unreadable",
                "Stored verification record could not be decoded"
            );
            DomainError::store_unavailable(format!("Unreadable verification record: {}", e))
        })?;

        Ok(StoredRecord { record, document })
    }

    /// Remove the record for `email`; absent keys are not an error
    pub async fn delete(&self, email: &str) -> DomainResult<()> {
        self.store
            .delete(&self.key_for(email))
            .await
            .map(|_| ())
            .map_err(DomainError::store_unavailable)
    }

    /// Remove `stored` only if it is still the current record for its email
    pub async fn delete_exact(&self, stored: &StoredRecord) -> DomainResult<bool> {
        self.store
            .delete_if_equals(&self.key_for(&stored.record.email), &stored.document)
            .await
            .map_err(DomainError::store_unavailable)
    }
}
