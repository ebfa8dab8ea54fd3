//! Main verification service implementation

use chrono::Duration;
use std::sync::Arc;

use ev_shared::email::{is_valid_email, mask_email, normalize_email};

use crate::domain::entities::verification_record::VerificationRecord;
use crate::errors::{DomainError, DomainResult};
use crate::services::clock::{SystemTimeProvider, TimeProvider};

use super::code_store::{CodeStore, StoredRecord};
use super::config::VerificationServiceConfig;
use super::message::compose_message;
use super::traits::{Notifier, RecordStore};
use super::types::CodeIssued;

/// Verification service issuing and confirming email codes
pub struct VerificationService<S: RecordStore + ?Sized, N: Notifier + ?Sized> {
    /// Per-email record access
    code_store: CodeStore<S>,
    /// Email delivery
    notifier: Arc<N>,
    /// Time source for issuance and expiry checks
    clock: Arc<dyn TimeProvider>,
    /// Service configuration
    config: VerificationServiceConfig,
}

impl<S: RecordStore + ?Sized, N: Notifier + ?Sized> VerificationService<S, N> {
    /// Create a new verification service using the system clock
    ///
    /// # Arguments
    ///
    /// * `record_store` - Record store implementation
    /// * `notifier` - Notifier implementation
    /// * `config` - Service configuration
    pub fn new(record_store: Arc<S>, notifier: Arc<N>, config: VerificationServiceConfig) -> Self {
        Self::with_clock(record_store, notifier, config, Arc::new(SystemTimeProvider))
    }

    /// Create a new verification service with an explicit time source
    pub fn with_clock(
        record_store: Arc<S>,
        notifier: Arc<N>,
        config: VerificationServiceConfig,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        let code_store = CodeStore::new(
            record_store,
            config.key_prefix.clone(),
            config.storage_ttl_seconds(),
        );

        Self {
            code_store,
            notifier,
            clock,
            config,
        }
    }

    /// Service configuration
    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Issue a verification code to an email address
    ///
    /// This method:
    /// 1. Normalizes and validates the email
    /// 2. Generates a new 6-digit code
    /// 3. Stores the record, replacing any pending code for this email
    /// 4. Sends the code by email
    ///
    /// # Returns
    ///
    /// * `Ok(CodeIssued)` - Where and until when the code is valid
    /// * `Err(DomainError)` - `InvalidArgument`, `StoreUnavailable` or `NotificationFailed`
    pub async fn request_code(&self, email: &str) -> DomainResult<CodeIssued> {
        let email = Self::validated_email(email)?;

        let now = self.clock.now();
        let record = VerificationRecord::issue(
            email.clone(),
            now,
            Duration::minutes(self.config.code_ttl_minutes),
        );

        let stored = self.code_store.put(&email, &record).await?;

        tracing::info!(
            email = %mask_email(&email),
            event = "code_issued",
            expires_at = %record.expires_at,
            "Issued new verification code"
        );

        let message = compose_message(
            &email,
            &record.code,
            &self.config.app_name,
            self.config.code_ttl_minutes,
        );

        match self.notifier.send(&message).await {
            Ok(message_id) => {
                tracing::info!(
                    email = %mask_email(&email),
                    event = "code_sent",
                    message_id = %message_id,
                    "Verification email sent"
                );
                Ok(CodeIssued {
                    email,
                    expires_at: record.expires_at,
                    message_id,
                })
            }
            Err(e) => {
                tracing::error!(
                    email = %mask_email(&email),
                    error = %e,
                    event = "code_send_failed",
                    "Failed to send verification email"
                );
                if self.config.rollback_on_notification_failure {
                    self.rollback(&stored).await;
                }
                Err(DomainError::notification_failed(e))
            }
        }
    }

    /// Confirm a code previously sent to an email address
    ///
    /// A matching, unexpired code is consumed: the record is deleted and
    /// cannot be confirmed again. A mismatch leaves the record in place.
    /// An expired record is removed as a side effect.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The code was valid and has been consumed
    /// * `Err(DomainError)` - `InvalidArgument`, `NotFound`, `Expired`,
    ///   `CodeMismatch` or `StoreUnavailable`
    pub async fn confirm_code(&self, email: &str, code: &str) -> DomainResult<()> {
        let email = Self::validated_email(email)?;
        if code.is_empty() {
            return Err(DomainError::invalid_argument("Verification code is required"));
        }

        let stored = match self.code_store.get(&email).await {
            Ok(stored) => stored,
            Err(DomainError::NotFound) => {
                tracing::warn!(
                    email = %mask_email(&email),
                    event = "code_not_found",
                    "No pending verification code"
                );
                return Err(DomainError::NotFound);
            }
            Err(e) => return Err(e),
        };

        if stored.record.is_expired_at(self.clock.now()) {
            tracing::warn!(
                email = %mask_email(&email),
                event = "code_expired",
                expired_at = %stored.record.expires_at,
                "Verification code expired"
            );
            if let Err(e) = self.code_store.delete_exact(&stored).await {
                tracing::warn!(
                    email = %mask_email(&email),
                    error = %e,
                    event = "expired_record_delete_failed",
                    "Failed to remove expired verification record"
                );
            }
            return Err(DomainError::Expired);
        }

        if !stored.record.matches(code) {
            tracing::warn!(
                email = %mask_email(&email),
                event = "code_mismatch",
                "Verification code does not match"
            );
            return Err(DomainError::CodeMismatch);
        }

        // Lost a race with a concurrent confirmation or a newer issuance
        if !self.code_store.delete_exact(&stored).await? {
            tracing::warn!(
                email = %mask_email(&email),
                event = "code_consumed_concurrently",
                "Verification record changed before it could be consumed"
            );
            return Err(DomainError::NotFound);
        }

        tracing::info!(
            email = %mask_email(&email),
            event = "code_confirmed",
            "Verification code confirmed"
        );
        Ok(())
    }

    /// Remove a freshly written record after the notifier failed
    async fn rollback(&self, stored: &StoredRecord) {
        let email = mask_email(&stored.record.email);
        match self.code_store.delete_exact(stored).await {
            Ok(removed) => {
                tracing::info!(
                    email = %email,
                    event = "code_rolled_back",
                    removed = removed,
                    "Rolled back verification record after send failure"
                );
            }
            Err(e) => {
                tracing::error!(
                    email = %email,
                    error = %e,
                    event = "code_rollback_failed",
                    "Failed to roll back verification record"
                );
            }
        }
    }

    fn validated_email(email: &str) -> DomainResult<String> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(DomainError::invalid_argument("Email is required"));
        }
        if !is_valid_email(&email) {
            return Err(DomainError::invalid_argument("Invalid email format"));
        }
        Ok(email)
    }
}
