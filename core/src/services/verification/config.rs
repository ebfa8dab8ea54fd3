//! Configuration for the verification service

use ev_shared::{AppConfig, MAX_CODE_TTL_MINUTES, MAX_RETENTION_GRACE_MINUTES};

use crate::domain::entities::verification_record::DEFAULT_TTL_MINUTES;

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Number of minutes before a verification code expires
    pub code_ttl_minutes: i64,
    /// Extra minutes an expired record is kept so it can be reported as expired
    pub retention_grace_minutes: i64,
    /// Remove the stored record again when the email could not be sent
    pub rollback_on_notification_failure: bool,
    /// Product name shown in the email subject
    pub app_name: String,
    /// Prefix for record store keys
    pub key_prefix: String,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            code_ttl_minutes: DEFAULT_TTL_MINUTES,
            retention_grace_minutes: 60,
            rollback_on_notification_failure: true,
            app_name: String::from("Budget Buddy"),
            key_prefix: String::from("email_verifications"),
        }
    }
}

impl VerificationServiceConfig {
    /// Build from the loaded application configuration
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            code_ttl_minutes: bounded_minutes(
                config.verification.code_ttl_minutes,
                MAX_CODE_TTL_MINUTES,
            ),
            retention_grace_minutes: bounded_minutes(
                config.verification.retention_grace_minutes,
                MAX_RETENTION_GRACE_MINUTES,
            ),
            rollback_on_notification_failure: config
                .verification
                .rollback_on_notification_failure,
            app_name: config.verification.app_name.clone(),
            key_prefix: config.cache.redis.key_prefix.clone(),
        }
    }

    /// Physical lifetime of a stored record in seconds
    pub fn storage_ttl_seconds(&self) -> u64 {
        let minutes = self
            .code_ttl_minutes
            .saturating_add(self.retention_grace_minutes)
            .max(1);
        u64::try_from(minutes).unwrap_or(1).saturating_mul(60)
    }
}

/// Minutes as `i64`, capped at `max`
fn bounded_minutes(minutes: u64, max: u64) -> i64 {
    i64::try_from(minutes.min(max)).unwrap_or(DEFAULT_TTL_MINUTES)
}
