//! Verification code policy configuration

use serde::{Deserialize, Serialize};
use std::env;

use super::{env_parse, ConfigError};

/// Longest accepted code lifetime (one day)
pub const MAX_CODE_TTL_MINUTES: u64 = 24 * 60;

/// Longest accepted retention grace (one week)
pub const MAX_RETENTION_GRACE_MINUTES: u64 = 7 * 24 * 60;

/// Settings governing how codes are issued and retained
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Logical lifetime of an issued code in minutes
    pub code_ttl_minutes: u64,

    /// How long a record stays in storage after it expires, so that a late
    /// confirmation can still be told the code expired
    pub retention_grace_minutes: u64,

    /// Delete the freshly stored record when the email could not be sent
    pub rollback_on_notification_failure: bool,

    /// Product name used in the email subject
    pub app_name: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_minutes: 10,
            retention_grace_minutes: 60,
            rollback_on_notification_failure: true,
            app_name: String::from("Budget Buddy"),
        }
    }
}

impl VerificationConfig {
    pub(crate) fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(ttl) = env_parse::<u64>("CODE_TTL_MINUTES")? {
            self.code_ttl_minutes = ttl;
        }
        if let Some(grace) = env_parse::<u64>("RETENTION_GRACE_MINUTES")? {
            self.retention_grace_minutes = grace;
        }
        if let Some(rollback) = env_parse::<bool>("ROLLBACK_ON_NOTIFICATION_FAILURE")? {
            self.rollback_on_notification_failure = rollback;
        }
        if let Ok(name) = env::var("APP_NAME") {
            self.app_name = name;
        }
        Ok(())
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_CODE_TTL_MINUTES).contains(&self.code_ttl_minutes) {
            return Err(ConfigError::InvalidValue {
                key: "verification.code_ttl_minutes".to_string(),
                message: format!("must be between 1 and {}", MAX_CODE_TTL_MINUTES),
            });
        }
        // A zero grace drops records at expiry, so late confirmations never see `Expired`
        if !(1..=MAX_RETENTION_GRACE_MINUTES).contains(&self.retention_grace_minutes) {
            return Err(ConfigError::InvalidValue {
                key: "verification.retention_grace_minutes".to_string(),
                message: format!("must be between 1 and {}", MAX_RETENTION_GRACE_MINUTES),
            });
        }
        if self.app_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "verification.app_name".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
