//! Email delivery configuration

use serde::{Deserialize, Serialize};
use std::env;

use super::{env_parse, ConfigError};
use crate::utils::email::is_valid_email;

/// Email delivery provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotifierProvider {
    /// SendGrid v3 mail API
    SendGrid,
    /// Logs messages instead of sending them
    #[default]
    Mock,
}

impl std::str::FromStr for NotifierProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sendgrid" => Ok(NotifierProvider::SendGrid),
            "mock" => Ok(NotifierProvider::Mock),
            _ => Err(format!("Invalid notifier provider: {}", s)),
        }
    }
}

/// Email provider settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Which provider delivers codes
    pub provider: NotifierProvider,

    /// Provider API key
    pub api_key: Option<String>,

    /// Sender address
    pub from_address: String,

    /// Provider API base URL
    pub api_base_url: String,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            provider: NotifierProvider::Mock,
            api_key: None,
            from_address: String::from("no-reply@yourdomain.com"),
            api_base_url: String::from("https://api.sendgrid.com"),
            request_timeout_secs: 10,
        }
    }
}

impl NotifierConfig {
    pub(crate) fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(provider) = env_parse::<NotifierProvider>("NOTIFIER_PROVIDER")? {
            self.provider = provider;
        }
        if let Ok(key) = env::var("NOTIFIER_API_KEY") {
            if !key.trim().is_empty() {
                self.api_key = Some(key);
            }
        }
        if let Ok(from) = env::var("FROM_ADDRESS") {
            self.from_address = from;
        }
        if let Ok(url) = env::var("NOTIFIER_API_URL") {
            self.api_base_url = url;
        }
        if let Some(timeout) = env_parse::<u64>("NOTIFIER_TIMEOUT_SECS")? {
            self.request_timeout_secs = timeout;
        }
        Ok(())
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_email(&self.from_address) {
            return Err(ConfigError::InvalidValue {
                key: "notifier.from_address".to_string(),
                message: format!("'{}' is not an email address", self.from_address),
            });
        }
        if self.provider == NotifierProvider::SendGrid && self.api_key.is_none() {
            return Err(ConfigError::InvalidValue {
                key: "notifier.api_key".to_string(),
                message: "required for the sendgrid provider".to_string(),
            });
        }
        Ok(())
    }
}
