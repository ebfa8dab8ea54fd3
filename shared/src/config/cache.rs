//! Record storage configuration module

use serde::{Deserialize, Serialize};

use super::{env_parse, ConfigError};

/// Redis connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Prefix prepended to every verification record key
    pub key_prefix: String,

    /// Maximum number of attempts for a Redis command on transient errors
    pub max_retries: u32,

    /// Base delay between retries in milliseconds (doubles each attempt)
    pub retry_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            key_prefix: String::from("email_verifications"),
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the key prefix for verification records
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheType {
    Redis,
    Memory,
}

impl std::str::FromStr for CacheType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(CacheType::Redis),
            "memory" | "in-memory" => Ok(CacheType::Memory),
            _ => Err(format!("Invalid cache type: {}", s)),
        }
    }
}

/// Storage strategy configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheStrategyConfig {
    /// Which backend stores verification records
    pub cache_type: CacheType,

    /// Redis configuration (used when `cache_type` is `redis`)
    pub redis: CacheConfig,

    /// Interval for purging physically expired entries (0 disables)
    pub sweep_interval_seconds: u64,
}

impl Default for CacheStrategyConfig {
    fn default() -> Self {
        Self {
            cache_type: CacheType::Redis,
            redis: CacheConfig::default(),
            sweep_interval_seconds: 300,
        }
    }
}

impl CacheStrategyConfig {
    /// In-memory storage, for development and tests
    pub fn memory() -> Self {
        Self {
            cache_type: CacheType::Memory,
            ..Default::default()
        }
    }

    pub(crate) fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(cache_type) = env_parse::<CacheType>("CACHE_TYPE")? {
            self.cache_type = cache_type;
        }
        if let Ok(url) = std::env::var("REDIS_URL") {
            self.redis.url = url;
        }
        if let Ok(prefix) = std::env::var("REDIS_KEY_PREFIX") {
            self.redis.key_prefix = prefix;
        }
        if let Some(interval) = env_parse::<u64>("SWEEP_INTERVAL_SECONDS")? {
            self.sweep_interval_seconds = interval;
        }
        Ok(())
    }
}
