//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborators the verification core
//! depends on:
//! - **Cache**: verification record stores (Redis, in-memory)
//! - **Email**: notifier implementations (SendGrid, mock)
//!
//! [`initialize`] wires the implementations selected by configuration.

use std::sync::Arc;

use ev_core::services::verification::{ExpiredRecordSweeper, Notifier, RecordStore};
use ev_shared::{AppConfig, CacheType};

/// Record store module - Redis and in-memory implementations
pub mod cache;

/// Email module - verification email delivery
pub mod email;

/// Infrastructure service container
#[derive(Clone)]
pub struct InfrastructureServices {
    /// Store holding verification records
    pub record_store: Arc<dyn RecordStore>,
    /// Email delivery
    pub notifier: Arc<dyn Notifier>,
}

impl InfrastructureServices {
    /// Create a container from explicit implementations
    pub fn new(record_store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            record_store,
            notifier,
        }
    }
}

/// Initialize infrastructure services
///
/// This function sets up:
/// - The record store selected by `cache.cache_type`
/// - The expired record sweeper (in-memory store only)
/// - The notifier selected by `notifier.provider`
pub async fn initialize(config: &AppConfig) -> Result<InfrastructureServices, InfrastructureError> {
    tracing::info!("Initializing infrastructure services...");

    let record_store: Arc<dyn RecordStore> = match config.cache.cache_type {
        CacheType::Redis => {
            let client = cache::RedisClient::new(&config.cache.redis).await?;
            Arc::new(cache::RedisRecordStore::new(client))
        }
        CacheType::Memory => {
            tracing::warn!("Using in-memory record store; codes are lost on restart");
            let store: Arc<dyn RecordStore> = Arc::new(cache::MemoryRecordStore::new());
            let sweeper = Arc::new(ExpiredRecordSweeper::new(
                store.clone(),
                config.cache.sweep_interval_seconds,
            ));
            sweeper.start_background_task();
            store
        }
    };

    let notifier = email::create_notifier(&config.notifier)?;

    tracing::info!(
        cache_type = ?config.cache.cache_type,
        notifier = ?config.notifier.provider,
        "Infrastructure services initialized successfully"
    );

    Ok(InfrastructureServices::new(record_store, notifier))
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Email provider error
    #[error("Email service error: {0}")]
    Email(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_development() {
        let mut config = AppConfig::development();
        config.cache.sweep_interval_seconds = 0;

        let services = initialize(&config).await.unwrap();
        services
            .record_store
            .set_with_expiry("k", "v", 60)
            .await
            .unwrap();
        assert_eq!(
            services.record_store.get("k").await.unwrap().as_deref(),
            Some("v")
        );
    }

    #[tokio::test]
    async fn test_initialize_rejects_bad_redis_url() {
        let mut config = AppConfig::development();
        config.cache.cache_type = CacheType::Redis;
        config.cache.redis.url = "not a url".to_string();

        assert!(matches!(
            initialize(&config).await,
            Err(InfrastructureError::Config(_))
        ));
    }
}
