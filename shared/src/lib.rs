//! Shared utilities and common types for the email verification server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and loading
//! - Error response structures
//! - Utility functions (email normalization, validation, masking)

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, CacheStrategyConfig, CacheType, ConfigError, CorsConfig,
    Environment, LogFormat, LoggingConfig, NotifierConfig, NotifierProvider, ServerConfig,
    VerificationConfig, MAX_CODE_TTL_MINUTES, MAX_RETENTION_GRACE_MINUTES,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::email;
