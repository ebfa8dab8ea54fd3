//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `cache` - Record storage backend (Redis or in-memory) and sweeping
//! - `environment` - Environment detection and logging configuration
//! - `notifier` - Email delivery provider and sender identity
//! - `server` - HTTP server and CORS configuration
//! - `verification` - Code lifetime and issuance policy
//!
//! Values are resolved in three layers: built-in defaults, an optional TOML
//! file named after the environment, then environment variables.

pub mod cache;
pub mod environment;
pub mod notifier;
pub mod server;
pub mod verification;

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

// Re-export commonly used types
pub use cache::{CacheConfig, CacheStrategyConfig, CacheType};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use notifier::{NotifierConfig, NotifierProvider};
pub use server::{CorsConfig, ServerConfig};
pub use verification::{VerificationConfig, MAX_CODE_TTL_MINUTES, MAX_RETENTION_GRACE_MINUTES};

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    File(#[from] config::ConfigError),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// CORS configuration
    pub cors: CorsConfig,

    /// Record storage configuration
    pub cache: CacheStrategyConfig,

    /// Verification code policy
    pub verification: VerificationConfig,

    /// Email delivery configuration
    pub notifier: NotifierConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::new("127.0.0.1", 8080),
            cors: CorsConfig::development(),
            cache: CacheStrategyConfig::memory(),
            verification: VerificationConfig::default(),
            notifier: NotifierConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::new("0.0.0.0", 8080),
            cors: CorsConfig::default(),
            cache: CacheStrategyConfig::default(),
            verification: VerificationConfig::default(),
            notifier: NotifierConfig {
                provider: NotifierProvider::SendGrid,
                ..NotifierConfig::default()
            },
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Defaults for the given environment
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::production();
                config.environment = Environment::Staging;
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        }
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::for_environment(Environment::from_env());
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration: defaults, then the environment's TOML file (if it
    /// exists), then environment variables
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let env = Environment::from_env();
        dotenvy::from_filename(env.env_file()).ok();

        let mut config = Self::for_environment(env);
        if Path::new(env.config_file()).exists() {
            config = Self::from_file(env.config_file())?;
            config.environment = env;
        }

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file; missing sections use defaults
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Apply environment variable overrides on top of the current values
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.server.apply_env();
        self.cors.apply_env();
        self.cache.apply_env()?;
        self.verification.apply_env()?;
        self.notifier.apply_env()?;
        self.logging.apply_env();
        Ok(())
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.verification.validate()?;
        self.notifier.validate()?;
        Ok(())
    }
}

/// Parse an optional environment variable, reporting malformed values
pub(crate) fn env_parse<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.cache.cache_type, CacheType::Memory);
        assert_eq!(config.notifier.provider, NotifierProvider::Mock);
        assert_eq!(config.verification.code_ttl_minutes, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_uses_redis_and_sendgrid() {
        let config = AppConfig::production();
        assert_eq!(config.cache.cache_type, CacheType::Redis);
        assert_eq!(config.notifier.provider, NotifierProvider::SendGrid);
        // No API key configured yet
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_staging_inherits_production() {
        let config = AppConfig::for_environment(Environment::Staging);
        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.cache.cache_type, CacheType::Redis);
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let toml = r#"
            [verification]
            code_ttl_minutes = 15

            [notifier]
            from_address = "codes@example.com"
        "#;
        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap();
        let config: AppConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.verification.code_ttl_minutes, 15);
        assert_eq!(config.notifier.from_address, "codes@example.com");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_zero_retention_grace_fails_validation() {
        let toml = r#"
            [verification]
            retention_grace_minutes = 0
        "#;
        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap();
        let config: AppConfig = settings.try_deserialize().unwrap();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "verification.retention_grace_minutes"
        ));
    }
}
