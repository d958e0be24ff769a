//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `EXEMPTION_DESK` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use exemption_desk::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}:{}", config.server.host, config.server.port);
//! ```

mod error;
mod server;
mod store;
mod webhook;

pub use error::{ConfigError, ValidationError};
pub use server::{Environment, LogFormat, ServerConfig};
pub use store::{StoreBackend, StoreConfig};
pub use webhook::WebhookConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a development
/// server on the in-memory store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Document store configuration (backend, PostgreSQL pool)
    #[serde(default)]
    pub store: StoreConfig,

    /// Webhook configuration (reply limit, support contact, token)
    #[serde(default)]
    pub webhook: WebhookConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `EXEMPTION_DESK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `EXEMPTION_DESK__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `EXEMPTION_DESK__STORE__DATABASE_URL=...` -> `store.database_url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("EXEMPTION_DESK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.store.validate()?;
        self.webhook.validate(&self.server.environment)?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 7] = [
        "EXEMPTION_DESK__SERVER__PORT",
        "EXEMPTION_DESK__SERVER__ENVIRONMENT",
        "EXEMPTION_DESK__SERVER__LOG_FORMAT",
        "EXEMPTION_DESK__STORE__BACKEND",
        "EXEMPTION_DESK__STORE__DATABASE_URL",
        "EXEMPTION_DESK__WEBHOOK__MAX_REPLY_CHARS",
        "EXEMPTION_DESK__WEBHOOK__AUTH_TOKEN",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.webhook.max_reply_chars, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_postgres_store_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("EXEMPTION_DESK__STORE__BACKEND", "postgres");
        env::set_var(
            "EXEMPTION_DESK__STORE__DATABASE_URL",
            "postgresql://test@localhost/test",
        );
        env::set_var("EXEMPTION_DESK__SERVER__LOG_FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.store.backend, StoreBackend::Postgres);
        assert_eq!(
            config.store.database_url(),
            Some("postgresql://test@localhost/test")
        );
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_without_token_is_rejected() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("EXEMPTION_DESK__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert_eq!(
            config.validate(),
            Err(ValidationError::WebhookTokenRequired)
        );
    }

    #[test]
    fn test_custom_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("EXEMPTION_DESK__SERVER__PORT", "3000");
        env::set_var("EXEMPTION_DESK__WEBHOOK__MAX_REPLY_CHARS", "640");
        env::set_var("EXEMPTION_DESK__WEBHOOK__AUTH_TOKEN", "s3cret");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.webhook.max_reply_chars, 640);
        assert_eq!(config.webhook.auth_token(), Some("s3cret"));
    }
}
