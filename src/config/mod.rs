//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `AUDIOWALL_` prefix and nested values use underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use audiowall::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod database;
mod error;
mod payment;
mod server;
mod wallet;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};
pub use wallet::WalletConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Contains all configuration sections for the Audiowall service.
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Payment configuration (Razorpay, Paystack)
    pub payment: PaymentConfig,

    /// Wallet policy (welcome grant, default currency)
    #[serde(default)]
    pub wallet: WalletConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `AUDIOWALL` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `AUDIOWALL__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `AUDIOWALL__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("AUDIOWALL")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of configuration:
    /// - URL formats
    /// - Pool size constraints
    /// - Required API key prefixes
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.payment.validate()?;
        self.wallet.validate()?;
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

    /// Helper to set environment variables for testing
    /// Uses double underscores to separate nested config values
    fn set_minimal_env() {
        env::set_var("AUDIOWALL__DATABASE__URL", "postgresql://test@localhost/test");
        env::set_var("AUDIOWALL__PAYMENT__RAZORPAY_KEY_ID", "rzp_test_abc");
        env::set_var("AUDIOWALL__PAYMENT__RAZORPAY_KEY_SECRET", "secret");
        env::set_var("AUDIOWALL__PAYMENT__RAZORPAY_WEBHOOK_SECRET", "whsecret");
        env::set_var("AUDIOWALL__PAYMENT__PAYSTACK_SECRET_KEY", "sk_test_xyz");
    }

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("AUDIOWALL__DATABASE__URL");
        env::remove_var("AUDIOWALL__PAYMENT__RAZORPAY_KEY_ID");
        env::remove_var("AUDIOWALL__PAYMENT__RAZORPAY_KEY_SECRET");
        env::remove_var("AUDIOWALL__PAYMENT__RAZORPAY_WEBHOOK_SECRET");
        env::remove_var("AUDIOWALL__PAYMENT__PAYSTACK_SECRET_KEY");
        env::remove_var("AUDIOWALL__SERVER__PORT");
        env::remove_var("AUDIOWALL__SERVER__ENVIRONMENT");
        env::remove_var("AUDIOWALL__WALLET__WELCOME_COINS");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.payment.razorpay_key_id, "rzp_test_abc");
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok());
        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_and_wallet_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.wallet.welcome_coins, 50);
        assert_eq!(config.wallet.default_currency, "INR");
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("AUDIOWALL__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_custom_welcome_coins() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("AUDIOWALL__WALLET__WELCOME_COINS", "100");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.wallet.welcome_coins, 100);
    }
}
