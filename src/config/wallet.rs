//! Wallet policy configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Wallet configuration (welcome grant, default currency)
#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    /// Coins credited when a wallet is first provisioned
    #[serde(default = "default_welcome_coins")]
    pub welcome_coins: i64,

    /// Currency assumed when a request does not name one
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

impl WalletConfig {
    /// Validate wallet configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.welcome_coins < 0 {
            return Err(ValidationError::InvalidWelcomeCoins);
        }
        if self.default_currency.trim().len() != 3 {
            return Err(ValidationError::InvalidDefaultCurrency);
        }
        Ok(())
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            welcome_coins: default_welcome_coins(),
            default_currency: default_currency(),
        }
    }
}

fn default_welcome_coins() -> i64 {
    50
}

fn default_currency() -> String {
    "INR".to_string()
}
