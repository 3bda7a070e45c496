//! Error types for payment intake.

use thiserror::Error;

use crate::domain::catalog::Currency;

use super::PaymentStatus;

/// Errors produced by payment intake, as seen by callers.
#[derive(Debug, Clone, Error)]
pub enum PaymentIntakeError {
    #[error("Unknown or inactive coin bundle")]
    InvalidBundle,

    #[error("No payment gateway configured for currency {0}")]
    UnsupportedCurrency(Currency),

    /// Malformed, unverifiable, or unattributable callback payload.
    #[error("Invalid callback: {0}")]
    InvalidCallback(String),

    #[error("Payment cannot transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },

    /// A success callback arrived for a payment already marked failed, or
    /// the reverse. Never resolved automatically.
    #[error("Callback outcome contradicts recorded payment status")]
    OutcomeMismatch,

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl PaymentIntakeError {
    pub fn invalid_callback(reason: impl Into<String>) -> Self {
        PaymentIntakeError::InvalidCallback(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_currency() {
        let err = PaymentIntakeError::UnsupportedCurrency(Currency::new("usd"));
        assert!(err.to_string().contains("USD"));
    }
}
