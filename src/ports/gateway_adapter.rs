//! Gateway adapter port - bridges to external payment processors.
//!
//! Adapters own everything gateway-specific: redirect URL construction,
//! callback payload shape, and signature verification. The core sees only
//! a reference string and a success/failure outcome.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::catalog::{CoinBundle, Currency};
use crate::domain::payment::Payment;

/// Errors from a gateway adapter.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// HMAC verification failed; the payload must not be trusted.
    #[error("Callback signature verification failed")]
    InvalidSignature,

    #[error("Malformed callback payload: {0}")]
    MalformedPayload(String),

    #[error("Gateway unreachable: {0}")]
    Unreachable(String),

    #[error("Gateway rejected the request: {0}")]
    Rejected(String),
}

impl GatewayError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        GatewayError::MalformedPayload(reason.into())
    }
}

/// What a gateway hands back when a checkout is initiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayInitiation {
    /// The gateway's transaction reference; becomes the callback
    /// idempotency key.
    pub reference: String,
    /// Where to send the user to complete the charge.
    pub redirect_url: String,
    /// Checkout parameters for the client, stored opaquely on the payment.
    pub payload: serde_json::Value,
}

/// Whether a callback reports a captured or a failed charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackOutcome {
    Success,
    Failure,
}

/// A verified, parsed gateway callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackNotice {
    pub reference: String,
    pub outcome: CallbackOutcome,
}

/// One payment gateway integration.
///
/// `initiate` performs the network call to the processor and happens
/// entirely outside any ledger lock, before any ledger mutation.
/// `parse_callback` must establish authenticity (signature/HMAC) before
/// returning a notice; the core trusts whatever comes out of it.
#[async_trait]
pub trait GatewayAdapter: Send + Sync {
    /// Stable gateway name used in callback routes ("razorpay", "paystack").
    fn name(&self) -> &'static str;

    /// Obtains a transaction reference and redirect target for a pending
    /// payment.
    async fn initiate(
        &self,
        payment: &Payment,
        bundle: &CoinBundle,
    ) -> Result<GatewayInitiation, GatewayError>;

    /// Verifies and parses a raw callback body.
    fn parse_callback(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<CallbackNotice, GatewayError>;
}

/// The set of configured gateways, addressable by currency (for initiation)
/// and by name (for callbacks).
#[derive(Default)]
pub struct GatewayRegistry {
    by_currency: HashMap<String, Arc<dyn GatewayAdapter>>,
    by_name: HashMap<&'static str, Arc<dyn GatewayAdapter>>,
}

impl GatewayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a gateway as the handler for one currency.
    pub fn register(mut self, currency: Currency, adapter: Arc<dyn GatewayAdapter>) -> Self {
        self.by_name.insert(adapter.name(), adapter.clone());
        self.by_currency.insert(currency.as_str().to_string(), adapter);
        self
    }

    /// Gateway that charges in the given currency.
    pub fn for_currency(&self, currency: &Currency) -> Option<Arc<dyn GatewayAdapter>> {
        self.by_currency.get(currency.as_str()).cloned()
    }

    /// Gateway by its callback-route name.
    pub fn by_name(&self, name: &str) -> Option<Arc<dyn GatewayAdapter>> {
        self.by_name.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_adapter_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn GatewayAdapter) {}
    }
}
