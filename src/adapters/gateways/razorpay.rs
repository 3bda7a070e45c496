//! Razorpay gateway adapter (INR).
//!
//! Initiation creates a Razorpay order; the order id becomes the payment's
//! gateway reference. Webhook callbacks are authenticated with the
//! `X-Razorpay-Signature` header: HMAC-SHA256 over the raw body, hex
//! encoded, compared in constant time.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::catalog::CoinBundle;
use crate::domain::payment::Payment;
use crate::ports::{
    CallbackNotice, CallbackOutcome, GatewayAdapter, GatewayError, GatewayInitiation,
};

use super::{hex_decode, hex_encode};

type HmacSha256 = Hmac<Sha256>;

/// Razorpay API configuration.
#[derive(Clone)]
pub struct RazorpayConfig {
    /// API key id (rzp_live_... or rzp_test_...). Sent to the client.
    key_id: String,

    /// API key secret, used for order creation.
    key_secret: SecretString,

    /// Webhook signing secret.
    webhook_secret: SecretString,

    /// Base URL for the Razorpay API.
    api_base_url: String,
}

impl RazorpayConfig {
    pub fn new(
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
        webhook_secret: impl Into<String>,
    ) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: SecretString::new(key_secret.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: "https://api.razorpay.com".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

pub struct RazorpayGateway {
    config: RazorpayConfig,
    http_client: reqwest::Client,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn verify_signature(&self, payload: &[u8], signature: &str) -> Result<(), GatewayError> {
        let provided = hex_decode(signature).ok_or(GatewayError::InvalidSignature)?;

        let mut mac = HmacSha256::new_from_slice(
            self.config.webhook_secret.expose_secret().as_bytes(),
        )
        .expect("HMAC can take key of any size");
        mac.update(payload);
        let expected = mac.finalize().into_bytes();

        if expected.as_slice().ct_eq(&provided).unwrap_u8() != 1 {
            tracing::warn!(
                expected_signature = hex_encode(expected.as_slice()),
                "invalid razorpay webhook signature"
            );
            return Err(GatewayError::InvalidSignature);
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct RazorpayOrder {
    id: String,
}

#[derive(Deserialize)]
struct RazorpayWebhook {
    event: String,
    payload: RazorpayWebhookPayload,
}

#[derive(Deserialize)]
struct RazorpayWebhookPayload {
    payment: RazorpayPaymentWrapper,
}

#[derive(Deserialize)]
struct RazorpayPaymentWrapper {
    entity: RazorpayPaymentEntity,
}

#[derive(Deserialize)]
struct RazorpayPaymentEntity {
    order_id: String,
}

#[async_trait]
impl GatewayAdapter for RazorpayGateway {
    fn name(&self) -> &'static str {
        "razorpay"
    }

    async fn initiate(
        &self,
        payment: &Payment,
        bundle: &CoinBundle,
    ) -> Result<GatewayInitiation, GatewayError> {
        let url = format!("{}/v1/orders", self.config.api_base_url);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(
                &self.config.key_id,
                Some(self.config.key_secret.expose_secret()),
            )
            .json(&serde_json::json!({
                "amount": bundle.price,
                "currency": bundle.currency,
                "receipt": payment.id.to_string(),
            }))
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(error = %error_text, "razorpay order creation failed");
            return Err(GatewayError::Rejected(error_text));
        }

        let order: RazorpayOrder = response
            .json()
            .await
            .map_err(|e| GatewayError::Rejected(format!("unparseable order response: {e}")))?;

        Ok(GatewayInitiation {
            redirect_url: format!(
                "https://checkout.razorpay.com/v1/checkout?order_id={}&key_id={}",
                order.id, self.config.key_id
            ),
            payload: serde_json::json!({
                "order_id": order.id,
                "key_id": self.config.key_id,
                "amount": bundle.price,
                "currency": bundle.currency,
            }),
            reference: order.id,
        })
    }

    fn parse_callback(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<CallbackNotice, GatewayError> {
        let signature = signature.ok_or(GatewayError::InvalidSignature)?;
        self.verify_signature(payload, signature)?;

        let webhook: RazorpayWebhook = serde_json::from_slice(payload)
            .map_err(|e| GatewayError::malformed(e.to_string()))?;

        let outcome = match webhook.event.as_str() {
            "payment.captured" => CallbackOutcome::Success,
            "payment.failed" => CallbackOutcome::Failure,
            other => {
                return Err(GatewayError::malformed(format!("unhandled event: {other}")))
            }
        };

        Ok(CallbackNotice {
            reference: webhook.payload.payment.entity.order_id,
            outcome,
        })
    }
}
