//! Paystack gateway adapter (NGN).
//!
//! Initiation calls the transaction-initialize endpoint and hands back the
//! hosted authorization URL; Paystack's transaction reference becomes the
//! payment's gateway reference. Webhook callbacks carry an
//! `X-Paystack-Signature` header: HMAC-SHA512 over the raw body with the
//! secret key, hex encoded.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha512;
use subtle::ConstantTimeEq;

use crate::domain::catalog::CoinBundle;
use crate::domain::payment::Payment;
use crate::ports::{
    CallbackNotice, CallbackOutcome, GatewayAdapter, GatewayError, GatewayInitiation,
};

use super::{hex_decode, hex_encode};

type HmacSha512 = Hmac<Sha512>;

/// Paystack API configuration.
#[derive(Clone)]
pub struct PaystackConfig {
    /// Secret key (sk_live_... or sk_test_...); signs webhooks too.
    secret_key: SecretString,

    /// Base URL for the Paystack API.
    api_base_url: String,
}

impl PaystackConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: SecretString::new(secret_key.into()),
            api_base_url: "https://api.paystack.co".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

pub struct PaystackGateway {
    config: PaystackConfig,
    http_client: reqwest::Client,
}

impl PaystackGateway {
    pub fn new(config: PaystackConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn verify_signature(&self, payload: &[u8], signature: &str) -> Result<(), GatewayError> {
        let provided = hex_decode(signature).ok_or(GatewayError::InvalidSignature)?;

        let mut mac =
            HmacSha512::new_from_slice(self.config.secret_key.expose_secret().as_bytes())
                .expect("HMAC can take key of any size");
        mac.update(payload);
        let expected = mac.finalize().into_bytes();

        if expected.as_slice().ct_eq(&provided).unwrap_u8() != 1 {
            tracing::warn!(
                expected_signature = hex_encode(expected.as_slice()),
                "invalid paystack webhook signature"
            );
            return Err(GatewayError::InvalidSignature);
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct PaystackInitializeResponse {
    status: bool,
    data: Option<PaystackInitializeData>,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct PaystackInitializeData {
    authorization_url: String,
    reference: String,
}

#[derive(Deserialize)]
struct PaystackWebhook {
    event: String,
    data: PaystackWebhookData,
}

#[derive(Deserialize)]
struct PaystackWebhookData {
    reference: String,
}

#[async_trait]
impl GatewayAdapter for PaystackGateway {
    fn name(&self) -> &'static str {
        "paystack"
    }

    async fn initiate(
        &self,
        payment: &Payment,
        bundle: &CoinBundle,
    ) -> Result<GatewayInitiation, GatewayError> {
        let url = format!("{}/transaction/initialize", self.config.api_base_url);

        // Paystack requires a customer email; the wallet id stands in as a
        // stable per-user address.
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.secret_key.expose_secret())
            .json(&serde_json::json!({
                "email": format!("{}@wallet.audiowall.app", payment.user_id),
                "amount": bundle.price,
                "currency": bundle.currency,
                "metadata": {"payment_id": payment.id.to_string()},
            }))
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(error = %error_text, "paystack transaction initialize failed");
            return Err(GatewayError::Rejected(error_text));
        }

        let body: PaystackInitializeResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Rejected(format!("unparseable initialize response: {e}")))?;
        let data = match (body.status, body.data) {
            (true, Some(data)) => data,
            _ => return Err(GatewayError::Rejected(body.message)),
        };

        Ok(GatewayInitiation {
            reference: data.reference.clone(),
            redirect_url: data.authorization_url,
            payload: serde_json::json!({
                "reference": data.reference,
                "amount": bundle.price,
                "currency": bundle.currency,
            }),
        })
    }

    fn parse_callback(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<CallbackNotice, GatewayError> {
        let signature = signature.ok_or(GatewayError::InvalidSignature)?;
        self.verify_signature(payload, signature)?;

        let webhook: PaystackWebhook = serde_json::from_slice(payload)
            .map_err(|e| GatewayError::malformed(e.to_string()))?;

        let outcome = match webhook.event.as_str() {
            "charge.success" => CallbackOutcome::Success,
            "charge.failed" => CallbackOutcome::Failure,
            other => {
                return Err(GatewayError::malformed(format!("unhandled event: {other}")))
            }
        };

        Ok(CallbackNotice {
            reference: webhook.data.reference,
            outcome,
        })
    }
}
