//! Wire types for the payment endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::payment::{HandleCallbackResult, InitiatePaymentResult};
use crate::domain::catalog::{CoinBundle, Currency};
use crate::domain::foundation::{BundleId, PaymentId};

#[derive(Debug, Clone, Deserialize)]
pub struct BundlesQueryParams {
    pub currency: Option<Currency>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleResponse {
    pub id: BundleId,
    pub name: String,
    pub coins: i64,
    pub price: i64,
    pub currency: Currency,
}

impl From<CoinBundle> for BundleResponse {
    fn from(bundle: CoinBundle) -> Self {
        Self {
            id: bundle.id,
            name: bundle.name,
            coins: bundle.coins,
            price: bundle.price,
            currency: bundle.currency,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleListResponse {
    pub bundles: Vec<BundleResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InitiatePaymentRequest {
    pub bundle_id: BundleId,
    pub currency: Option<Currency>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatePaymentResponse {
    pub payment_id: PaymentId,
    pub gateway: String,
    pub gateway_ref: String,
    pub amount: i64,
    pub currency: Currency,
    pub redirect_url: String,
}

impl From<InitiatePaymentResult> for InitiatePaymentResponse {
    fn from(result: InitiatePaymentResult) -> Self {
        Self {
            payment_id: result.payment_id,
            gateway: result.gateway,
            gateway_ref: result.gateway_ref,
            amount: result.amount,
            currency: result.currency,
            redirect_url: result.redirect_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackResponse {
    pub payment_id: PaymentId,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<i64>,
}

impl From<HandleCallbackResult> for CallbackResponse {
    fn from(result: HandleCallbackResult) -> Self {
        match result {
            HandleCallbackResult::Credited {
                payment_id,
                balance,
            } => Self {
                payment_id,
                status: "credited".to_string(),
                balance: Some(balance),
            },
            HandleCallbackResult::AlreadyProcessed { payment_id } => Self {
                payment_id,
                status: "already_processed".to_string(),
                balance: None,
            },
            HandleCallbackResult::MarkedFailed { payment_id } => Self {
                payment_id,
                status: "failed".to_string(),
                balance: None,
            },
        }
    }
}
