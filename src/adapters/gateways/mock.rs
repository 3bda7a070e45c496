//! Mock gateway for tests and local development.
//!
//! Accepts every initiation and parses an unauthenticated JSON callback of
//! the form `{"reference": "...", "status": "success" | "failed"}`.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::catalog::CoinBundle;
use crate::domain::payment::Payment;
use crate::ports::{
    CallbackNotice, CallbackOutcome, GatewayAdapter, GatewayError, GatewayInitiation,
};

pub struct MockGateway;

impl MockGateway {
    /// A mock gateway whose initiations always succeed.
    pub fn succeeding() -> Self {
        Self
    }
}

#[derive(Deserialize)]
struct MockCallback {
    reference: String,
    status: String,
}

#[async_trait]
impl GatewayAdapter for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn initiate(
        &self,
        payment: &Payment,
        bundle: &CoinBundle,
    ) -> Result<GatewayInitiation, GatewayError> {
        let reference = format!("mock_{}", payment.id);
        Ok(GatewayInitiation {
            redirect_url: format!("https://checkout.mock.invalid/{reference}"),
            payload: serde_json::json!({
                "reference": reference,
                "amount": bundle.price,
                "currency": bundle.currency,
            }),
            reference,
        })
    }

    fn parse_callback(
        &self,
        payload: &[u8],
        _signature: Option<&str>,
    ) -> Result<CallbackNotice, GatewayError> {
        let callback: MockCallback = serde_json::from_slice(payload)
            .map_err(|e| GatewayError::malformed(e.to_string()))?;
        let outcome = match callback.status.as_str() {
            "success" => CallbackOutcome::Success,
            "failed" => CallbackOutcome::Failure,
            other => {
                return Err(GatewayError::malformed(format!("unknown status: {other}")))
            }
        };
        Ok(CallbackNotice {
            reference: callback.reference,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Currency;
    use crate::domain::foundation::{BundleId, UserId};

    fn bundle() -> CoinBundle {
        CoinBundle {
            id: BundleId::new(),
            name: "50 Coins".to_string(),
            coins: 50,
            price: 5000,
            currency: Currency::new("INR"),
            active: true,
        }
    }

    #[tokio::test]
    async fn initiation_derives_reference_from_payment() {
        let gateway = MockGateway::succeeding();
        let payment = Payment::pending(UserId::new(), &bundle());
        let initiation = gateway.initiate(&payment, &bundle()).await.unwrap();
        assert_eq!(initiation.reference, format!("mock_{}", payment.id));
        assert!(initiation.redirect_url.contains(&initiation.reference));
    }

    #[test]
    fn callback_parses_both_outcomes() {
        let gateway = MockGateway::succeeding();
        let success = gateway
            .parse_callback(br#"{"reference":"mock_1","status":"success"}"#, None)
            .unwrap();
        assert_eq!(success.outcome, CallbackOutcome::Success);

        let failure = gateway
            .parse_callback(br#"{"reference":"mock_1","status":"failed"}"#, None)
            .unwrap();
        assert_eq!(failure.outcome, CallbackOutcome::Failure);

        assert!(gateway
            .parse_callback(br#"{"reference":"mock_1","status":"maybe"}"#, None)
            .is_err());
    }
}
