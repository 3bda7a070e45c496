//! Payment aggregate - tracks one external-gateway transaction.
//!
//! # Design Decisions
//!
//! - **Forward-only lifecycle**: `pending` transitions to `completed` or
//!   `failed` exactly once and never backward.
//! - **Gateway reference as idempotency key**: once assigned, `gateway_ref`
//!   is unique across all payments; callbacks are reconciled by it.
//! - **Money in smallest units**: `amount` is paise/kobo, never floats.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{CoinBundle, Currency};
use crate::domain::foundation::{PaymentId, Timestamp, UserId};

use super::PaymentIntakeError;

/// Lifecycle state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "completed" => Some(PaymentStatus::Completed),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }

    /// Completed and Failed are terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

/// One coin purchase through an external gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub user_id: UserId,
    /// Charge amount in the smallest currency unit.
    pub amount: i64,
    pub currency: Currency,
    /// Coins to credit when the payment completes.
    pub coins: i64,
    /// Gateway name, set once the gateway has been selected.
    pub gateway: Option<String>,
    /// The gateway's transaction reference; unique once assigned.
    pub gateway_ref: Option<String>,
    pub status: PaymentStatus,
    /// Opaque checkout parameters handed to the client.
    pub gateway_payload: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Payment {
    /// Creates a pending payment for a bundle, before any gateway contact.
    pub fn pending(user_id: UserId, bundle: &CoinBundle) -> Self {
        let now = Timestamp::now();
        Self {
            id: PaymentId::new(),
            user_id,
            amount: bundle.price,
            currency: bundle.currency.clone(),
            coins: bundle.coins,
            gateway: None,
            gateway_ref: None,
            status: PaymentStatus::Pending,
            gateway_payload: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attaches the gateway reference obtained from `GatewayAdapter::initiate`.
    ///
    /// # Errors
    ///
    /// Fails if the payment is no longer pending or already has a reference.
    pub fn attach_reference(
        &mut self,
        gateway: impl Into<String>,
        reference: impl Into<String>,
        payload: serde_json::Value,
    ) -> Result<(), PaymentIntakeError> {
        if self.status != PaymentStatus::Pending || self.gateway_ref.is_some() {
            return Err(PaymentIntakeError::InvalidTransition {
                from: self.status,
                to: PaymentStatus::Pending,
            });
        }
        self.gateway = Some(gateway.into());
        self.gateway_ref = Some(reference.into());
        self.gateway_payload = Some(payload);
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Marks the payment completed.
    pub fn complete(&mut self) -> Result<(), PaymentIntakeError> {
        self.transition(PaymentStatus::Completed)
    }

    /// Marks the payment failed.
    pub fn fail(&mut self) -> Result<(), PaymentIntakeError> {
        self.transition(PaymentStatus::Failed)
    }

    fn transition(&mut self, to: PaymentStatus) -> Result<(), PaymentIntakeError> {
        if self.status != PaymentStatus::Pending {
            return Err(PaymentIntakeError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
