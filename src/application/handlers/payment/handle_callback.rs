//! HandleCallbackHandler - reconcile a gateway callback into a ledger
//! credit, exactly once per gateway reference.

use std::sync::Arc;

use crate::domain::foundation::PaymentId;
use crate::domain::ledger::{EntryDraft, EntryKind, LedgerError};
use crate::domain::payment::{PaymentIntakeError, PaymentStatus};
use crate::ports::{
    CallbackOutcome, GatewayRegistry, LedgerBatch, LedgerStore, PaymentTransition,
};

/// A raw callback as delivered by a gateway.
#[derive(Debug, Clone)]
pub struct HandleCallbackCommand {
    /// Gateway name from the callback route.
    pub gateway: String,
    /// Raw request body, verified by the adapter before parsing.
    pub payload: Vec<u8>,
    /// Signature header, when the gateway sends one.
    pub signature: Option<String>,
}

/// Outcome of callback reconciliation. Every variant is a 200 to the
/// gateway; only `PaymentIntakeError::InvalidCallback` maps to a 4xx.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleCallbackResult {
    /// Wallet credited and payment completed.
    Credited { payment_id: PaymentId, balance: i64 },
    /// Redelivery of an already-reconciled callback; nothing mutated.
    AlreadyProcessed { payment_id: PaymentId },
    /// Gateway reported failure; payment marked failed, no ledger change.
    MarkedFailed { payment_id: PaymentId },
}

/// Handler for gateway callbacks.
///
/// Gateways deliver at-least-once, possibly concurrently and on different
/// machines, so the guard is the conditional `pending` -> terminal payment
/// transition inside the ledger batch, not a lock. A lost race is re-read
/// and reported as `AlreadyProcessed`.
pub struct HandleCallbackHandler {
    ledger: Arc<dyn LedgerStore>,
    gateways: Arc<GatewayRegistry>,
}

impl HandleCallbackHandler {
    pub fn new(ledger: Arc<dyn LedgerStore>, gateways: Arc<GatewayRegistry>) -> Self {
        Self { ledger, gateways }
    }

    pub async fn handle(
        &self,
        cmd: HandleCallbackCommand,
    ) -> Result<HandleCallbackResult, PaymentIntakeError> {
        let gateway = self
            .gateways
            .by_name(&cmd.gateway)
            .ok_or_else(|| {
                PaymentIntakeError::invalid_callback(format!("unknown gateway: {}", cmd.gateway))
            })?;

        // Authenticity first: the notice only exists if the signature held.
        let notice = gateway
            .parse_callback(&cmd.payload, cmd.signature.as_deref())
            .map_err(|e| {
                tracing::warn!(gateway = %cmd.gateway, error = %e, "rejected gateway callback");
                PaymentIntakeError::invalid_callback(e.to_string())
            })?;

        let payment = self
            .ledger
            .find_payment_by_reference(&notice.reference)
            .await
            .map_err(|e| PaymentIntakeError::Storage(e.to_string()))?
            .ok_or_else(|| {
                PaymentIntakeError::invalid_callback(format!(
                    "no payment for reference {}",
                    notice.reference
                ))
            })?;

        match (payment.status, notice.outcome) {
            // Idempotent no-ops under redelivery.
            (PaymentStatus::Completed, CallbackOutcome::Success)
            | (PaymentStatus::Failed, CallbackOutcome::Failure) => {
                Ok(HandleCallbackResult::AlreadyProcessed {
                    payment_id: payment.id,
                })
            }
            // A terminal status never moves again.
            (PaymentStatus::Completed, CallbackOutcome::Failure)
            | (PaymentStatus::Failed, CallbackOutcome::Success) => {
                tracing::warn!(
                    payment_id = %payment.id,
                    status = payment.status.as_str(),
                    "callback outcome contradicts recorded payment status"
                );
                Err(PaymentIntakeError::OutcomeMismatch)
            }
            (PaymentStatus::Pending, CallbackOutcome::Failure) => {
                self.mark_failed(payment.id).await
            }
            (PaymentStatus::Pending, CallbackOutcome::Success) => {
                self.credit(payment.id, payment.user_id, payment.coins, &notice.reference)
                    .await
            }
        }
    }

    async fn mark_failed(
        &self,
        payment_id: PaymentId,
    ) -> Result<HandleCallbackResult, PaymentIntakeError> {
        let transition = PaymentTransition {
            payment_id,
            to: PaymentStatus::Failed,
        };
        match self.ledger.transition_payment(transition).await {
            Ok(()) => Ok(HandleCallbackResult::MarkedFailed { payment_id }),
            // Lost a race against another delivery; the payment is terminal.
            Err(LedgerError::PaymentNotPending) => {
                Ok(HandleCallbackResult::AlreadyProcessed { payment_id })
            }
            Err(e) => Err(PaymentIntakeError::Storage(e.to_string())),
        }
    }

    async fn credit(
        &self,
        payment_id: PaymentId,
        user_id: crate::domain::foundation::UserId,
        coins: i64,
        reference: &str,
    ) -> Result<HandleCallbackResult, PaymentIntakeError> {
        let entry = EntryDraft::new(
            EntryKind::PaymentCredit,
            coins,
            format!("Purchased {} coins", coins),
        )
        .with_reference(*payment_id.as_uuid());
        let batch = LedgerBatch::entry(entry).with_payment_transition(PaymentTransition {
            payment_id,
            to: PaymentStatus::Completed,
        });

        match self.ledger.apply_atomic(user_id, batch).await {
            Ok(applied) => {
                tracing::info!(
                    payment_id = %payment_id,
                    gateway_ref = reference,
                    coins,
                    balance = applied.new_balance,
                    "payment credited"
                );
                Ok(HandleCallbackResult::Credited {
                    payment_id,
                    balance: applied.new_balance,
                })
            }
            // Another delivery won the pending->completed race; the credit
            // already happened exactly once.
            Err(LedgerError::PaymentNotPending) => {
                Ok(HandleCallbackResult::AlreadyProcessed { payment_id })
            }
            Err(e) => Err(PaymentIntakeError::Storage(e.to_string())),
        }
    }
}
