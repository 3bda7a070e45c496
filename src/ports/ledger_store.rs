//! Ledger store port - the single source of truth for coin balances.
//!
//! No caller outside an implementation of this trait may write a balance
//! directly. Every mutation is expressed as a [`LedgerBatch`]: one signed
//! balance delta plus the auxiliary writes that must land with it, applied
//! all-or-nothing.

use async_trait::async_trait;

use crate::domain::entitlement::Entitlement;
use crate::domain::foundation::{EpisodeId, LedgerEntryId, PaymentId, UserId};
use crate::domain::ledger::{EntryDraft, LedgerEntry, LedgerError};
use crate::domain::payment::{Payment, PaymentStatus};

/// A guarded payment status change committed with the batch.
///
/// The transition only applies if the payment is still `pending` at commit
/// time; otherwise the whole batch is rejected with
/// [`LedgerError::PaymentNotPending`]. This conditional update is the
/// concurrency guard for at-least-once callback delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentTransition {
    pub payment_id: PaymentId,
    pub to: PaymentStatus,
}

/// One atomic unit of ledger work.
///
/// The entry's signed amount is the balance delta. For a debit, the store
/// verifies `balance >= |amount|` under the same serialization that applies
/// the write, so two concurrent debits can never both observe a stale
/// sufficient balance.
#[derive(Debug, Clone)]
pub struct LedgerBatch {
    pub entry: EntryDraft,
    /// Entitlements inserted with the batch; a duplicate completed
    /// entitlement rejects the whole batch.
    pub entitlements: Vec<Entitlement>,
    pub payment_transition: Option<PaymentTransition>,
}

impl LedgerBatch {
    pub fn entry(entry: EntryDraft) -> Self {
        Self {
            entry,
            entitlements: Vec::new(),
            payment_transition: None,
        }
    }

    pub fn with_entitlements(mut self, entitlements: Vec<Entitlement>) -> Self {
        self.entitlements = entitlements;
        self
    }

    pub fn with_payment_transition(mut self, transition: PaymentTransition) -> Self {
        self.payment_transition = Some(transition);
        self
    }
}

/// Result of a committed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedBatch {
    pub entry_id: LedgerEntryId,
    pub new_balance: i64,
}

/// Durable storage of wallets, ledger entries, entitlements, and payments.
///
/// Implementations must serialize mutating operations per user (row lock,
/// optimistic check, or per-user mutex) while keeping different users fully
/// independent. The batch is short-lived: implementations never hold its
/// lock across a network call.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Creates a wallet seeded by the given welcome credit.
    ///
    /// # Errors
    ///
    /// `WalletExists` if the user already has a wallet.
    async fn create_wallet(
        &self,
        user_id: UserId,
        welcome: EntryDraft,
    ) -> Result<AppliedBatch, LedgerError>;

    /// Current balance for a user.
    async fn read_balance(&self, user_id: UserId) -> Result<i64, LedgerError>;

    /// Applies a balance delta and its auxiliary writes as one unit.
    ///
    /// Rejects the whole batch if any precondition no longer holds:
    /// insufficient balance for a debit, duplicate completed entitlement,
    /// or a payment that is no longer pending.
    async fn apply_atomic(
        &self,
        user_id: UserId,
        batch: LedgerBatch,
    ) -> Result<AppliedBatch, LedgerError>;

    /// A user's ledger history in creation order.
    async fn ledger_entries(&self, user_id: UserId) -> Result<Vec<LedgerEntry>, LedgerError>;

    /// Whether the user has a completed entitlement for the episode.
    async fn owns(&self, user_id: UserId, episode_id: EpisodeId) -> Result<bool, LedgerError>;

    /// Subset of `episode_ids` the user already owns (one query, one pass).
    async fn owned_episodes(
        &self,
        user_id: UserId,
        episode_ids: &[EpisodeId],
    ) -> Result<Vec<EpisodeId>, LedgerError>;

    /// Persists a freshly created pending payment.
    async fn create_payment(&self, payment: &Payment) -> Result<(), LedgerError>;

    /// Records the gateway reference and payload on a pending payment.
    async fn attach_payment_reference(&self, payment: &Payment) -> Result<(), LedgerError>;

    /// Looks up a payment by its gateway reference.
    async fn find_payment_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Payment>, LedgerError>;

    /// Conditionally transitions a pending payment without touching the
    /// wallet (used for failure callbacks).
    async fn transition_payment(
        &self,
        transition: PaymentTransition,
    ) -> Result<(), LedgerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::EntryKind;

    #[test]
    fn ledger_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn LedgerStore) {}
    }

    #[test]
    fn batch_builder_composes() {
        let entitlement = Entitlement::completed(UserId::new(), EpisodeId::new(), 10);
        let batch = LedgerBatch::entry(EntryDraft::new(EntryKind::Purchase, -10, "ep"))
            .with_entitlements(vec![entitlement])
            .with_payment_transition(PaymentTransition {
                payment_id: PaymentId::new(),
                to: PaymentStatus::Completed,
            });
        assert_eq!(batch.entitlements.len(), 1);
        assert!(batch.payment_transition.is_some());
    }
}
