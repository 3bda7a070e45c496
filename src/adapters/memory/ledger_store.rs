//! In-memory `LedgerStore` with one mutex per user.
//!
//! Each wallet lives behind its own lock, so mutating operations for
//! different users never contend; payments sit behind a separate lock
//! keyed by gateway reference. Holding the user lock (and, for batches
//! with a payment transition, the payments lock) gives the same
//! all-or-nothing semantics as a database transaction: every precondition
//! is checked before the first mutation, so a rejected batch leaves no
//! trace.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::entitlement::{Entitlement, EntitlementStatus};
use crate::domain::foundation::{EpisodeId, LedgerEntryId, PaymentId, Timestamp, UserId};
use crate::domain::ledger::{EntryDraft, LedgerEntry, LedgerError, Wallet};
use crate::domain::payment::{Payment, PaymentStatus};
use crate::ports::{AppliedBatch, LedgerBatch, LedgerStore, PaymentTransition};

struct UserState {
    wallet: Wallet,
    entries: Vec<LedgerEntry>,
    entitlements: Vec<Entitlement>,
}

impl UserState {
    fn has_completed_entitlement(&self, episode_id: EpisodeId) -> bool {
        self.entitlements
            .iter()
            .any(|e| e.episode_id == episode_id && e.status == EntitlementStatus::Completed)
    }

    fn record_entry(&mut self, user_id: UserId, draft: EntryDraft, balance_after: i64) -> LedgerEntryId {
        let entry = LedgerEntry {
            id: LedgerEntryId::new(),
            user_id,
            kind: draft.kind,
            amount: draft.amount,
            balance_after,
            description: draft.description,
            reference_id: draft.reference_id,
            created_at: Timestamp::now(),
        };
        let id = entry.id;
        self.entries.push(entry);
        id
    }
}

#[derive(Default)]
struct PaymentState {
    payments: HashMap<PaymentId, Payment>,
    by_ref: HashMap<String, PaymentId>,
}

impl PaymentState {
    fn transition(&mut self, transition: &PaymentTransition) -> Result<(), LedgerError> {
        let payment = self
            .payments
            .get_mut(&transition.payment_id)
            .ok_or_else(|| LedgerError::storage("payment not found"))?;
        if payment.status != PaymentStatus::Pending {
            return Err(LedgerError::PaymentNotPending);
        }
        match transition.to {
            PaymentStatus::Completed => payment.complete(),
            PaymentStatus::Failed => payment.fail(),
            PaymentStatus::Pending => {
                return Err(LedgerError::storage("cannot transition to pending"))
            }
        }
        .map_err(|e| LedgerError::storage(e.to_string()))
    }
}

/// In-memory, fully async implementation of [`LedgerStore`].
///
/// The user registry is a brief std mutex, never held across an await;
/// per-user state and payments are tokio mutexes. Lock order is always
/// user then payments, so the pair cannot deadlock.
#[derive(Default)]
pub struct InMemoryLedgerStore {
    users: StdMutex<HashMap<UserId, Arc<Mutex<UserState>>>>,
    payments: Mutex<PaymentState>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn user(&self, user_id: UserId) -> Result<Arc<Mutex<UserState>>, LedgerError> {
        self.users
            .lock()
            .expect("user registry lock poisoned")
            .get(&user_id)
            .cloned()
            .ok_or(LedgerError::WalletNotFound(user_id))
    }

    /// Completed entitlements for a user, newest last. Test helper.
    pub async fn entitlements_for(&self, user_id: UserId) -> Vec<Entitlement> {
        match self.user(user_id) {
            Ok(user) => user.lock().await.entitlements.clone(),
            Err(_) => Vec::new(),
        }
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn create_wallet(
        &self,
        user_id: UserId,
        welcome: EntryDraft,
    ) -> Result<AppliedBatch, LedgerError> {
        let mut users = self.users.lock().expect("user registry lock poisoned");
        if users.contains_key(&user_id) {
            return Err(LedgerError::WalletExists(user_id));
        }

        let wallet = Wallet::open(user_id, welcome.amount);
        let new_balance = wallet.balance;
        let mut state = UserState {
            wallet,
            entries: Vec::new(),
            entitlements: Vec::new(),
        };
        let entry_id = state.record_entry(user_id, welcome, new_balance);
        users.insert(user_id, Arc::new(Mutex::new(state)));

        Ok(AppliedBatch {
            entry_id,
            new_balance,
        })
    }

    async fn read_balance(&self, user_id: UserId) -> Result<i64, LedgerError> {
        let user = self.user(user_id)?;
        let state = user.lock().await;
        Ok(state.wallet.balance)
    }

    async fn apply_atomic(
        &self,
        user_id: UserId,
        batch: LedgerBatch,
    ) -> Result<AppliedBatch, LedgerError> {
        let user = self.user(user_id)?;
        let mut state = user.lock().await;

        // Validate every precondition before the first mutation.
        let new_balance = state.wallet.balance + batch.entry.amount;
        if new_balance < 0 {
            return Err(LedgerError::InsufficientFunds {
                needed: -batch.entry.amount,
                available: state.wallet.balance,
            });
        }
        for entitlement in &batch.entitlements {
            if entitlement.status == EntitlementStatus::Completed
                && state.has_completed_entitlement(entitlement.episode_id)
            {
                return Err(LedgerError::DuplicateEntitlement {
                    user_id,
                    episode_id: entitlement.episode_id,
                });
            }
        }

        // The payments lock is taken after the user lock and held through
        // the user-state mutation, so the transition and the credit land
        // together or not at all.
        let _payments = match &batch.payment_transition {
            Some(transition) => {
                let mut payments = self.payments.lock().await;
                payments.transition(transition)?;
                Some(payments)
            }
            None => None,
        };

        state.wallet.apply(batch.entry.amount)?;
        let entry_id = state.record_entry(user_id, batch.entry, new_balance);
        state.entitlements.extend(batch.entitlements);

        Ok(AppliedBatch {
            entry_id,
            new_balance,
        })
    }

    async fn ledger_entries(&self, user_id: UserId) -> Result<Vec<LedgerEntry>, LedgerError> {
        let user = self.user(user_id)?;
        let state = user.lock().await;
        Ok(state.entries.clone())
    }

    async fn owns(&self, user_id: UserId, episode_id: EpisodeId) -> Result<bool, LedgerError> {
        match self.user(user_id) {
            Ok(user) => Ok(user.lock().await.has_completed_entitlement(episode_id)),
            Err(_) => Ok(false),
        }
    }

    async fn owned_episodes(
        &self,
        user_id: UserId,
        episode_ids: &[EpisodeId],
    ) -> Result<Vec<EpisodeId>, LedgerError> {
        match self.user(user_id) {
            Ok(user) => {
                let state = user.lock().await;
                Ok(episode_ids
                    .iter()
                    .copied()
                    .filter(|id| state.has_completed_entitlement(*id))
                    .collect())
            }
            Err(_) => Ok(Vec::new()),
        }
    }

    async fn create_payment(&self, payment: &Payment) -> Result<(), LedgerError> {
        let mut payments = self.payments.lock().await;
        payments.payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn attach_payment_reference(&self, payment: &Payment) -> Result<(), LedgerError> {
        let mut payments = self.payments.lock().await;
        let reference = payment
            .gateway_ref
            .clone()
            .ok_or_else(|| LedgerError::storage("payment has no gateway reference"))?;
        if payments.by_ref.contains_key(&reference) {
            return Err(LedgerError::Conflict);
        }
        payments.payments.insert(payment.id, payment.clone());
        payments.by_ref.insert(reference, payment.id);
        Ok(())
    }

    async fn find_payment_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Payment>, LedgerError> {
        let payments = self.payments.lock().await;
        Ok(payments
            .by_ref
            .get(reference)
            .and_then(|id| payments.payments.get(id))
            .cloned())
    }

    async fn transition_payment(
        &self,
        transition: PaymentTransition,
    ) -> Result<(), LedgerError> {
        let mut payments = self.payments.lock().await;
        payments.transition(&transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::EntryKind;

    fn welcome() -> EntryDraft {
        EntryDraft::new(EntryKind::Welcome, 50, "Welcome bonus coins")
    }

    #[tokio::test]
    async fn batch_is_all_or_nothing_on_duplicate_entitlement() {
        let store = InMemoryLedgerStore::new();
        let user_id = UserId::new();
        let episode_id = EpisodeId::new();
        store.create_wallet(user_id, welcome()).await.unwrap();

        let first = LedgerBatch::entry(EntryDraft::new(EntryKind::Purchase, -10, "ep"))
            .with_entitlements(vec![Entitlement::completed(user_id, episode_id, 10)]);
        store.apply_atomic(user_id, first).await.unwrap();

        let replay = LedgerBatch::entry(EntryDraft::new(EntryKind::Purchase, -10, "ep"))
            .with_entitlements(vec![Entitlement::completed(user_id, episode_id, 10)]);
        let err = store.apply_atomic(user_id, replay).await.unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateEntitlement { .. }));

        // No second debit landed.
        assert_eq!(store.read_balance(user_id).await.unwrap(), 40);
        assert_eq!(store.ledger_entries(user_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn balance_after_forms_a_running_total() {
        let store = InMemoryLedgerStore::new();
        let user_id = UserId::new();
        store.create_wallet(user_id, welcome()).await.unwrap();
        store
            .apply_atomic(
                user_id,
                LedgerBatch::entry(EntryDraft::new(EntryKind::Purchase, -10, "ep")),
            )
            .await
            .unwrap();
        store
            .apply_atomic(
                user_id,
                LedgerBatch::entry(EntryDraft::new(EntryKind::PaymentCredit, 120, "coins")),
            )
            .await
            .unwrap();

        let entries = store.ledger_entries(user_id).await.unwrap();
        let totals: Vec<i64> = entries.iter().map(|e| e.balance_after).collect();
        assert_eq!(totals, vec![50, 40, 160]);
    }

    #[tokio::test]
    async fn pending_transition_applies_exactly_once() {
        let store = InMemoryLedgerStore::new();
        let user_id = UserId::new();
        store.create_wallet(user_id, welcome()).await.unwrap();

        let bundle = crate::domain::catalog::CoinBundle {
            id: crate::domain::foundation::BundleId::new(),
            name: "120 Coins".to_string(),
            coins: 120,
            price: 9900,
            currency: crate::domain::catalog::Currency::new("INR"),
            active: true,
        };
        let payment = Payment::pending(user_id, &bundle);
        store.create_payment(&payment).await.unwrap();

        let transition = PaymentTransition {
            payment_id: payment.id,
            to: PaymentStatus::Completed,
        };
        store.transition_payment(transition.clone()).await.unwrap();
        let err = store.transition_payment(transition).await.unwrap_err();
        assert!(matches!(err, LedgerError::PaymentNotPending));
    }

    #[tokio::test]
    async fn duplicate_gateway_reference_conflicts() {
        let store = InMemoryLedgerStore::new();
        let bundle = crate::domain::catalog::CoinBundle {
            id: crate::domain::foundation::BundleId::new(),
            name: "50 Coins".to_string(),
            coins: 50,
            price: 5000,
            currency: crate::domain::catalog::Currency::new("INR"),
            active: true,
        };

        let mut first = Payment::pending(UserId::new(), &bundle);
        store.create_payment(&first).await.unwrap();
        first
            .attach_reference("mock", "order_1", serde_json::json!({}))
            .unwrap();
        store.attach_payment_reference(&first).await.unwrap();

        let mut second = Payment::pending(UserId::new(), &bundle);
        store.create_payment(&second).await.unwrap();
        second
            .attach_reference("mock", "order_1", serde_json::json!({}))
            .unwrap();
        let err = store.attach_payment_reference(&second).await.unwrap_err();
        assert!(matches!(err, LedgerError::Conflict));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn users_mutate_concurrently_without_interference() {
        // Many users hammer their own wallets at once; each shard stays
        // consistent because the locks are per user, not global.
        let store = Arc::new(InMemoryLedgerStore::new());
        let barrier = Arc::new(tokio::sync::Barrier::new(8));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let barrier = barrier.clone();
            tasks.push(tokio::spawn(async move {
                let user_id = UserId::new();
                store.create_wallet(user_id, welcome()).await.unwrap();
                barrier.wait().await;
                for _ in 0..20 {
                    store
                        .apply_atomic(
                            user_id,
                            LedgerBatch::entry(EntryDraft::new(
                                EntryKind::AdminAdjustment,
                                -2,
                                "drain",
                            )),
                        )
                        .await
                        .unwrap();
                }
                (user_id, store.read_balance(user_id).await.unwrap())
            }));
        }

        for task in tasks {
            let (user_id, balance) = task.await.unwrap();
            assert_eq!(balance, 10);
            let entries = store.ledger_entries(user_id).await.unwrap();
            assert_eq!(entries.len(), 21);
            assert_eq!(entries.last().unwrap().balance_after, 10);
        }
    }
}
