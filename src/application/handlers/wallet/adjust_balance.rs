//! AdjustBalanceHandler - operator-applied credits and debits.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::ledger::{EntryDraft, EntryKind, LedgerError};
use crate::ports::{LedgerBatch, LedgerStore};

/// An operator adjustment. `amount` is signed; debits go through the same
/// overdraw guard as purchases.
#[derive(Debug, Clone)]
pub struct AdjustBalanceCommand {
    pub user_id: UserId,
    pub amount: i64,
    pub reason: String,
}

pub struct AdjustBalanceHandler {
    ledger: Arc<dyn LedgerStore>,
}

impl AdjustBalanceHandler {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self, cmd: AdjustBalanceCommand) -> Result<i64, LedgerError> {
        let entry = EntryDraft::new(EntryKind::AdminAdjustment, cmd.amount, cmd.reason.clone());
        let applied = self
            .ledger
            .apply_atomic(cmd.user_id, LedgerBatch::entry(entry))
            .await?;

        tracing::info!(
            user_id = %cmd.user_id,
            amount = cmd.amount,
            balance = applied.new_balance,
            reason = %cmd.reason,
            "balance adjusted"
        );
        Ok(applied.new_balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryLedgerStore;

    async fn store_with_wallet(user_id: UserId) -> Arc<InMemoryLedgerStore> {
        let ledger = Arc::new(InMemoryLedgerStore::new());
        ledger
            .create_wallet(
                user_id,
                EntryDraft::new(EntryKind::Welcome, 50, "Welcome bonus coins"),
            )
            .await
            .unwrap();
        ledger
    }

    #[tokio::test]
    async fn credit_and_debit_move_the_balance() {
        let user_id = UserId::new();
        let ledger = store_with_wallet(user_id).await;
        let handler = AdjustBalanceHandler::new(ledger.clone());

        let balance = handler
            .handle(AdjustBalanceCommand {
                user_id,
                amount: 30,
                reason: "Goodwill credit".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(balance, 80);

        let balance = handler
            .handle(AdjustBalanceCommand {
                user_id,
                amount: -25,
                reason: "Chargeback".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(balance, 55);
    }

    #[tokio::test]
    async fn debit_cannot_overdraw() {
        let user_id = UserId::new();
        let ledger = store_with_wallet(user_id).await;
        let handler = AdjustBalanceHandler::new(ledger.clone());

        let err = handler
            .handle(AdjustBalanceCommand {
                user_id,
                amount: -60,
                reason: "Chargeback".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        assert_eq!(ledger.read_balance(user_id).await.unwrap(), 50);
    }
}
