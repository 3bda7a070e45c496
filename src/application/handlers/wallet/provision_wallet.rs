//! ProvisionWalletHandler - create a wallet with the welcome credit.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::ledger::{EntryDraft, EntryKind, LedgerError};
use crate::ports::LedgerStore;

/// Command issued when a user account is created.
#[derive(Debug, Clone)]
pub struct ProvisionWalletCommand {
    pub user_id: UserId,
}

/// Creates the user's wallet, seeded with the configured welcome balance.
///
/// The welcome credit is itself a ledger entry, so the running-total
/// invariant holds from the very first coin.
pub struct ProvisionWalletHandler {
    ledger: Arc<dyn LedgerStore>,
    welcome_coins: i64,
}

impl ProvisionWalletHandler {
    pub fn new(ledger: Arc<dyn LedgerStore>, welcome_coins: i64) -> Self {
        Self {
            ledger,
            welcome_coins,
        }
    }

    pub async fn handle(&self, cmd: ProvisionWalletCommand) -> Result<i64, LedgerError> {
        let welcome = EntryDraft::new(
            EntryKind::Welcome,
            self.welcome_coins,
            "Welcome bonus coins",
        );
        let applied = self.ledger.create_wallet(cmd.user_id, welcome).await?;

        tracing::info!(
            user_id = %cmd.user_id,
            balance = applied.new_balance,
            "wallet provisioned"
        );
        Ok(applied.new_balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryLedgerStore;

    #[tokio::test]
    async fn provisioning_seeds_welcome_balance_with_entry() {
        let ledger = Arc::new(InMemoryLedgerStore::new());
        let handler = ProvisionWalletHandler::new(ledger.clone(), 50);
        let user_id = UserId::new();

        let balance = handler
            .handle(ProvisionWalletCommand { user_id })
            .await
            .unwrap();
        assert_eq!(balance, 50);

        let entries = ledger.ledger_entries(user_id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, EntryKind::Welcome);
        assert_eq!(entries[0].amount, 50);
        assert_eq!(entries[0].balance_after, 50);
    }

    #[tokio::test]
    async fn provisioning_twice_fails() {
        let ledger = Arc::new(InMemoryLedgerStore::new());
        let handler = ProvisionWalletHandler::new(ledger, 50);
        let user_id = UserId::new();

        handler
            .handle(ProvisionWalletCommand { user_id })
            .await
            .unwrap();
        let err = handler
            .handle(ProvisionWalletCommand { user_id })
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::WalletExists(_)));
    }
}
