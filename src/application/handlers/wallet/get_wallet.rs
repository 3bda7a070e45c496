//! GetWalletHandler - balance and transaction history read side.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::ledger::{LedgerEntry, LedgerError};
use crate::ports::LedgerStore;

/// Query for a user's wallet state.
#[derive(Debug, Clone)]
pub struct GetWalletQuery {
    pub user_id: UserId,
    /// When set, the ledger history is included in the view.
    pub include_entries: bool,
}

/// Balance plus, optionally, the full ledger history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletView {
    pub user_id: UserId,
    pub balance: i64,
    pub entries: Vec<LedgerEntry>,
}

pub struct GetWalletHandler {
    ledger: Arc<dyn LedgerStore>,
}

impl GetWalletHandler {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self, query: GetWalletQuery) -> Result<WalletView, LedgerError> {
        let balance = self.ledger.read_balance(query.user_id).await?;
        let entries = if query.include_entries {
            self.ledger.ledger_entries(query.user_id).await?
        } else {
            Vec::new()
        };
        Ok(WalletView {
            user_id: query.user_id,
            balance,
            entries,
        })
    }
}
