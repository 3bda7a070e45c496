//! Wallet entity - one per user, holding the coin balance.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

use super::LedgerError;

/// A user's coin balance.
///
/// Created when the user account is provisioned (seeded with a welcome
/// balance) and mutated only through the unlock engine or payment intake.
/// The balance is an integer coin count and never goes negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub user_id: UserId,
    pub balance: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Wallet {
    /// Creates a wallet with the given opening balance.
    pub fn open(user_id: UserId, opening_balance: i64) -> Self {
        let now = Timestamp::now();
        Self {
            user_id,
            balance: opening_balance,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the balance covers a debit of `cost` coins.
    pub fn can_afford(&self, cost: i64) -> bool {
        self.balance >= cost
    }

    /// Applies a signed delta to the balance.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientFunds` if the delta would take the balance
    /// below zero; the wallet is left unchanged.
    pub fn apply(&mut self, delta: i64) -> Result<i64, LedgerError> {
        let next = self.balance + delta;
        if next < 0 {
            return Err(LedgerError::InsufficientFunds {
                needed: -delta,
                available: self.balance,
            });
        }
        self.balance = next;
        self.updated_at = Timestamp::now();
        Ok(next)
    }
}
