//! Error types for the ledger and unlock engine.

use thiserror::Error;

use crate::domain::foundation::{EpisodeId, SeriesId, UserId};

/// Errors surfaced by the ledger store.
///
/// `apply_atomic` rejects the whole batch on any of these; no partial state
/// is ever committed.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    #[error("No wallet exists for user {0}")]
    WalletNotFound(UserId),

    #[error("User {0} already has a wallet")]
    WalletExists(UserId),

    #[error("Insufficient funds: need {needed} coins, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },

    #[error("User {user_id} already owns episode {episode_id}")]
    DuplicateEntitlement {
        user_id: UserId,
        episode_id: EpisodeId,
    },

    #[error("Payment is not in the expected status")]
    PaymentNotPending,

    #[error("Concurrent modification detected; retry the operation")]
    Conflict,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    pub fn storage(msg: impl Into<String>) -> Self {
        LedgerError::Storage(msg.into())
    }

    /// Whether re-running the whole operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Conflict)
    }
}

/// Errors produced by the unlock engine, as seen by callers.
#[derive(Debug, Clone, Error)]
pub enum UnlockError {
    #[error("Episode {0} does not exist")]
    EpisodeNotFound(EpisodeId),

    #[error("Series {0} does not exist")]
    SeriesNotFound(SeriesId),

    /// Idempotent outcome: retrying an unlock never double-charges.
    #[error("Already owned; nothing to unlock")]
    AlreadyOwned,

    #[error("Insufficient funds: need {needed} coins, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },

    /// Transient; the caller should retry the whole operation.
    #[error("Concurrent modification detected; retry the operation")]
    StorageConflict,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<LedgerError> for UnlockError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientFunds { needed, available } => {
                UnlockError::InsufficientFunds { needed, available }
            }
            // A concurrent unlock won the race to insert the entitlement.
            LedgerError::DuplicateEntitlement { .. } => UnlockError::AlreadyOwned,
            LedgerError::Conflict => UnlockError::StorageConflict,
            other => UnlockError::Storage(other.to_string()),
        }
    }
}
