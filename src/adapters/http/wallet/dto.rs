//! Wire types for the wallet endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{LedgerEntryId, Timestamp, UserId};
use crate::domain::ledger::{EntryKind, LedgerEntry};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletResponse {
    pub user_id: UserId,
    pub balance: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntryResponse {
    pub id: LedgerEntryId,
    pub kind: EntryKind,
    pub amount: i64,
    pub balance_after: i64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<Uuid>,
    pub created_at: Timestamp,
}

impl From<LedgerEntry> for LedgerEntryResponse {
    fn from(entry: LedgerEntry) -> Self {
        Self {
            id: entry.id,
            kind: entry.kind,
            amount: entry.amount,
            balance_after: entry.balance_after,
            description: entry.description,
            reference_id: entry.reference_id,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerHistoryResponse {
    pub balance: i64,
    /// Newest first.
    pub entries: Vec<LedgerEntryResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdjustBalanceRequest {
    /// Signed coin amount; negative debits.
    pub amount: i64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: i64,
}
