//! Immutable ledger entries - the audit trail of every balance change.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{LedgerEntryId, Timestamp, UserId};

/// Classification of a balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Opening credit granted when the wallet is created.
    Welcome,
    /// Debit for unlocking an episode or series.
    Purchase,
    /// Credit from a completed external-gateway payment.
    PaymentCredit,
    /// Credit reversing a previous purchase.
    Refund,
    /// Manual credit or debit applied by an operator.
    AdminAdjustment,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Welcome => "welcome",
            EntryKind::Purchase => "purchase",
            EntryKind::PaymentCredit => "payment_credit",
            EntryKind::Refund => "refund",
            EntryKind::AdminAdjustment => "admin_adjustment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "welcome" => Some(EntryKind::Welcome),
            "purchase" => Some(EntryKind::Purchase),
            "payment_credit" => Some(EntryKind::PaymentCredit),
            "refund" => Some(EntryKind::Refund),
            "admin_adjustment" => Some(EntryKind::AdminAdjustment),
            _ => None,
        }
    }
}

/// One immutable record in a user's transaction history.
///
/// Entries are never edited or removed. `balance_after` equals the wallet
/// balance immediately after this entry was applied, so the sequence of
/// entries forms a verifiable running total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: LedgerEntryId,
    pub user_id: UserId,
    pub kind: EntryKind,
    /// Signed coin amount; negative is a debit, positive a credit.
    pub amount: i64,
    /// Wallet balance immediately after this entry applied.
    pub balance_after: i64,
    pub description: String,
    /// Links the entry to the entitlement or payment that caused it.
    pub reference_id: Option<Uuid>,
    pub created_at: Timestamp,
}

/// The caller-supplied part of a ledger entry.
///
/// The ledger store assigns `id`, `balance_after`, and `created_at` at the
/// moment the batch commits, so callers can never fabricate a running
/// total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub kind: EntryKind,
    pub amount: i64,
    pub description: String,
    pub reference_id: Option<Uuid>,
}

impl EntryDraft {
    pub fn new(kind: EntryKind, amount: i64, description: impl Into<String>) -> Self {
        Self {
            kind,
            amount,
            description: description.into(),
            reference_id: None,
        }
    }

    pub fn with_reference(mut self, reference: Uuid) -> Self {
        self.reference_id = Some(reference);
        self
    }

    /// Whether this draft debits the wallet.
    pub fn is_debit(&self) -> bool {
        self.amount < 0
    }
}
