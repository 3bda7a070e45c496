//! Entitlement - record that a user has paid access to an episode.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EntitlementId, EpisodeId, Timestamp, UserId};

/// Lifecycle state of an entitlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementStatus {
    Completed,
    Pending,
    Failed,
}

impl EntitlementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntitlementStatus::Completed => "completed",
            EntitlementStatus::Pending => "pending",
            EntitlementStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(EntitlementStatus::Completed),
            "pending" => Some(EntitlementStatus::Pending),
            "failed" => Some(EntitlementStatus::Failed),
            _ => None,
        }
    }
}

/// Records that a user owns a specific episode.
///
/// # Invariants
///
/// - At most one `completed` entitlement per (user, episode); the ledger
///   store enforces this at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    pub id: EntitlementId,
    pub user_id: UserId,
    pub episode_id: EpisodeId,
    /// Coins debited for this episode.
    pub amount_paid: i64,
    pub status: EntitlementStatus,
    pub created_at: Timestamp,
}

impl Entitlement {
    /// Creates a completed entitlement for a paid unlock.
    pub fn completed(user_id: UserId, episode_id: EpisodeId, amount_paid: i64) -> Self {
        Self {
            id: EntitlementId::new(),
            user_id,
            episode_id,
            amount_paid,
            status: EntitlementStatus::Completed,
            created_at: Timestamp::now(),
        }
    }
}
