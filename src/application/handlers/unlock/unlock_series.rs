//! UnlockSeriesHandler - unlock every missing episode of a series at once.

use std::sync::Arc;

use crate::domain::entitlement::Entitlement;
use crate::domain::foundation::{EntitlementId, SeriesId, UserId};
use crate::domain::ledger::{EntryDraft, EntryKind, UnlockError};
use crate::ports::{CatalogLookup, LedgerBatch, LedgerStore};

/// Command to unlock all not-yet-owned episodes of a series.
#[derive(Debug, Clone)]
pub struct UnlockSeriesCommand {
    pub user_id: UserId,
    pub series_id: SeriesId,
}

/// Result of a successful series unlock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockSeriesResult {
    pub balance: i64,
    pub entitlement_ids: Vec<EntitlementId>,
    pub total_cost: i64,
}

/// Handler for the series unlock operation.
///
/// Atomicity is series-wide, not per-episode: either every missing episode
/// becomes owned and the full total is debited, or nothing changes. A
/// single ownership pass both computes the total cost and selects the
/// entitlement set, so the two can never disagree.
pub struct UnlockSeriesHandler {
    catalog: Arc<dyn CatalogLookup>,
    ledger: Arc<dyn LedgerStore>,
}

impl UnlockSeriesHandler {
    pub fn new(catalog: Arc<dyn CatalogLookup>, ledger: Arc<dyn LedgerStore>) -> Self {
        Self { catalog, ledger }
    }

    pub async fn handle(
        &self,
        cmd: UnlockSeriesCommand,
    ) -> Result<UnlockSeriesResult, UnlockError> {
        let episodes = self
            .catalog
            .episodes_by_series(cmd.series_id)
            .await
            .map_err(|e| UnlockError::Storage(e.to_string()))?;
        if episodes.is_empty() {
            return Err(UnlockError::SeriesNotFound(cmd.series_id));
        }

        // One ownership query; cost sum and entitlement set come from the
        // same partition.
        let episode_ids: Vec<_> = episodes.iter().map(|e| e.id).collect();
        let owned = self.ledger.owned_episodes(cmd.user_id, &episode_ids).await?;

        let missing: Vec<_> = episodes
            .iter()
            .filter(|e| !owned.contains(&e.id))
            .collect();
        if missing.is_empty() {
            return Err(UnlockError::AlreadyOwned);
        }
        let total_cost: i64 = missing.iter().map(|e| e.price).sum();

        let balance = self.ledger.read_balance(cmd.user_id).await?;
        if balance < total_cost {
            return Err(UnlockError::InsufficientFunds {
                needed: total_cost,
                available: balance,
            });
        }

        let entitlements: Vec<Entitlement> = missing
            .iter()
            .map(|e| Entitlement::completed(cmd.user_id, e.id, e.price))
            .collect();
        let entitlement_ids: Vec<_> = entitlements.iter().map(|e| e.id).collect();

        let entry = EntryDraft::new(
            EntryKind::Purchase,
            -total_cost,
            "Purchased entire series",
        )
        .with_reference(*cmd.series_id.as_uuid());

        let applied = self
            .ledger
            .apply_atomic(
                cmd.user_id,
                LedgerBatch::entry(entry).with_entitlements(entitlements),
            )
            .await?;

        tracing::info!(
            user_id = %cmd.user_id,
            series_id = %cmd.series_id,
            episodes = entitlement_ids.len(),
            total_cost,
            balance = applied.new_balance,
            "series unlocked"
        );

        Ok(UnlockSeriesResult {
            balance: applied.new_balance,
            entitlement_ids,
            total_cost,
        })
    }
}
