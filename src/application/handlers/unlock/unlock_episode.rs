//! UnlockEpisodeHandler - debit one episode's price and record ownership.

use std::sync::Arc;

use crate::domain::entitlement::Entitlement;
use crate::domain::foundation::{EntitlementId, EpisodeId, UserId};
use crate::domain::ledger::{EntryDraft, EntryKind, UnlockError};
use crate::ports::{CatalogLookup, LedgerBatch, LedgerStore};

/// Command to unlock a single episode for a user.
#[derive(Debug, Clone)]
pub struct UnlockEpisodeCommand {
    pub user_id: UserId,
    pub episode_id: EpisodeId,
}

/// Result of a successful unlock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockEpisodeResult {
    pub balance: i64,
    pub entitlement_id: EntitlementId,
}

/// Handler for the episode unlock operation.
///
/// The debit, the entitlement insert, and the ledger entry commit together
/// or not at all; a partial application (debit without entitlement, or the
/// reverse) is the failure mode this handler exists to prevent.
pub struct UnlockEpisodeHandler {
    catalog: Arc<dyn CatalogLookup>,
    ledger: Arc<dyn LedgerStore>,
}

impl UnlockEpisodeHandler {
    pub fn new(catalog: Arc<dyn CatalogLookup>, ledger: Arc<dyn LedgerStore>) -> Self {
        Self { catalog, ledger }
    }

    pub async fn handle(
        &self,
        cmd: UnlockEpisodeCommand,
    ) -> Result<UnlockEpisodeResult, UnlockError> {
        // 1. Price and existence from the catalog.
        let episode = self
            .catalog
            .get_episode(cmd.episode_id)
            .await
            .map_err(|e| UnlockError::Storage(e.to_string()))?
            .ok_or(UnlockError::EpisodeNotFound(cmd.episode_id))?;

        // 2. Idempotency: retrying an unlock never double-charges.
        if self.ledger.owns(cmd.user_id, cmd.episode_id).await? {
            return Err(UnlockError::AlreadyOwned);
        }

        // 3. Fast-fail on balance; the store re-checks under its own
        //    serialization at commit time.
        let balance = self.ledger.read_balance(cmd.user_id).await?;
        if balance < episode.price {
            return Err(UnlockError::InsufficientFunds {
                needed: episode.price,
                available: balance,
            });
        }

        // 4. Atomic batch: debit + entitlement + audit entry.
        let entitlement = Entitlement::completed(cmd.user_id, cmd.episode_id, episode.price);
        let entitlement_id = entitlement.id;
        let entry = EntryDraft::new(
            EntryKind::Purchase,
            -episode.price,
            format!("Purchased episode: {}", episode.title),
        )
        .with_reference(*entitlement_id.as_uuid());

        let applied = self
            .ledger
            .apply_atomic(
                cmd.user_id,
                LedgerBatch::entry(entry).with_entitlements(vec![entitlement]),
            )
            .await?;

        tracing::info!(
            user_id = %cmd.user_id,
            episode_id = %cmd.episode_id,
            price = episode.price,
            balance = applied.new_balance,
            "episode unlocked"
        );

        Ok(UnlockEpisodeResult {
            balance: applied.new_balance,
            entitlement_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryCatalog, InMemoryLedgerStore};
    use crate::domain::catalog::Episode;
    use crate::domain::foundation::SeriesId;

    fn episode(price: i64) -> Episode {
        Episode {
            id: EpisodeId::new(),
            series_id: SeriesId::new(),
            title: "Pilot".to_string(),
            price,
        }
    }

    async fn setup(balance: i64, ep: &Episode) -> (UnlockEpisodeHandler, Arc<InMemoryLedgerStore>, UserId) {
        let catalog = Arc::new(InMemoryCatalog::new().with_episode(ep.clone()));
        let ledger = Arc::new(InMemoryLedgerStore::new());
        let user_id = UserId::new();
        ledger
            .create_wallet(
                user_id,
                EntryDraft::new(EntryKind::Welcome, balance, "Welcome bonus coins"),
            )
            .await
            .unwrap();
        (
            UnlockEpisodeHandler::new(catalog, ledger.clone()),
            ledger,
            user_id,
        )
    }

    #[tokio::test]
    async fn unlock_debits_once_and_records_entitlement() {
        let ep = episode(10);
        let (handler, ledger, user_id) = setup(50, &ep).await;

        let result = handler
            .handle(UnlockEpisodeCommand {
                user_id,
                episode_id: ep.id,
            })
            .await
            .unwrap();

        assert_eq!(result.balance, 40);
        assert!(ledger.owns(user_id, ep.id).await.unwrap());

        let entries = ledger.ledger_entries(user_id).await.unwrap();
        let purchase = entries.last().unwrap();
        assert_eq!(purchase.amount, -10);
        assert_eq!(purchase.balance_after, 40);
        assert_eq!(purchase.kind, EntryKind::Purchase);
    }

    #[tokio::test]
    async fn second_unlock_is_already_owned_without_charge() {
        let ep = episode(10);
        let (handler, ledger, user_id) = setup(50, &ep).await;

        handler
            .handle(UnlockEpisodeCommand {
                user_id,
                episode_id: ep.id,
            })
            .await
            .unwrap();

        let err = handler
            .handle(UnlockEpisodeCommand {
                user_id,
                episode_id: ep.id,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UnlockError::AlreadyOwned));
        assert_eq!(ledger.read_balance(user_id).await.unwrap(), 40);
    }

    #[tokio::test]
    async fn insufficient_funds_leaves_everything_unchanged() {
        let ep = episode(100);
        let (handler, ledger, user_id) = setup(50, &ep).await;

        let err = handler
            .handle(UnlockEpisodeCommand {
                user_id,
                episode_id: ep.id,
            })
            .await
            .unwrap_err();

        match err {
            UnlockError::InsufficientFunds { needed, available } => {
                assert_eq!((needed, available), (100, 50));
            }
            other => panic!("unexpected: {other}"),
        }
        assert_eq!(ledger.read_balance(user_id).await.unwrap(), 50);
        assert!(!ledger.owns(user_id, ep.id).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_episode_is_not_found() {
        let ep = episode(10);
        let (handler, _, user_id) = setup(50, &ep).await;

        let err = handler
            .handle(UnlockEpisodeCommand {
                user_id,
                episode_id: EpisodeId::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UnlockError::EpisodeNotFound(_)));
    }
}
