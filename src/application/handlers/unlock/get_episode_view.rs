//! GetEpisodeViewHandler - entitlement-annotated episode view.

use std::sync::Arc;

use crate::domain::catalog::Episode;
use crate::domain::foundation::{EpisodeId, UserId};
use crate::domain::ledger::UnlockError;
use crate::ports::{CatalogLookup, LedgerStore};

/// Query for an episode plus the caller's ownership flags.
#[derive(Debug, Clone)]
pub struct GetEpisodeViewQuery {
    pub user_id: UserId,
    pub episode_id: EpisodeId,
}

/// An episode annotated with display flags for the requesting user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeView {
    pub episode: Episode,
    pub is_owned: bool,
    /// Not owned, and the balance covers the price.
    pub can_unlock: bool,
}

/// Pure read; no side effects.
pub struct GetEpisodeViewHandler {
    catalog: Arc<dyn CatalogLookup>,
    ledger: Arc<dyn LedgerStore>,
}

impl GetEpisodeViewHandler {
    pub fn new(catalog: Arc<dyn CatalogLookup>, ledger: Arc<dyn LedgerStore>) -> Self {
        Self { catalog, ledger }
    }

    pub async fn handle(&self, query: GetEpisodeViewQuery) -> Result<EpisodeView, UnlockError> {
        let episode = self
            .catalog
            .get_episode(query.episode_id)
            .await
            .map_err(|e| UnlockError::Storage(e.to_string()))?
            .ok_or(UnlockError::EpisodeNotFound(query.episode_id))?;

        let is_owned = self.ledger.owns(query.user_id, query.episode_id).await?;
        let can_unlock = if is_owned {
            false
        } else {
            let balance = self.ledger.read_balance(query.user_id).await?;
            balance >= episode.price
        };

        Ok(EpisodeView {
            episode,
            is_owned,
            can_unlock,
        })
    }
}
