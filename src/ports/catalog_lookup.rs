//! Catalog lookup port - read-only accessor for episode metadata.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::catalog::Episode;
use crate::domain::foundation::{EpisodeId, SeriesId};

/// Errors from the catalog collaborator.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Catalog storage error: {0}")]
    Storage(String),
}

/// Read-only lookup into the series/episode catalog.
///
/// The catalog is an external collaborator; the core only ever queries it
/// by id and never writes through this port.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Fetches one episode, or `None` if it does not exist.
    async fn get_episode(&self, id: EpisodeId) -> Result<Option<Episode>, CatalogError>;

    /// All episodes of a series, in episode order. Empty if the series is
    /// unknown.
    async fn episodes_by_series(&self, series_id: SeriesId)
        -> Result<Vec<Episode>, CatalogError>;
}
