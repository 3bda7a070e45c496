//! In-memory catalog adapters.

use async_trait::async_trait;

use crate::domain::catalog::{CoinBundle, Currency, Episode};
use crate::domain::foundation::{BundleId, EpisodeId, SeriesId};
use crate::ports::{BundleCatalog, CatalogError, CatalogLookup};

/// Episode catalog backed by a plain vector, in insertion order.
#[derive(Default)]
pub struct InMemoryCatalog {
    episodes: Vec<Episode>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_episode(mut self, episode: Episode) -> Self {
        self.episodes.push(episode);
        self
    }
}

#[async_trait]
impl CatalogLookup for InMemoryCatalog {
    async fn get_episode(&self, id: EpisodeId) -> Result<Option<Episode>, CatalogError> {
        Ok(self.episodes.iter().find(|e| e.id == id).cloned())
    }

    async fn episodes_by_series(
        &self,
        series_id: SeriesId,
    ) -> Result<Vec<Episode>, CatalogError> {
        Ok(self
            .episodes
            .iter()
            .filter(|e| e.series_id == series_id)
            .cloned()
            .collect())
    }
}

/// Fixed bundle configuration, resolved at construction.
pub struct StaticBundleCatalog {
    bundles: Vec<CoinBundle>,
}

impl StaticBundleCatalog {
    pub fn new(bundles: Vec<CoinBundle>) -> Self {
        Self { bundles }
    }

    /// The stock bundle sets for the two launch currencies.
    pub fn with_default_bundles() -> Self {
        let mut bundles = Vec::new();
        for currency in ["INR", "NGN"] {
            for (coins, price) in [(50, 5000), (120, 9900), (250, 19900), (500, 39900)] {
                bundles.push(CoinBundle {
                    id: BundleId::new(),
                    name: format!("{coins} Coins"),
                    coins,
                    price,
                    currency: Currency::new(currency),
                    active: true,
                });
            }
        }
        Self::new(bundles)
    }
}

#[async_trait]
impl BundleCatalog for StaticBundleCatalog {
    async fn bundles_for(&self, currency: &Currency) -> Result<Vec<CoinBundle>, CatalogError> {
        Ok(self
            .bundles
            .iter()
            .filter(|b| &b.currency == currency)
            .cloned()
            .collect())
    }

    async fn find(
        &self,
        bundle_id: BundleId,
        currency: &Currency,
    ) -> Result<Option<CoinBundle>, CatalogError> {
        Ok(self
            .bundles
            .iter()
            .find(|b| b.id == bundle_id && &b.currency == currency)
            .cloned())
    }
}
