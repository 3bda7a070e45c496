//! GetBundlesHandler - the coin packs purchasable in a currency.

use std::sync::Arc;

use crate::domain::catalog::{CoinBundle, Currency};
use crate::domain::payment::PaymentIntakeError;
use crate::ports::BundleCatalog;

/// Query for the active bundles of a currency.
#[derive(Debug, Clone)]
pub struct GetBundlesQuery {
    pub currency: Currency,
}

/// Handler for the bundle listing.
///
/// An unsupported currency falls back to the default currency's bundles:
/// a usable catalog beats an error page for a user whose region has no
/// gateway yet.
pub struct GetBundlesHandler {
    bundles: Arc<dyn BundleCatalog>,
    default_currency: Currency,
}

impl GetBundlesHandler {
    pub fn new(bundles: Arc<dyn BundleCatalog>, default_currency: Currency) -> Self {
        Self {
            bundles,
            default_currency,
        }
    }

    pub async fn handle(
        &self,
        query: GetBundlesQuery,
    ) -> Result<Vec<CoinBundle>, PaymentIntakeError> {
        let configured = self
            .bundles
            .bundles_for(&query.currency)
            .await
            .map_err(|e| PaymentIntakeError::Storage(e.to_string()))?;

        let listed = if configured.is_empty() {
            self.bundles
                .bundles_for(&self.default_currency)
                .await
                .map_err(|e| PaymentIntakeError::Storage(e.to_string()))?
        } else {
            configured
        };

        Ok(listed.into_iter().filter(|b| b.active).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::StaticBundleCatalog;

    #[tokio::test]
    async fn configured_currency_returns_its_bundles() {
        let catalog = Arc::new(StaticBundleCatalog::with_default_bundles());
        let handler = GetBundlesHandler::new(catalog, Currency::new("INR"));

        let bundles = handler
            .handle(GetBundlesQuery {
                currency: Currency::new("NGN"),
            })
            .await
            .unwrap();
        assert!(!bundles.is_empty());
        assert!(bundles.iter().all(|b| b.currency == Currency::new("NGN")));
    }

    #[tokio::test]
    async fn unknown_currency_falls_back_to_default() {
        let catalog = Arc::new(StaticBundleCatalog::with_default_bundles());
        let handler = GetBundlesHandler::new(catalog, Currency::new("INR"));

        let bundles = handler
            .handle(GetBundlesQuery {
                currency: Currency::new("USD"),
            })
            .await
            .unwrap();
        assert!(!bundles.is_empty());
        assert!(bundles.iter().all(|b| b.currency == Currency::new("INR")));
    }

    #[tokio::test]
    async fn inactive_bundles_are_hidden() {
        let catalog = Arc::new(StaticBundleCatalog::with_default_bundles());
        let handler = GetBundlesHandler::new(catalog, Currency::new("INR"));

        let bundles = handler
            .handle(GetBundlesQuery {
                currency: Currency::new("INR"),
            })
            .await
            .unwrap();
        assert!(bundles.iter().all(|b| b.active));
    }
}
