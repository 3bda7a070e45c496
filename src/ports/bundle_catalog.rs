//! Bundle catalog port - the purchasable coin packs per currency.

use async_trait::async_trait;

use crate::domain::catalog::{CoinBundle, Currency};
use crate::domain::foundation::BundleId;

use super::CatalogError;

/// Read-mostly lookup of coin bundles by currency.
///
/// Implementations return only what is configured for a currency; the
/// default-currency fallback is applied by the payment intake handlers,
/// which receive the default explicitly at construction.
#[async_trait]
pub trait BundleCatalog: Send + Sync {
    /// Active bundles configured for a currency. Empty when the currency
    /// has no configuration.
    async fn bundles_for(&self, currency: &Currency) -> Result<Vec<CoinBundle>, CatalogError>;

    /// Resolves one bundle within a currency's configuration.
    async fn find(
        &self,
        bundle_id: BundleId,
        currency: &Currency,
    ) -> Result<Option<CoinBundle>, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_catalog_is_object_safe() {
        fn _accepts_dyn(_bundles: &dyn BundleCatalog) {}
    }
}
