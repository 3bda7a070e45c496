//! Catalog value objects: episodes, currencies, and coin bundles.
//!
//! The catalog itself is an external collaborator; these are the read-only
//! shapes the core consumes through the `CatalogLookup` and `BundleCatalog`
//! ports.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BundleId, EpisodeId, SeriesId};

/// ISO-style currency code, normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A priced episode as seen by the unlock engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: EpisodeId,
    pub series_id: SeriesId,
    pub title: String,
    /// Unlock cost in coins. Zero means the episode is free.
    pub price: i64,
}

/// A purchasable pack of coins for real currency.
///
/// Immutable during a request; looked up by currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinBundle {
    pub id: BundleId,
    pub name: String,
    /// Coins credited when the payment completes.
    pub coins: i64,
    /// Price in the smallest currency unit (paise, kobo).
    pub price: i64,
    pub currency: Currency,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_normalizes_case_and_whitespace() {
        assert_eq!(Currency::new(" inr ").as_str(), "INR");
        assert_eq!(Currency::new("NGN"), Currency::new("ngn"));
    }

    #[test]
    fn currency_serializes_transparently() {
        let json = serde_json::to_string(&Currency::new("inr")).unwrap();
        assert_eq!(json, "\"INR\"");
    }
}
