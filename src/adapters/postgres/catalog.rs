//! PostgreSQL catalog adapters.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::catalog::{CoinBundle, Currency, Episode};
use crate::domain::foundation::{BundleId, EpisodeId, SeriesId};
use crate::ports::{BundleCatalog, CatalogError, CatalogLookup};

pub struct PostgresCatalogLookup {
    pool: PgPool,
}

impl PostgresCatalogLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EpisodeRow {
    id: Uuid,
    series_id: Uuid,
    title: String,
    price: i64,
}

impl From<EpisodeRow> for Episode {
    fn from(row: EpisodeRow) -> Self {
        Episode {
            id: EpisodeId::from_uuid(row.id),
            series_id: SeriesId::from_uuid(row.series_id),
            title: row.title,
            price: row.price,
        }
    }
}

#[async_trait]
impl CatalogLookup for PostgresCatalogLookup {
    async fn get_episode(&self, id: EpisodeId) -> Result<Option<Episode>, CatalogError> {
        let row: Option<EpisodeRow> = sqlx::query_as(
            "SELECT id, series_id, title, price FROM episodes WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CatalogError::Storage(e.to_string()))?;
        Ok(row.map(Episode::from))
    }

    async fn episodes_by_series(
        &self,
        series_id: SeriesId,
    ) -> Result<Vec<Episode>, CatalogError> {
        let rows: Vec<EpisodeRow> = sqlx::query_as(
            r#"
            SELECT id, series_id, title, price
            FROM episodes
            WHERE series_id = $1
            ORDER BY episode_number
            "#,
        )
        .bind(series_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CatalogError::Storage(e.to_string()))?;
        Ok(rows.into_iter().map(Episode::from).collect())
    }
}

pub struct PostgresBundleCatalog {
    pool: PgPool,
}

impl PostgresBundleCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BundleRow {
    id: Uuid,
    name: String,
    coins: i64,
    price: i64,
    currency: String,
    active: bool,
}

impl From<BundleRow> for CoinBundle {
    fn from(row: BundleRow) -> Self {
        CoinBundle {
            id: BundleId::from_uuid(row.id),
            name: row.name,
            coins: row.coins,
            price: row.price,
            currency: Currency::new(&row.currency),
            active: row.active,
        }
    }
}

#[async_trait]
impl BundleCatalog for PostgresBundleCatalog {
    async fn bundles_for(&self, currency: &Currency) -> Result<Vec<CoinBundle>, CatalogError> {
        let rows: Vec<BundleRow> = sqlx::query_as(
            r#"
            SELECT id, name, coins, price, currency, active
            FROM coin_bundles
            WHERE currency = $1
            ORDER BY coins
            "#,
        )
        .bind(currency.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CatalogError::Storage(e.to_string()))?;
        Ok(rows.into_iter().map(CoinBundle::from).collect())
    }

    async fn find(
        &self,
        bundle_id: BundleId,
        currency: &Currency,
    ) -> Result<Option<CoinBundle>, CatalogError> {
        let row: Option<BundleRow> = sqlx::query_as(
            r#"
            SELECT id, name, coins, price, currency, active
            FROM coin_bundles
            WHERE id = $1 AND currency = $2
            "#,
        )
        .bind(bundle_id.as_uuid())
        .bind(currency.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CatalogError::Storage(e.to_string()))?;
        Ok(row.map(CoinBundle::from))
    }
}
