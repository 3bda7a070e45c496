//! Wire types for the episode endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::unlock::{
    EpisodeView, UnlockEpisodeResult, UnlockSeriesResult,
};
use crate::domain::foundation::{EntitlementId, EpisodeId, SeriesId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeViewResponse {
    pub id: EpisodeId,
    pub series_id: SeriesId,
    pub title: String,
    pub price: i64,
    pub is_owned: bool,
    pub can_unlock: bool,
}

impl From<EpisodeView> for EpisodeViewResponse {
    fn from(view: EpisodeView) -> Self {
        Self {
            id: view.episode.id,
            series_id: view.episode.series_id,
            title: view.episode.title,
            price: view.episode.price,
            is_owned: view.is_owned,
            can_unlock: view.can_unlock,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockEpisodeResponse {
    pub balance: i64,
    pub entitlement_id: EntitlementId,
}

impl From<UnlockEpisodeResult> for UnlockEpisodeResponse {
    fn from(result: UnlockEpisodeResult) -> Self {
        Self {
            balance: result.balance,
            entitlement_id: result.entitlement_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockSeriesResponse {
    pub balance: i64,
    pub entitlement_ids: Vec<EntitlementId>,
    pub total_cost: i64,
}

impl From<UnlockSeriesResult> for UnlockSeriesResponse {
    fn from(result: UnlockSeriesResult) -> Self {
        Self {
            balance: result.balance,
            entitlement_ids: result.entitlement_ids,
            total_cost: result.total_cost,
        }
    }
}
