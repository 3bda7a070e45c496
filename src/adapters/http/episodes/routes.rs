//! Route tables for the episode and series endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::super::AppState;
use super::handlers::{get_episode, unlock_episode, unlock_series};

/// Routes mounted at `/api/episodes`.
///
/// - `GET  /:id` - entitlement-annotated episode view
/// - `POST /:id/unlock` - unlock one episode
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_episode))
        .route("/:id/unlock", post(unlock_episode))
}

/// Routes mounted at `/api/series`.
///
/// - `POST /:id/unlock` - unlock every missing episode of the series
pub fn series_routes() -> Router<AppState> {
    Router::new().route("/:id/unlock", post(unlock_series))
}
