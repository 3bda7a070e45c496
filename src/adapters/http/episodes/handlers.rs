//! HTTP handlers for episode and series endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::unlock::{
    GetEpisodeViewQuery, UnlockEpisodeCommand, UnlockSeriesCommand,
};
use crate::domain::foundation::{EpisodeId, SeriesId};
use crate::domain::ledger::UnlockError;

use super::super::{AppState, AuthenticatedUser, ErrorResponse};
use super::dto::{EpisodeViewResponse, UnlockEpisodeResponse, UnlockSeriesResponse};

/// GET /api/episodes/:id - episode with the caller's ownership flags
pub async fn get_episode(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(episode_id): Path<EpisodeId>,
) -> Result<impl IntoResponse, EpisodeApiError> {
    let handler = state.episode_view_handler();
    let view = handler
        .handle(GetEpisodeViewQuery {
            user_id: user.user_id,
            episode_id,
        })
        .await?;
    Ok(Json(EpisodeViewResponse::from(view)))
}

/// POST /api/episodes/:id/unlock - debit and grant access
pub async fn unlock_episode(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(episode_id): Path<EpisodeId>,
) -> Result<impl IntoResponse, EpisodeApiError> {
    let handler = state.unlock_episode_handler();
    let result = handler
        .handle(UnlockEpisodeCommand {
            user_id: user.user_id,
            episode_id,
        })
        .await?;
    Ok(Json(UnlockEpisodeResponse::from(result)))
}

/// POST /api/series/:id/unlock - unlock every missing episode at once
pub async fn unlock_series(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(series_id): Path<SeriesId>,
) -> Result<impl IntoResponse, EpisodeApiError> {
    let handler = state.unlock_series_handler();
    let result = handler
        .handle(UnlockSeriesCommand {
            user_id: user.user_id,
            series_id,
        })
        .await?;
    Ok(Json(UnlockSeriesResponse::from(result)))
}

/// API error type converting unlock errors to HTTP responses.
pub struct EpisodeApiError(UnlockError);

impl From<UnlockError> for EpisodeApiError {
    fn from(err: UnlockError) -> Self {
        Self(err)
    }
}

impl IntoResponse for EpisodeApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self.0 {
            UnlockError::EpisodeNotFound(_) => (StatusCode::NOT_FOUND, "EPISODE_NOT_FOUND"),
            UnlockError::SeriesNotFound(_) => (StatusCode::NOT_FOUND, "SERIES_NOT_FOUND"),
            UnlockError::AlreadyOwned => (StatusCode::CONFLICT, "ALREADY_OWNED"),
            UnlockError::InsufficientFunds { .. } => {
                (StatusCode::PAYMENT_REQUIRED, "INSUFFICIENT_FUNDS")
            }
            UnlockError::StorageConflict => (StatusCode::CONFLICT, "CONFLICT"),
            UnlockError::Storage(detail) => {
                tracing::error!(error = %detail, "unlock storage failure");
                let body = ErrorResponse::new("INTERNAL_ERROR", "Internal server error");
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
        };
        let body = ErrorResponse::new(code, self.0.to_string());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let response =
            EpisodeApiError(UnlockError::EpisodeNotFound(EpisodeId::new())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn already_owned_maps_to_409() {
        let response = EpisodeApiError(UnlockError::AlreadyOwned).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn insufficient_funds_maps_to_402() {
        let response = EpisodeApiError(UnlockError::InsufficientFunds {
            needed: 10,
            available: 5,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn storage_maps_to_500_with_generic_body() {
        let response =
            EpisodeApiError(UnlockError::Storage("connection reset".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
