//! HTTP adapter - axum routers per capability, thin over the application
//! handlers.

pub mod episodes;
pub mod payment;
pub mod wallet;

use std::sync::Arc;

use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::application::handlers::payment::{
    GetBundlesHandler, HandleCallbackHandler, InitiatePaymentHandler,
};
use crate::application::handlers::unlock::{
    GetEpisodeViewHandler, UnlockEpisodeHandler, UnlockSeriesHandler,
};
use crate::application::handlers::wallet::{
    AdjustBalanceHandler, GetWalletHandler, ProvisionWalletHandler,
};
use crate::domain::catalog::Currency;
use crate::domain::foundation::UserId;
use crate::ports::{BundleCatalog, CatalogLookup, GatewayRegistry, LedgerStore};

/// Shared application state, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn LedgerStore>,
    pub catalog: Arc<dyn CatalogLookup>,
    pub bundles: Arc<dyn BundleCatalog>,
    pub gateways: Arc<GatewayRegistry>,
    pub default_currency: Currency,
    pub welcome_coins: i64,
}

impl AppState {
    pub fn episode_view_handler(&self) -> GetEpisodeViewHandler {
        GetEpisodeViewHandler::new(self.catalog.clone(), self.ledger.clone())
    }

    pub fn unlock_episode_handler(&self) -> UnlockEpisodeHandler {
        UnlockEpisodeHandler::new(self.catalog.clone(), self.ledger.clone())
    }

    pub fn unlock_series_handler(&self) -> UnlockSeriesHandler {
        UnlockSeriesHandler::new(self.catalog.clone(), self.ledger.clone())
    }

    pub fn get_bundles_handler(&self) -> GetBundlesHandler {
        GetBundlesHandler::new(self.bundles.clone(), self.default_currency.clone())
    }

    pub fn initiate_payment_handler(&self) -> InitiatePaymentHandler {
        InitiatePaymentHandler::new(
            self.ledger.clone(),
            self.bundles.clone(),
            self.gateways.clone(),
            self.default_currency.clone(),
        )
    }

    pub fn callback_handler(&self) -> HandleCallbackHandler {
        HandleCallbackHandler::new(self.ledger.clone(), self.gateways.clone())
    }

    pub fn provision_wallet_handler(&self) -> ProvisionWalletHandler {
        ProvisionWalletHandler::new(self.ledger.clone(), self.welcome_coins)
    }

    pub fn get_wallet_handler(&self) -> GetWalletHandler {
        GetWalletHandler::new(self.ledger.clone())
    }

    pub fn adjust_balance_handler(&self) -> AdjustBalanceHandler {
        AdjustBalanceHandler::new(self.ledger.clone())
    }
}

/// Standard error payload for every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            error: error.into(),
        }
    }
}

/// Authenticated user context extracted from the request.
///
/// An upstream gateway terminates authentication and forwards the verified
/// user id in the `X-User-Id` header.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user_id = parts
                .headers
                .get("X-User-Id")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<UserId>().ok())
                .ok_or(AuthenticationRequired)?;

            Ok(AuthenticatedUser { user_id })
        })
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// The complete API router, to be mounted at `/`.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/episodes", episodes::routes())
        .nest("/api/series", episodes::series_routes())
        .nest("/api/payment", payment::routes())
        .nest("/api/wallet", wallet::routes())
        .with_state(state)
}
