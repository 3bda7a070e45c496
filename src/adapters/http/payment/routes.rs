//! Route table for the payment endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::super::AppState;
use super::handlers::{gateway_callback, get_bundles, initiate_payment};

/// Routes mounted at `/api/payment`.
///
/// - `GET  /bundles` - coin packs for a currency
/// - `POST /initiate` - start a coin purchase
/// - `POST /callback/:gateway` - gateway callback (signature verified)
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bundles", get(get_bundles))
        .route("/initiate", post(initiate_payment))
        .route("/callback/:gateway", post(gateway_callback))
}
