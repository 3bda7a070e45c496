//! Route table for the wallet endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::super::AppState;
use super::handlers::{adjust_balance, get_ledger, get_wallet, provision_wallet};

/// Routes mounted at `/api/wallet`.
///
/// - `GET  /` - current balance
/// - `GET  /ledger` - transaction history, newest first
/// - `POST /provision` - create the wallet with the welcome credit
/// - `POST /adjust` - operator credit or debit
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_wallet))
        .route("/ledger", get(get_ledger))
        .route("/provision", post(provision_wallet))
        .route("/adjust", post(adjust_balance))
}
