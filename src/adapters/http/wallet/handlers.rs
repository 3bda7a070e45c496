//! HTTP handlers for the wallet endpoints.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::wallet::{
    AdjustBalanceCommand, GetWalletQuery, ProvisionWalletCommand,
};
use crate::domain::ledger::LedgerError;

use super::super::{AppState, AuthenticatedUser, ErrorResponse};
use super::dto::{
    AdjustBalanceRequest, BalanceResponse, LedgerEntryResponse, LedgerHistoryResponse,
    WalletResponse,
};

/// GET /api/wallet - current balance
pub async fn get_wallet(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, WalletApiError> {
    let handler = state.get_wallet_handler();
    let view = handler
        .handle(GetWalletQuery {
            user_id: user.user_id,
            include_entries: false,
        })
        .await?;

    Ok(Json(WalletResponse {
        user_id: view.user_id,
        balance: view.balance,
    }))
}

/// GET /api/wallet/ledger - transaction history, newest first
pub async fn get_ledger(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, WalletApiError> {
    let handler = state.get_wallet_handler();
    let view = handler
        .handle(GetWalletQuery {
            user_id: user.user_id,
            include_entries: true,
        })
        .await?;

    Ok(Json(LedgerHistoryResponse {
        balance: view.balance,
        entries: view
            .entries
            .into_iter()
            .rev()
            .map(LedgerEntryResponse::from)
            .collect(),
    }))
}

/// POST /api/wallet/provision - create the wallet with the welcome credit
///
/// Called by the account service when a user signs up.
pub async fn provision_wallet(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, WalletApiError> {
    let handler = state.provision_wallet_handler();
    let balance = handler
        .handle(ProvisionWalletCommand {
            user_id: user.user_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(BalanceResponse { balance })))
}

/// POST /api/wallet/adjust - operator credit or debit
pub async fn adjust_balance(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<AdjustBalanceRequest>,
) -> Result<impl IntoResponse, WalletApiError> {
    let handler = state.adjust_balance_handler();
    let balance = handler
        .handle(AdjustBalanceCommand {
            user_id: user.user_id,
            amount: request.amount,
            reason: request.reason,
        })
        .await?;

    Ok(Json(BalanceResponse { balance }))
}

/// API error type converting ledger errors to HTTP responses.
pub struct WalletApiError(LedgerError);

impl From<LedgerError> for WalletApiError {
    fn from(err: LedgerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WalletApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self.0 {
            LedgerError::WalletNotFound(_) => (StatusCode::NOT_FOUND, "WALLET_NOT_FOUND"),
            LedgerError::WalletExists(_) => (StatusCode::CONFLICT, "WALLET_EXISTS"),
            LedgerError::InsufficientFunds { .. } => {
                (StatusCode::PAYMENT_REQUIRED, "INSUFFICIENT_FUNDS")
            }
            LedgerError::DuplicateEntitlement { .. } => (StatusCode::CONFLICT, "ALREADY_OWNED"),
            LedgerError::PaymentNotPending => (StatusCode::CONFLICT, "PAYMENT_NOT_PENDING"),
            LedgerError::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            LedgerError::Storage(detail) => {
                tracing::error!(error = %detail, "wallet storage failure");
                let body = ErrorResponse::new("INTERNAL_ERROR", "Internal server error");
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
        };
        let body = ErrorResponse::new(code, self.0.to_string());
        (status, Json(body)).into_response()
    }
}
