//! HTTP handlers for the payment endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::payment::{
    GetBundlesQuery, HandleCallbackCommand, InitiatePaymentCommand,
};
use crate::domain::payment::PaymentIntakeError;

use super::super::{AppState, AuthenticatedUser, ErrorResponse};
use super::dto::{
    BundleListResponse, BundleResponse, BundlesQueryParams, CallbackResponse,
    InitiatePaymentRequest, InitiatePaymentResponse,
};

/// GET /api/payment/bundles?currency=INR - purchasable coin packs
pub async fn get_bundles(
    State(state): State<AppState>,
    Query(params): Query<BundlesQueryParams>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let currency = params
        .currency
        .unwrap_or_else(|| state.default_currency.clone());
    let handler = state.get_bundles_handler();
    let bundles = handler.handle(GetBundlesQuery { currency }).await?;

    Ok(Json(BundleListResponse {
        bundles: bundles.into_iter().map(BundleResponse::from).collect(),
    }))
}

/// POST /api/payment/initiate - start a coin purchase
pub async fn initiate_payment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<InitiatePaymentRequest>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let currency = request
        .currency
        .unwrap_or_else(|| state.default_currency.clone());
    let handler = state.initiate_payment_handler();
    let result = handler
        .handle(InitiatePaymentCommand {
            user_id: user.user_id,
            bundle_id: request.bundle_id,
            currency,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(InitiatePaymentResponse::from(result)),
    ))
}

/// POST /api/payment/callback/:gateway - gateway callback intake
///
/// No user authentication; authenticity comes from the gateway signature,
/// verified by the adapter before anything is trusted.
pub async fn gateway_callback(
    State(state): State<AppState>,
    Path(gateway): Path<String>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, PaymentApiError> {
    // Gateways name their signature header after themselves.
    let signature = headers
        .get(format!("x-{gateway}-signature"))
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let handler = state.callback_handler();
    let result = handler
        .handle(HandleCallbackCommand {
            gateway,
            payload: body.to_vec(),
            signature,
        })
        .await?;

    Ok(Json(CallbackResponse::from(result)))
}

/// API error type converting payment intake errors to HTTP responses.
pub struct PaymentApiError(PaymentIntakeError);

impl From<PaymentIntakeError> for PaymentApiError {
    fn from(err: PaymentIntakeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self.0 {
            PaymentIntakeError::InvalidBundle => (StatusCode::BAD_REQUEST, "INVALID_BUNDLE"),
            PaymentIntakeError::UnsupportedCurrency(_) => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_CURRENCY")
            }
            PaymentIntakeError::InvalidCallback(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_CALLBACK")
            }
            PaymentIntakeError::InvalidTransition { .. } => {
                (StatusCode::CONFLICT, "INVALID_STATE_TRANSITION")
            }
            PaymentIntakeError::OutcomeMismatch => (StatusCode::CONFLICT, "OUTCOME_MISMATCH"),
            PaymentIntakeError::Gateway(detail) => {
                tracing::error!(error = %detail, "gateway failure");
                let body = ErrorResponse::new("GATEWAY_ERROR", "Payment gateway unavailable");
                return (StatusCode::BAD_GATEWAY, Json(body)).into_response();
            }
            PaymentIntakeError::Storage(detail) => {
                tracing::error!(error = %detail, "payment storage failure");
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
    use crate::domain::catalog::Currency;

    #[test]
    fn invalid_bundle_maps_to_400() {
        let response = PaymentApiError(PaymentIntakeError::InvalidBundle).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unsupported_currency_maps_to_400() {
        let response =
            PaymentApiError(PaymentIntakeError::UnsupportedCurrency(Currency::new("USD")))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_callback_maps_to_400() {
        let response =
            PaymentApiError(PaymentIntakeError::invalid_callback("bad signature"))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn outcome_mismatch_maps_to_409() {
        let response = PaymentApiError(PaymentIntakeError::OutcomeMismatch).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn storage_maps_to_500() {
        let response =
            PaymentApiError(PaymentIntakeError::Storage("boom".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
