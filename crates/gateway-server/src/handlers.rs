//! HTTP Handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use gateway_payments::{
    CreatePaymentIntentRequest, CreatePaymentIntentResponse, PaymentError, PaymentGateway,
    PaymentIntentLookup, PaymentStatusResponse, RefundSummary,
};

use crate::state::AppState;

/// Liveness text served on `/`
pub const LIVENESS_MESSAGE: &str = "Stripe Payment Backend is running";

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub processor: Option<String>,
    pub payments_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn error_response(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

/// Map a gateway failure to its HTTP form
fn payment_error(operation: &str, err: &PaymentError) -> ApiError {
    let status = match err {
        PaymentError::InvalidRequest(_) | PaymentError::IneligibleState(_) => StatusCode::BAD_REQUEST,
        PaymentError::Processor(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if err.is_client_error() {
        tracing::warn!(operation, code = err.code(), "Rejected request: {}", err);
    } else {
        tracing::error!(operation, code = err.code(), "Error {}: {}", operation, err);
    }

    error_response(status, err.to_string(), err.code())
}

/// Malformed JSON bodies get the same JSON error shape as validation failures
fn body_error(rejection: &JsonRejection) -> ApiError {
    tracing::warn!("Unreadable request body: {}", rejection.body_text());
    error_response(StatusCode::BAD_REQUEST, rejection.body_text(), "INVALID_REQUEST")
}

fn gateway(state: &AppState) -> Result<&Arc<PaymentGateway>, ApiError> {
    state.gateway.as_ref().ok_or_else(|| {
        error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Payments not configured",
            "PAYMENTS_DISABLED",
        )
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// Liveness probe
pub async fn root() -> &'static str {
    LIVENESS_MESSAGE
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        processor: state.gateway.as_ref().map(|g| g.processor_name().to_string()),
        payments_configured: state.gateway.is_some(),
    })
}

/// Create a payment intent
pub async fn create_payment_intent(
    State(state): State<AppState>,
    payload: Result<Json<CreatePaymentIntentRequest>, JsonRejection>,
) -> Result<Json<CreatePaymentIntentResponse>, ApiError> {
    let gateway = gateway(&state)?;
    let Json(request) = payload.map_err(|e| body_error(&e))?;

    let created = gateway
        .create_payment_intent(request)
        .await
        .map_err(|e| payment_error("creating payment intent", &e))?;

    Ok(Json(created))
}

/// Retrieve the current state of a payment intent
pub async fn confirm_payment(
    State(state): State<AppState>,
    payload: Result<Json<PaymentIntentLookup>, JsonRejection>,
) -> Result<Json<PaymentStatusResponse>, ApiError> {
    let gateway = gateway(&state)?;
    let Json(lookup) = payload.map_err(|e| body_error(&e))?;

    let status = gateway
        .confirm_payment(lookup)
        .await
        .map_err(|e| payment_error("confirming payment", &e))?;

    Ok(Json(status))
}

/// Cancel an order by refunding its charge
pub async fn cancel_order(
    State(state): State<AppState>,
    payload: Result<Json<PaymentIntentLookup>, JsonRejection>,
) -> Result<Json<RefundSummary>, ApiError> {
    let gateway = gateway(&state)?;
    let Json(lookup) = payload.map_err(|e| body_error(&e))?;

    let refund = gateway
        .cancel_and_refund(lookup)
        .await
        .map_err(|e| payment_error("processing refund", &e))?;

    Ok(Json(refund))
}
