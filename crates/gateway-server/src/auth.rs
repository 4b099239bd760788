//! API key guard for the payment routes

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::handlers::error_response;
use crate::state::AppState;

/// Require `Authorization: Bearer <key>` when an API key is configured
pub async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(expected) = state.api_key.as_deref() else {
        return next.run(request).await;
    };

    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| constant_time_eq(token.trim().as_bytes(), expected.as_bytes()));

    if authorized {
        return next.run(request).await;
    }

    tracing::warn!(path = %request.uri().path(), "Rejected request without valid API key");
    error_response(StatusCode::UNAUTHORIZED, "Missing or invalid API key", "UNAUTHORIZED")
        .into_response()
}

/// Compares SHA-256 digests so neither the contents nor the length of the
/// key leak through timing
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let hash_a = Sha256::digest(a);
    let hash_b = Sha256::digest(b);
    hash_a.ct_eq(&hash_b).into()
}
