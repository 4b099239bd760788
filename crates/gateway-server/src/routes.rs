//! Router assembly

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::require_api_key;
use crate::handlers::{cancel_order, confirm_payment, create_payment_intent, health_check, root};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let payments = Router::new()
        .route("/create-payment-intent", post(create_payment_intent))
        .route("/confirm-payment", post(confirm_payment))
        .route("/cancel-order", post(cancel_order))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        // Liveness & health
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(payments)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
