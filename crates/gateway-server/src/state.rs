//! Application State

use std::sync::Arc;

use gateway_payments::PaymentGateway;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment gateway (None if no processor is configured)
    pub gateway: Option<Arc<PaymentGateway>>,

    /// Bearer token guarding the payment routes (None = open)
    pub api_key: Option<Arc<str>>,
}
