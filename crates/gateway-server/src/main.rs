//! Payment gateway HTTP server
//!
//! Axum-based server exposing payment intent creation, confirmation and
//! order cancellation (refund) over JSON.

mod auth;
mod config;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateway_payments::{MockProcessor, PaymentGateway, PaymentProcessor, StripeClient};

use crate::config::{ProcessorMode, ServerConfig};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Initialize payment processor
    let processor: Option<Arc<dyn PaymentProcessor>> = match config.processor {
        ProcessorMode::Mock => {
            tracing::warn!("⚠ Using in-memory mock processor - no real payments");
            Some(Arc::new(MockProcessor::new()))
        }
        ProcessorMode::Stripe => match config.stripe_secret_key.as_deref() {
            Some(secret_key) => {
                tracing::info!("✓ Stripe configured");
                Some(Arc::new(StripeClient::new(secret_key)))
            }
            None => {
                tracing::warn!("⚠ Stripe not configured - payments disabled");
                tracing::warn!("  Set STRIPE_SECRET_KEY in .env");
                None
            }
        },
    };

    if config.api_key.is_none() {
        tracing::warn!("⚠ GATEWAY_API_KEY not set - payment routes are open to any caller");
    }

    // Build application state
    let state = AppState {
        gateway: processor.map(|p| Arc::new(PaymentGateway::new(p))),
        api_key: config.api_key.as_deref().map(Arc::from),
    };

    let app = routes::router(state);

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server running on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /                      - Liveness");
    tracing::info!("  GET  /health                - Health check");
    tracing::info!("  POST /create-payment-intent - Create payment intent");
    tracing::info!("  POST /confirm-payment       - Retrieve payment status");
    tracing::info!("  POST /cancel-order          - Refund a succeeded payment");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
