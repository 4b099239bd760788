//! # gateway-payments
//!
//! Thin facade over a card payment processor (Stripe): create a payment
//! intent, look one up, and cancel an order by refunding its charge.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────┐  amount (dollars)  ┌────────────────┐  amount (cents)  ┌──────────┐
//! │  Client  │───────────────────▶│ PaymentGateway │─────────────────▶│  Stripe  │
//! │          │◀───────────────────│                │◀─────────────────│          │
//! └──────────┘  amounts (dollars) └────────────────┘  amounts (cents) └──────────┘
//! ```
//!
//! The processor is the system of record. The gateway keeps no state between
//! calls, never retries, and leaves double-refund protection to the processor.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use gateway_payments::{CreatePaymentIntentRequest, PaymentGateway, StripeClient};
//!
//! let gateway = PaymentGateway::new(Arc::new(StripeClient::new(&secret_key)));
//!
//! let created = gateway.create_payment_intent(CreatePaymentIntentRequest {
//!     amount: Some(serde_json::json!(25)),
//!     currency: "usd".into(),
//!     metadata: Default::default(),
//! }).await?;
//!
//! // Hand created.client_secret to the frontend
//! ```

mod error;
mod gateway;
pub mod model;
pub mod money;
pub mod processor;

pub use error::{PaymentError, Result};
pub use gateway::{PaymentGateway, MISSING_INTENT_ID, NO_CHARGE};
pub use model::{
    CreatePaymentIntentRequest, CreatePaymentIntentResponse, PaymentIntentLookup,
    PaymentStatusResponse, RefundNote, RefundSummary,
};
pub use processor::{MockProcessor, PaymentProcessor, StripeClient};
