//! Payment Processor Integration
//!
//! Abstraction over the external payment service plus its implementations.

mod mock;
mod stripe_client;

pub use mock::{MockCalls, MockProcessor};
pub use stripe_client::StripeClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::Result;

/// Intent status that allows a refund
pub const STATUS_SUCCEEDED: &str = "succeeded";

/// Payment processor trait (Strategy pattern)
///
/// The processor is the system of record; implementations hold no per-request
/// state and are shared across requests behind an `Arc`.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create a payment intent
    async fn create_payment_intent(&self, params: NewPaymentIntent) -> Result<ProcessorIntent>;

    /// Fetch the current state of a payment intent
    async fn retrieve_payment_intent(&self, id: &str) -> Result<ProcessorIntent>;

    /// Issue a full refund against a charge
    async fn refund_charge(&self, charge_id: &str) -> Result<ProcessorRefund>;

    /// Processor name
    fn name(&self) -> &str;
}

/// Parameters sent to the processor when creating an intent
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPaymentIntent {
    /// Amount in minor units
    pub amount: i64,

    /// Lowercase ISO currency code
    pub currency: String,

    pub metadata: HashMap<String, String>,

    /// Let the processor pick applicable payment methods
    pub automatic_payment_methods: bool,
}

/// A payment intent as reported by the processor
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessorIntent {
    pub id: String,
    pub status: String,

    /// Amount in minor units
    pub amount: i64,

    pub currency: String,
    pub client_secret: Option<String>,

    /// Most recent charge, present once funds have moved
    pub latest_charge: Option<String>,

    /// Full record in the processor's own shape
    pub record: Value,
}

impl ProcessorIntent {
    pub fn is_succeeded(&self) -> bool {
        self.status == STATUS_SUCCEEDED
    }
}

/// A refund as reported by the processor
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessorRefund {
    pub id: String,
    pub status: Option<String>,

    /// Amount in minor units
    pub amount: i64,

    pub currency: String,
}
