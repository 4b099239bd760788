//! Request and response bodies of the gateway operations

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Currency used when the caller does not name one
pub const DEFAULT_CURRENCY: &str = "usd";

/// Success message returned by a refund
pub const REFUND_MESSAGE: &str = "Refund processed successfully";

/// Note attached to refund responses
pub const REFUND_NOTE: &str = "All amounts are shown in dollars";

fn default_currency() -> String {
    DEFAULT_CURRENCY.into()
}

/// Request to create a payment intent
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatePaymentIntentRequest {
    /// Amount in major units; a number or numeric string, checked by the gateway
    #[serde(default)]
    pub amount: Option<Value>,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Result of creating a payment intent
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentResponse {
    /// Token the client uses to confirm the payment
    pub client_secret: String,
    pub payment_intent_id: String,
}

/// Request naming an existing payment intent
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentLookup {
    #[serde(default)]
    pub payment_intent_id: Option<String>,
}

impl PaymentIntentLookup {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            payment_intent_id: Some(id.into()),
        }
    }
}

/// Current state of a payment intent
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusResponse {
    pub status: String,

    /// Full record as reported by the processor
    pub payment_intent: Value,
}

/// Result of cancelling an order and refunding its charge
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RefundSummary {
    pub status: Option<String>,

    #[serde(rename = "refundId")]
    pub refund_id: String,

    /// Refunded amount in major units
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_refunded: Decimal,

    /// Original intent amount in major units
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_original: Decimal,

    pub currency: String,
    pub message: String,
    pub metadata: RefundNote,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundNote {
    pub note: String,
}

impl Default for RefundNote {
    fn default() -> Self {
        Self {
            note: REFUND_NOTE.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_create_request_defaults() {
        let request: CreatePaymentIntentRequest = serde_json::from_value(json!({"amount": 25})).unwrap();
        assert_eq!(request.currency, "usd");
        assert!(request.metadata.is_empty());
        assert_eq!(request.amount, Some(json!(25)));
    }

    #[test]
    fn test_refund_summary_wire_shape() {
        let summary = RefundSummary {
            status: Some("succeeded".into()),
            refund_id: "re_123".into(),
            amount_refunded: dec!(5.00),
            amount_original: dec!(12.50),
            currency: "usd".into(),
            message: REFUND_MESSAGE.into(),
            metadata: RefundNote::default(),
        };

        let body = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            body,
            json!({
                "status": "succeeded",
                "refundId": "re_123",
                "amount_refunded": 5.0,
                "amount_original": 12.5,
                "currency": "usd",
                "message": "Refund processed successfully",
                "metadata": { "note": "All amounts are shown in dollars" }
            })
        );
    }

    #[test]
    fn test_create_response_is_camel_case() {
        let body = serde_json::to_value(CreatePaymentIntentResponse {
            client_secret: "pi_1_secret_2".into(),
            payment_intent_id: "pi_1".into(),
        })
        .unwrap();
        assert_eq!(body, json!({"clientSecret": "pi_1_secret_2", "paymentIntentId": "pi_1"}));
    }
}
