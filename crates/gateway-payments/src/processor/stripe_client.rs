//! Stripe Payment Intents Integration
//!
//! Implements `PaymentProcessor` on top of `async-stripe`.

use async_trait::async_trait;
use serde_json::Value;
use stripe::{
    ChargeId, Client, CreatePaymentIntent, CreatePaymentIntentAutomaticPaymentMethods,
    CreateRefund, Currency, PaymentIntent, PaymentIntentId, Refund,
};

use super::{NewPaymentIntent, PaymentProcessor, ProcessorIntent, ProcessorRefund};
use crate::error::{PaymentError, Result};

/// Stripe client wrapper
pub struct StripeClient {
    client: Client,
}

impl StripeClient {
    /// Create a new Stripe client
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }
}

#[async_trait]
impl PaymentProcessor for StripeClient {
    async fn create_payment_intent(&self, request: NewPaymentIntent) -> Result<ProcessorIntent> {
        let currency = parse_currency(&request.currency)?;

        let mut params = CreatePaymentIntent::new(request.amount, currency);
        params.automatic_payment_methods = Some(CreatePaymentIntentAutomaticPaymentMethods {
            enabled: request.automatic_payment_methods,
            ..Default::default()
        });
        if !request.metadata.is_empty() {
            params.metadata = Some(request.metadata);
        }

        let intent = PaymentIntent::create(&self.client, params).await?;

        tracing::debug!(intent_id = %intent.id, amount = intent.amount, "Stripe payment intent created");

        to_processor_intent(intent)
    }

    async fn retrieve_payment_intent(&self, id: &str) -> Result<ProcessorIntent> {
        let intent_id: PaymentIntentId = id
            .parse()
            .map_err(|_| PaymentError::Processor(format!("No such payment_intent: '{id}'")))?;

        let intent = PaymentIntent::retrieve(&self.client, &intent_id, &[]).await?;

        to_processor_intent(intent)
    }

    async fn refund_charge(&self, charge_id: &str) -> Result<ProcessorRefund> {
        let charge: ChargeId = charge_id
            .parse()
            .map_err(|_| PaymentError::Processor(format!("No such charge: '{charge_id}'")))?;

        let mut params = CreateRefund::new();
        params.charge = Some(charge);

        let refund = Refund::create(&self.client, params).await?;

        Ok(ProcessorRefund {
            id: refund.id.to_string(),
            status: refund.status.map(|s| s.to_string()),
            amount: refund.amount,
            currency: refund.currency.to_string(),
        })
    }

    fn name(&self) -> &str {
        "stripe"
    }
}

/// Stripe rejects unknown currencies anyway; this only fails earlier
fn parse_currency(code: &str) -> Result<Currency> {
    serde_json::from_value(Value::String(code.to_lowercase()))
        .map_err(|_| PaymentError::Processor(format!("Invalid currency: {code}")))
}

fn to_processor_intent(intent: PaymentIntent) -> Result<ProcessorIntent> {
    let record = serde_json::to_value(&intent)
        .map_err(|e| PaymentError::Processor(format!("Unreadable payment intent: {e}")))?;

    Ok(ProcessorIntent {
        id: intent.id.to_string(),
        status: intent.status.to_string(),
        amount: intent.amount,
        currency: intent.currency.to_string(),
        latest_charge: intent.latest_charge.as_ref().map(|charge| charge.id().to_string()),
        client_secret: intent.client_secret,
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("usd").unwrap(), Currency::USD);
        assert_eq!(parse_currency("EUR").unwrap(), Currency::EUR);
        assert!(parse_currency("zzz").is_err());
    }

    #[tokio::test]
    async fn test_malformed_intent_id_is_processor_error() {
        let client = StripeClient::new("sk_test_placeholder");
        let err = client.retrieve_payment_intent("not-an-intent").await.unwrap_err();
        assert!(matches!(err, PaymentError::Processor(_)));
        assert_eq!(client.name(), "stripe");
    }
}
