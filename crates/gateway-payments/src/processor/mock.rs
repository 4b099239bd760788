//! Mock Payment Processor
//!
//! In-memory stand-in for Stripe, for tests and local demos.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

use super::{NewPaymentIntent, PaymentProcessor, ProcessorIntent, ProcessorRefund, STATUS_SUCCEEDED};
use crate::error::{PaymentError, Result};

/// Number of calls seen per operation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MockCalls {
    pub create: usize,
    pub retrieve: usize,
    pub refund: usize,
}

#[derive(Default)]
struct MockState {
    intents: HashMap<String, ProcessorIntent>,
    refunded_charges: HashSet<String>,
    created: Vec<NewPaymentIntent>,
    calls: MockCalls,
    failure: Option<String>,
}

/// In-memory processor that behaves like a Stripe test account
#[derive(Default)]
pub struct MockProcessor {
    state: RwLock<MockState>,
}

impl MockProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an intent as-is; an empty `record` is filled in
    pub async fn insert_intent(&self, mut intent: ProcessorIntent) {
        if intent.record.is_null() {
            intent.record = record_for(&intent, &HashMap::new());
        }
        self.state.write().await.intents.insert(intent.id.clone(), intent);
    }

    /// Simulate the customer completing payment: the intent succeeds and gains
    /// a charge. Returns the charge id.
    pub async fn mark_succeeded(&self, intent_id: &str) -> Result<String> {
        let mut state = self.state.write().await;
        let intent = state
            .intents
            .get_mut(intent_id)
            .ok_or_else(|| no_such_intent(intent_id))?;

        let charge_id = format!("ch_mock_{}", uuid::Uuid::new_v4().simple());
        intent.status = STATUS_SUCCEEDED.to_string();
        intent.latest_charge = Some(charge_id.clone());
        refresh_record(intent);

        Ok(charge_id)
    }

    /// Make every subsequent call fail with `message`
    pub async fn fail_with(&self, message: impl Into<String>) {
        self.state.write().await.failure = Some(message.into());
    }

    pub async fn clear_failure(&self) {
        self.state.write().await.failure = None;
    }

    /// Every create request received, in order
    pub async fn created_requests(&self) -> Vec<NewPaymentIntent> {
        self.state.read().await.created.clone()
    }

    pub async fn calls(&self) -> MockCalls {
        self.state.read().await.calls
    }
}

#[async_trait]
impl PaymentProcessor for MockProcessor {
    async fn create_payment_intent(&self, params: NewPaymentIntent) -> Result<ProcessorIntent> {
        let mut state = self.state.write().await;
        state.calls.create += 1;
        state.created.push(params.clone());
        if let Some(message) = &state.failure {
            return Err(PaymentError::Processor(message.clone()));
        }

        let id = format!("pi_mock_{}", uuid::Uuid::new_v4().simple());
        let mut intent = ProcessorIntent {
            client_secret: Some(format!("{id}_secret_{}", uuid::Uuid::new_v4().simple())),
            id,
            status: "requires_payment_method".into(),
            amount: params.amount,
            currency: params.currency.clone(),
            latest_charge: None,
            record: Value::Null,
        };
        intent.record = record_for(&intent, &params.metadata);

        state.intents.insert(intent.id.clone(), intent.clone());
        Ok(intent)
    }

    async fn retrieve_payment_intent(&self, id: &str) -> Result<ProcessorIntent> {
        let mut state = self.state.write().await;
        state.calls.retrieve += 1;
        if let Some(message) = &state.failure {
            return Err(PaymentError::Processor(message.clone()));
        }

        state.intents.get(id).cloned().ok_or_else(|| no_such_intent(id))
    }

    async fn refund_charge(&self, charge_id: &str) -> Result<ProcessorRefund> {
        let mut state = self.state.write().await;
        state.calls.refund += 1;
        if let Some(message) = &state.failure {
            return Err(PaymentError::Processor(message.clone()));
        }

        let (amount, currency) = state
            .intents
            .values()
            .find(|intent| intent.latest_charge.as_deref() == Some(charge_id))
            .map(|intent| (intent.amount, intent.currency.clone()))
            .ok_or_else(|| PaymentError::Processor(format!("No such charge: '{charge_id}'")))?;

        if !state.refunded_charges.insert(charge_id.to_string()) {
            return Err(PaymentError::Processor(format!(
                "Charge {charge_id} has already been refunded."
            )));
        }

        Ok(ProcessorRefund {
            id: format!("re_mock_{}", uuid::Uuid::new_v4().simple()),
            status: Some(STATUS_SUCCEEDED.to_string()),
            amount,
            currency,
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

fn no_such_intent(id: &str) -> PaymentError {
    PaymentError::Processor(format!("No such payment_intent: '{id}'"))
}

/// Build a Stripe-shaped JSON record for an intent
fn record_for(intent: &ProcessorIntent, metadata: &HashMap<String, String>) -> Value {
    json!({
        "id": intent.id,
        "object": "payment_intent",
        "amount": intent.amount,
        "currency": intent.currency,
        "status": intent.status,
        "client_secret": intent.client_secret,
        "latest_charge": intent.latest_charge,
        "metadata": metadata,
        "automatic_payment_methods": { "enabled": true },
        "created": Utc::now().timestamp(),
        "livemode": false,
    })
}

fn refresh_record(intent: &mut ProcessorIntent) {
    let status = json!(intent.status);
    let latest_charge = json!(intent.latest_charge);
    if let Value::Object(fields) = &mut intent.record {
        fields.insert("status".into(), status);
        fields.insert("latest_charge".into(), latest_charge);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(amount: i64) -> NewPaymentIntent {
        NewPaymentIntent {
            amount,
            currency: "usd".into(),
            metadata: HashMap::new(),
            automatic_payment_methods: true,
        }
    }

    #[tokio::test]
    async fn test_create_then_retrieve() {
        let mock = MockProcessor::new();
        let created = mock.create_payment_intent(params(2500)).await.unwrap();
        assert!(created.client_secret.is_some());

        let fetched = mock.retrieve_payment_intent(&created.id).await.unwrap();
        assert_eq!(fetched.amount, 2500);
        assert_eq!(fetched.status, "requires_payment_method");
        assert_eq!(fetched.record["object"], "payment_intent");
        assert_eq!(mock.calls().await, MockCalls { create: 1, retrieve: 1, refund: 0 });
    }

    #[tokio::test]
    async fn test_mark_succeeded_updates_record() {
        let mock = MockProcessor::new();
        let created = mock.create_payment_intent(params(500)).await.unwrap();
        let charge = mock.mark_succeeded(&created.id).await.unwrap();

        let fetched = mock.retrieve_payment_intent(&created.id).await.unwrap();
        assert!(fetched.is_succeeded());
        assert_eq!(fetched.latest_charge.as_deref(), Some(charge.as_str()));
        assert_eq!(fetched.record["status"], "succeeded");
        assert_eq!(fetched.record["latest_charge"], charge.as_str());
    }

    #[tokio::test]
    async fn test_second_refund_is_rejected() {
        let mock = MockProcessor::new();
        let created = mock.create_payment_intent(params(500)).await.unwrap();
        let charge = mock.mark_succeeded(&created.id).await.unwrap();

        let refund = mock.refund_charge(&charge).await.unwrap();
        assert_eq!(refund.amount, 500);

        let err = mock.refund_charge(&charge).await.unwrap_err();
        assert!(err.to_string().contains("already been refunded"));
    }

    #[tokio::test]
    async fn test_forced_failure() {
        let mock = MockProcessor::new();
        mock.fail_with("card_declined").await;
        let err = mock.create_payment_intent(params(100)).await.unwrap_err();
        assert_eq!(err, PaymentError::Processor("card_declined".into()));

        mock.clear_failure().await;
        assert!(mock.create_payment_intent(params(100)).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_intent() {
        let mock = MockProcessor::new();
        let err = mock.retrieve_payment_intent("pi_missing").await.unwrap_err();
        assert_eq!(err.to_string(), "No such payment_intent: 'pi_missing'");
    }
}
