//! Payment Gateway Facade
//!
//! Validates caller input, makes the processor call and reshapes the result.
//! Every failure is reported synchronously; nothing is retried.
//!
//! ```text
//! cancel_and_refund:
//!
//!   Start ──▶ Retrieved ──┬──▶ Eligible ──▶ Refunded
//!                         ├──▶ Ineligible (status is not "succeeded")
//!                         └──▶ Ineligible (no charge to refund)
//! ```

use std::sync::Arc;

use crate::error::{PaymentError, Result};
use crate::model::{
    CreatePaymentIntentRequest, CreatePaymentIntentResponse, PaymentIntentLookup,
    PaymentStatusResponse, RefundNote, RefundSummary, REFUND_MESSAGE,
};
use crate::money::{parse_amount, to_major_units, to_minor_units};
use crate::processor::{NewPaymentIntent, PaymentProcessor};

/// Rejection message for a missing intent identifier
pub const MISSING_INTENT_ID: &str = "Payment intent ID is required";

/// Rejection message for an intent without a charge
pub const NO_CHARGE: &str = "No charge found to refund";

/// Flat dispatcher over the three payment operations
#[derive(Clone)]
pub struct PaymentGateway {
    processor: Arc<dyn PaymentProcessor>,
}

impl PaymentGateway {
    pub fn new(processor: Arc<dyn PaymentProcessor>) -> Self {
        Self { processor }
    }

    /// Name of the processor behind this gateway
    pub fn processor_name(&self) -> &str {
        self.processor.name()
    }

    /// Create a payment intent for an amount given in major units
    pub async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<CreatePaymentIntentResponse> {
        let amount = parse_amount(request.amount.as_ref())?;
        let minor = to_minor_units(amount)?;
        let currency = normalize_currency(&request.currency)?;

        let intent = self
            .processor
            .create_payment_intent(NewPaymentIntent {
                amount: minor,
                currency,
                metadata: request.metadata,
                automatic_payment_methods: true,
            })
            .await?;

        tracing::info!(
            intent_id = %intent.id,
            amount = minor,
            currency = %intent.currency,
            "Created payment intent"
        );

        let client_secret = intent.client_secret.ok_or_else(|| {
            PaymentError::Processor("No client secret returned".into())
        })?;

        Ok(CreatePaymentIntentResponse {
            client_secret,
            payment_intent_id: intent.id,
        })
    }

    /// Report the processor's current view of an intent; nothing is mutated
    pub async fn confirm_payment(&self, lookup: PaymentIntentLookup) -> Result<PaymentStatusResponse> {
        let id = require_intent_id(&lookup)?;

        let intent = self.processor.retrieve_payment_intent(id).await?;

        tracing::info!(intent_id = %intent.id, status = %intent.status, "Retrieved payment intent");

        Ok(PaymentStatusResponse {
            status: intent.status,
            payment_intent: intent.record,
        })
    }

    /// Fully refund a succeeded intent's charge.
    ///
    /// Double refunds are not prevented here; a second call attempts a second
    /// refund and the processor decides.
    pub async fn cancel_and_refund(&self, lookup: PaymentIntentLookup) -> Result<RefundSummary> {
        let id = require_intent_id(&lookup)?;

        let intent = self.processor.retrieve_payment_intent(id).await?;

        if !intent.is_succeeded() {
            tracing::warn!(intent_id = %intent.id, status = %intent.status, "Refund refused");
            return Err(PaymentError::IneligibleState(format!(
                "Cannot refund payment with status: {}. Only succeeded payments can be refunded.",
                intent.status
            )));
        }

        let charge = intent
            .latest_charge
            .as_deref()
            .ok_or_else(|| PaymentError::IneligibleState(NO_CHARGE.into()))?;

        let refund = self.processor.refund_charge(charge).await?;

        tracing::info!(
            intent_id = %intent.id,
            refund_id = %refund.id,
            amount = refund.amount,
            "Refunded payment"
        );

        Ok(RefundSummary {
            status: refund.status,
            refund_id: refund.id,
            amount_refunded: to_major_units(refund.amount),
            amount_original: to_major_units(intent.amount),
            currency: refund.currency,
            message: REFUND_MESSAGE.into(),
            metadata: RefundNote::default(),
        })
    }
}

fn require_intent_id(lookup: &PaymentIntentLookup) -> Result<&str> {
    lookup
        .payment_intent_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| PaymentError::InvalidRequest(MISSING_INTENT_ID.into()))
}

/// Three-letter alphabetic code, lowercased
fn normalize_currency(currency: &str) -> Result<String> {
    let code = currency.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(PaymentError::InvalidRequest(format!("Invalid currency: {currency}")));
    }
    Ok(code.to_ascii_lowercase())
}
