//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// Missing or malformed caller input, detected before any processor call
    #[error("{0}")]
    InvalidRequest(String),

    /// Input is valid but the payment's current state does not allow the operation
    #[error("{0}")]
    IneligibleState(String),

    /// The payment processor call failed; carries the processor's message
    #[error("{0}")]
    Processor(String),
}

impl PaymentError {
    /// Errors the caller can fix by changing the request
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            PaymentError::InvalidRequest(_) | PaymentError::IneligibleState(_)
        )
    }

    /// Machine-readable error code
    pub const fn code(&self) -> &'static str {
        match self {
            PaymentError::InvalidRequest(_) => "INVALID_REQUEST",
            PaymentError::IneligibleState(_) => "INELIGIBLE_STATE",
            PaymentError::Processor(_) => "PROCESSOR_ERROR",
        }
    }
}

impl From<stripe::StripeError> for PaymentError {
    fn from(err: stripe::StripeError) -> Self {
        match err {
            // Surface Stripe's own message rather than the wrapper's formatting
            stripe::StripeError::Stripe(request) => PaymentError::Processor(
                request
                    .message
                    .unwrap_or_else(|| request.error_type.to_string()),
            ),
            other => PaymentError::Processor(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(PaymentError::InvalidRequest("x".into()).is_client_error());
        assert!(PaymentError::IneligibleState("x".into()).is_client_error());
        assert!(!PaymentError::Processor("x".into()).is_client_error());
    }

    #[test]
    fn test_stripe_request_error_keeps_message() {
        let request = stripe::RequestError {
            http_status: 404,
            error_type: stripe::ErrorType::InvalidRequest,
            message: Some("No such payment_intent: 'pi_x'".into()),
            ..Default::default()
        };

        let err = PaymentError::from(stripe::StripeError::Stripe(request));
        assert_eq!(err, PaymentError::Processor("No such payment_intent: 'pi_x'".into()));
        assert_eq!(err.to_string(), "No such payment_intent: 'pi_x'");
        assert_eq!(err.code(), "PROCESSOR_ERROR");
    }

    #[test]
    fn test_stripe_request_error_without_message_uses_type() {
        let request = stripe::RequestError {
            http_status: 400,
            error_type: stripe::ErrorType::InvalidRequest,
            message: None,
            ..Default::default()
        };

        let err = PaymentError::from(stripe::StripeError::Stripe(request));
        assert_eq!(err, PaymentError::Processor("invalid_request_error".into()));
    }

    #[test]
    fn test_stripe_transport_error_is_processor() {
        let err = PaymentError::from(stripe::StripeError::Timeout);
        assert_eq!(err, PaymentError::Processor("timeout communicating with stripe".into()));
        assert!(!err.is_client_error());
    }
}
