//! Webhook service errors.

use thiserror::Error;

use crate::payments::{PaymentGatewayError, signature::SignatureError};

#[derive(Debug, Error)]
pub enum WebhookServiceError {
    #[error("webhook signature is invalid")]
    InvalidSignature(#[source] SignatureError),

    #[error("webhook could not be verified")]
    Unverifiable(#[source] PaymentGatewayError),
}

impl From<PaymentGatewayError> for WebhookServiceError {
    fn from(error: PaymentGatewayError) -> Self {
        match error {
            PaymentGatewayError::InvalidSignature(error) => Self::InvalidSignature(error),
            other => Self::Unverifiable(other),
        }
    }
}
