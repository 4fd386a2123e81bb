//! Checkout service errors.

use thiserror::Error;

use timeart::checkout::ValidationError;

use crate::payments::PaymentGatewayError;

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    #[error(transparent)]
    Rejected(#[from] ValidationError),

    #[error("failed to create checkout session")]
    Gateway(#[source] PaymentGatewayError),
}
