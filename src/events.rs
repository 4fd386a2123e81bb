//! Payment Events
//!
//! The closed set of inbound payment notifications the storefront reacts to. Anything
//! else the provider sends is carried as [`PaymentEvent::Other`] so it can be
//! acknowledged and logged without being acted on.

use crate::orders::CompletedCheckout;

/// A verified notification from the payment provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    /// A hosted checkout session was paid.
    CheckoutCompleted(CompletedCheckout),

    /// A payment attempt was declined or otherwise failed.
    PaymentFailed(FailedPayment),

    /// Any event type with no handling of its own.
    Other { event_type: String },
}

impl PaymentEvent {
    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CheckoutCompleted(_) => "checkout_completed",
            Self::PaymentFailed(_) => "payment_failed",
            Self::Other { .. } => "other",
        }
    }
}

/// Details of a failed payment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedPayment {
    pub payment_intent: String,
    pub failure_message: Option<String>,
}
