//! Webhook service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{error, info, warn};

use timeart::{
    events::PaymentEvent,
    orders::{CompletedCheckout, NewOrder},
};

use crate::{
    domain::{
        orders::{CreateOrderOutcome, OrdersRepository},
        webhooks::{errors::WebhookServiceError, tokens::generate_download_token},
    },
    payments::{PaymentGateway, PaymentGatewayError},
};

/// What happened to a completed checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded,

    /// The session was already recorded by an earlier delivery.
    AlreadyRecorded,

    /// Required metadata was missing or unusable; nothing was written.
    Skipped,

    /// The write failed. The payment succeeded but has no order.
    Failed,
}

impl RecordOutcome {
    /// Short label used for logs and metrics.
    pub fn label(self) -> &'static str {
        match self {
            Self::Recorded => "recorded",
            Self::AlreadyRecorded => "duplicate",
            Self::Skipped => "skipped",
            Self::Failed => "unrecorded",
        }
    }
}

/// How a verified delivery was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    Order(RecordOutcome),
    PaymentFailed { payment_intent: String },
    Ignored { event_type: String },

    /// The signature verified but the event could not be decoded.
    Undecodable,
}

impl WebhookOutcome {
    /// Event kind label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Order(_) => "checkout_completed",
            Self::PaymentFailed { .. } => "payment_failed",
            Self::Ignored { .. } => "other",
            Self::Undecodable => "undecodable",
        }
    }
}

#[automock]
#[async_trait]
pub trait WebhookService: Send + Sync {
    /// Verify and handle one delivery.
    ///
    /// Only verification failures are errors; once verified the delivery is always
    /// handled to completion and its outcome reported.
    async fn handle_delivery(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookOutcome, WebhookServiceError>;
}

/// Turns verified payment events into orders.
#[derive(Clone)]
pub struct PaymentWebhookService {
    gateway: Arc<dyn PaymentGateway>,
    orders: Arc<dyn OrdersRepository>,
    download_base_url: String,
}

impl PaymentWebhookService {
    #[must_use]
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        orders: Arc<dyn OrdersRepository>,
        download_base_url: String,
    ) -> Self {
        Self {
            gateway,
            orders,
            download_base_url,
        }
    }

    /// Record exactly one order for a completed checkout session.
    pub async fn record_completed_checkout(&self, checkout: &CompletedCheckout) -> RecordOutcome {
        let order = match NewOrder::derive(
            checkout,
            Timestamp::now(),
            &self.download_base_url,
            &generate_download_token(),
        ) {
            Ok(order) => order,
            Err(error) => {
                error!(
                    session_id = %checkout.session_id,
                    error = %error,
                    "completed checkout cannot be recorded"
                );

                return RecordOutcome::Skipped;
            }
        };

        if order.is_missing_shipping_address() {
            warn!(
                session_id = %checkout.session_id,
                "print order completed without a shipping address"
            );
        }

        let photo = order.photo;

        match self.orders.create_order_if_absent(order).await {
            Ok(CreateOrderOutcome::Created) => {
                info!(session_id = %checkout.session_id, photo_uuid = %photo, "order recorded");

                RecordOutcome::Recorded
            }
            Ok(CreateOrderOutcome::AlreadyExists) => {
                info!(
                    session_id = %checkout.session_id,
                    "order already recorded; duplicate delivery ignored"
                );

                RecordOutcome::AlreadyRecorded
            }
            Err(error) => {
                error!(
                    session_id = %checkout.session_id,
                    payment_intent = ?checkout.payment_intent,
                    error = ?error,
                    "paid checkout has no order record; reconcile manually"
                );

                RecordOutcome::Failed
            }
        }
    }
}

impl std::fmt::Debug for PaymentWebhookService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentWebhookService")
            .field("download_base_url", &self.download_base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WebhookService for PaymentWebhookService {
    async fn handle_delivery(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookOutcome, WebhookServiceError> {
        let event = match self.gateway.verify_event(payload, signature) {
            Ok(event) => event,
            Err(PaymentGatewayError::MalformedEvent(source)) => {
                error!(error = %source, "verified webhook event could not be decoded");

                return Ok(WebhookOutcome::Undecodable);
            }
            Err(error) => return Err(error.into()),
        };

        let outcome = match event {
            PaymentEvent::CheckoutCompleted(checkout) => {
                WebhookOutcome::Order(self.record_completed_checkout(&checkout).await)
            }
            PaymentEvent::PaymentFailed(failed) => {
                info!(
                    payment_intent = %failed.payment_intent,
                    reason = failed.failure_message.as_deref().unwrap_or("unknown"),
                    "payment failed"
                );

                WebhookOutcome::PaymentFailed {
                    payment_intent: failed.payment_intent,
                }
            }
            PaymentEvent::Other { event_type } => {
                info!(event_type = %event_type, "unhandled payment event");

                WebhookOutcome::Ignored { event_type }
            }
        };

        Ok(outcome)
    }
}
