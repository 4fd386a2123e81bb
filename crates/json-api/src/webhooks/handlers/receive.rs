//! Receive Payment Webhook Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::info;

use timeart_app::domain::webhooks::WebhookOutcome;

use crate::{extensions::*, observability, state::State, webhooks::errors::into_status_error};

const SIGNATURE_HEADER: &str = "stripe-signature";

/// Webhook Acknowledgement
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WebhookResponse {
    pub received: bool,
}

/// Receive Payment Webhook Handler
///
/// Verifies the provider signature over the raw body, then handles the event. Every
/// verified delivery is acknowledged, whatever happened to it internally.
#[endpoint(
    tags("webhooks"),
    summary = "Receive payment provider event",
    responses(
        (status_code = 200, description = "Delivery acknowledged"),
        (status_code = 400, description = "Missing or invalid signature"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<WebhookResponse>, StatusError> {
    let signature = req
        .header::<String>(SIGNATURE_HEADER)
        .filter(|signature| !signature.trim().is_empty())
        .ok_or_else(|| StatusError::bad_request().brief("Missing signature header"))?;

    let payload = req
        .payload()
        .await
        .or_400("Unreadable request body")?
        .clone();

    let outcome = depot
        .obtain_or_500::<Arc<State>>()?
        .app
        .webhooks
        .handle_delivery(&payload, &signature)
        .await
        .map_err(into_status_error)?;

    observability::record_webhook_event(outcome.kind());

    if let WebhookOutcome::Order(recorded) = outcome {
        observability::record_order(recorded.label());

        info!(outcome = recorded.label(), "completed checkout handled");
    }

    Ok(Json(WebhookResponse { received: true }))
}
