//! Webhook Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use timeart_app::domain::webhooks::WebhookServiceError;

pub(crate) fn into_status_error(error: WebhookServiceError) -> StatusError {
    match error {
        WebhookServiceError::InvalidSignature(source) => {
            warn!("webhook signature rejected: {source}");

            StatusError::bad_request().brief("Invalid signature")
        }
        WebhookServiceError::Unverifiable(source) => {
            error!("webhook could not be verified: {source}");

            StatusError::internal_server_error()
        }
    }
}
