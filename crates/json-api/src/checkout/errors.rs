//! Checkout Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use timeart::checkout::ValidationError;
use timeart_app::domain::checkout::CheckoutServiceError;

use crate::observability;

pub(crate) fn into_status_error(error: CheckoutServiceError) -> StatusError {
    match error {
        CheckoutServiceError::Rejected(rejection) => {
            observability::record_checkout_rejection(rejection.kind());

            warn!(kind = rejection.kind(), "checkout rejected: {rejection}");

            rejection_status(rejection)
                .brief(rejection.to_string())
                .detail(rejection.kind())
        }
        CheckoutServiceError::Gateway(source) => {
            error!("failed to create checkout session: {source}");

            StatusError::internal_server_error().brief("Failed to create checkout session")
        }
    }
}

fn rejection_status(rejection: ValidationError) -> StatusError {
    match rejection {
        ValidationError::NotFound => StatusError::not_found(),
        ValidationError::UpstreamUnavailable => StatusError::internal_server_error(),
        ValidationError::MalformedRequest(_)
        | ValidationError::Unavailable
        | ValidationError::TypeNotOffered(_)
        | ValidationError::PriceMismatch => StatusError::bad_request(),
    }
}
