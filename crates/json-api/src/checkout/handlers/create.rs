//! Create Checkout Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use timeart::checkout::{RawPrice, RawPurchaseRequest};
use timeart_app::payments::CheckoutSession;

use crate::{checkout::errors::into_status_error, extensions::*, state::State};

/// Create Checkout Request
///
/// Every field is optional at the wire level so that a missing field is reported by
/// name rather than as a parse failure.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateCheckoutRequest {
    pub photo_id: Option<String>,

    /// Title shown to the buyer; recorded as-is in session metadata
    pub photo_title: Option<String>,

    /// `digital` or `print`
    #[serde(alias = "type")]
    pub purchase_type: Option<String>,

    /// Price the buyer was shown, in major units. Non-numbers are rejected by name.
    pub price: Option<Value>,

    /// Requested print size, e.g. `8x10`; ignored for digital purchases
    pub print_size: Option<String>,
}

impl From<JsonBody<CreateCheckoutRequest>> for RawPurchaseRequest {
    fn from(json: JsonBody<CreateCheckoutRequest>) -> Self {
        let request = json.into_inner();

        RawPurchaseRequest {
            photo_id: request.photo_id,
            photo_title: request.photo_title,
            purchase_type: request.purchase_type,
            price: request
                .price
                .map(|price| price.as_f64().map_or(RawPrice::NotANumber, RawPrice::Number)),
            print_size: request.print_size,
        }
    }
}

/// Create Checkout Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutResponse {
    /// Hosted checkout page to redirect the buyer to
    pub url: String,

    pub session_id: String,
}

impl From<CheckoutSession> for CheckoutResponse {
    fn from(session: CheckoutSession) -> Self {
        Self {
            url: session.url,
            session_id: session.id,
        }
    }
}

/// Create Checkout Handler
///
/// Validates the purchase against the catalog and opens a hosted checkout session for
/// the authorised amount.
#[endpoint(
    tags("checkout"),
    summary = "Create Checkout Session",
    responses(
        (status_code = 200, description = "Checkout session created"),
        (status_code = 400, description = "Purchase request rejected"),
        (status_code = 404, description = "Photo not found"),
        (status_code = 500, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCheckoutRequest>,
    depot: &mut Depot,
) -> Result<Json<CheckoutResponse>, StatusError> {
    let session = depot
        .obtain_or_500::<Arc<State>>()?
        .app
        .checkout
        .create_checkout(json.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(session.into()))
}
