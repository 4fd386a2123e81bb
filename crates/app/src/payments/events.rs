//! Decoding of provider event payloads.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use timeart::{
    events::{FailedPayment, PaymentEvent},
    orders::{CompletedCheckout, PostalAddress, ShippingDetails},
};

pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";
pub const PAYMENT_INTENT_FAILED: &str = "payment_intent.payment_failed";

#[derive(Debug, Deserialize)]
struct EventEnvelope {
    #[serde(rename = "type")]
    event_type: String,
    data: EventData,
}

#[derive(Debug, Deserialize)]
struct EventData {
    object: Value,
}

#[derive(Debug, Deserialize)]
struct CheckoutSessionObject {
    id: String,
    amount_total: Option<i64>,
    customer_details: Option<CustomerDetails>,
    payment_intent: Option<ExpandableId>,

    #[serde(default)]
    metadata: BTreeMap<String, String>,

    shipping_details: Option<ShippingObject>,
    collected_information: Option<CollectedInformation>,
}

#[derive(Debug, Deserialize)]
struct CustomerDetails {
    email: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CollectedInformation {
    shipping_details: Option<ShippingObject>,
}

#[derive(Debug, Deserialize)]
struct ShippingObject {
    name: Option<String>,
    address: Option<AddressObject>,
}

#[derive(Debug, Deserialize)]
struct AddressObject {
    line1: Option<String>,
    line2: Option<String>,
    city: Option<String>,
    state: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PaymentIntentObject {
    id: String,
    last_payment_error: Option<PaymentError>,
}

#[derive(Debug, Deserialize)]
struct PaymentError {
    message: Option<String>,
}

/// Either a bare id or an expanded object carrying one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExpandableId {
    Id(String),
    Object { id: String },
}

impl ExpandableId {
    fn into_id(self) -> String {
        match self {
            Self::Id(id) | Self::Object { id } => id,
        }
    }
}

impl From<ShippingObject> for ShippingDetails {
    fn from(shipping: ShippingObject) -> Self {
        let address = shipping.address.map_or_else(PostalAddress::default, |address| {
            PostalAddress {
                line1: address.line1,
                line2: address.line2,
                city: address.city,
                state: address.state,
                postal_code: address.postal_code,
                country: address.country,
            }
        });

        Self {
            name: shipping.name,
            address,
        }
    }
}

impl From<CheckoutSessionObject> for CompletedCheckout {
    fn from(session: CheckoutSessionObject) -> Self {
        let shipping = session
            .collected_information
            .and_then(|collected| collected.shipping_details)
            .or(session.shipping_details)
            .map(ShippingDetails::from);

        let (customer_email, customer_name) = session
            .customer_details
            .map(|customer| (customer.email, customer.name))
            .unwrap_or_default();

        Self {
            session_id: session.id,
            amount_total: session.amount_total,
            customer_email,
            customer_name,
            payment_intent: session.payment_intent.map(ExpandableId::into_id),
            metadata: session.metadata,
            shipping,
        }
    }
}

/// Decode a verified event body into the storefront's event type.
///
/// # Errors
///
/// Returns the JSON error when the envelope, or the object of a handled event type, does
/// not have the expected shape.
pub fn decode_event(payload: &[u8]) -> Result<PaymentEvent, serde_json::Error> {
    let envelope: EventEnvelope = serde_json::from_slice(payload)?;

    match envelope.event_type.as_str() {
        CHECKOUT_SESSION_COMPLETED => {
            let session: CheckoutSessionObject = serde_json::from_value(envelope.data.object)?;

            Ok(PaymentEvent::CheckoutCompleted(session.into()))
        }
        PAYMENT_INTENT_FAILED => {
            let intent: PaymentIntentObject = serde_json::from_value(envelope.data.object)?;

            Ok(PaymentEvent::PaymentFailed(FailedPayment {
                payment_intent: intent.id,
                failure_message: intent.last_payment_error.and_then(|error| error.message),
            }))
        }
        _ => Ok(PaymentEvent::Other {
            event_type: envelope.event_type,
        }),
    }
}
