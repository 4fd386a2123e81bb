//! Payment gateway boundary.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use timeart::{checkout::CheckoutSpec, events::PaymentEvent};

use crate::payments::signature::SignatureError;

/// A hosted checkout the buyer is redirected to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Where the provider sends the buyer after paying or abandoning checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRedirects {
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutRedirects {
    /// Return to the photo's page with a status flag.
    pub fn for_photo(public_site_url: &str, slug: &str) -> Self {
        let page = format!("{}/photos/{slug}", public_site_url.trim_end_matches('/'));

        Self {
            success_url: format!("{page}?success=true"),
            cancel_url: format!("{page}?canceled=true"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PaymentGatewayError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from payment provider: {0}")]
    UnexpectedResponse(String),

    #[error("event signature rejected")]
    InvalidSignature(#[from] SignatureError),

    #[error("event payload is malformed")]
    MalformedEvent(#[source] serde_json::Error),
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted checkout session charging exactly what `spec` authorises.
    async fn create_session(
        &self,
        spec: &CheckoutSpec,
        redirects: &CheckoutRedirects,
    ) -> Result<CheckoutSession, PaymentGatewayError>;

    /// Authenticate an inbound event and decode it.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentGatewayError::InvalidSignature`] unless the signature is valid
    /// for `payload` and fresh; nothing is decoded from an unverified payload.
    fn verify_event(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<PaymentEvent, PaymentGatewayError>;
}
