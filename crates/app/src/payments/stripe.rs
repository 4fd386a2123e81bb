//! Stripe REST client for hosted checkout.

use std::time::Duration;

use async_trait::async_trait;
use jiff::Timestamp;
use reqwest::Client;
use serde::Deserialize;

use timeart::{checkout::CheckoutSpec, events::PaymentEvent};

use crate::payments::{
    events::decode_event,
    gateway::{CheckoutRedirects, CheckoutSession, PaymentGateway, PaymentGatewayError},
    secret::Secret,
    signature::{self, DEFAULT_TOLERANCE},
};

/// Default Stripe API address.
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Countries prints may ship to unless configured otherwise.
pub const DEFAULT_SHIPPING_COUNTRIES: [&str; 12] = [
    "US", "CA", "GB", "AU", "DE", "FR", "IT", "ES", "NL", "SE", "NO", "DK",
];

/// Configuration for talking to Stripe.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// API address, e.g. `"https://api.stripe.com"`.
    pub api_base: String,

    /// Secret API key used to create sessions.
    pub secret_key: Secret,

    /// Endpoint secret used to verify webhook deliveries.
    pub webhook_secret: Secret,

    /// Maximum accepted age of a webhook delivery.
    pub webhook_tolerance: Duration,

    /// ISO 3166-1 alpha-2 codes prints may ship to.
    pub shipping_countries: Vec<String>,
}

impl StripeConfig {
    #[must_use]
    pub fn new(secret_key: Secret, webhook_secret: Secret) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            secret_key,
            webhook_secret,
            webhook_tolerance: DEFAULT_TOLERANCE,
            shipping_countries: DEFAULT_SHIPPING_COUNTRIES
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// [`PaymentGateway`] backed by Stripe Checkout.
#[derive(Debug, Clone)]
pub struct StripeGateway {
    config: StripeConfig,
    http: Client,
}

impl StripeGateway {
    #[must_use]
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_session(
        &self,
        spec: &CheckoutSpec,
        redirects: &CheckoutRedirects,
    ) -> Result<CheckoutSession, PaymentGatewayError> {
        let url = format!(
            "{}/v1/checkout/sessions",
            self.config.api_base.trim_end_matches('/')
        );

        let form = session_form(spec, redirects, &self.config.shipping_countries);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.config.secret_key.expose())
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(PaymentGatewayError::UnexpectedResponse(format!(
                "session request failed with status {status}: {text}"
            )));
        }

        let session: SessionResponse = response.json().await?;

        let url = session.url.ok_or_else(|| {
            PaymentGatewayError::UnexpectedResponse(format!(
                "session {} was created without a redirect url",
                session.id
            ))
        })?;

        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }

    fn verify_event(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<PaymentEvent, PaymentGatewayError> {
        signature::verify(
            payload,
            signature,
            self.config.webhook_secret.expose(),
            self.config.webhook_tolerance,
            Timestamp::now(),
        )?;

        decode_event(payload).map_err(PaymentGatewayError::MalformedEvent)
    }
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

/// Form-encoded body for `POST /v1/checkout/sessions`.
fn session_form(
    spec: &CheckoutSpec,
    redirects: &CheckoutRedirects,
    shipping_countries: &[String],
) -> Vec<(String, String)> {
    const ITEM: &str = "line_items[0]";
    const PRICE: &str = "line_items[0][price_data]";
    const PRODUCT: &str = "line_items[0][price_data][product_data]";

    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("payment_method_types[0]".to_string(), "card".to_string()),
        (format!("{PRICE}[currency]"), spec.currency().to_string()),
        (format!("{PRICE}[unit_amount]"), spec.unit_amount().to_string()),
        (format!("{PRODUCT}[name]"), spec.product_name().to_string()),
        (format!("{ITEM}[quantity]"), "1".to_string()),
        ("success_url".to_string(), redirects.success_url.clone()),
        ("cancel_url".to_string(), redirects.cancel_url.clone()),
        ("billing_address_collection".to_string(), "required".to_string()),
    ];

    if !spec.product_description().is_empty() {
        form.push((
            format!("{PRODUCT}[description]"),
            spec.product_description().to_string(),
        ));
    }

    if let Some(image_url) = spec.image_url() {
        form.push((format!("{PRODUCT}[images][0]"), image_url.to_string()));
    }

    for (key, value) in spec.metadata().pairs() {
        form.push((format!("metadata[{key}]"), value.to_string()));
    }

    if spec.collects_shipping_address() {
        for (index, country) in shipping_countries.iter().enumerate() {
            form.push((
                format!("shipping_address_collection[allowed_countries][{index}]"),
                country.clone(),
            ));
        }
    }

    form
}
