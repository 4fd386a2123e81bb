//! Payments Config

use std::time::Duration;

use clap::Args;

use timeart::checkout::DEFAULT_CHECKOUT_CURRENCY;
use timeart_app::payments::{secret::Secret, stripe::DEFAULT_API_BASE};

const DEFAULT_SHIPPING_COUNTRIES: &str = "US,CA,GB,AU,DE,FR,IT,ES,NL,SE,NO,DK";

/// Payment provider settings.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Stripe API address
    #[arg(long, env = "STRIPE_API_BASE", default_value = DEFAULT_API_BASE)]
    pub stripe_api_base: String,

    /// Stripe secret API key
    #[arg(long, env = "STRIPE_SECRET_KEY", hide_env_values = true)]
    pub stripe_secret_key: Secret,

    /// Stripe webhook endpoint secret
    #[arg(long, env = "STRIPE_WEBHOOK_SECRET", hide_env_values = true)]
    pub stripe_webhook_secret: Secret,

    /// Maximum age of an accepted webhook delivery
    #[arg(long, env = "STRIPE_WEBHOOK_TOLERANCE_SECONDS", default_value_t = 300_u64)]
    pub stripe_webhook_tolerance_seconds: u64,

    /// ISO 4217 currency checkout sessions charge in
    #[arg(long, env = "CHECKOUT_CURRENCY", default_value = DEFAULT_CHECKOUT_CURRENCY)]
    pub checkout_currency: String,

    /// Countries prints may ship to (comma separated ISO 3166-1 alpha-2 codes)
    #[arg(
        long,
        env = "SHIPPING_COUNTRIES",
        value_delimiter = ',',
        default_value = DEFAULT_SHIPPING_COUNTRIES
    )]
    pub shipping_countries: Vec<String>,
}

impl PaymentsConfig {
    #[must_use]
    pub fn webhook_tolerance(&self) -> Duration {
        Duration::from_secs(self.stripe_webhook_tolerance_seconds)
    }
}
