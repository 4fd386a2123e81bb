//! Server configuration module

use clap::Parser;
use thiserror::Error;

use timeart::checkout::{CheckoutValidator, InvalidPriceTolerance, PriceTolerance};
use timeart_app::{
    calendar::RotationCalendar,
    context::{AppConfig, StorefrontConfig},
    payments::stripe::StripeConfig,
};

use crate::config::{
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    payments::PaymentsConfig,
    rotation::RotationConfig,
    server::ServerRuntimeConfig,
    storefront::StorefrontSettings,
};

pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod payments;
pub(crate) mod rotation;
pub(crate) mod server;
pub(crate) mod storefront;

/// Errors found while turning parsed settings into application config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The rotation time zone is not in the time zone database.
    #[error("unknown rotation time zone {name:?}")]
    TimeZone {
        /// Zone name as configured.
        name: String,

        /// Lookup failure.
        #[source]
        source: jiff::Error,
    },

    /// The print price multiplier is below one.
    #[error(transparent)]
    PriceMultiplier(#[from] InvalidPriceTolerance),

    /// A required secret was configured as blank.
    #[error("{0} must not be blank")]
    BlankSecret(&'static str),
}

/// Timeart JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "timeart-json", about = "Timeart JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Request observability settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Payment provider settings.
    #[command(flatten)]
    pub payments: PaymentsConfig,

    /// Public storefront settings.
    #[command(flatten)]
    pub storefront: StorefrontSettings,

    /// Featured photo rotation settings.
    #[command(flatten)]
    pub rotation: RotationConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Build the application wiring config.
    ///
    /// # Errors
    ///
    /// Returns an error when a setting parses but is not usable.
    pub fn app_config(&self) -> Result<AppConfig, ConfigError> {
        if self.payments.stripe_secret_key.is_empty() {
            return Err(ConfigError::BlankSecret("STRIPE_SECRET_KEY"));
        }

        if self.payments.stripe_webhook_secret.is_empty() {
            return Err(ConfigError::BlankSecret("STRIPE_WEBHOOK_SECRET"));
        }

        let calendar = RotationCalendar::from_zone_name(&self.rotation.rotation_time_zone)
            .map_err(|source| ConfigError::TimeZone {
                name: self.rotation.rotation_time_zone.clone(),
                source,
            })?;

        let tolerance = PriceTolerance::new(self.storefront.print_price_multiplier)?;

        let mut stripe = StripeConfig::new(
            self.payments.stripe_secret_key.clone(),
            self.payments.stripe_webhook_secret.clone(),
        );

        stripe.api_base.clone_from(&self.payments.stripe_api_base);
        stripe.webhook_tolerance = self.payments.webhook_tolerance();
        stripe.shipping_countries = self
            .payments
            .shipping_countries
            .iter()
            .map(|country| country.trim().to_ascii_uppercase())
            .filter(|country| !country.is_empty())
            .collect();

        Ok(AppConfig {
            database_url: self.database.database_url.clone(),
            run_migrations: self.database.run_migrations,
            stripe,
            storefront: StorefrontConfig {
                public_site_url: self.storefront.public_site_url.clone(),
                download_base_url: self.storefront.download_base_url(),
                validator: CheckoutValidator::new(tolerance, &self.payments.checkout_currency),
            },
            calendar,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const REQUIRED: [&str; 9] = [
        "timeart-json",
        "--database-url",
        "postgres://localhost/timeart",
        "--stripe-secret-key",
        "sk_test",
        "--stripe-webhook-secret",
        "whsec_test",
        "--public-site-url",
        "https://timeart.example",
    ];

    fn parse(extra: &[&str]) -> Result<ServerConfig, clap::Error> {
        ServerConfig::try_parse_from(REQUIRED.iter().chain(extra).copied())
    }

    #[test]
    fn defaults_produce_a_working_app_config() -> TestResult {
        let config = parse(&[])?.app_config()?;

        assert_eq!(config.stripe.api_base, "https://api.stripe.com");
        assert_eq!(config.stripe.shipping_countries.len(), 12);
        assert_eq!(config.storefront.public_site_url, "https://timeart.example");
        assert_eq!(
            config.storefront.download_base_url,
            "https://timeart.example/download"
        );
        assert!(!config.run_migrations, "migrations are opt-in");

        Ok(())
    }

    #[test]
    fn shipping_countries_are_normalised() -> TestResult {
        let config = parse(&["--shipping-countries", "us, ca,,gb"])?.app_config()?;

        assert_eq!(config.stripe.shipping_countries, ["US", "CA", "GB"]);

        Ok(())
    }

    #[test]
    fn unknown_time_zone_is_rejected() -> TestResult {
        let result = parse(&["--rotation-time-zone", "Mars/Olympus_Mons"])?.app_config();

        assert!(
            matches!(result, Err(ConfigError::TimeZone { .. })),
            "expected a time zone error, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn multiplier_below_one_is_rejected() -> TestResult {
        let result = parse(&["--print-price-multiplier", "0.5"])?.app_config();

        assert!(
            matches!(result, Err(ConfigError::PriceMultiplier(_))),
            "expected a multiplier error, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn blank_secret_is_rejected() -> TestResult {
        let result = ServerConfig::try_parse_from([
            "timeart-json",
            "--database-url",
            "postgres://localhost/timeart",
            "--stripe-secret-key",
            " ",
            "--stripe-webhook-secret",
            "whsec_test",
            "--public-site-url",
            "https://timeart.example",
        ])?
        .app_config();

        assert!(
            matches!(result, Err(ConfigError::BlankSecret("STRIPE_SECRET_KEY"))),
            "expected a blank secret error, got {result:?}"
        );

        Ok(())
    }
}
