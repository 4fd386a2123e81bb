//! App Context

use std::sync::Arc;

use thiserror::Error;

use timeart::checkout::CheckoutValidator;

use crate::{
    calendar::RotationCalendar,
    database,
    domain::{
        checkout::{CheckoutService, HostedCheckoutService},
        orders::PgOrdersRepository,
        photos::PgPhotosRepository,
        rotation::{DailyRotationService, RotationService},
        settings::PgSettingsRepository,
        webhooks::{PaymentWebhookService, WebhookService},
    },
    payments::stripe::{StripeConfig, StripeGateway},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrations(#[source] sqlx::migrate::MigrateError),
}

/// Storefront settings shared by checkout and order recording.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Public origin of the site, used for checkout redirects.
    pub public_site_url: String,

    /// Prefix of digital download links.
    pub download_base_url: String,

    pub validator: CheckoutValidator,
}

/// Everything needed to build an [`AppContext`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub run_migrations: bool,
    pub stripe: StripeConfig,
    pub storefront: StorefrontConfig,
    pub calendar: RotationCalendar,
}

#[derive(Clone)]
pub struct AppContext {
    pub rotation: Arc<dyn RotationService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub webhooks: Arc<dyn WebhookService>,
    pub calendar: RotationCalendar,
}

impl AppContext {
    /// Connect to storage and wire every service.
    ///
    /// # Errors
    ///
    /// Returns an error when connecting to the database or migrating it fails.
    pub async fn from_config(config: AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(&config.database_url)
            .await
            .map_err(AppInitError::Database)?;

        if config.run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrations)?;
        }

        let photos = Arc::new(PgPhotosRepository::new(pool.clone()));
        let settings = Arc::new(PgSettingsRepository::new(pool.clone()));
        let orders = Arc::new(PgOrdersRepository::new(pool));
        let gateway = Arc::new(StripeGateway::new(config.stripe));

        Ok(Self {
            rotation: Arc::new(DailyRotationService::new(photos.clone(), settings)),
            checkout: Arc::new(HostedCheckoutService::new(
                photos,
                gateway.clone(),
                config.storefront.validator,
                config.storefront.public_site_url,
            )),
            webhooks: Arc::new(PaymentWebhookService::new(
                gateway,
                orders,
                config.storefront.download_base_url,
            )),
            calendar: config.calendar,
        })
    }
}
