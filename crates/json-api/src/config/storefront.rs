//! Storefront Config

use clap::Args;
use rust_decimal::Decimal;

use timeart::checkout::DEFAULT_PRINT_PRICE_MULTIPLIER;

/// Public storefront settings.
#[derive(Debug, Args)]
pub struct StorefrontSettings {
    /// Public origin of the site, e.g. `https://timeart.example`
    #[arg(long, env = "PUBLIC_SITE_URL")]
    pub public_site_url: String,

    /// Prefix for digital download links (defaults to `{PUBLIC_SITE_URL}/download`)
    #[arg(long, env = "DOWNLOAD_BASE_URL")]
    pub download_base_url: Option<String>,

    /// Highest accepted print price as a multiple of the base print price
    #[arg(long, env = "PRINT_PRICE_MULTIPLIER", default_value_t = DEFAULT_PRINT_PRICE_MULTIPLIER)]
    pub print_price_multiplier: Decimal,
}

impl StorefrontSettings {
    /// The configured download prefix, or the site's own download path.
    #[must_use]
    pub fn download_base_url(&self) -> String {
        self.download_base_url.clone().unwrap_or_else(|| {
            format!("{}/download", self.public_site_url.trim_end_matches('/'))
        })
    }
}
