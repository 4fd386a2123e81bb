//! Orders
//!
//! Derives the durable order record from a completed hosted checkout. Nothing here talks
//! to storage; the app crate persists the [`NewOrder`] keyed by its session id.

use std::{collections::BTreeMap, fmt};

use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    checkout::metadata_keys,
    money::{from_minor_units, round_to_cents},
    photos::{DEFAULT_COMMISSION_RATE, DEFAULT_LICENSE_LABEL, PhotoUuid, PurchaseType},
};

/// How long a digital download link stays valid after payment.
pub const DOWNLOAD_VALIDITY: SignedDuration = SignedDuration::from_hours(30 * 24);

/// A postal address as reported by the payment provider. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostalAddress {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl PostalAddress {
    /// Render as a mailing label: street lines, then `City, ST 12345`, then country.
    ///
    /// Empty parts are skipped rather than leaving blank lines or dangling separators.
    pub fn format_multiline(&self) -> String {
        let locality = [self.city.as_deref(), self.state.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        let locality = [Some(locality.as_str()), self.postal_code.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        [
            self.line1.as_deref(),
            self.line2.as_deref(),
            Some(locality.as_str()),
            self.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
    }
}

/// Where a print is shipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingDetails {
    pub name: Option<String>,
    pub address: PostalAddress,
}

/// The parts of a completed checkout session needed to record an order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedCheckout {
    pub session_id: String,

    /// Amount charged, in minor units.
    pub amount_total: Option<i64>,

    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub payment_intent: Option<String>,
    pub metadata: BTreeMap<String, String>,
    pub shipping: Option<ShippingDetails>,
}

impl CompletedCheckout {
    fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

/// Artist/platform division of an order total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissionSplit {
    pub artist_commission: Decimal,
    pub platform_fee: Decimal,
}

impl CommissionSplit {
    /// Split `total` so the artist receives `rate` percent, rounded to cents.
    ///
    /// The platform fee is the remainder, so the two parts always sum to `total`.
    pub fn compute(total: Decimal, rate: Decimal) -> Self {
        let artist_commission = total
            .checked_mul(rate)
            .and_then(|amount| amount.checked_div(Decimal::ONE_HUNDRED))
            .map_or(Decimal::ZERO, round_to_cents);

        Self {
            artist_commission,
            platform_fee: total - artist_commission,
        }
    }
}

/// Lifecycle state of an order. Orders are created completed and never updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Completed,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time-limited link to a purchased digital file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadGrant {
    pub url: String,
    pub expires_at: Timestamp,
}

/// How the purchase reaches the buyer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fulfilment {
    Download(DownloadGrant),

    /// `None` when the provider reported no shipping details for a print.
    Ship { address: Option<String> },
}

/// An order ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub session_id: String,
    pub customer_email: String,
    pub customer_name: String,
    pub photo: PhotoUuid,
    pub purchase_type: PurchaseType,
    pub license_label: String,
    pub order_total: Decimal,
    pub commission_rate: Decimal,
    pub split: CommissionSplit,
    pub status: OrderStatus,
    pub payment_intent: Option<String>,
    pub purchased_at: Timestamp,
    pub fulfilment: Fulfilment,
    pub notes: String,
}

impl NewOrder {
    /// Derive the order for a completed checkout.
    ///
    /// `download_token` must be an unguessable value; it is only used for digital
    /// purchases and is appended to `download_base_url`.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderDerivationError`] when the photo id or purchase type metadata is
    /// missing or unparsable.
    pub fn derive(
        checkout: &CompletedCheckout,
        completed_at: Timestamp,
        download_base_url: &str,
        download_token: &str,
    ) -> Result<Self, OrderDerivationError> {
        let photo = checkout
            .metadata_value(metadata_keys::PHOTO_ID)
            .ok_or(OrderDerivationError::MissingMetadata(metadata_keys::PHOTO_ID))?;

        let purchase_type = checkout
            .metadata_value(metadata_keys::PURCHASE_TYPE)
            .ok_or(OrderDerivationError::MissingMetadata(
                metadata_keys::PURCHASE_TYPE,
            ))?;

        let photo = photo
            .parse::<PhotoUuid>()
            .map_err(|_invalid| OrderDerivationError::invalid(metadata_keys::PHOTO_ID, photo))?;

        let purchase_type = purchase_type.parse::<PurchaseType>().map_err(|_unknown| {
            OrderDerivationError::invalid(metadata_keys::PURCHASE_TYPE, purchase_type)
        })?;

        let order_total = from_minor_units(checkout.amount_total.unwrap_or_default());
        let commission_rate = commission_rate(checkout.metadata_value(metadata_keys::COMMISSION_RATE));

        let fulfilment = match purchase_type {
            PurchaseType::Digital => Fulfilment::Download(DownloadGrant {
                url: format!("{}/{download_token}", download_base_url.trim_end_matches('/')),
                expires_at: completed_at
                    .checked_add(DOWNLOAD_VALIDITY)
                    .unwrap_or(Timestamp::MAX),
            }),
            PurchaseType::Print => Fulfilment::Ship {
                address: checkout
                    .shipping
                    .as_ref()
                    .map(|shipping| shipping.address.format_multiline())
                    .filter(|address| !address.is_empty()),
            },
        };

        Ok(Self {
            session_id: checkout.session_id.clone(),
            customer_email: checkout.customer_email.clone().unwrap_or_default(),
            customer_name: checkout.customer_name.clone().unwrap_or_default(),
            photo,
            purchase_type,
            license_label: checkout
                .metadata_value(metadata_keys::LICENSE_TYPE)
                .unwrap_or(DEFAULT_LICENSE_LABEL)
                .to_string(),
            order_total,
            commission_rate,
            split: CommissionSplit::compute(order_total, commission_rate),
            status: OrderStatus::Completed,
            payment_intent: checkout.payment_intent.clone(),
            purchased_at: completed_at,
            fulfilment,
            notes: format!(
                "Order processed via hosted checkout. Session ID: {}",
                checkout.session_id
            ),
        })
    }

    /// A print whose provider event carried no shipping address.
    pub fn is_missing_shipping_address(&self) -> bool {
        matches!(self.fulfilment, Fulfilment::Ship { address: None })
    }
}

/// Unparsable or out-of-range rates fall back to the default.
fn commission_rate(raw: Option<&str>) -> Decimal {
    raw.and_then(|raw| raw.parse::<Decimal>().ok())
        .filter(|rate| (Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(rate))
        .unwrap_or(DEFAULT_COMMISSION_RATE)
}

/// The completed checkout cannot be turned into an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderDerivationError {
    #[error("checkout metadata is missing {0}")]
    MissingMetadata(&'static str),

    #[error("checkout metadata {key} has unusable value {value:?}")]
    InvalidMetadata { key: &'static str, value: String },
}

impl OrderDerivationError {
    fn invalid(key: &'static str, value: &str) -> Self {
        Self::InvalidMetadata {
            key,
            value: value.to_string(),
        }
    }
}
