//! Checkout Validation
//!
//! Turns an untrusted purchase request plus the authoritative photo record into a
//! [`CheckoutSpec`] the payment gateway may charge, or a [`ValidationError`].
//!
//! The client-supplied price is advisory. It is only ever accepted when it matches the
//! catalog: exactly for digital downloads, and within the print size band for prints.

use std::future::Future;

use rust_decimal::{Decimal, prelude::FromPrimitive};
use serde::{Deserialize, Deserializer, de::IgnoredAny};
use thiserror::Error;

use crate::{
    money::{MoneyError, to_minor_units},
    photos::{Photo, PhotoUuid, PurchaseType},
};

/// Currency checkouts are charged in unless configured otherwise.
pub const DEFAULT_CHECKOUT_CURRENCY: &str = "usd";

/// Default upper bound of the print band, as a multiple of the base print price.
pub const DEFAULT_PRINT_PRICE_MULTIPLIER: Decimal = Decimal::from_parts(3, 0, 0, false, 0);

/// Keys of the string-only metadata bag carried through the payment gateway.
pub mod metadata_keys {
    /// Catalog id of the purchased photo.
    pub const PHOTO_ID: &str = "photoId";

    /// URL slug, used to build redirect pages.
    pub const PHOTO_SLUG: &str = "photoSlug";

    /// Title as the buyer saw it.
    pub const PHOTO_TITLE: &str = "photoTitle";

    /// `digital` or `print`.
    pub const PURCHASE_TYPE: &str = "type";

    /// Requested print size; empty for digital purchases.
    pub const PRINT_SIZE: &str = "printSize";

    /// Catalog id of the artist.
    pub const ARTIST_ID: &str = "artistId";

    /// Artist display name.
    pub const ARTIST_NAME: &str = "artistName";

    /// Artist contact address.
    pub const ARTIST_EMAIL: &str = "artistEmail";

    /// Artist share of the total, in percent.
    pub const COMMISSION_RATE: &str = "commissionRate";

    /// License label shown on the order.
    pub const LICENSE_TYPE: &str = "licenseType";
}

/// Purchase request exactly as received from the browser.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPurchaseRequest {
    /// Requested photo id, unparsed.
    pub photo_id: Option<String>,

    /// Title the buyer was shown.
    pub photo_title: Option<String>,

    /// Requested format, unparsed.
    #[serde(alias = "type")]
    pub purchase_type: Option<String>,

    /// Price the buyer was shown, in major units.
    pub price: Option<RawPrice>,

    /// Requested print size.
    pub print_size: Option<String>,
}

/// The `price` field as sent, before its type is checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawPrice {
    /// A JSON number.
    Number(f64),

    /// Anything else: a string, boolean, array or object.
    NotANumber,
}

impl From<f64> for RawPrice {
    fn from(price: f64) -> Self {
        Self::Number(price)
    }
}

impl<'de> Deserialize<'de> for RawPrice {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Number(f64),
            Other(IgnoredAny),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Number(price) => Self::Number(price),
            Wire::Other(IgnoredAny) => Self::NotANumber,
        })
    }
}

/// A purchase request whose shape has been checked but whose price has not.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseRequest {
    /// Requested photo.
    pub photo: PhotoUuid,

    /// Title the buyer was shown, trimmed.
    pub photo_title: String,

    /// Requested format.
    pub purchase_type: PurchaseType,

    /// Offered price in major units; not yet checked against the catalog.
    pub price: Decimal,

    /// Requested print size, if any.
    pub print_size: Option<String>,
}

/// Which part of a request was missing or unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedField {
    /// No photo id was sent.
    #[error("photoId is required")]
    MissingPhotoId,

    /// The photo id is not a UUID.
    #[error("photoId is not a valid photo identifier")]
    InvalidPhotoId,

    /// No title was sent.
    #[error("photoTitle is required")]
    MissingPhotoTitle,

    /// No purchase type was sent.
    #[error("purchaseType is required")]
    MissingPurchaseType,

    /// The purchase type is not a known format.
    #[error("purchaseType must be \"digital\" or \"print\"")]
    UnknownPurchaseType,

    /// No price was sent.
    #[error("price is required")]
    MissingPrice,

    /// The price is not a positive finite number.
    #[error("price must be a positive number")]
    InvalidPrice,
}

/// Reasons a checkout is refused. Each maps to a distinct buyer-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A field was missing or unusable.
    #[error("Invalid purchase request: {0}")]
    MalformedRequest(MalformedField),

    /// No photo has the requested id.
    #[error("Photo not found")]
    NotFound,

    /// The photo exists but is not active.
    #[error("This photo is not available for purchase")]
    Unavailable,

    /// The photo has no price for the requested format.
    #[error("{} purchases are not available for this photo", .0.display_name())]
    TypeNotOffered(PurchaseType),

    /// The offered price is outside the accepted band.
    #[error("The price for this item has changed; please refresh the page and try again")]
    PriceMismatch,

    /// The catalog could not be reached.
    #[error("We could not verify this photo right now; please try again later")]
    UpstreamUnavailable,
}

impl ValidationError {
    /// Stable machine-readable name, used in responses and metric labels.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MalformedRequest(_) => "malformed_request",
            Self::NotFound => "not_found",
            Self::Unavailable => "unavailable",
            Self::TypeNotOffered(_) => "type_not_offered",
            Self::PriceMismatch => "price_mismatch",
            Self::UpstreamUnavailable => "upstream_unavailable",
        }
    }
}

impl From<MalformedField> for ValidationError {
    fn from(field: MalformedField) -> Self {
        Self::MalformedRequest(field)
    }
}

/// Outcome of resolving a photo id against the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PhotoLookupError {
    /// No photo has the id.
    #[error("photo does not exist")]
    NotFound,

    /// The store failed to answer.
    #[error("photo store is unreachable")]
    Unavailable,
}

impl From<PhotoLookupError> for ValidationError {
    fn from(error: PhotoLookupError) -> Self {
        match error {
            PhotoLookupError::NotFound => Self::NotFound,
            PhotoLookupError::Unavailable => Self::UpstreamUnavailable,
        }
    }
}

/// How far above the base print price a client-priced print may go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceTolerance {
    print_multiplier: Decimal,
}

/// The print multiplier was below one, which would reject the base price itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("print price multiplier must be at least 1, got {0}")]
pub struct InvalidPriceTolerance(pub Decimal);

impl PriceTolerance {
    /// # Errors
    ///
    /// Returns [`InvalidPriceTolerance`] when `print_multiplier` is below one.
    pub fn new(print_multiplier: Decimal) -> Result<Self, InvalidPriceTolerance> {
        if print_multiplier < Decimal::ONE {
            return Err(InvalidPriceTolerance(print_multiplier));
        }

        Ok(Self { print_multiplier })
    }

    /// Upper bound of the print band as a multiple of the base price.
    #[must_use]
    pub const fn print_multiplier(&self) -> Decimal {
        self.print_multiplier
    }

    fn accepts(&self, purchase_type: PurchaseType, expected: Decimal, offered: Decimal) -> bool {
        match purchase_type {
            PurchaseType::Digital => offered == expected,
            PurchaseType::Print => expected
                .checked_mul(self.print_multiplier)
                .is_some_and(|ceiling| expected <= offered && offered <= ceiling),
        }
    }
}

impl Default for PriceTolerance {
    fn default() -> Self {
        Self {
            print_multiplier: DEFAULT_PRINT_PRICE_MULTIPLIER,
        }
    }
}

/// Metadata echoed back by the gateway on the completion event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutMetadata {
    /// See [`metadata_keys::PHOTO_ID`].
    pub photo_id: String,

    /// See [`metadata_keys::PHOTO_SLUG`].
    pub photo_slug: String,

    /// See [`metadata_keys::PHOTO_TITLE`].
    pub photo_title: String,

    /// See [`metadata_keys::PURCHASE_TYPE`].
    pub purchase_type: String,

    /// See [`metadata_keys::PRINT_SIZE`].
    pub print_size: String,

    /// See [`metadata_keys::ARTIST_ID`].
    pub artist_id: String,

    /// See [`metadata_keys::ARTIST_NAME`].
    pub artist_name: String,

    /// See [`metadata_keys::ARTIST_EMAIL`].
    pub artist_email: String,

    /// See [`metadata_keys::COMMISSION_RATE`].
    pub commission_rate: String,

    /// See [`metadata_keys::LICENSE_TYPE`].
    pub license_type: String,
}

impl CheckoutMetadata {
    /// Flatten into key/value pairs for the gateway's string-only metadata channel.
    pub fn pairs(&self) -> [(&'static str, &str); 10] {
        [
            (metadata_keys::PHOTO_ID, &self.photo_id),
            (metadata_keys::PHOTO_SLUG, &self.photo_slug),
            (metadata_keys::PHOTO_TITLE, &self.photo_title),
            (metadata_keys::PURCHASE_TYPE, &self.purchase_type),
            (metadata_keys::PRINT_SIZE, &self.print_size),
            (metadata_keys::ARTIST_ID, &self.artist_id),
            (metadata_keys::ARTIST_NAME, &self.artist_name),
            (metadata_keys::ARTIST_EMAIL, &self.artist_email),
            (metadata_keys::COMMISSION_RATE, &self.commission_rate),
            (metadata_keys::LICENSE_TYPE, &self.license_type),
        ]
    }
}

/// Server-authorised description of a single purchase. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSpec {
    photo: PhotoUuid,
    photo_slug: String,
    purchase_type: PurchaseType,
    unit_amount: i64,
    currency: String,
    print_size: Option<String>,
    product_name: String,
    product_description: String,
    image_url: Option<String>,
    metadata: CheckoutMetadata,
}

impl CheckoutSpec {
    /// Photo being sold.
    pub fn photo(&self) -> PhotoUuid {
        self.photo
    }

    /// Slug of the photo page.
    pub fn photo_slug(&self) -> &str {
        &self.photo_slug
    }

    /// Format being sold.
    pub fn purchase_type(&self) -> PurchaseType {
        self.purchase_type
    }

    /// Authorised unit price in minor units.
    pub fn unit_amount(&self) -> i64 {
        self.unit_amount
    }

    /// Lowercase ISO 4217 code.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Print size; always `None` for digital purchases.
    pub fn print_size(&self) -> Option<&str> {
        self.print_size.as_deref()
    }

    /// Line item name, built from the catalog title.
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Line item description.
    pub fn product_description(&self) -> &str {
        &self.product_description
    }

    /// Product image shown on the hosted page.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Metadata to attach to the session.
    pub fn metadata(&self) -> &CheckoutMetadata {
        &self.metadata
    }

    /// Only physical prints need somewhere to ship to.
    pub fn collects_shipping_address(&self) -> bool {
        self.purchase_type == PurchaseType::Print
    }
}

/// Checks purchase requests against the catalog.
#[derive(Debug, Clone)]
pub struct CheckoutValidator {
    tolerance: PriceTolerance,
    currency: String,
}

impl CheckoutValidator {
    /// Build a validator charging in `currency`.
    #[must_use]
    pub fn new(tolerance: PriceTolerance, currency: &str) -> Self {
        Self {
            tolerance,
            currency: currency.trim().to_ascii_lowercase(),
        }
    }

    /// Full validation: shape, authoritative lookup, availability and price.
    ///
    /// `lookup` resolves the requested id against the content store; a client-supplied
    /// photo payload is never consulted.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered, in the order shape, lookup,
    /// availability, price.
    pub async fn validate<F, Fut>(
        &self,
        raw: RawPurchaseRequest,
        lookup: F,
    ) -> Result<CheckoutSpec, ValidationError>
    where
        F: FnOnce(PhotoUuid) -> Fut,
        Fut: Future<Output = Result<Photo, PhotoLookupError>>,
    {
        let request = parse(raw)?;
        let photo = lookup(request.photo).await?;

        self.authorize(request, &photo)
    }

    /// Authorise a well-formed request against the resolved photo.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::Unavailable`]: the photo is not active.
    /// - [`ValidationError::TypeNotOffered`]: the photo has no price for the format.
    /// - [`ValidationError::PriceMismatch`]: the offered price is outside tolerance.
    pub fn authorize(
        &self,
        request: PurchaseRequest,
        photo: &Photo,
    ) -> Result<CheckoutSpec, ValidationError> {
        if !photo.is_active {
            return Err(ValidationError::Unavailable);
        }

        let expected = photo
            .price_for(request.purchase_type)
            .ok_or(ValidationError::TypeNotOffered(request.purchase_type))?;

        if !self
            .tolerance
            .accepts(request.purchase_type, expected, request.price)
        {
            return Err(ValidationError::PriceMismatch);
        }

        let unit_amount = to_minor_units(request.price)
            .map_err(|_out_of_range: MoneyError| MalformedField::InvalidPrice)?;

        let print_size = match request.purchase_type {
            PurchaseType::Print => request.print_size,
            PurchaseType::Digital => None,
        };

        Ok(CheckoutSpec {
            photo: photo.uuid,
            photo_slug: photo.slug.clone(),
            purchase_type: request.purchase_type,
            unit_amount,
            currency: self.currency.clone(),
            product_name: format!(
                "{} - {}",
                photo.title,
                request.purchase_type.display_name()
            ),
            product_description: product_description(photo, print_size.as_deref()),
            image_url: photo.image_url.clone(),
            metadata: metadata(photo, &request.photo_title, request.purchase_type, print_size.as_deref()),
            print_size,
        })
    }
}

impl Default for CheckoutValidator {
    fn default() -> Self {
        Self::new(PriceTolerance::default(), DEFAULT_CHECKOUT_CURRENCY)
    }
}

/// Check that every required field is present and well-formed.
///
/// # Errors
///
/// Returns [`ValidationError::MalformedRequest`] naming the offending field.
pub fn parse(raw: RawPurchaseRequest) -> Result<PurchaseRequest, ValidationError> {
    let photo_id = non_blank(raw.photo_id).ok_or(MalformedField::MissingPhotoId)?;
    let photo_title = non_blank(raw.photo_title).ok_or(MalformedField::MissingPhotoTitle)?;
    let purchase_type = non_blank(raw.purchase_type).ok_or(MalformedField::MissingPurchaseType)?;
    let price = match raw.price.ok_or(MalformedField::MissingPrice)? {
        RawPrice::Number(price) => price,
        RawPrice::NotANumber => return Err(MalformedField::InvalidPrice.into()),
    };

    let purchase_type = purchase_type
        .parse::<PurchaseType>()
        .map_err(|_unknown| MalformedField::UnknownPurchaseType)?;

    if !price.is_finite() || price <= 0.0 {
        return Err(MalformedField::InvalidPrice.into());
    }

    let price = Decimal::from_f64(price).ok_or(MalformedField::InvalidPrice)?;

    let photo = photo_id
        .parse::<PhotoUuid>()
        .map_err(|_invalid| MalformedField::InvalidPhotoId)?;

    Ok(PurchaseRequest {
        photo,
        photo_title,
        purchase_type,
        price,
        print_size: non_blank(raw.print_size),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn product_description(photo: &Photo, print_size: Option<&str>) -> String {
    let size = print_size.map(|size| format!("Size: {size}"));
    let license = format!("License: {}", photo.license_label());

    [photo.description.clone(), size, Some(license)]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" • ")
}

fn metadata(
    photo: &Photo,
    photo_title: &str,
    purchase_type: PurchaseType,
    print_size: Option<&str>,
) -> CheckoutMetadata {
    let artist = photo.artist.as_ref();

    CheckoutMetadata {
        photo_id: photo.uuid.to_string(),
        photo_slug: photo.slug.clone(),
        photo_title: photo_title.to_string(),
        purchase_type: purchase_type.as_str().to_string(),
        print_size: print_size.unwrap_or_default().to_string(),
        artist_id: artist.map(|a| a.uuid.to_string()).unwrap_or_default(),
        artist_name: artist.map(|a| a.name.clone()).unwrap_or_default(),
        artist_email: artist
            .and_then(|a| a.contact_email.clone())
            .unwrap_or_default(),
        commission_rate: artist
            .map_or(crate::photos::DEFAULT_COMMISSION_RATE, |a| {
                a.commission_rate_or_default()
            })
            .normalize()
            .to_string(),
        license_type: photo.license_label().to_string(),
    }
}
