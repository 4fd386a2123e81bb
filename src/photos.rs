//! Photos & Artists

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::uuids::TypedUuid;

/// Photo UUID
pub type PhotoUuid = TypedUuid<Photo>;

/// Artist UUID
pub type ArtistUuid = TypedUuid<Artist>;

/// Commission percentage paid to an artist that has not negotiated a rate.
pub const DEFAULT_COMMISSION_RATE: Decimal = Decimal::from_parts(70, 0, 0, false, 0);

/// License label used when a photo does not name one.
pub const DEFAULT_LICENSE_LABEL: &str = "Personal Use";

/// A sellable artwork.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub uuid: PhotoUuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,

    /// Digital download price in major units.
    pub price_digital: Option<Decimal>,

    /// Base print price in major units.
    pub price_print: Option<Decimal>,

    pub is_active: bool,
    pub artist: Option<Artist>,
    pub license_type: Option<LicenseType>,

    /// Free-text catalog of print sizes, e.g. `"8x10, 16x20"`.
    pub dimensions: Option<String>,
}

impl Photo {
    /// Catalog price for the given format, if the photo is sold in it.
    pub fn price_for(&self, purchase_type: PurchaseType) -> Option<Decimal> {
        match purchase_type {
            PurchaseType::Digital => self.price_digital,
            PurchaseType::Print => self.price_print,
        }
    }

    /// A photo with neither price cannot be bought at all.
    pub fn is_purchasable(&self) -> bool {
        self.price_digital.is_some() || self.price_print.is_some()
    }

    pub fn license_label(&self) -> &'static str {
        self.license_type
            .map_or(DEFAULT_LICENSE_LABEL, LicenseType::label)
    }
}

/// A payee credited for a photo.
#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    pub uuid: ArtistUuid,
    pub name: String,

    /// Percentage of proceeds (0–100) owed to the artist.
    pub commission_rate: Option<Decimal>,

    /// Record-keeping only; never used to authenticate anyone.
    pub contact_email: Option<String>,
}

impl Artist {
    pub fn commission_rate_or_default(&self) -> Decimal {
        self.commission_rate.unwrap_or(DEFAULT_COMMISSION_RATE)
    }
}

/// Purchasable formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseType {
    Digital,
    Print,
}

impl PurchaseType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Digital => "digital",
            Self::Print => "print",
        }
    }

    /// Human-facing format name used on checkout line items.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Digital => "Digital Download",
            Self::Print => "Physical Print",
        }
    }
}

impl fmt::Display for PurchaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PurchaseType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "digital" => Ok(Self::Digital),
            "print" => Ok(Self::Print),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Usage rights granted with a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseType {
    Personal,
    Commercial,
    Extended,
}

impl LicenseType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Commercial => "commercial",
            Self::Extended => "extended",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Personal => DEFAULT_LICENSE_LABEL,
            Self::Commercial => "Commercial Use",
            Self::Extended => "Extended License",
        }
    }
}

impl FromStr for LicenseType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "personal" => Ok(Self::Personal),
            "commercial" => Ok(Self::Commercial),
            "extended" => Ok(Self::Extended),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// A string did not name any known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown variant \"{0}\"")]
pub struct UnknownVariant(pub String);
