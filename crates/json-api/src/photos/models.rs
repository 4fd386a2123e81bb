//! Photo response models.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use timeart::photos::Photo;

/// A photo as shown on the storefront.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct PhotoResponse {
    pub uuid: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,

    /// Digital download price as a decimal string in major units
    pub price_digital: Option<String>,

    /// Base print price as a decimal string in major units
    pub price_print: Option<String>,

    pub artist_name: Option<String>,
    pub license: String,
    pub dimensions: Option<String>,
}

impl From<Photo> for PhotoResponse {
    fn from(photo: Photo) -> Self {
        Self {
            uuid: photo.uuid.into(),
            license: photo.license_label().to_string(),
            slug: photo.slug,
            title: photo.title,
            description: photo.description,
            image_url: photo.image_url,
            price_digital: photo.price_digital.map(|price| price.to_string()),
            price_print: photo.price_print.map(|price| price.to_string()),
            artist_name: photo.artist.map(|artist| artist.name),
            dimensions: photo.dimensions,
        }
    }
}
