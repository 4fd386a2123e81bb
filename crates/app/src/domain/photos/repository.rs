//! Photos Repository

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};
use uuid::Uuid;

use timeart::photos::{Artist, ArtistUuid, LicenseType, Photo, PhotoUuid};

use crate::domain::photos::errors::PhotosRepositoryError;

const FIND_ACTIVE_PHOTOS_SQL: &str = include_str!("sql/find_active_photos.sql");
const FIND_PHOTO_BY_ID_SQL: &str = include_str!("sql/find_photo_by_id.sql");

/// Read access to the photo catalog.
#[automock]
#[async_trait]
pub trait PhotosRepository: Send + Sync {
    /// All active photos in pool order. The order is the basis of daily rotation.
    async fn find_active_photos(&self) -> Result<Vec<Photo>, PhotosRepositoryError>;

    /// A single photo, active or not.
    async fn find_photo_by_id(
        &self,
        photo: PhotoUuid,
    ) -> Result<Option<Photo>, PhotosRepositoryError>;
}

#[derive(Debug, Clone)]
pub struct PgPhotosRepository {
    pool: PgPool,
}

impl PgPhotosRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhotosRepository for PgPhotosRepository {
    async fn find_active_photos(&self) -> Result<Vec<Photo>, PhotosRepositoryError> {
        let rows = query_as::<Postgres, PhotoRow>(FIND_ACTIVE_PHOTOS_SQL)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(PhotoRow::into_photo).collect())
    }

    async fn find_photo_by_id(
        &self,
        photo: PhotoUuid,
    ) -> Result<Option<Photo>, PhotosRepositoryError> {
        let row = query_as::<Postgres, PhotoRow>(FIND_PHOTO_BY_ID_SQL)
            .bind(photo.into_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(PhotoRow::into_photo))
    }
}

/// Row shape of the photo/artist join.
struct PhotoRow(Photo);

impl PhotoRow {
    fn into_photo(self) -> Photo {
        self.0
    }
}

impl<'r> FromRow<'r, PgRow> for PhotoRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let license_type = row
            .try_get::<Option<String>, _>("license_type")?
            .map(|value| {
                value
                    .parse::<LicenseType>()
                    .map_err(|error| sqlx::Error::ColumnDecode {
                        index: "license_type".to_string(),
                        source: Box::new(error),
                    })
            })
            .transpose()?;

        let artist = match row.try_get::<Option<Uuid>, _>("artist_uuid")? {
            Some(uuid) => Some(Artist {
                uuid: ArtistUuid::from_uuid(uuid),
                name: row.try_get("artist_name")?,
                commission_rate: row.try_get::<Option<Decimal>, _>("artist_commission_rate")?,
                contact_email: row.try_get("artist_contact_email")?,
            }),
            None => None,
        };

        Ok(Self(Photo {
            uuid: PhotoUuid::from_uuid(row.try_get("uuid")?),
            slug: row.try_get("slug")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            image_url: row.try_get("image_url")?,
            price_digital: row.try_get("price_digital")?,
            price_print: row.try_get("price_print")?,
            is_active: row.try_get("is_active")?,
            artist,
            license_type,
            dimensions: row.try_get("dimensions")?,
        }))
    }
}
