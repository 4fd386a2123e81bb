//! Repositories wired to a test database, plus fixture inserts.

use rust_decimal::Decimal;
use sqlx::query;

use timeart::photos::{ArtistUuid, PhotoUuid};

use crate::domain::{
    orders::PgOrdersRepository, photos::PgPhotosRepository, settings::PgSettingsRepository,
};

use super::db::TestDb;

pub(crate) struct TestContext {
    pub db: TestDb,
    pub photos: PgPhotosRepository,
    pub settings: PgSettingsRepository,
    pub orders: PgOrdersRepository,
}

impl TestContext {
    pub async fn new() -> Self {
        let db = TestDb::new().await;
        let pool = db.pool().clone();

        Self {
            photos: PgPhotosRepository::new(pool.clone()),
            settings: PgSettingsRepository::new(pool.clone()),
            orders: PgOrdersRepository::new(pool),
            db,
        }
    }

    pub async fn insert_artist(
        &self,
        name: &str,
        commission_rate: Option<Decimal>,
    ) -> Result<ArtistUuid, sqlx::Error> {
        let uuid = ArtistUuid::new();

        query("INSERT INTO artists (uuid, name, commission_rate) VALUES ($1, $2, $3)")
            .bind(uuid.into_uuid())
            .bind(name)
            .bind(commission_rate)
            .execute(self.db.pool())
            .await?;

        Ok(uuid)
    }

    pub async fn insert_photo(&self, fixture: PhotoFixture) -> Result<PhotoUuid, sqlx::Error> {
        let uuid = PhotoUuid::new();

        query(
            "INSERT INTO photos \
             (uuid, slug, title, price_digital, price_print, is_active, artist_uuid, license_type, position) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(uuid.into_uuid())
        .bind(&fixture.slug)
        .bind(fixture.slug.to_uppercase())
        .bind(fixture.price_digital)
        .bind(fixture.price_print)
        .bind(fixture.is_active)
        .bind(fixture.artist.map(ArtistUuid::into_uuid))
        .bind(fixture.license_type)
        .bind(fixture.position)
        .execute(self.db.pool())
        .await?;

        Ok(uuid)
    }
}

/// Builder for photo rows inserted by tests.
#[derive(Debug, Clone)]
pub(crate) struct PhotoFixture {
    slug: String,
    price_digital: Option<Decimal>,
    price_print: Option<Decimal>,
    is_active: bool,
    artist: Option<ArtistUuid>,
    license_type: Option<String>,
    position: i32,
}

impl PhotoFixture {
    pub fn new(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            price_digital: None,
            price_print: None,
            is_active: true,
            artist: None,
            license_type: None,
            position: 0,
        }
    }

    pub fn position(mut self, position: i32) -> Self {
        self.position = position;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn artist(mut self, artist: ArtistUuid) -> Self {
        self.artist = Some(artist);
        self
    }

    pub fn license(mut self, license_type: &str) -> Self {
        self.license_type = Some(license_type.to_string());
        self
    }

    pub fn prices(mut self, digital: Option<Decimal>, print: Option<Decimal>) -> Self {
        self.price_digital = digital;
        self.price_print = print;
        self
    }
}
