//! Settings Repository

use async_trait::async_trait;
use mockall::automock;
use sqlx::{PgPool, query, query_scalar};
use uuid::Uuid;

use timeart::photos::PhotoUuid;

use crate::domain::settings::errors::SettingsRepositoryError;

const FEATURED_PHOTO_SQL: &str = include_str!("sql/featured_photo.sql");
const SET_FEATURED_PHOTO_SQL: &str = include_str!("sql/set_featured_photo.sql");

/// Key of the single settings row the storefront reads.
pub const SITE_SETTINGS_KEY: &str = "main-site-configuration";

/// The persisted "currently featured photo" pointer.
///
/// Never cached in process: every read goes to storage so concurrent writers converge.
#[automock]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn featured_photo(&self) -> Result<Option<PhotoUuid>, SettingsRepositoryError>;

    /// Upsert the pointer. Writing the same value twice is harmless.
    async fn set_featured_photo(&self, photo: PhotoUuid) -> Result<(), SettingsRepositoryError>;
}

#[derive(Debug, Clone)]
pub struct PgSettingsRepository {
    pool: PgPool,
}

impl PgSettingsRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PgSettingsRepository {
    async fn featured_photo(&self) -> Result<Option<PhotoUuid>, SettingsRepositoryError> {
        let featured = query_scalar::<_, Option<Uuid>>(FEATURED_PHOTO_SQL)
            .bind(SITE_SETTINGS_KEY)
            .fetch_optional(&self.pool)
            .await?;

        Ok(featured.flatten().map(PhotoUuid::from_uuid))
    }

    async fn set_featured_photo(&self, photo: PhotoUuid) -> Result<(), SettingsRepositoryError> {
        query(SET_FEATURED_PHOTO_SQL)
            .bind(SITE_SETTINGS_KEY)
            .bind(photo.into_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{PhotoFixture, TestContext};

    use super::*;

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn pointer_is_absent_until_first_write() -> TestResult {
        let ctx = TestContext::new().await;

        assert_eq!(ctx.settings.featured_photo().await?, None);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn pointer_upserts_in_place() -> TestResult {
        let ctx = TestContext::new().await;

        let first = ctx.insert_photo(PhotoFixture::new("first")).await?;
        let second = ctx.insert_photo(PhotoFixture::new("second")).await?;

        ctx.settings.set_featured_photo(first).await?;
        ctx.settings.set_featured_photo(second).await?;
        ctx.settings.set_featured_photo(second).await?;

        assert_eq!(ctx.settings.featured_photo().await?, Some(second));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn pointer_to_missing_photo_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx.settings.set_featured_photo(PhotoUuid::new()).await;

        assert!(
            matches!(result, Err(SettingsRepositoryError::UnknownPhoto)),
            "expected UnknownPhoto, got {result:?}"
        );
    }
}
