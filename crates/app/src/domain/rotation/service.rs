//! Rotation service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::civil::Date;
use mockall::automock;
use tracing::{error, info, warn};

use timeart::{
    photos::{Photo, PhotoUuid},
    rotation::{needs_rotation, preview_upcoming, select_todays_photo},
};

use crate::domain::{
    photos::PhotosRepository, rotation::errors::RotationServiceError,
    settings::SettingsRepository,
};

/// What a reconciliation run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationOutcome {
    /// The pointer was rewritten to today's selection.
    Rotated { photo: PhotoUuid, slug: String },

    /// The pointer already matched; nothing was written.
    AlreadyCurrent { photo: PhotoUuid },

    /// The active pool is empty.
    NoPhotoAvailable,

    /// Storage failed. The pointer was left as it was.
    Failed,
}

impl RotationOutcome {
    /// Short label used for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rotated { .. } => "rotated",
            Self::AlreadyCurrent { .. } => "already_current",
            Self::NoPhotoAvailable => "no_photo_available",
            Self::Failed => "failed",
        }
    }

    pub fn rotated(&self) -> bool {
        matches!(self, Self::Rotated { .. })
    }

    /// The photo featured after this run, if known.
    pub fn photo(&self) -> Option<PhotoUuid> {
        match self {
            Self::Rotated { photo, .. } | Self::AlreadyCurrent { photo } => Some(*photo),
            Self::NoPhotoAvailable | Self::Failed => None,
        }
    }
}

/// A photo scheduled for a given day.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledPhoto {
    pub date: Date,
    pub photo: Photo,
}

#[automock]
#[async_trait]
pub trait RotationService: Send + Sync {
    /// Bring the featured photo pointer in line with the selection for `today`.
    ///
    /// Never fails: storage errors are logged and reported as
    /// [`RotationOutcome::Failed`].
    async fn reconcile(&self, today: Date) -> RotationOutcome;

    /// Whether [`RotationService::reconcile`] would write for `today`.
    async fn needs_rotation_today(&self, today: Date) -> Result<bool, RotationServiceError>;

    /// The photo selected for `today`, computed from the current pool.
    async fn todays_photo(&self, today: Date) -> Result<Option<Photo>, RotationServiceError>;

    /// Selections for `days` consecutive days starting at `today`.
    async fn upcoming_photos(
        &self,
        today: Date,
        days: u32,
    ) -> Result<Vec<ScheduledPhoto>, RotationServiceError>;
}

/// Rotation over the photo catalog and the settings pointer.
#[derive(Clone)]
pub struct DailyRotationService {
    photos: Arc<dyn PhotosRepository>,
    settings: Arc<dyn SettingsRepository>,
}

impl DailyRotationService {
    #[must_use]
    pub fn new(photos: Arc<dyn PhotosRepository>, settings: Arc<dyn SettingsRepository>) -> Self {
        Self { photos, settings }
    }

    async fn try_reconcile(&self, today: Date) -> Result<RotationOutcome, RotationServiceError> {
        let pool = self.photos.find_active_photos().await?;

        let Some(todays) = select_todays_photo(&pool, today) else {
            warn!(%today, "no active photos to feature");

            return Ok(RotationOutcome::NoPhotoAvailable);
        };

        let persisted = self.settings.featured_photo().await?;

        if !needs_rotation(persisted, Some(todays)) {
            return Ok(RotationOutcome::AlreadyCurrent { photo: todays.uuid });
        }

        self.settings.set_featured_photo(todays.uuid).await?;

        info!(
            %today,
            photo_uuid = %todays.uuid,
            slug = %todays.slug,
            "featured photo rotated"
        );

        Ok(RotationOutcome::Rotated {
            photo: todays.uuid,
            slug: todays.slug.clone(),
        })
    }
}

impl std::fmt::Debug for DailyRotationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DailyRotationService").finish_non_exhaustive()
    }
}

#[async_trait]
impl RotationService for DailyRotationService {
    async fn reconcile(&self, today: Date) -> RotationOutcome {
        match self.try_reconcile(today).await {
            Ok(outcome) => outcome,
            Err(error) => {
                error!(%today, error = ?error, "rotation failed; featured photo unchanged");

                RotationOutcome::Failed
            }
        }
    }

    async fn needs_rotation_today(&self, today: Date) -> Result<bool, RotationServiceError> {
        let pool = self.photos.find_active_photos().await?;
        let persisted = self.settings.featured_photo().await?;

        Ok(needs_rotation(persisted, select_todays_photo(&pool, today)))
    }

    async fn todays_photo(&self, today: Date) -> Result<Option<Photo>, RotationServiceError> {
        let pool = self.photos.find_active_photos().await?;

        Ok(select_todays_photo(&pool, today).cloned())
    }

    async fn upcoming_photos(
        &self,
        today: Date,
        days: u32,
    ) -> Result<Vec<ScheduledPhoto>, RotationServiceError> {
        let pool = self.photos.find_active_photos().await?;

        Ok(preview_upcoming(&pool, today, days)
            .map(|(date, photo)| ScheduledPhoto {
                date,
                photo: photo.clone(),
            })
            .collect())
    }
}
