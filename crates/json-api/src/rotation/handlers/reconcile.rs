//! Rotate Featured Photo Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use timeart_app::domain::rotation::RotationOutcome;

use crate::{extensions::*, rotation::rotate_now, state::State};

/// Rotate Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RotateResponse {
    /// Whether the featured photo pointer was rewritten
    pub rotated: bool,

    /// `rotated`, `already_current`, `no_photo_available` or `failed`
    pub outcome: String,

    /// The photo featured after this run, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_uuid: Option<Uuid>,

    pub message: String,
}

impl From<RotationOutcome> for RotateResponse {
    fn from(outcome: RotationOutcome) -> Self {
        let message = match outcome {
            RotationOutcome::Rotated { .. } => "Photo rotated successfully",
            RotationOutcome::AlreadyCurrent { .. } => "Photo is already current for today",
            RotationOutcome::NoPhotoAvailable => "No active photos to feature",
            RotationOutcome::Failed => "Rotation failed; the featured photo is unchanged",
        };

        Self {
            rotated: outcome.rotated(),
            outcome: outcome.label().to_string(),
            photo_uuid: outcome.photo().map(Uuid::from),
            message: message.to_string(),
        }
    }
}

/// Rotate Featured Photo Handler
///
/// Brings the featured photo in line with today's selection. Storage failures are
/// reported in the body, never as an error status.
#[endpoint(tags("rotation"), summary = "Rotate featured photo")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<RotateResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let outcome = rotate_now(state.app.rotation.as_ref(), &state.app.calendar).await;

    Ok(Json(outcome.into()))
}
