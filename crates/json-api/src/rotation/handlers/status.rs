//! Rotation Status Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State};

/// Rotation Status Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RotationStatusResponse {
    /// Whether the persisted featured photo differs from today's selection
    pub needs_rotation: bool,

    pub message: String,
}

/// Rotation Status Handler
///
/// Reports whether a rotation would change anything, without writing.
#[endpoint(
    tags("rotation"),
    summary = "Check rotation status",
    responses(
        (status_code = 200, description = "Status computed"),
        (status_code = 500, description = "Status could not be computed"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<RotationStatusResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let needs_rotation = state
        .app
        .rotation
        .needs_rotation_today(state.app.calendar.today())
        .await
        .or_500("failed to check rotation status")?;

    let message = if needs_rotation {
        "Photo needs rotation"
    } else {
        "Photo is current"
    };

    Ok(Json(RotationStatusResponse {
        needs_rotation,
        message: message.to_string(),
    }))
}
