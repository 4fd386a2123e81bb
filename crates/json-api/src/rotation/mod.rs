//! Featured Photo Rotation

mod handlers;
pub(crate) mod scheduler;

pub(crate) use handlers::*;

use timeart_app::{
    calendar::RotationCalendar,
    domain::rotation::{RotationOutcome, RotationService},
};

use crate::observability;

/// Reconcile the featured photo for today and count the outcome.
pub(crate) async fn rotate_now(
    rotation: &dyn RotationService,
    calendar: &RotationCalendar,
) -> RotationOutcome {
    let outcome = rotation.reconcile(calendar.today()).await;

    observability::record_rotation(outcome.label());

    outcome
}
