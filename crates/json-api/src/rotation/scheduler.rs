//! Background rotation scheduler.

use std::{sync::Arc, time::Duration};

use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

use timeart_app::{
    calendar::RotationCalendar,
    domain::rotation::{RotationOutcome, RotationService},
};

use crate::rotation::rotate_now;

/// Reconcile immediately, then once per `period`, until the task is dropped.
#[expect(
    clippy::infinite_loop,
    reason = "the task is aborted when the server shuts down"
)]
pub(crate) async fn run(
    rotation: Arc<dyn RotationService>,
    calendar: RotationCalendar,
    period: Duration,
) {
    info!(period_seconds = period.as_secs(), "rotation scheduler started");

    let mut ticks = interval(period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticks.tick().await;

        match rotate_now(rotation.as_ref(), &calendar).await {
            RotationOutcome::Failed => warn!("scheduled rotation failed; retrying next tick"),
            outcome => info!(outcome = outcome.label(), "scheduled rotation finished"),
        }
    }
}
