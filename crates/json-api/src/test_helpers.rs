//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};

use timeart_app::{
    calendar::RotationCalendar,
    context::AppContext,
    domain::{
        checkout::MockCheckoutService, rotation::MockRotationService,
        webhooks::MockWebhookService,
    },
};

use crate::state::State;

fn strict_rotation_mock() -> MockRotationService {
    let mut rotation = MockRotationService::new();

    rotation.expect_reconcile().never();
    rotation.expect_needs_rotation_today().never();
    rotation.expect_todays_photo().never();
    rotation.expect_upcoming_photos().never();

    rotation
}

fn strict_checkout_mock() -> MockCheckoutService {
    let mut checkout = MockCheckoutService::new();

    checkout.expect_create_checkout().never();

    checkout
}

fn strict_webhooks_mock() -> MockWebhookService {
    let mut webhooks = MockWebhookService::new();

    webhooks.expect_handle_delivery().never();

    webhooks
}

pub(crate) fn state_with(
    rotation: MockRotationService,
    checkout: MockCheckoutService,
    webhooks: MockWebhookService,
) -> Arc<State> {
    State::from_app_context(AppContext {
        rotation: Arc::new(rotation),
        checkout: Arc::new(checkout),
        webhooks: Arc::new(webhooks),
        calendar: RotationCalendar::default(),
    })
}

fn service_with(state: Arc<State>, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(state)).push(route))
}

pub(crate) fn rotation_service(rotation: MockRotationService, route: Router) -> Service {
    service_with(
        state_with(rotation, strict_checkout_mock(), strict_webhooks_mock()),
        route,
    )
}

pub(crate) fn checkout_service(checkout: MockCheckoutService, route: Router) -> Service {
    service_with(
        state_with(strict_rotation_mock(), checkout, strict_webhooks_mock()),
        route,
    )
}

pub(crate) fn webhooks_service(webhooks: MockWebhookService, route: Router) -> Service {
    service_with(
        state_with(strict_rotation_mock(), strict_checkout_mock(), webhooks),
        route,
    )
}
