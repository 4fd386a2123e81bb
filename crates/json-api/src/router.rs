//! App Router

use salvo::Router;

use crate::{checkout, healthcheck, photos, rotation, webhooks};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(
            Router::with_path("rotate")
                .get(rotation::status::handler)
                .post(rotation::reconcile::handler)
                .push(Router::with_path("upcoming").get(rotation::upcoming::handler)),
        )
        .push(Router::with_path("photos/today").get(photos::today::handler))
        .push(Router::with_path("checkout").post(checkout::create::handler))
        .push(Router::with_path("webhook").post(webhooks::receive::handler))
}
