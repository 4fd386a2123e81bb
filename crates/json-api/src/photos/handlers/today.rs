//! Today's Photo Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{extensions::*, photos::PhotoResponse, state::State};

/// Today's Photo Handler
///
/// Returns the photo selected for today from the active pool.
#[endpoint(
    tags("photos"),
    summary = "Get today's featured photo",
    responses(
        (status_code = 200, description = "Today's photo"),
        (status_code = 404, description = "No active photos"),
        (status_code = 500, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<PhotoResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let photo = state
        .app
        .rotation
        .todays_photo(state.app.calendar.today())
        .await
        .or_500("failed to select today's photo")?
        .ok_or_else(|| StatusError::not_found().brief("No photos are available"))?;

    Ok(Json(photo.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use timeart_app::domain::rotation::MockRotationService;

    use crate::{photos::models::fixtures::make_photo, test_helpers::rotation_service};

    use super::*;

    fn make_service(rotation: MockRotationService) -> Service {
        rotation_service(rotation, Router::with_path("photos/today").get(handler))
    }

    #[tokio::test]
    async fn test_today_returns_the_selected_photo() -> TestResult {
        let photo = make_photo("harbour");
        let uuid = photo.uuid;

        let mut rotation = MockRotationService::new();
        rotation
            .expect_todays_photo()
            .once()
            .return_once(move |_| Ok(Some(photo)));

        let body: PhotoResponse = TestClient::get("http://example.com/photos/today")
            .send(&make_service(rotation))
            .await
            .take_json()
            .await?;

        assert_eq!(body.uuid, uuid.into());
        assert_eq!(body.slug, "harbour");
        assert_eq!(body.price_digital.as_deref(), Some("25.00"));
        assert_eq!(body.license, "Personal Use");

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_pool_returns_404() {
        let mut rotation = MockRotationService::new();
        rotation
            .expect_todays_photo()
            .once()
            .returning(|_| Ok(None));

        let res = TestClient::get("http://example.com/photos/today")
            .send(&make_service(rotation))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
