//! Upcoming Photos Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use timeart_app::domain::rotation::ScheduledPhoto;

use crate::{extensions::*, photos::PhotoResponse, state::State};

const DEFAULT_DAYS: u32 = 7;
const MAX_DAYS: u32 = 60;

/// A day in the rotation schedule.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ScheduledPhotoResponse {
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,

    pub photo: PhotoResponse,
}

impl From<ScheduledPhoto> for ScheduledPhotoResponse {
    fn from(scheduled: ScheduledPhoto) -> Self {
        Self {
            date: scheduled.date.to_string(),
            photo: scheduled.photo.into(),
        }
    }
}

/// Upcoming Photos Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpcomingPhotosResponse {
    pub schedule: Vec<ScheduledPhotoResponse>,
}

/// Upcoming Photos Handler
///
/// Previews which photo will be featured on each of the next `days` days, starting
/// today. Empty when there are no active photos.
#[endpoint(
    tags("rotation"),
    summary = "Preview upcoming featured photos",
    responses(
        (status_code = 200, description = "Schedule computed"),
        (status_code = 400, description = "days is out of range"),
        (status_code = 500, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    days: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<UpcomingPhotosResponse>, StatusError> {
    let days = days.into_inner().unwrap_or(DEFAULT_DAYS);

    if !(1..=MAX_DAYS).contains(&days) {
        return Err(
            StatusError::bad_request().brief(format!("days must be between 1 and {MAX_DAYS}"))
        );
    }

    let state = depot.obtain_or_500::<Arc<State>>()?;

    let schedule = state
        .app
        .rotation
        .upcoming_photos(state.app.calendar.today(), days)
        .await
        .or_500("failed to preview upcoming photos")?;

    Ok(Json(UpcomingPhotosResponse {
        schedule: schedule.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use jiff::civil::Date;
    use mockall::predicate::{always, eq};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use timeart_app::domain::rotation::MockRotationService;

    use crate::{photos::models::fixtures::make_photo, test_helpers::rotation_service};

    use super::*;

    fn make_service(rotation: MockRotationService) -> Service {
        rotation_service(
            rotation,
            Router::with_path("rotate/upcoming").get(handler),
        )
    }

    #[tokio::test]
    async fn test_defaults_to_a_week() -> TestResult {
        let mut rotation = MockRotationService::new();
        rotation
            .expect_upcoming_photos()
            .with(always(), eq(DEFAULT_DAYS))
            .once()
            .returning(|_, _| Ok(Vec::new()));

        let body: UpcomingPhotosResponse = TestClient::get("http://example.com/rotate/upcoming")
            .send(&make_service(rotation))
            .await
            .take_json()
            .await?;

        assert!(body.schedule.is_empty(), "expected an empty schedule");

        Ok(())
    }

    #[tokio::test]
    async fn test_schedule_lists_dates_and_photos() -> TestResult {
        let mut rotation = MockRotationService::new();
        rotation
            .expect_upcoming_photos()
            .with(always(), eq(2))
            .once()
            .returning(|_, _| {
                Ok(vec![
                    ScheduledPhoto {
                        date: Date::constant(2026, 10, 19),
                        photo: make_photo("harbour"),
                    },
                    ScheduledPhoto {
                        date: Date::constant(2026, 10, 20),
                        photo: make_photo("dunes"),
                    },
                ])
            });

        let body: UpcomingPhotosResponse =
            TestClient::get("http://example.com/rotate/upcoming?days=2")
                .send(&make_service(rotation))
                .await
                .take_json()
                .await?;

        let days: Vec<(&str, &str)> = body
            .schedule
            .iter()
            .map(|day| (day.date.as_str(), day.photo.slug.as_str()))
            .collect();

        assert_eq!(days, [("2026-10-19", "harbour"), ("2026-10-20", "dunes")]);

        Ok(())
    }

    #[tokio::test]
    async fn test_out_of_range_days_returns_400() {
        for days in ["0", "61"] {
            let res = TestClient::get(format!("http://example.com/rotate/upcoming?days={days}"))
                .send(&make_service(MockRotationService::new()))
                .await;

            assert_eq!(
                res.status_code,
                Some(StatusCode::BAD_REQUEST),
                "days={days} should be rejected"
            );
        }
    }
}
