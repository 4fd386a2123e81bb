//! Integration tests for daily photo rotation

use jiff::civil::Date;
use testresult::TestResult;

use timeart::{
    photos::{Photo, PhotoUuid},
    rotation::{epoch_day, needs_rotation, preview_upcoming, select_todays_photo},
};

fn photo(slug: &str) -> Photo {
    Photo {
        uuid: PhotoUuid::new(),
        slug: slug.to_string(),
        title: slug.to_uppercase(),
        description: None,
        image_url: None,
        price_digital: None,
        price_print: None,
        is_active: true,
        artist: None,
        license_type: None,
        dimensions: None,
    }
}

fn pool() -> [Photo; 3] {
    [photo("a"), photo("b"), photo("c")]
}

#[test]
fn selection_is_deterministic_for_a_given_day() {
    let pool = pool();
    let day_ten = Date::constant(1970, 1, 11);

    for _ in 0..5 {
        let selected = select_todays_photo(&pool, day_ten);

        assert_eq!(selected.map(|p| p.slug.as_str()), Some("b"));
    }
}

#[test]
fn empty_pool_selects_nothing() {
    assert!(select_todays_photo(&[], Date::constant(2026, 10, 19)).is_none());
    assert!(needs_rotation(None, None));
}

#[test]
fn week_preview_cycles_through_the_pool() -> TestResult {
    let pool = pool();
    let today = Date::constant(2026, 10, 19);

    let start = usize::try_from(epoch_day(today).rem_euclid(3))?;

    let slugs: Vec<&str> = preview_upcoming(&pool, today, 7)
        .map(|(_, photo)| photo.slug.as_str())
        .collect();

    let expected: Vec<&str> = (0..7)
        .map(|offset| ["a", "b", "c"][(start + offset) % 3])
        .collect();

    assert_eq!(slugs, expected);

    for slug in ["a", "b", "c"] {
        assert!(
            slugs.iter().filter(|s| **s == slug).count() >= 2,
            "{slug} should be featured at least twice in a week"
        );
    }

    Ok(())
}

#[test]
fn preview_dates_are_consecutive_and_match_daily_selection() {
    let pool = pool();
    let today = Date::constant(2026, 12, 30);

    let preview: Vec<(Date, &Photo)> = preview_upcoming(&pool, today, 4).collect();

    let dates: Vec<Date> = preview.iter().map(|(date, _)| *date).collect();

    assert_eq!(
        dates,
        [
            Date::constant(2026, 12, 30),
            Date::constant(2026, 12, 31),
            Date::constant(2027, 1, 1),
            Date::constant(2027, 1, 2),
        ]
    );

    for (date, photo) in preview {
        assert_eq!(
            select_todays_photo(&pool, date).map(|p| p.uuid),
            Some(photo.uuid)
        );
    }
}

#[test]
fn preview_can_be_restarted_by_cloning() {
    let pool = pool();

    let mut upcoming = preview_upcoming(&pool, Date::constant(2026, 10, 19), 3);
    let restart = upcoming.clone();

    upcoming.next();

    assert_eq!(upcoming.count(), 2);
    assert_eq!(restart.count(), 3);
}

#[test]
fn pointer_matching_todays_photo_needs_no_rotation() {
    let pool = pool();
    let today = Date::constant(2026, 10, 19);

    let todays = select_todays_photo(&pool, today);
    let persisted = todays.map(|photo| photo.uuid);

    assert!(!needs_rotation(persisted, todays));
}
