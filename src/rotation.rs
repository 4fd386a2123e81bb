//! Daily Rotation
//!
//! The featured photo is a pure function of the active pool (in order) and the calendar
//! date, so what will be shown on any day can be computed ahead of time and any number of
//! callers agree on it without coordination.

use std::iter::FusedIterator;

use jiff::{Span, civil::Date};

use crate::photos::{Photo, PhotoUuid};

const UNIX_EPOCH_DATE: Date = Date::constant(1970, 1, 1);

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days between 1970-01-01 and `date`; negative before the epoch.
pub fn epoch_day(date: Date) -> i64 {
    date.duration_since(UNIX_EPOCH_DATE)
        .as_secs()
        .div_euclid(SECONDS_PER_DAY)
}

/// Pick the photo featured on `today`.
///
/// `today` is the calendar date in the storefront's time zone. Returns `None` for an
/// empty pool. Changes to pool membership shift the cycle; continuity across them is not
/// preserved.
pub fn select_todays_photo(pool: &[Photo], today: Date) -> Option<&Photo> {
    let len = i64::try_from(pool.len()).ok().filter(|len| *len > 0)?;
    let index = usize::try_from(epoch_day(today).rem_euclid(len)).ok()?;

    pool.get(index)
}

/// Lazily preview the selections for `days` consecutive days starting at `today`.
pub fn preview_upcoming(pool: &[Photo], today: Date, days: u32) -> UpcomingPhotos<'_> {
    UpcomingPhotos {
        pool,
        start: today,
        offset: 0,
        days,
    }
}

/// Whether the persisted pointer must be rewritten to match today's selection.
///
/// Missing data on either side counts as stale so an uninitialised or dangling pointer
/// heals on the next run.
pub fn needs_rotation(persisted: Option<PhotoUuid>, todays: Option<&Photo>) -> bool {
    match (persisted, todays) {
        (Some(persisted), Some(todays)) => persisted != todays.uuid,
        _ => true,
    }
}

/// Iterator returned by [`preview_upcoming`].
///
/// Cloning yields an independent iterator from the same position.
#[derive(Debug, Clone)]
pub struct UpcomingPhotos<'a> {
    pool: &'a [Photo],
    start: Date,
    offset: u32,
    days: u32,
}

impl<'a> Iterator for UpcomingPhotos<'a> {
    type Item = (Date, &'a Photo);

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.days || self.pool.is_empty() {
            return None;
        }

        let date = self
            .start
            .checked_add(Span::new().days(i64::from(self.offset)))
            .ok()?;

        self.offset += 1;

        select_todays_photo(self.pool, date).map(|photo| (date, photo))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.pool.is_empty() {
            return (0, Some(0));
        }

        let remaining = usize::try_from(self.days.saturating_sub(self.offset)).unwrap_or(0);

        (0, Some(remaining))
    }
}

impl FusedIterator for UpcomingPhotos<'_> {}
