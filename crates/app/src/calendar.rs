//! Rotation Calendar

use jiff::{Timestamp, civil::Date, tz::TimeZone};

/// Resolves "today" in the storefront's time zone.
///
/// The featured photo changes at local midnight of this zone, so every caller must agree
/// on it.
#[derive(Debug, Clone)]
pub struct RotationCalendar {
    time_zone: TimeZone,
}

impl RotationCalendar {
    #[must_use]
    pub fn new(time_zone: TimeZone) -> Self {
        Self { time_zone }
    }

    /// Look up a calendar by IANA zone name, e.g. `"Europe/London"`.
    ///
    /// # Errors
    ///
    /// Returns an error when the zone is not in the time zone database.
    pub fn from_zone_name(name: &str) -> Result<Self, jiff::Error> {
        TimeZone::get(name).map(Self::new)
    }

    /// The calendar date of `instant` in this zone.
    pub fn date_at(&self, instant: Timestamp) -> Date {
        instant.to_zoned(self.time_zone.clone()).date()
    }

    /// Today's date in this zone.
    pub fn today(&self) -> Date {
        self.date_at(Timestamp::now())
    }

    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }
}

impl Default for RotationCalendar {
    fn default() -> Self {
        Self::new(TimeZone::UTC)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn date_follows_the_configured_zone() -> TestResult {
        let instant: Timestamp = "2026-10-19T23:30:00Z".parse()?;

        let utc = RotationCalendar::default();
        let tokyo = RotationCalendar::from_zone_name("Asia/Tokyo")?;

        assert_eq!(utc.date_at(instant), Date::constant(2026, 10, 19));
        assert_eq!(tokyo.date_at(instant), Date::constant(2026, 10, 20));

        Ok(())
    }

    #[test]
    fn unknown_zone_is_rejected() {
        assert!(RotationCalendar::from_zone_name("Mars/Olympus_Mons").is_err());
    }
}
