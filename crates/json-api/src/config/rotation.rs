//! Rotation Config

use std::time::Duration;

use clap::Args;

/// Featured photo rotation settings.
#[derive(Debug, Args)]
pub struct RotationConfig {
    /// IANA time zone the featured photo changes in
    #[arg(long, env = "ROTATION_TIME_ZONE", default_value = "UTC")]
    pub rotation_time_zone: String,

    /// Seconds between background reconciliations (0 disables the scheduler)
    #[arg(long, env = "ROTATION_INTERVAL_SECONDS", default_value_t = 3_600_u64)]
    pub rotation_interval_seconds: u64,
}

impl RotationConfig {
    /// The scheduler period, if background rotation is enabled.
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        (self.rotation_interval_seconds > 0)
            .then(|| Duration::from_secs(self.rotation_interval_seconds))
    }
}
