//! Shared doubles for domain unit tests.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

/// Clock frozen at a fixed instant.
pub(crate) struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl FixtureClock {
    pub(crate) fn new(utc_now: DateTime<Utc>) -> Self {
        Self { utc_now }
    }

    /// 2025-03-01 at the given hour, UTC.
    pub(crate) fn at_hour(hour: u32) -> Self {
        let utc_now = Utc
            .with_ymd_and_hms(2025, 3, 1, hour, 0, 0)
            .single()
            .expect("valid fixture timestamp");
        Self::new(utc_now)
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}
