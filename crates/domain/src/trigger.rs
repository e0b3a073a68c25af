//! Trigger — a point in the day at which a timer switches on or off.

use chrono::{DateTime, NaiveTime, TimeDelta, TimeZone};

use crate::error::SolarComputationError;
use crate::solar::{SolarClock, SolarEvent, SolarSite};
use crate::time::format_time_of_day;

/// Resolves to a local time-of-day for the calendar day of a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A fixed local time, the same every day.
    Daily { time_of_day: NaiveTime },
    /// Sunrise, shifted by a signed number of seconds.
    SunriseRelative { offset_seconds: i32 },
    /// Sunset, shifted by a signed number of seconds.
    SunsetRelative { offset_seconds: i32 },
}

impl Trigger {
    /// Resolve the local time-of-day this trigger stands for on `at`'s date.
    ///
    /// Sun-relative triggers are recomputed on every call. The offset is
    /// applied to the UTC instant and only the resulting local time-of-day
    /// is kept: an offset that pushes the instant into the previous or next
    /// day wraps around within the day.
    ///
    /// # Errors
    ///
    /// Propagates [`SolarComputationError`] from the solar clock.
    pub fn resolve<Tz, S>(
        &self,
        at: &DateTime<Tz>,
        site: &SolarSite<S>,
    ) -> Result<NaiveTime, SolarComputationError>
    where
        Tz: TimeZone,
        S: SolarClock,
    {
        let (event, offset_seconds) = match *self {
            Self::Daily { time_of_day } => return Ok(time_of_day),
            Self::SunriseRelative { offset_seconds } => (SolarEvent::Sunrise, offset_seconds),
            Self::SunsetRelative { offset_seconds } => (SolarEvent::Sunset, offset_seconds),
        };
        let instant = site.event_time(event, at.date_naive())?
            + TimeDelta::seconds(i64::from(offset_seconds));
        Ok(instant.with_timezone(&at.timezone()).time())
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily { time_of_day } => write!(f, "daily({})", format_time_of_day(*time_of_day)),
            Self::SunriseRelative { offset_seconds } => write!(f, "sunrise({offset_seconds:+}s)"),
            Self::SunsetRelative { offset_seconds } => write!(f, "sunset({offset_seconds:+}s)"),
        }
    }
}
