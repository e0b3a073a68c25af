//! Time and time-of-day helpers.

use chrono::{DateTime, NaiveTime, TimeZone, Timelike, Utc};

/// UTC timestamp.
pub type Timestamp = DateTime<Utc>;

/// Format used for daily trigger times in configuration.
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S";

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Seconds elapsed since midnight for a time-of-day.
#[must_use]
pub fn seconds_since_midnight(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight())
}

/// Parse an `HH:MM:SS` time-of-day.
#[must_use]
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_OF_DAY_FORMAT).ok()
}

/// Render a time-of-day as `HH:MM:SS`.
#[must_use]
pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format(TIME_OF_DAY_FORMAT).to_string()
}

/// The instant at unix second `second`, seen in time zone `tz`.
#[must_use]
pub fn instant_at<Tz: TimeZone>(second: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    DateTime::from_timestamp(second, 0).map(|utc| utc.with_timezone(tz))
}
