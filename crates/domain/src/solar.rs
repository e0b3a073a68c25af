//! Solar clock — sunrise and sunset for a date and a location.
//!
//! The astronomy itself lives behind [`SolarClock`]; the domain only needs
//! "when does the sun rise/set on this date at these coordinates".

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SolarComputationError;

/// Geographic position used for solar computations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        Self::new(51.0, -1.6)
    }
}

/// Which solar event to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolarEvent {
    Sunrise,
    Sunset,
}

impl std::fmt::Display for SolarEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sunrise => f.write_str("sunrise"),
            Self::Sunset => f.write_str("sunset"),
        }
    }
}

/// Computes sunrise/sunset instants.
///
/// Implementations must be pure functions of `(event, date, coordinates)`.
pub trait SolarClock {
    /// UTC instant of `event` on `date` at `coordinates`.
    ///
    /// # Errors
    ///
    /// Returns [`SolarComputationError`] when the event does not happen on
    /// that date (polar day/night) or the coordinates are invalid.
    fn event_time(
        &self,
        event: SolarEvent,
        date: NaiveDate,
        coordinates: Coordinates,
    ) -> Result<DateTime<Utc>, SolarComputationError>;

    /// Sunrise on `date`.
    ///
    /// # Errors
    ///
    /// See [`SolarClock::event_time`].
    fn sunrise(
        &self,
        date: NaiveDate,
        coordinates: Coordinates,
    ) -> Result<DateTime<Utc>, SolarComputationError> {
        self.event_time(SolarEvent::Sunrise, date, coordinates)
    }

    /// Sunset on `date`.
    ///
    /// # Errors
    ///
    /// See [`SolarClock::event_time`].
    fn sunset(
        &self,
        date: NaiveDate,
        coordinates: Coordinates,
    ) -> Result<DateTime<Utc>, SolarComputationError> {
        self.event_time(SolarEvent::Sunset, date, coordinates)
    }
}

impl<T: SolarClock + ?Sized> SolarClock for &T {
    fn event_time(
        &self,
        event: SolarEvent,
        date: NaiveDate,
        coordinates: Coordinates,
    ) -> Result<DateTime<Utc>, SolarComputationError> {
        (**self).event_time(event, date, coordinates)
    }
}

impl<T: SolarClock + ?Sized> SolarClock for std::sync::Arc<T> {
    fn event_time(
        &self,
        event: SolarEvent,
        date: NaiveDate,
        coordinates: Coordinates,
    ) -> Result<DateTime<Utc>, SolarComputationError> {
        (**self).event_time(event, date, coordinates)
    }
}

/// A [`SolarClock`] pinned to one location.
#[derive(Debug, Clone)]
pub struct SolarSite<S> {
    pub clock: S,
    pub coordinates: Coordinates,
}

impl<S: SolarClock> SolarSite<S> {
    #[must_use]
    pub fn new(clock: S, coordinates: Coordinates) -> Self {
        Self { clock, coordinates }
    }

    /// UTC instant of `event` on `date` at this site.
    ///
    /// # Errors
    ///
    /// See [`SolarClock::event_time`].
    pub fn event_time(
        &self,
        event: SolarEvent,
        date: NaiveDate,
    ) -> Result<DateTime<Utc>, SolarComputationError> {
        self.clock.event_time(event, date, self.coordinates)
    }
}

/// A [`SolarClock`] that reports the same UTC sunrise and sunset time on
/// every date, wherever you are. Used for tests and dry runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSolarClock {
    pub sunrise: NaiveTime,
    pub sunset: NaiveTime,
}

impl FixedSolarClock {
    #[must_use]
    pub const fn new(sunrise: NaiveTime, sunset: NaiveTime) -> Self {
        Self { sunrise, sunset }
    }
}

impl SolarClock for FixedSolarClock {
    fn event_time(
        &self,
        event: SolarEvent,
        date: NaiveDate,
        _coordinates: Coordinates,
    ) -> Result<DateTime<Utc>, SolarComputationError> {
        let time = match event {
            SolarEvent::Sunrise => self.sunrise,
            SolarEvent::Sunset => self.sunset,
        };
        Ok(date.and_time(time).and_utc())
    }
}
