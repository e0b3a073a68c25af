//! # sunswitch-adapter-solar-sunrise
//!
//! [`SolarClock`] implementation backed by the
//! [`sunrise`](https://docs.rs/sunrise) crate.
//!
//! The crate always returns an instant, even on dates where the sun never
//! rises or sets at the requested latitude. Such results land far away from
//! the requested date, so every instant is checked against the date before
//! it is handed to the domain; implausible ones become
//! [`SolarComputationError::NoEvent`].
//!
//! ## Dependency rule
//! Depends on `sunswitch-domain` only.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use sunswitch_domain::error::SolarComputationError;
use sunswitch_domain::solar::{Coordinates, SolarClock, SolarEvent};

/// Furthest a real sunrise/sunset can be from noon UTC on its date
/// (longitude shifts solar noon by up to 12 hours, day length adds up to 12 more).
const MAX_DISTANCE_FROM_NOON: TimeDelta = TimeDelta::hours(36);

/// Astronomical sunrise/sunset using the `sunrise` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SunriseSolarClock;

impl SolarClock for SunriseSolarClock {
    fn event_time(
        &self,
        event: SolarEvent,
        date: NaiveDate,
        coordinates: Coordinates,
    ) -> Result<DateTime<Utc>, SolarComputationError> {
        let coord = sunrise::Coordinates::new(coordinates.latitude, coordinates.longitude)
            .ok_or(SolarComputationError::InvalidCoordinates {
                latitude: coordinates.latitude,
                longitude: coordinates.longitude,
            })?;
        let solar_day = sunrise::SolarDay::new(coord, date);
        let instant = match event {
            SolarEvent::Sunrise => solar_day.event_time(sunrise::SolarEvent::Sunrise),
            SolarEvent::Sunset => solar_day.event_time(sunrise::SolarEvent::Sunset),
        };
        check_plausible(event, date, coordinates, instant)
    }
}

fn check_plausible(
    event: SolarEvent,
    date: NaiveDate,
    coordinates: Coordinates,
    instant: DateTime<Utc>,
) -> Result<DateTime<Utc>, SolarComputationError> {
    let noon = date.and_time(NaiveTime::MIN).and_utc() + TimeDelta::hours(12);
    if (instant - noon).abs() > MAX_DISTANCE_FROM_NOON {
        tracing::debug!(%event, %date, %instant, "implausible solar event, treating as absent");
        return Err(SolarComputationError::NoEvent {
            event,
            date,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        });
    }
    Ok(instant)
}
