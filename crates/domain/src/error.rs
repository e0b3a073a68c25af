//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`SunswitchError`] via `#[from]` at the port boundary.

use crate::id::TimerId;

/// Top-level domain error.
#[derive(Debug, thiserror::Error)]
pub enum SunswitchError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("solar computation failed")]
    Solar(#[from] SolarComputationError),
}

/// Rejected input — raised before any state is mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid mode {value:?}, expected one of manual, on, off, auto")]
    InvalidMode { value: String },

    #[error("invalid timer spec: {reason}")]
    InvalidTimerSpec { reason: String },

    #[error("switch {name:?} already exists")]
    DuplicateSwitch { name: String },
}

impl ValidationError {
    pub(crate) fn timer_spec(reason: impl Into<String>) -> Self {
        Self::InvalidTimerSpec {
            reason: reason.into(),
        }
    }
}

/// A switch or timer lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundError {
    #[error("switch {0:?} not found")]
    Switch(String),

    #[error("timer {0} not found")]
    Timer(TimerId),
}

/// The solar clock could not produce a sunrise or sunset.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolarComputationError {
    #[error("invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// Polar day or polar night: the event does not happen on `date`.
    #[error("no {event} on {date} at ({latitude}, {longitude})")]
    NoEvent {
        event: crate::solar::SolarEvent,
        date: chrono::NaiveDate,
        latitude: f64,
        longitude: f64,
    },
}

/// The outbound device call failed.
///
/// Returned by the device port only. The scheduler logs it and moves on, so
/// it is never part of [`SunswitchError`].
#[derive(Debug, thiserror::Error)]
#[error("failed to set switch {switch:?} to {value}")]
pub struct DispatchError {
    pub switch: String,
    pub value: i64,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}
