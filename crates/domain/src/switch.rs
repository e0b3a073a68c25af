//! Switch — a named output driven by its mode and its timer rules.

use std::str::FromStr;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{SolarComputationError, ValidationError};
use crate::id::TimerId;
use crate::solar::{SolarClock, SolarSite};
use crate::timer_rule::TimerRule;

/// Default value sent to a device to switch it on.
pub const DEFAULT_ON_VALUE: i64 = 255;

/// Default value sent to a device to switch it off.
pub const DEFAULT_OFF_VALUE: i64 = 0;

/// Top-level operating state of a switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchMode {
    /// Left alone: nothing is ever dispatched.
    Manual,
    /// Forced on.
    On,
    /// Forced off.
    Off,
    /// Follows the timer rules.
    Auto,
}

impl FromStr for SwitchMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            "auto" => Ok(Self::Auto),
            other => Err(ValidationError::InvalidMode {
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for SwitchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Manual => "manual",
            Self::On => "on",
            Self::Off => "off",
            Self::Auto => "auto",
        })
    }
}

/// How the timer rules of an `auto` switch combine into one decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccumulationPolicy {
    /// On if any rule is active. Weights are ignored.
    Any,
    /// On if the weights of the active rules sum to more than zero.
    #[default]
    Weighted,
}

/// A timer rule together with its scheduler-assigned id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTimer {
    pub id: TimerId,
    pub rule: TimerRule,
}

/// Mutable per-switch record owned by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchState {
    pub name: String,
    pub mode: SwitchMode,
    pub timers: Vec<ScheduledTimer>,
    /// Value dispatched when the switch should be on.
    pub on_value: i64,
}

impl SwitchState {
    /// A switch with no timers.
    #[must_use]
    pub fn new(name: impl Into<String>, mode: SwitchMode, on_value: i64) -> Self {
        Self {
            name: name.into(),
            mode,
            timers: Vec::new(),
            on_value,
        }
    }

    /// Whether the timer rules want the switch on at `at`.
    ///
    /// An empty rule list means off under both policies.
    ///
    /// # Errors
    ///
    /// Propagates the first [`SolarComputationError`] raised by a rule.
    pub fn desired_on<Tz, S>(
        &self,
        at: &DateTime<Tz>,
        site: &SolarSite<S>,
        policy: AccumulationPolicy,
    ) -> Result<bool, SolarComputationError>
    where
        Tz: TimeZone,
        S: SolarClock,
    {
        match policy {
            AccumulationPolicy::Any => {
                for timer in &self.timers {
                    if timer.rule.is_active(at, site)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            AccumulationPolicy::Weighted => {
                let mut sum = 0_i64;
                for timer in &self.timers {
                    if timer.rule.is_active(at, site)? {
                        sum += i64::from(timer.rule.weight);
                    }
                }
                Ok(sum > 0)
            }
        }
    }

    /// The value to dispatch at `at`, or `None` in manual mode.
    ///
    /// # Errors
    ///
    /// Propagates [`SolarComputationError`] in auto mode.
    pub fn output<Tz, S>(
        &self,
        at: &DateTime<Tz>,
        site: &SolarSite<S>,
        policy: AccumulationPolicy,
        off_value: i64,
    ) -> Result<Option<i64>, SolarComputationError>
    where
        Tz: TimeZone,
        S: SolarClock,
    {
        let on = match self.mode {
            SwitchMode::Manual => return Ok(None),
            SwitchMode::On => true,
            SwitchMode::Off => false,
            SwitchMode::Auto => self.desired_on(at, site, policy)?,
        };
        Ok(Some(if on { self.on_value } else { off_value }))
    }

    /// Remove the timer with `id`, returning whether it was present.
    pub fn remove_timer(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id);
        self.timers.len() != before
    }
}
