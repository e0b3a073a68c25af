//! Timer rule — a daily on-window bounded by two triggers.

use chrono::{DateTime, TimeZone};

use crate::error::SolarComputationError;
use crate::solar::{SolarClock, SolarSite};
use crate::time::seconds_since_midnight;
use crate::trigger::Trigger;

/// Weight a rule contributes when none is configured.
pub const DEFAULT_WEIGHT: i32 = 1;

/// A daily window `[on, off)` during which the rule wants its switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRule {
    pub on: Trigger,
    pub off: Trigger,
    /// Windows shorter than this many seconds are suppressed entirely.
    pub minimum_duration_seconds: Option<i64>,
    /// Contribution to the signed accumulator while the rule is active.
    pub weight: i32,
}

impl TimerRule {
    /// A rule with no minimum duration and the default weight.
    #[must_use]
    pub const fn new(on: Trigger, off: Trigger) -> Self {
        Self {
            on,
            off,
            minimum_duration_seconds: None,
            weight: DEFAULT_WEIGHT,
        }
    }

    #[must_use]
    pub const fn with_minimum_duration(mut self, seconds: i64) -> Self {
        self.minimum_duration_seconds = Some(seconds);
        self
    }

    #[must_use]
    pub const fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Whether the switch should be on at `at` according to this rule alone.
    ///
    /// The minimum duration is checked against the signed gap
    /// `off - on` in seconds since midnight, without normalizing for
    /// midnight: a window whose off time resolves before its on time (for
    /// example `sunrise+2h .. sunset-2h` on a short winter day) fails any
    /// minimum and stays off all day.
    ///
    /// Otherwise the window is half-open. When `off < on` it wraps around
    /// midnight; when `on == off` it is empty.
    ///
    /// # Errors
    ///
    /// Propagates [`SolarComputationError`] from either trigger.
    pub fn is_active<Tz, S>(
        &self,
        at: &DateTime<Tz>,
        site: &SolarSite<S>,
    ) -> Result<bool, SolarComputationError>
    where
        Tz: TimeZone,
        S: SolarClock,
    {
        let on = self.on.resolve(at, site)?;
        let off = self.off.resolve(at, site)?;

        if let Some(minimum) = self.minimum_duration_seconds {
            let gap = seconds_since_midnight(off) - seconds_since_midnight(on);
            if gap < minimum {
                return Ok(false);
            }
        }

        let now = at.time();
        Ok(if on <= off {
            on <= now && now < off
        } else {
            now >= on || now < off
        })
    }
}

impl std::fmt::Display for TimerRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.on, self.off)?;
        if let Some(minimum) = self.minimum_duration_seconds {
            write!(f, " min {minimum}s")?;
        }
        if self.weight != DEFAULT_WEIGHT {
            write!(f, " weight {:+}", self.weight)?;
        }
        Ok(())
    }
}
