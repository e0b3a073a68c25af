//! Timer identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a timer attached to a switch.
///
/// Allocated by the scheduler from a single monotonically increasing
/// counter shared by all switches; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(u64);

impl TimerId {
    /// Wrap a raw counter value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Access the raw counter value.
    #[must_use]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TimerId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Hands out [`TimerId`]s in increasing order, starting at 1.
#[derive(Debug)]
pub struct TimerIdAllocator {
    next: u64,
}

impl Default for TimerIdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl TimerIdAllocator {
    /// Return the next identifier.
    pub fn allocate(&mut self) -> TimerId {
        let id = TimerId(self.next);
        self.next += 1;
        id
    }
}
