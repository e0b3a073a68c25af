//! Clock port — the wall clock the scheduler aligns to.

use sunswitch_domain::time::{Timestamp, now};

/// Source of the current wall-clock time.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        now()
    }
}
