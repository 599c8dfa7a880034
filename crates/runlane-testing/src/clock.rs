use std::sync::atomic::{AtomicI64, Ordering};

use runlane_analytics::Clock;

/// Clock pinned to one instant; every reading returns the same value.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn millis_since_epoch(&self) -> i64 {
        self.0
    }
}

/// Clock that advances by `step` on every reading.
///
/// Useful for asserting that each record captures its own timestamp rather
/// than reusing a session-level one.
pub struct SteppingClock {
    next: AtomicI64,
    step: i64,
}

impl SteppingClock {
    pub fn new(start: i64, step: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn millis_since_epoch(&self) -> i64 {
        self.next.fetch_add(self.step, Ordering::Relaxed)
    }
}
