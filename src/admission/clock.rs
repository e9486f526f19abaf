//! Time sources for window arithmetic.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Source of "now" for the admission pipeline and the sweeper.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Monotonic process clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-driven clock. Starts at the instant it was created and only moves
/// when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// The instant this clock reads as `t=0`.
    pub fn origin(&self) -> Instant {
        self.origin
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().expect("manual clock mutex poisoned");
        *offset += by;
    }

    /// Set the clock to `origin + offset`. May move backwards.
    pub fn set(&self, offset: Duration) {
        *self.offset.lock().expect("manual clock mutex poisoned") = offset;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock().expect("manual clock mutex poisoned")
    }
}
