//! Host time adapter.
//!
//! Monotonic milliseconds since the clock was created, backed by
//! `std::time::Instant`.  The controller only ever sees the `u64`.

use std::time::Instant;

pub struct HostClock {
    start: Instant,
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Milliseconds since start (monotonic).
    pub fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
