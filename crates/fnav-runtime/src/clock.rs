#![forbid(unsafe_code)]

//! Millisecond clock for host implementations.
//!
//! The navigator reads time only through
//! [`Host::now_millis`](fnav_core::Host::now_millis). Hosts without a
//! platform clock can back it with [`MonotonicClock`].

use web_time::Instant;

/// Monotonic milliseconds since construction.
///
/// ```
/// use fnav_runtime::MonotonicClock;
///
/// let clock = MonotonicClock::new();
/// let before = clock.now_millis();
/// assert!(clock.now_millis() >= before);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Start a clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds elapsed since [`MonotonicClock::new`], saturating.
    #[must_use]
    pub fn now_millis(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}
