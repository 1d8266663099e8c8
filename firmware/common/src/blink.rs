//! Shared blink phase.
//!
//! One [`BlinkClock`] is owned by the frame controller. It is written once
//! per tick and read by every widget that blinks, so all of them switch
//! on the same frame.

use std::time::{Duration, Instant};

use crate::config::BLINK_INTERVAL;

/// Boolean phase toggled on a fixed wall-clock interval.
#[derive(Clone, Copy, Debug)]
pub struct BlinkClock {
    phase: bool,
    last_toggle: Instant,
    interval: Duration,
}

impl BlinkClock {
    /// Create a clock in the "on" phase with the default [`BLINK_INTERVAL`].
    pub const fn new(now: Instant) -> Self { Self::with_interval(now, BLINK_INTERVAL) }

    /// Create a clock with a custom toggle interval.
    pub const fn with_interval(
        now: Instant,
        interval: Duration,
    ) -> Self {
        Self {
            phase: true,
            last_toggle: now,
            interval,
        }
    }

    /// Toggle the phase if at least one interval has elapsed. Returns true on toggle.
    ///
    /// Toggles at most once per call, so a stalled frame does not skip phases.
    pub fn tick(
        &mut self,
        now: Instant,
    ) -> bool {
        if now.saturating_duration_since(self.last_toggle) >= self.interval {
            self.phase = !self.phase;
            self.last_toggle = now;
            true
        } else {
            false
        }
    }

    /// Current phase. `true` is the highlighted ("on") phase.
    #[inline]
    pub const fn phase(&self) -> bool { self.phase }
}
