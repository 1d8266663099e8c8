//! Host-side bookkeeping for the data source.
//!
//! [`FeedState`] keeps the most recent good snapshot and decides whether the
//! source counts as live. The controller only sees the derived
//! [`FeedStatus`]; it never fetches anything itself.
//!
//! # Liveness Rules
//!
//! - A successful refresh replaces the snapshot and marks the source live.
//! - A failed refresh keeps the previous snapshot and marks it offline.
//! - Once the last success is older than [`MAX_OFFLINE_TIME`] the source is
//!   offline even without a failed refresh.

use core::fmt::Write;
use std::time::{Duration, Instant};

use heapless::String;
use tracing::{info, warn};

use crate::config::{MAX_OFFLINE_TIME, STALENESS_STEP_SECS};
use crate::snapshot::StationSnapshot;

// =============================================================================
// Wall Clock
// =============================================================================

/// Local time of day shown in the header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClockTime {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl ClockTime {
    /// Create a clock reading. Values are taken modulo 24/60/60.
    pub const fn new(
        hours: u8,
        minutes: u8,
        seconds: u8,
    ) -> Self {
        Self {
            hours: hours % 24,
            minutes: minutes % 60,
            seconds: seconds % 60,
        }
    }

    /// Format as `HH:MM:SS`.
    pub fn format(&self) -> String<8> {
        let mut s = String::new();
        write!(s, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds).ok();
        s
    }
}

// =============================================================================
// Feed Status
// =============================================================================

/// What the renderer needs to know about the data source for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeedStatus {
    /// Source reachable and data fresh. Selects the animated or offline icon.
    pub is_live: bool,
    /// Seconds since the last successful refresh.
    pub seconds_since_update: u64,
    /// Wall clock for the header.
    pub clock: ClockTime,
}

impl FeedStatus {
    /// Create a status.
    pub const fn new(
        is_live: bool,
        seconds_since_update: u64,
        clock: ClockTime,
    ) -> Self {
        Self {
            is_live,
            seconds_since_update,
            clock,
        }
    }

    /// Seconds since update rounded down to [`STALENESS_STEP_SECS`].
    pub const fn staleness_secs(&self) -> u64 { self.seconds_since_update / STALENESS_STEP_SECS * STALENESS_STEP_SECS }

    /// Staleness readout, e.g. `vor 15s`.
    pub fn staleness_label(&self) -> String<24> {
        let mut s = String::new();
        write!(s, "vor {}s", self.staleness_secs()).ok();
        s
    }
}

impl Default for FeedStatus {
    fn default() -> Self { Self::new(true, 0, ClockTime::default()) }
}

// =============================================================================
// Feed State
// =============================================================================

/// Last good snapshot plus liveness tracking.
#[derive(Debug)]
pub struct FeedState {
    stations: Vec<StationSnapshot>,
    is_live: bool,
    last_success: Instant,
    failures: u32,
}

impl FeedState {
    /// Create an empty, live feed. The clock for staleness starts at `now`.
    pub const fn new(now: Instant) -> Self {
        Self {
            stations: Vec::new(),
            is_live: true,
            last_success: now,
            failures: 0,
        }
    }

    /// Record a refresh that produced data.
    ///
    /// An empty station list counts as a failed refresh and keeps the
    /// previous snapshot.
    pub fn record_success(
        &mut self,
        stations: Vec<StationSnapshot>,
        now: Instant,
    ) {
        if stations.is_empty() {
            self.record_failure(now);
            return;
        }
        if !self.is_live {
            info!(stations = stations.len(), "data source back online");
        }
        self.stations = stations;
        self.is_live = true;
        self.last_success = now;
    }

    /// Record a refresh that failed. The previous snapshot is kept.
    pub fn record_failure(
        &mut self,
        now: Instant,
    ) {
        self.is_live = false;
        self.failures += 1;
        warn!(
            failures = self.failures,
            since_success_s = now.saturating_duration_since(self.last_success).as_secs(),
            "refresh failed, keeping previous data"
        );
    }

    /// Current snapshot (possibly stale).
    #[inline]
    pub fn stations(&self) -> &[StationSnapshot] { &self.stations }

    /// Failed refreshes so far.
    #[inline]
    pub const fn failures(&self) -> u32 { self.failures }

    /// Time since the last successful refresh.
    pub fn since_success(
        &self,
        now: Instant,
    ) -> Duration {
        now.saturating_duration_since(self.last_success)
    }

    /// True if the last refresh succeeded and is not older than [`MAX_OFFLINE_TIME`].
    pub fn is_live(
        &self,
        now: Instant,
    ) -> bool {
        self.is_live && self.since_success(now) <= MAX_OFFLINE_TIME
    }

    /// Status for the frame rendered at `now`.
    pub fn status(
        &self,
        now: Instant,
        clock: ClockTime,
    ) -> FeedStatus {
        FeedStatus::new(self.is_live(now), self.since_success(now).as_secs(), clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(name: &str) -> StationSnapshot { StationSnapshot::new(name, name, 3) }

    #[test]
    fn test_clock_format() {
        assert_eq!(ClockTime::new(7, 5, 9).format().as_str(), "07:05:09");
        assert_eq!(ClockTime::new(23, 59, 59).format().as_str(), "23:59:59");
    }

    #[test]
    fn test_staleness_rounds_down_to_five() {
        let clock = ClockTime::default();
        assert_eq!(FeedStatus::new(true, 0, clock).staleness_label().as_str(), "vor 0s");
        assert_eq!(FeedStatus::new(true, 4, clock).staleness_label().as_str(), "vor 0s");
        assert_eq!(FeedStatus::new(true, 17, clock).staleness_label().as_str(), "vor 15s");
        assert_eq!(FeedStatus::new(true, 20, clock).staleness_secs(), 20);
    }

    #[test]
    fn test_failure_keeps_previous_data() {
        let t0 = Instant::now();
        let mut feed = FeedState::new(t0);
        feed.record_success(vec![station("A")], t0);
        assert!(feed.is_live(t0));

        let t1 = t0 + Duration::from_secs(15);
        feed.record_failure(t1);
        assert!(!feed.is_live(t1));
        assert_eq!(feed.stations().len(), 1);
        assert_eq!(feed.failures(), 1);

        let t2 = t1 + Duration::from_secs(15);
        feed.record_success(vec![station("B"), station("C")], t2);
        assert!(feed.is_live(t2));
        assert_eq!(feed.stations()[0].name, "B");
    }

    #[test]
    fn test_empty_refresh_is_failure() {
        let t0 = Instant::now();
        let mut feed = FeedState::new(t0);
        feed.record_success(vec![station("A")], t0);
        feed.record_success(Vec::new(), t0 + Duration::from_secs(1));
        assert!(!feed.is_live(t0 + Duration::from_secs(1)));
        assert_eq!(feed.stations()[0].name, "A");
    }

    #[test]
    fn test_goes_offline_after_max_offline_time() {
        let t0 = Instant::now();
        let mut feed = FeedState::new(t0);
        feed.record_success(vec![station("A")], t0);

        assert!(feed.is_live(t0 + MAX_OFFLINE_TIME));
        let late = t0 + MAX_OFFLINE_TIME + Duration::from_secs(1);
        assert!(!feed.is_live(late));

        let status = feed.status(late, ClockTime::default());
        assert!(!status.is_live);
        assert_eq!(status.seconds_since_update, 121);
    }
}
