//! Frame timing and recovery counters.
//!
//! Every condition the renderer recovers from locally (skipped rows, font or
//! icon fallbacks) is counted here, next to the frame timing statistics.
//! Nothing in this module affects what is drawn.

use core::fmt::Write;
use std::time::{Duration, Instant};

use heapless::String;

/// Frame timing and render statistics.
#[derive(Clone, Debug)]
pub struct RenderMetrics {
    // Frame timing (microseconds)
    pub frame_time_us: u32,
    pub render_time_us: u32,
    pub sleep_time_us: u32,

    // Statistics
    pub frame_time_min_us: u32,
    pub frame_time_max_us: u32,
    frame_time_avg_us: f32,

    // Counters
    pub total_frames: u64,
    pub rows_drawn: usize,
    pub rows_skipped: u64,
    pub disruptions_skipped: u64,
    pub font_fallbacks: u32,
    pub icon_fallbacks: u32,
    pub labels_created: u64,
    pub labels_evicted: u64,
    pub labels_live: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_entries: usize,

    // Uptime tracking
    start_time: Instant,
}

impl RenderMetrics {
    const EMA_ALPHA: f32 = 0.1;

    /// Create new render metrics.
    pub fn new() -> Self {
        Self {
            frame_time_us: 0,
            render_time_us: 0,
            sleep_time_us: 0,
            frame_time_min_us: u32::MAX,
            frame_time_max_us: 0,
            frame_time_avg_us: 0.0,
            total_frames: 0,
            rows_drawn: 0,
            rows_skipped: 0,
            disruptions_skipped: 0,
            font_fallbacks: 0,
            icon_fallbacks: 0,
            labels_created: 0,
            labels_evicted: 0,
            labels_live: 0,
            cache_hits: 0,
            cache_misses: 0,
            cache_entries: 0,
            start_time: Instant::now(),
        }
    }

    /// Record frame timing for this frame.
    pub fn record_frame(
        &mut self,
        total_time: Duration,
        render_time: Duration,
        sleep_time: Duration,
    ) {
        let total_us = total_time.as_micros() as u32;
        self.frame_time_us = total_us;
        self.render_time_us = render_time.as_micros() as u32;
        self.sleep_time_us = sleep_time.as_micros() as u32;

        self.frame_time_min_us = self.frame_time_min_us.min(total_us);
        self.frame_time_max_us = self.frame_time_max_us.max(total_us);

        if self.total_frames == 0 {
            self.frame_time_avg_us = total_us as f32;
        } else {
            self.frame_time_avg_us =
                Self::EMA_ALPHA.mul_add(total_us as f32, (1.0 - Self::EMA_ALPHA) * self.frame_time_avg_us);
        }

        self.total_frames += 1;
    }

    /// Get average frame time in microseconds.
    #[inline]
    pub const fn frame_time_avg_us(&self) -> u32 { self.frame_time_avg_us as u32 }

    /// Get uptime since metrics were created.
    #[inline]
    pub fn uptime(&self) -> Duration { self.start_time.elapsed() }

    /// Format uptime as HH:MM:SS string.
    pub fn uptime_string(&self) -> String<12> { format_hms(self.uptime()) }

    /// Total recovered conditions so far.
    pub const fn recovered_total(&self) -> u64 {
        self.rows_skipped + self.disruptions_skipped + self.font_fallbacks as u64 + self.icon_fallbacks as u64
    }
}

impl Default for RenderMetrics {
    fn default() -> Self { Self::new() }
}

/// Format a duration as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_hms(duration: Duration) -> String<12> {
    let secs = duration.as_secs();
    let mut s = String::new();
    write!(s, "{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60).ok();
    s
}
