//! The frame loop.
//!
//! [`FrameController`] owns all display state (blink phase, scroll labels,
//! icon animation, render cache) and turns one data snapshot into one
//! presented frame per [`tick`](FrameController::tick).
//!
//! # Tick Order
//!
//! 1. Poll input. A quit stops the controller and ends the tick.
//! 2. Toggle the blink phase if its interval elapsed.
//! 3. Advance every scroll label, and the icon while the source is live.
//! 4. Lay out and paint header, station columns and legend.
//! 5. Present the frame.
//! 6. Sleep for the rest of the frame budget.
//!
//! A malformed record only drops its own row in step 4. The only error
//! that leaves `tick` is a [`SurfaceError`].

use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::blink::BlinkClock;
use crate::cache::RenderCache;
use crate::chrome::{paint_divider, paint_header, paint_legend};
use crate::colors::BLACK;
use crate::config::{BoardConfig, FRAME_TIME};
use crate::departure::DepartureRenderer;
use crate::error::SurfaceError;
use crate::feed::FeedStatus;
use crate::fonts::FontBook;
use crate::icon::AnimatedIcon;
use crate::layout::BoardLayout;
use crate::metrics::RenderMetrics;
use crate::scroll::LabelStore;
use crate::snapshot::StationSnapshot;
use crate::surface::{InputPoll, Surface};

/// Controller lifecycle. `Stopped` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    Running,
    Stopped,
}

/// How the end of a tick is paced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pacing {
    /// Sleep until the frame budget is used up.
    Fixed(Duration),
    /// Return immediately (headless rendering, tests).
    Unpaced,
}

impl Default for Pacing {
    fn default() -> Self { Self::Fixed(FRAME_TIME) }
}

/// Fixed-rate renderer for the departure board.
pub struct FrameController {
    config: BoardConfig,
    fonts: FontBook,
    cache: RenderCache,
    labels: LabelStore,
    icon: AnimatedIcon,
    blink: BlinkClock,
    metrics: RenderMetrics,
    state: ControllerState,
    pacing: Pacing,
}

impl FrameController {
    /// Create a running controller with the built-in connectivity icon.
    pub fn new(
        config: BoardConfig,
        now: Instant,
    ) -> Self {
        let fonts = FontBook::from_name(&config.font_face);
        let mut metrics = RenderMetrics::new();
        if fonts.fell_back() {
            metrics.font_fallbacks += 1;
        }

        info!(
            width = config.display_width,
            height = config.display_height,
            face = ?fonts.face(),
            "frame controller started"
        );

        Self {
            config,
            fonts,
            cache: RenderCache::new(),
            labels: LabelStore::new(),
            icon: AnimatedIcon::wifi(),
            blink: BlinkClock::new(now),
            metrics,
            state: ControllerState::Running,
            pacing: Pacing::default(),
        }
    }

    /// Use `icon` as the connectivity icon.
    #[must_use]
    pub fn with_icon(
        mut self,
        icon: AnimatedIcon,
    ) -> Self {
        self.icon = icon;
        self
    }

    /// Use an RGB565 icon strip. A malformed strip is counted and leaves no icon.
    #[must_use]
    pub fn with_icon_strip(
        mut self,
        bytes: &[u8],
        frame_width: u32,
    ) -> Self {
        self.icon = match AnimatedIcon::from_rgb565_strip(bytes, frame_width) {
            Ok(icon) => icon,
            Err(err) => {
                warn!(%err, "icon strip unusable, drawing no icon");
                self.metrics.icon_fallbacks += 1;
                AnimatedIcon::empty()
            }
        };
        self
    }

    /// Set frame pacing.
    #[must_use]
    pub const fn with_pacing(
        mut self,
        pacing: Pacing,
    ) -> Self {
        self.pacing = pacing;
        self
    }

    /// Current lifecycle state.
    #[inline]
    pub const fn state(&self) -> ControllerState { self.state }

    /// Current blink phase.
    #[inline]
    pub const fn blink_phase(&self) -> bool { self.blink.phase() }

    /// Render statistics.
    #[inline]
    pub const fn metrics(&self) -> &RenderMetrics { &self.metrics }

    /// Scroll labels alive after the last frame.
    #[inline]
    pub const fn labels(&self) -> &LabelStore { &self.labels }

    /// Connectivity icon.
    #[inline]
    pub const fn icon(&self) -> &AnimatedIcon { &self.icon }

    /// Run one tick at the current time.
    pub fn tick<S>(
        &mut self,
        surface: &mut S,
        stations: &[StationSnapshot],
        status: &FeedStatus,
    ) -> Result<InputPoll, SurfaceError>
    where
        S: Surface,
    {
        self.tick_at(surface, stations, status, Instant::now())
    }

    /// Run one tick with `now` as the frame's wall-clock time.
    ///
    /// Returns [`InputPoll::Quit`] once the controller has stopped; the host
    /// loop should not call it again after that.
    pub fn tick_at<S>(
        &mut self,
        surface: &mut S,
        stations: &[StationSnapshot],
        status: &FeedStatus,
        now: Instant,
    ) -> Result<InputPoll, SurfaceError>
    where
        S: Surface,
    {
        let frame_start = Instant::now();

        if self.state == ControllerState::Stopped {
            return Ok(InputPoll::Quit);
        }

        // 1. Input
        if surface.poll_input() == InputPoll::Quit {
            info!(frames = self.metrics.total_frames, "quit requested, stopping");
            self.state = ControllerState::Stopped;
            return Ok(InputPoll::Quit);
        }

        // 2. Blink phase
        self.blink.tick(now);

        // 3. Animation state
        self.labels.advance_all();
        if status.is_live {
            self.icon.advance();
        }

        // 4. Layout and paint
        self.render(surface, stations, status).map_err(SurfaceError::draw)?;
        let render_time = frame_start.elapsed();

        // 5. Present
        surface.present()?;

        // 6. Pace
        let sleep_time = match self.pacing {
            Pacing::Fixed(budget) => {
                let remaining = budget.saturating_sub(frame_start.elapsed());
                if !remaining.is_zero() {
                    thread::sleep(remaining);
                }
                remaining
            }
            Pacing::Unpaced => Duration::ZERO,
        };

        self.metrics.record_frame(frame_start.elapsed(), render_time, sleep_time);
        Ok(InputPoll::Continue)
    }

    fn render<S>(
        &mut self,
        surface: &mut S,
        stations: &[StationSnapshot],
        status: &FeedStatus,
    ) -> Result<(), S::Error>
    where
        S: Surface,
    {
        surface.clear(BLACK)?;

        paint_header(
            surface,
            &self.fonts,
            &mut self.cache,
            &self.config,
            status,
            self.icon.current_frame(status.is_live),
        )?;

        let layout = BoardLayout::compute(stations.len(), surface.bounding_box().size);
        if stations.len() > layout.columns().len() {
            debug!(stations = stations.len(), shown = layout.columns().len(), "extra stations not shown");
        }

        let mut renderer = DepartureRenderer::new(&self.fonts, &mut self.cache, &mut self.labels, self.blink.phase());
        let mut rows_drawn = 0;
        for column in layout.columns() {
            let outcome = renderer.paint_station(surface, &layout, column, &stations[column.index])?;
            rows_drawn += outcome.rows_drawn;
            self.metrics.rows_skipped += outcome.rows_skipped as u64;
            self.metrics.disruptions_skipped += u64::from(outcome.disruption_skipped);
            self.metrics.labels_created += outcome.labels_created as u64;
        }

        paint_divider(surface, &layout)?;
        paint_legend(surface, &self.fonts, &mut self.cache, &layout)?;

        self.metrics.rows_drawn = rows_drawn;
        self.metrics.labels_evicted += self.labels.sweep() as u64;
        self.metrics.labels_live = self.labels.len();
        self.metrics.cache_hits = self.cache.hits();
        self.metrics.cache_misses = self.cache.misses();
        self.metrics.cache_entries = self.cache.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::pixelcolor::Rgb565;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::Rectangle;

    use super::*;
    use crate::colors::{DARK_GRAY, RED};
    use crate::config::BLINK_INTERVAL;
    use crate::feed::ClockTime;
    use crate::framebuffer::FrameBuffer;
    use crate::snapshot::{DepartureRecord, ProductKind};

    fn controller(now: Instant) -> FrameController {
        let config = BoardConfig {
            font_face: String::from("builtin"),
            ..BoardConfig::default()
        };
        FrameController::new(config, now).with_pacing(Pacing::Unpaced)
    }

    fn live() -> FeedStatus { FeedStatus::new(true, 0, ClockTime::new(8, 0, 0)) }

    #[test]
    fn test_quit_stops_controller() {
        let t0 = Instant::now();
        let mut ctl = controller(t0);
        let mut fb = FrameBuffer::new(Size::new(800, 480));

        assert_eq!(ctl.tick_at(&mut fb, &[], &live(), t0).unwrap(), InputPoll::Continue);
        assert_eq!(fb.presented(), 1);

        fb.request_quit();
        assert_eq!(ctl.tick_at(&mut fb, &[], &live(), t0).unwrap(), InputPoll::Quit);
        assert_eq!(ctl.state(), ControllerState::Stopped);
        assert_eq!(fb.presented(), 1, "Quit tick must not present");

        assert_eq!(ctl.tick_at(&mut fb, &[], &live(), t0).unwrap(), InputPoll::Quit);
    }

    #[test]
    fn test_no_stations_renders_chrome_only() {
        let t0 = Instant::now();
        let mut ctl = controller(t0);
        let mut fb = FrameBuffer::new(Size::new(800, 480));
        ctl.tick_at(&mut fb, &[], &live(), t0).unwrap();

        let content = Rectangle::new(Point::new(0, 45), Size::new(800, 400));
        assert_eq!(fb.count_non(&content, BLACK), 0, "No columns without stations");
        let header = Rectangle::new(Point::zero(), Size::new(800, 40));
        assert!(fb.count_non(&header, BLACK) > 0);
        assert_eq!(ctl.metrics().rows_drawn, 0);
    }

    #[test]
    fn test_icon_advances_only_while_live() {
        let t0 = Instant::now();
        let mut ctl = controller(t0);
        let mut fb = FrameBuffer::new(Size::new(800, 480));
        let offline = FeedStatus::new(false, 200, ClockTime::default());

        ctl.tick_at(&mut fb, &[], &offline, t0).unwrap();
        assert_eq!(ctl.icon().frame_index(), 0);
        ctl.tick_at(&mut fb, &[], &live(), t0).unwrap();
        assert_eq!(ctl.icon().frame_index(), 1);
    }

    #[test]
    fn test_blink_follows_wall_clock() {
        let t0 = Instant::now();
        let mut ctl = controller(t0);
        let mut fb = FrameBuffer::new(Size::new(800, 480));
        let station = StationSnapshot::new("1", "Zoo", 4)
            .with_departure(DepartureRecord::new("S5", "Spandau", 0, ProductKind::Suburban));
        let stations = [station];

        ctl.tick_at(&mut fb, &stations, &live(), t0).unwrap();
        assert!(ctl.blink_phase());
        let time_area = Rectangle::new(Point::new(600, 128), Size::new(200, 30));
        assert!(fb.count_in(&time_area, RED) > 0);

        ctl.tick_at(&mut fb, &stations, &live(), t0 + BLINK_INTERVAL).unwrap();
        assert!(!ctl.blink_phase());
        assert_eq!(fb.count_in(&time_area, RED), 0);
        assert!(fb.count_in(&time_area, DARK_GRAY) > 0);
    }

    #[test]
    fn test_scroll_labels_evicted_when_rows_disappear() {
        let t0 = Instant::now();
        let mut ctl = controller(t0);
        let mut fb = FrameBuffer::new(Size::new(800, 480));
        let full = [StationSnapshot::new("1", "Zoo", 4)
            .with_departure(DepartureRecord::new("S5", "Spandau", 3, ProductKind::Suburban))
            .with_departure(DepartureRecord::new("U9", "Osloer Str.", 6, ProductKind::Subway))];
        let mut fewer = full.clone();
        fewer[0].departures.pop();

        ctl.tick_at(&mut fb, &full, &live(), t0).unwrap();
        assert_eq!(ctl.labels().len(), 2);
        ctl.tick_at(&mut fb, &fewer, &live(), t0).unwrap();
        assert_eq!(ctl.labels().len(), 1);
        assert_eq!(ctl.metrics().labels_evicted, 1);
    }

    #[test]
    fn test_unknown_font_face_is_counted() {
        let config = BoardConfig {
            font_face: String::from("Comic Sans"),
            ..BoardConfig::default()
        };
        let ctl = FrameController::new(config, Instant::now());
        assert_eq!(ctl.metrics().font_fallbacks, 1);
    }

    /// Surface whose panel is gone: every draw fails.
    struct Unplugged;

    #[derive(Debug)]
    struct Disconnected;

    impl OriginDimensions for Unplugged {
        fn size(&self) -> Size { Size::new(800, 480) }
    }

    impl DrawTarget for Unplugged {
        type Color = Rgb565;
        type Error = Disconnected;

        fn draw_iter<I>(
            &mut self,
            _pixels: I,
        ) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            Err(Disconnected)
        }
    }

    impl Surface for Unplugged {
        fn poll_input(&mut self) -> InputPoll { InputPoll::Continue }

        fn present(&mut self) -> Result<(), SurfaceError> { Ok(()) }
    }

    #[test]
    fn test_draw_failure_becomes_surface_error() {
        let t0 = Instant::now();
        let mut ctl = controller(t0);
        let err = ctl.tick_at(&mut Unplugged, &[], &live(), t0).unwrap_err();
        assert!(matches!(err, SurfaceError::Draw(ref msg) if msg == "Disconnected"));
        assert_eq!(ctl.metrics().total_frames, 0);
        assert_eq!(ctl.state(), ControllerState::Running);
    }

    #[test]
    fn test_malformed_icon_strip_is_counted() {
        let ctl = controller(Instant::now()).with_icon_strip(&[1, 2, 3], 20);
        assert_eq!(ctl.metrics().icon_fallbacks, 1);
        assert!(ctl.icon().current_frame(true).is_none());
    }

    #[test]
    fn test_oversized_icon_frame_width_is_counted() {
        let t0 = Instant::now();
        let mut ctl = controller(t0).with_icon_strip(&[0; 8], 65_536);
        assert_eq!(ctl.metrics().icon_fallbacks, 1);

        let mut fb = FrameBuffer::new(Size::new(800, 480));
        assert_eq!(ctl.tick_at(&mut fb, &[], &live(), t0).unwrap(), InputPoll::Continue);
    }
}
