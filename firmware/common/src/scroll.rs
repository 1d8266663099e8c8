//! Horizontally scrolling text labels.
//!
//! A [`ScrollingLabel`] whose text is wider than its viewport cycles through
//! three phases, one step per frame:
//!
//! ```text
//!   pause (SCROLL_PAUSE_FRAMES) -> scroll (+SCROLL_SPEED px/frame) -> reset
//!        ^                                                           |
//!        +-----------------------------------------------------------+
//! ```
//!
//! The scroll phase ends once the integer offset exceeds
//! `text_width - viewport_width + SCROLL_OVERSHOOT`. Speed is per frame, not
//! per second: the frame rate is authoritative.
//!
//! Labels live in a [`LabelStore`] keyed by station, line and direction,
//! so scroll state survives from one frame to the next.

use std::collections::HashMap;

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use tracing::debug;

use crate::colors::WHITE;
use crate::config::{SCROLL_OVERSHOOT, SCROLL_PAUSE_FRAMES, SCROLL_SPEED};
use crate::raster::Raster;

// =============================================================================
// Scrolling Label
// =============================================================================

/// Text clipped to a fixed-width viewport, scrolling if it does not fit.
pub struct ScrollingLabel {
    text: String,
    font: &'static MonoFont<'static>,
    raster: Raster,
    viewport_width: u32,
    color: Rgb565,
    offset_px: f32,
    pause_frames: u32,
}

impl ScrollingLabel {
    /// Create a label. It starts in the pause phase.
    pub fn new(
        text: &str,
        font: &'static MonoFont<'static>,
        viewport_width: u32,
        color: Rgb565,
    ) -> Self {
        Self {
            text: String::from(text),
            font,
            raster: Raster::from_text(text, font, WHITE),
            viewport_width,
            color,
            offset_px: 0.0,
            pause_frames: SCROLL_PAUSE_FRAMES,
        }
    }

    /// Label text.
    #[inline]
    pub fn text(&self) -> &str { &self.text }

    /// Rasterized text width in pixels.
    #[inline]
    pub const fn text_width(&self) -> u32 { self.raster.width() }

    /// Viewport width in pixels.
    #[inline]
    pub const fn viewport_width(&self) -> u32 { self.viewport_width }

    /// True if the text is wider than the viewport.
    #[inline]
    pub const fn needs_scroll(&self) -> bool { self.raster.width() > self.viewport_width }

    /// Current integer scroll offset in pixels.
    #[inline]
    pub const fn offset(&self) -> i32 { self.offset_px as i32 }

    /// Pause frames left before scrolling resumes.
    #[inline]
    pub const fn pause_remaining(&self) -> u32 { self.pause_frames }

    /// Current text color.
    #[inline]
    pub const fn color(&self) -> Rgb565 { self.color }

    /// Change the text color. Scroll state is unaffected.
    pub fn set_color(
        &mut self,
        color: Rgb565,
    ) {
        self.color = color;
    }

    /// True if this label was built for the same text, font and viewport.
    pub fn matches(
        &self,
        text: &str,
        font: &'static MonoFont<'static>,
        viewport_width: u32,
    ) -> bool {
        self.text == text && core::ptr::eq(self.font, font) && self.viewport_width == viewport_width
    }

    /// Advance the scroll state by one frame.
    pub fn advance(&mut self) {
        if !self.needs_scroll() {
            return;
        }

        if self.pause_frames > 0 {
            self.pause_frames -= 1;
            return;
        }

        self.offset_px += SCROLL_SPEED;
        let limit = self.raster.width() as i32 - self.viewport_width as i32 + SCROLL_OVERSHOOT;
        if self.offset() > limit {
            self.offset_px = 0.0;
            self.pause_frames = SCROLL_PAUSE_FRAMES;
        }
    }

    /// Draw with the top-left corner of the viewport at `origin`.
    pub fn render<D>(
        &self,
        target: &mut D,
        origin: Point,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if !self.needs_scroll() {
            return self.raster.draw_tinted(target, origin, self.color);
        }

        let viewport = Rectangle::new(origin, Size::new(self.viewport_width, self.raster.height()));
        let mut clipped = target.clipped(&viewport);
        self.raster
            .draw_tinted(&mut clipped, origin - Point::new(self.offset(), 0), self.color)
    }
}

// =============================================================================
// Label Store
// =============================================================================

/// Identity of a scrolling label across frames.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LabelKey {
    station: usize,
    line: String,
    direction: String,
}

impl LabelKey {
    /// Build a key from the station index, line name and direction.
    ///
    /// Two departures of one line whose directions share a long prefix
    /// (`Wittenau (Berlin)`, `Wittenau (Wilhelmsruher Damm)`) get separate
    /// labels.
    pub fn new(
        station: usize,
        line: &str,
        direction: &str,
    ) -> Self {
        Self {
            station,
            line: String::from(line),
            direction: String::from(direction),
        }
    }
}

struct Slot {
    label: ScrollingLabel,
    touched: bool,
}

/// Scrolling labels owned by the renderer.
///
/// Labels are created lazily on first use and replaced when their text
/// changes. [`sweep`](Self::sweep) drops every label that was not used since
/// the previous sweep, so the store never holds more labels than one frame
/// draws.
#[derive(Default)]
pub struct LabelStore {
    slots: HashMap<LabelKey, Slot>,
}

impl LabelStore {
    /// Create an empty store.
    pub fn new() -> Self { Self::default() }

    /// Number of live labels.
    #[inline]
    pub fn len(&self) -> usize { self.slots.len() }

    /// True if no labels are live.
    #[inline]
    pub fn is_empty(&self) -> bool { self.slots.is_empty() }

    /// Look up a label without touching it.
    pub fn get(
        &self,
        key: &LabelKey,
    ) -> Option<&ScrollingLabel> {
        self.slots.get(key).map(|slot| &slot.label)
    }

    /// Advance every live label by one frame.
    pub fn advance_all(&mut self) {
        for slot in self.slots.values_mut() {
            slot.label.advance();
        }
    }

    /// Fetch the label for `key`, creating or replacing it as needed.
    ///
    /// Returns the label and whether it was newly created. A label whose
    /// text, font or viewport differs from the request is rebuilt; its old
    /// scroll state does not carry over.
    pub fn acquire(
        &mut self,
        key: LabelKey,
        text: &str,
        font: &'static MonoFont<'static>,
        viewport_width: u32,
        color: Rgb565,
    ) -> (&mut ScrollingLabel, bool) {
        let mut created = false;
        let slot = self
            .slots
            .entry(key)
            .and_modify(|slot| {
                if !slot.label.matches(text, font, viewport_width) {
                    debug!(old = slot.label.text(), new = text, "scroll label text changed, rebuilding");
                    slot.label = ScrollingLabel::new(text, font, viewport_width, color);
                    created = true;
                }
            })
            .or_insert_with(|| {
                created = true;
                Slot {
                    label: ScrollingLabel::new(text, font, viewport_width, color),
                    touched: false,
                }
            });
        slot.touched = true;
        (&mut slot.label, created)
    }

    /// Drop labels not acquired since the last sweep. Returns how many were dropped.
    pub fn sweep(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, slot| core::mem::take(&mut slot.touched));
        before - self.slots.len()
    }
}
