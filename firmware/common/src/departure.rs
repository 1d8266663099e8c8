//! Departure rows and station columns.
//!
//! # Row Coloring
//!
//! The time label tells a rider whether they can still make a departure,
//! given the station's walking time `w` and the minutes until departure `m`:
//!
//! | Condition | Label    | Color                              |
//! |-----------|----------|------------------------------------|
//! | `m == 0`  | `jetzt`  | RED / DARK_GRAY, alternating blink |
//! | `m < w`   | `{m}'`   | RED                                |
//! | `m == w`  | `{m}'`   | YELLOW                             |
//! | `m > w`   | `{m}'`   | GREEN                              |
//!
//! Delays are annotated below the time: `(+3)` in red, `(-2)` in green,
//! nothing when on time. In the dim blink phase of a `jetzt` row the
//! badge is hidden and the direction is drawn dark gray.
//!
//! # Malformed Records
//!
//! A record missing its line, direction or minutes is skipped without
//! taking a row slot; the rows after it move up. The rest of the column and
//! the frame render normally.

use core::fmt::Write;
use std::borrow::Cow;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle, RoundedRectangle};
use heapless::String;
use tracing::debug;

use crate::cache::RenderCache;
use crate::colors::{DARK_GRAY, GRAY, GREEN, LIGHT_GRAY, ORANGE, RED, WHITE, YELLOW};
use crate::config::{BADGE_RADIUS, BADGE_SIZE, DISRUPTION_MAX_CHARS, STATION_NAME_MAX_CHARS};
use crate::error::RecordError;
use crate::fonts::{FontBook, FontId};
use crate::layout::{BoardLayout, Column, RowGeometry};
use crate::scroll::{LabelKey, LabelStore};
use crate::snapshot::{DepartureRecord, ProductKind, StationSnapshot};

/// Label for a departure leaving now.
pub const NOW_LABEL: &str = "jetzt";

/// Caption above the time column.
pub const CAPTION_LABEL: &str = "Abfahrt in:";

/// Shown instead of rows when a station has nothing to list.
pub const EMPTY_LABEL: &str = "Keine Abfahrten";

/// Diameter of the disruption warning disc.
const WARNING_DISC: u32 = 18;

/// Inset of badge text from the badge's top and bottom edges.
const BADGE_TEXT_INSET: i32 = 4;

// =============================================================================
// Validated Departure
// =============================================================================

/// A departure record with every field needed to draw it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Departure<'a> {
    pub line: &'a str,
    pub direction: &'a str,
    pub minutes: u32,
    pub delay: i64,
    pub product: ProductKind,
}

impl<'a> TryFrom<&'a DepartureRecord> for Departure<'a> {
    type Error = RecordError;

    fn try_from(record: &'a DepartureRecord) -> Result<Self, Self::Error> {
        let line = record.line_name.as_deref().ok_or(RecordError::MissingField("lineName"))?;
        let direction = record.direction.as_deref().ok_or(RecordError::MissingField("direction"))?;
        let minutes = record.minutes_until.ok_or(RecordError::MissingField("minutesUntil"))?;
        if minutes < 0 {
            return Err(RecordError::NegativeMinutes(minutes));
        }

        Ok(Self {
            line,
            direction,
            minutes: u32::try_from(minutes).unwrap_or(u32::MAX),
            delay: record.delay_minutes,
            product: record.product_kind,
        })
    }
}

// =============================================================================
// Row View
// =============================================================================

/// Delay text and color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelayAnnotation {
    pub text: String<24>,
    pub color: Rgb565,
}

/// Everything about a row that depends on data and blink phase, not on position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowView {
    pub time_label: String<16>,
    pub time_color: Rgb565,
    pub delay: Option<DelayAnnotation>,
    /// Departure is leaving now and blinks.
    pub is_now: bool,
    pub show_badge: bool,
    pub direction_color: Rgb565,
}

impl RowView {
    /// Derive labels and colors for `departure` at a station `walking_time` minutes away.
    pub fn derive(
        departure: &Departure<'_>,
        walking_time: u32,
        blink_phase: bool,
    ) -> Self {
        let m = departure.minutes;
        let is_now = m == 0;
        let dim = is_now && !blink_phase;

        let mut time_label = String::new();
        let time_color = if is_now {
            time_label.push_str(NOW_LABEL).ok();
            if blink_phase { RED } else { DARK_GRAY }
        } else {
            write!(time_label, "{m}'").ok();
            lead_time_color(m, walking_time)
        };

        Self {
            time_label,
            time_color,
            delay: delay_annotation(departure.delay),
            is_now,
            show_badge: !dim,
            direction_color: if dim { DARK_GRAY } else { LIGHT_GRAY },
        }
    }
}

/// Time color for `minutes` until departure at a station `walking_time` minutes away.
pub const fn lead_time_color(
    minutes: u32,
    walking_time: u32,
) -> Rgb565 {
    if minutes < walking_time {
        RED
    } else if minutes == walking_time {
        YELLOW
    } else {
        GREEN
    }
}

/// Delay annotation, `None` when on time.
pub fn delay_annotation(delay: i64) -> Option<DelayAnnotation> {
    let (sign, color) = match delay {
        0 => return None,
        d if d > 0 => ("+", RED),
        _ => ("", GREEN),
    };
    let mut text = String::new();
    write!(text, "({sign}{delay})").ok();
    Some(DelayAnnotation { text, color })
}

/// Cut `text` to `max` characters, appending "..." if anything was cut.
pub fn truncate_with_ellipsis(
    text: &str,
    max: usize,
) -> Cow<'_, str> {
    match text.char_indices().nth(max) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

// =============================================================================
// Renderer
// =============================================================================

/// What happened while painting one station column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StationOutcome {
    pub rows_drawn: usize,
    pub rows_skipped: usize,
    pub disruption_skipped: bool,
    pub labels_created: usize,
}

/// Paints station columns for one frame.
///
/// Borrows the controller's caches and label store; the blink phase is
/// read, never written.
pub struct DepartureRenderer<'a> {
    fonts: &'a FontBook,
    cache: &'a mut RenderCache,
    labels: &'a mut LabelStore,
    blink_phase: bool,
}

impl<'a> DepartureRenderer<'a> {
    /// Create a renderer for one frame.
    pub const fn new(
        fonts: &'a FontBook,
        cache: &'a mut RenderCache,
        labels: &'a mut LabelStore,
        blink_phase: bool,
    ) -> Self {
        Self {
            fonts,
            cache,
            labels,
            blink_phase,
        }
    }

    /// Paint header and rows of `station` into `column`.
    pub fn paint_station<D>(
        &mut self,
        target: &mut D,
        layout: &BoardLayout,
        column: &Column,
        station: &StationSnapshot,
    ) -> Result<StationOutcome, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let mut outcome = StationOutcome::default();

        let warning = match station.disruptions.first().map(|d| d.summary()) {
            Some(Ok(summary)) => Some(summary),
            Some(Err(err)) => {
                debug!(station = column.index, %err, "skipping malformed disruption");
                outcome.disruption_skipped = true;
                None
            }
            None => None,
        };
        let plan = layout.station_plan(column, warning.is_some());

        let name = truncate_with_ellipsis(&station.name, STATION_NAME_MAX_CHARS);
        self.cache.blit(self.fonts, target, &name, FontId::Medium, WHITE, plan.name_origin)?;

        let mut walk: String<24> = String::new();
        write!(walk, "{} min", station.walking_time_minutes).ok();
        self.cache.blit(self.fonts, target, &walk, FontId::Tiny, GRAY, plan.walk_origin)?;

        if let (Some(summary), Some(origin)) = (warning, plan.warning_origin) {
            self.paint_warning(target, origin, summary)?;
        }

        self.cache
            .blit(self.fonts, target, CAPTION_LABEL, FontId::Tiny, GRAY, plan.caption_origin)?;

        for record in &station.departures {
            let Some(row) = plan.row(outcome.rows_drawn) else {
                break;
            };
            match Departure::try_from(record) {
                Ok(departure) => {
                    if self.paint_row(target, column.index, station.walking_time_minutes, &departure, &row)? {
                        outcome.labels_created += 1;
                    }
                    outcome.rows_drawn += 1;
                }
                Err(err) => {
                    debug!(station = column.index, %err, "skipping malformed departure");
                    outcome.rows_skipped += 1;
                }
            }
        }

        if outcome.rows_drawn == 0 {
            self.cache
                .blit(self.fonts, target, EMPTY_LABEL, FontId::Small, GRAY, plan.empty_origin)?;
        }

        Ok(outcome)
    }

    /// Paint one departure row. Returns true if a new scroll label was created.
    pub fn paint_row<D>(
        &mut self,
        target: &mut D,
        station_index: usize,
        walking_time: u32,
        departure: &Departure<'_>,
        row: &RowGeometry,
    ) -> Result<bool, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let view = RowView::derive(departure, walking_time, self.blink_phase);

        if view.show_badge {
            self.paint_badge(target, row.origin, departure.product, departure.line)?;
        }

        let (label, created) = self.labels.acquire(
            LabelKey::new(station_index, departure.line, departure.direction),
            departure.direction,
            self.fonts.font(FontId::Small),
            row.direction_width(),
            view.direction_color,
        );
        label.set_color(view.direction_color);
        label.render(target, row.direction_origin())?;

        let time = self.cache.get(self.fonts, &view.time_label, FontId::Large, view.time_color);
        let time_width = time.width();
        time.draw(target, row.time_origin(time_width))?;

        if let Some(delay) = &view.delay {
            self.cache
                .blit(self.fonts, target, &delay.text, FontId::Small, delay.color, row.delay_origin(time_width))?;
        }

        Ok(created)
    }

    /// Product badge: rounded tile with product caption above the line name.
    fn paint_badge<D>(
        &mut self,
        target: &mut D,
        origin: Point,
        product: ProductKind,
        line: &str,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let tile = Rectangle::new(origin, Size::new(BADGE_SIZE, BADGE_SIZE));
        RoundedRectangle::with_equal_corners(tile, Size::new(BADGE_RADIUS, BADGE_RADIUS))
            .into_styled(PrimitiveStyle::with_fill(product.color()))
            .draw(target)?;

        let center_x = origin.x + BADGE_SIZE as i32 / 2;
        self.cache.blit_centered(
            self.fonts,
            target,
            product.label(),
            FontId::Tiny,
            WHITE,
            center_x,
            origin.y + BADGE_TEXT_INSET,
        )?;

        let line_raster = self.cache.get(self.fonts, line, FontId::Medium, WHITE);
        let line_top = origin.y + BADGE_SIZE as i32 - BADGE_TEXT_INSET - line_raster.height() as i32;
        line_raster.draw(target, Point::new(center_x - line_raster.width() as i32 / 2, line_top))
    }

    /// Orange disc with "!" followed by the truncated summary.
    fn paint_warning<D>(
        &mut self,
        target: &mut D,
        origin: Point,
        summary: &str,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let disc = Circle::new(origin, WARNING_DISC);
        disc.into_styled(PrimitiveStyle::with_fill(ORANGE)).draw(target)?;

        let mark = self.cache.get(self.fonts, "!", FontId::Small, WHITE);
        let center = disc.center();
        mark.draw(target, center - Point::new(mark.width() as i32 / 2, mark.height() as i32 / 2))?;

        let text = truncate_with_ellipsis(summary, DISRUPTION_MAX_CHARS);
        self.cache.blit(
            self.fonts,
            target,
            &text,
            FontId::Tiny,
            ORANGE,
            origin + Point::new(WARNING_DISC as i32 + 5, 2),
        )?;
        Ok(())
    }
}
