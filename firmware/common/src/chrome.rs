//! Header, footer legend and column divider.
//!
//! Static labels (title, legend entries) go through the [`RenderCache`].
//! The clock and the staleness readout change every second and are drawn
//! directly so they do not accumulate in the cache.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle};
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::{Baseline, Text};

use crate::cache::RenderCache;
use crate::colors::{DARK_GRAY, GRAY, GREEN, LIGHT_GRAY, ORANGE, RED, YELLOW};
use crate::config::{BoardConfig, HEADER_HEIGHT, ICON_SIZE};
use crate::feed::FeedStatus;
use crate::fonts::{FontBook, FontId};
use crate::layout::BoardLayout;
use crate::raster::Raster;

// =============================================================================
// Header Layout
// =============================================================================

/// Top-left of the title.
const TITLE_ORIGIN: Point = Point::new(20, 10);

/// Gap between title and test-mode marker.
const TEST_MODE_GAP: i32 = 10;

/// Top of the clock and icon.
const CLOCK_TOP: i32 = 10;

/// Top of the staleness readout.
const STALENESS_TOP: i32 = 26;

/// Right margin of clock and staleness readout.
const RIGHT_MARGIN: i32 = 10;

/// Gap between the icon's left edge and the clock.
const ICON_GAP: i32 = ICON_SIZE as i32 + 15;

/// Test-mode marker text.
pub const TEST_MODE_LABEL: &str = "testMode=ON";

// =============================================================================
// Legend Layout
// =============================================================================

/// Legend entries: dot color and label.
pub const LEGEND_ITEMS: [(Rgb565, &str); 4] =
    [(GREEN, ">Fußweg"), (YELLOW, "=Fußweg"), (RED, "<Fußweg"), (ORANGE, "Störung")];

/// Right-aligned legend hint.
pub const LEGEND_HINT: &str = "Zeiten inkl. Delays (+/-)";

/// Width reserved for the hint when spacing legend entries.
const LEGEND_HINT_RESERVE: u32 = 220;

/// Diameter of a legend dot.
const LEGEND_DOT: u32 = 10;

/// Stroke width of the header rule and column divider.
const RULE_WIDTH: u32 = 2;

// =============================================================================
// Header
// =============================================================================

/// Draw title, test-mode marker, clock, staleness readout, icon and header rule.
pub fn paint_header<D>(
    target: &mut D,
    fonts: &FontBook,
    cache: &mut RenderCache,
    config: &BoardConfig,
    status: &FeedStatus,
    icon: Option<&Raster>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let width = target.bounding_box().size.width as i32;

    let title = cache.blit(fonts, target, &config.title, FontId::Small, LIGHT_GRAY, TITLE_ORIGIN)?;
    if config.test_mode {
        let origin = TITLE_ORIGIN + Point::new(title.width as i32 + TEST_MODE_GAP, 0);
        cache.blit(fonts, target, TEST_MODE_LABEL, FontId::Small, ORANGE, origin)?;
    }

    let clock = status.clock.format();
    let clock_style = MonoTextStyle::new(fonts.font(FontId::Small), LIGHT_GRAY);
    let clock_width = text_width(&clock_style, &clock);
    Text::with_baseline(&clock, Point::new(width - clock_width - RIGHT_MARGIN, CLOCK_TOP), clock_style, Baseline::Top)
        .draw(target)?;

    let staleness = status.staleness_label();
    let staleness_style = MonoTextStyle::new(fonts.font(FontId::Tiny), GRAY);
    let staleness_width = text_width(&staleness_style, &staleness);
    Text::with_baseline(
        &staleness,
        Point::new(width - staleness_width - RIGHT_MARGIN, STALENESS_TOP),
        staleness_style,
        Baseline::Top,
    )
    .draw(target)?;

    if let Some(frame) = icon {
        frame.draw(target, Point::new(width - clock_width - ICON_GAP, CLOCK_TOP))?;
    }

    paint_header_rule(target, width)
}

fn paint_header_rule<D>(
    target: &mut D,
    width: i32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let y = HEADER_HEIGHT as i32;
    Line::new(Point::new(0, y), Point::new(width, y))
        .into_styled(PrimitiveStyle::with_stroke(DARK_GRAY, RULE_WIDTH))
        .draw(target)
}

fn text_width(
    style: &MonoTextStyle<'_, Rgb565>,
    text: &str,
) -> i32 {
    style.measure_string(text, Point::zero(), Baseline::Top).bounding_box.size.width as i32
}

// =============================================================================
// Footer
// =============================================================================

/// Draw the legend separator, the four color entries and the hint.
pub fn paint_legend<D>(
    target: &mut D,
    fonts: &FontBook,
    cache: &mut RenderCache,
    layout: &BoardLayout,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let width = layout.size().width;
    let legend_y = layout.legend_y();
    let separator_y = layout.legend_separator_y();

    Line::new(Point::new(0, separator_y), Point::new(width as i32, separator_y))
        .into_styled(PrimitiveStyle::with_stroke(DARK_GRAY, 1))
        .draw(target)?;

    let item_width = width.saturating_sub(LEGEND_HINT_RESERVE) / LEGEND_ITEMS.len() as u32;
    for (i, (color, label)) in LEGEND_ITEMS.iter().enumerate() {
        let x = (i as u32 * item_width) as i32 + 10;
        Circle::with_center(Point::new(x, legend_y + 7), LEGEND_DOT)
            .into_styled(PrimitiveStyle::with_fill(*color))
            .draw(target)?;
        cache.blit(fonts, target, label, FontId::Tiny, LIGHT_GRAY, Point::new(x + 10, legend_y))?;
    }

    cache.blit_right(
        fonts,
        target,
        LEGEND_HINT,
        FontId::Tiny,
        GRAY,
        width as i32 - RIGHT_MARGIN,
        legend_y,
    )?;
    Ok(())
}

/// Draw the vertical divider between two station columns, if there is one.
pub fn paint_divider<D>(
    target: &mut D,
    layout: &BoardLayout,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let Some(x) = layout.divider_x() else {
        return Ok(());
    };
    Line::new(Point::new(x, layout.header_rule_y()), Point::new(x, layout.size().height as i32))
        .into_styled(PrimitiveStyle::with_stroke(DARK_GRAY, RULE_WIDTH))
        .draw(target)
}
