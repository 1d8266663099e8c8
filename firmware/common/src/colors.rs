//! Color constants for the departure board.
//!
//! The board palette was designed in 8-bit RGB; each constant below is the
//! RGB565 equivalent (channels scaled to 5/6/5 bits and rounded) so nothing
//! has to be converted per frame.
//!
//! ## Rgb565 Color Format
//!
//! Rgb565 uses 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue.
//! - Red: 0-31 (5 bits)
//! - Green: 0-63 (6 bits)
//! - Blue: 0-31 (5 bits)

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Standard Colors (from RgbColor trait)
// =============================================================================

/// Pure black (0, 0, 0). Screen background.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white (31, 63, 31). Station names and badge text.
pub const WHITE: Rgb565 = Rgb565::WHITE;

// =============================================================================
// Board Palette
// =============================================================================

/// Neutral gray (128, 128, 128). Walking hint, captions, staleness readout.
pub const GRAY: Rgb565 = Rgb565::new(16, 32, 16);

/// Light gray (200, 200, 200). Title, clock, direction labels.
pub const LIGHT_GRAY: Rgb565 = Rgb565::new(24, 49, 24);

/// Dark gray (60, 60, 60). Rules, dividers and the dim blink phase.
pub const DARK_GRAY: Rgb565 = Rgb565::new(7, 15, 7);

/// Soft red (255, 80, 80). Not enough time to walk, delays, "jetzt".
pub const RED: Rgb565 = Rgb565::new(31, 20, 10);

/// Soft green (80, 255, 120). Comfortable lead time, early departures.
pub const GREEN: Rgb565 = Rgb565::new(10, 63, 15);

/// Warm yellow (255, 220, 80). Lead time exactly equals walking time.
pub const YELLOW: Rgb565 = Rgb565::new(31, 54, 10);

/// Orange (255, 165, 80). Disruption warnings and test-mode indicator.
pub const ORANGE: Rgb565 = Rgb565::new(31, 41, 10);

/// Sky blue (100, 150, 255).
pub const BLUE: Rgb565 = Rgb565::new(12, 37, 31);

// =============================================================================
// Product Tile Colors
// =============================================================================

/// U-Bahn blue (0, 84, 159).
pub const SUBWAY_BLUE: Rgb565 = Rgb565::new(0, 21, 19);

/// S-Bahn green (0, 131, 81).
pub const SUBURBAN_GREEN: Rgb565 = Rgb565::new(0, 32, 10);

/// Tram, express and regional red (204, 0, 0).
pub const RAIL_RED: Rgb565 = Rgb565::new(25, 0, 0);

/// Bus purple (153, 51, 153).
pub const BUS_PURPLE: Rgb565 = Rgb565::new(19, 13, 19);

/// Ferry turquoise (0, 153, 204).
pub const FERRY_TURQUOISE: Rgb565 = Rgb565::new(0, 38, 25);
