//! Board configuration: compile-time layout/timing constants and the runtime
//! [`BoardConfig`].
//!
//! # Pre-computed Layout Constants
//!
//! Everything that never changes for a given board (header height, row
//! height, badge size, scroll timing) is a `const`, so the frame loop does
//! no arithmetic to find fixed positions. Only values that depend on the
//! physical screen (width, height) live in [`BoardConfig`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

// =============================================================================
// Display Configuration
// =============================================================================

/// Default display width in pixels (7" kiosk panel: 800x480).
pub const SCREEN_WIDTH: u32 = 800;

/// Default display height in pixels.
pub const SCREEN_HEIGHT: u32 = 480;

// =============================================================================
// Timing Configuration
// =============================================================================

/// Target frame rate. Text only needs a few frames per second.
pub const TARGET_FPS: u32 = 5;

/// Target frame time derived from [`TARGET_FPS`]. The loop sleeps if a frame completes early.
pub const FRAME_TIME: Duration = Duration::from_millis(1000 / TARGET_FPS as u64);

/// Wall-clock interval between blink phase toggles.
pub const BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Scroll speed of overflowing labels, in pixels per frame (tuned for 5 FPS).
pub const SCROLL_SPEED: f32 = 3.0;

/// Frames a scrolling label rests at its start position (3 s at 5 FPS).
pub const SCROLL_PAUSE_FRAMES: u32 = 15;

/// Extra pixels a label scrolls past its end before snapping back.
pub const SCROLL_OVERSHOOT: i32 = 20;

/// Frames per connectivity icon animation step.
pub const ICON_ANIMATION_SPEED: u32 = 1;

/// Seconds without a successful refresh before the source counts as offline.
pub const MAX_OFFLINE_TIME: Duration = Duration::from_secs(120);

/// Default interval between data refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(15);

/// Staleness readout granularity in seconds ("vor 15s", "vor 20s", ...).
pub const STALENESS_STEP_SECS: u64 = 5;

// =============================================================================
// Layout Constants
// =============================================================================

/// Header bar height in pixels (title, clock, icon). A 2px rule sits at this y.
pub const HEADER_HEIGHT: u32 = 40;

/// Footer legend height in pixels.
pub const LEGEND_HEIGHT: u32 = 25;

/// Connectivity icon edge length in pixels.
pub const ICON_SIZE: u32 = 20;

/// Product badge edge length in pixels.
pub const BADGE_SIZE: u32 = 45;

/// Corner radius of product badges.
pub const BADGE_RADIUS: u32 = 8;

/// Height of one departure row. Constant regardless of row content.
pub const ROW_HEIGHT: u32 = 60;

/// First y coordinate of station header content.
pub const STATION_TOP: i32 = (HEADER_HEIGHT + 10) as i32;

/// Extra header space reserved when a station shows a disruption warning.
pub const DISRUPTION_HEIGHT: i32 = 25;

/// Space taken by station name and walking hint before the caption.
pub const STATION_HEADER_HEIGHT: i32 = 60;

/// Height of the "Abfahrt in:" caption line.
pub const CAPTION_HEIGHT: i32 = 18;

/// Horizontal inset of station header text inside its column.
pub const COLUMN_PADDING: i32 = 15;

/// Horizontal inset of departure rows inside their column.
pub const ROW_INSET: i32 = 10;

/// Space kept free right of the direction label for time and delay.
pub const TIME_AREA_WIDTH: u32 = 105;

/// Stations rendered at most. Further stations are ignored.
pub const MAX_STATIONS: usize = 2;

/// Departure rows per column when one station fills the screen.
pub const SINGLE_COLUMN_ROWS: usize = 8;

/// Departure rows per column in the two-column layout.
pub const DOUBLE_COLUMN_ROWS: usize = 5;

/// Station names longer than this many characters are cut and get "...".
pub const STATION_NAME_MAX_CHARS: usize = 40;

/// Disruption summaries longer than this many characters are cut and get "...".
pub const DISRUPTION_MAX_CHARS: usize = 25;

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Settings that vary between installations of the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Display width in pixels.
    pub display_width: u32,
    /// Display height in pixels.
    pub display_height: u32,
    /// Title shown in the top-left corner.
    pub title: String,
    /// Shows an orange "testMode=ON" marker next to the title.
    pub test_mode: bool,
    /// Font face name (`profont` or `builtin`). Unknown names fall back to `builtin`.
    pub font_face: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            display_width: SCREEN_WIDTH,
            display_height: SCREEN_HEIGHT,
            title: String::from("BVG Abfahrten"),
            test_mode: false,
            font_face: String::from("profont"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_time_matches_target_fps() {
        assert_eq!(FRAME_TIME, Duration::from_millis(200));
    }

    #[test]
    fn test_row_limits() {
        assert!(SINGLE_COLUMN_ROWS > DOUBLE_COLUMN_ROWS);
        assert_eq!(MAX_STATIONS, 2);
    }

    #[test]
    fn test_board_config_default() {
        let config = BoardConfig::default();
        assert_eq!(config.display_width, 800);
        assert_eq!(config.display_height, 480);
        assert!(!config.test_mode);
        assert_eq!(config.font_face, "profont");
    }

    #[test]
    fn test_board_config_partial_json() {
        let config: BoardConfig = serde_json::from_str(r#"{"title": "Zoo", "test_mode": true}"#).unwrap();
        assert_eq!(config.title, "Zoo");
        assert!(config.test_mode);
        assert_eq!(config.display_height, 480);
    }
}
