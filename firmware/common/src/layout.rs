//! Board geometry.
//!
//! All positions are computed from the station count and the display size
//! only, so the same inputs always produce the same layout.
//!
//! ```text
//! +--------------------------------------------------------------+  y = 0
//! | title  [testMode=ON]                      (icon) HH:MM:SS     |
//! |                                                  vor 15s      |
//! +------------------------------+-------------------------------+  y = HEADER_HEIGHT
//! | station name                 | station name                  |  y = STATION_TOP
//! | walking hint                 | walking hint                  |
//! | (! disruption)               |                               |
//! |                  Abfahrt in: |                  Abfahrt in:  |
//! | [badge] direction       5'   | [badge] direction      12'    |  rows, ROW_HEIGHT apart
//! |                        (+2)  |                               |
//! +------------------------------+-------------------------------+  legend separator
//! | o >Fussweg  o =Fussweg  o <Fussweg  o Stoerung      hint      |
//! +--------------------------------------------------------------+  y = height
//! ```
//!
//! One station spans the full width and may show up to
//! [`SINGLE_COLUMN_ROWS`] rows; two stations split the width with a divider
//! and show up to [`DOUBLE_COLUMN_ROWS`] rows each. A row is laid out only
//! if its badge ends above the legend separator; the spacing below the last
//! badge does not need to fit.

use embedded_graphics::prelude::*;
use heapless::Vec;

use crate::config::{
    BADGE_SIZE,
    CAPTION_HEIGHT,
    COLUMN_PADDING,
    DISRUPTION_HEIGHT,
    DOUBLE_COLUMN_ROWS,
    HEADER_HEIGHT,
    LEGEND_HEIGHT,
    MAX_STATIONS,
    ROW_HEIGHT,
    ROW_INSET,
    SINGLE_COLUMN_ROWS,
    STATION_HEADER_HEIGHT,
    STATION_TOP,
    TIME_AREA_WIDTH,
};

/// Gap between the legend separator and the legend text.
const LEGEND_GAP: i32 = 5;

/// Offset of the walking hint below the station name.
const WALK_OFFSET: i32 = 28;

/// Offset of the disruption warning below the station name.
const WARNING_OFFSET: i32 = 45;

/// Distance of the "Abfahrt in:" caption from the column's right edge.
const CAPTION_RIGHT: i32 = 80;

/// Horizontal gap between badge and direction label.
const BADGE_GAP: i32 = 10;

/// Vertical offset of direction and time inside a row.
const ROW_TEXT_OFFSET: i32 = 5;

/// Vertical offset of the delay annotation inside a row.
const DELAY_OFFSET: i32 = 43;

/// Margin right of the time label.
const TIME_MARGIN: i32 = 5;

// =============================================================================
// Board Layout
// =============================================================================

/// Geometry of one station column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    /// Station index (0 = left).
    pub index: usize,
    /// Left edge.
    pub x: i32,
    /// Column width.
    pub width: u32,
    /// Maximum number of departure rows.
    pub max_rows: usize,
}

/// Column split for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardLayout {
    size: Size,
    columns: Vec<Column, MAX_STATIONS>,
}

impl BoardLayout {
    /// Compute columns for `station_count` stations on a display of `size`.
    ///
    /// Stations beyond [`MAX_STATIONS`] are ignored.
    pub fn compute(
        station_count: usize,
        size: Size,
    ) -> Self {
        let shown = station_count.min(MAX_STATIONS);
        let (width, max_rows) = match shown {
            0 => (0, 0),
            1 => (size.width, SINGLE_COLUMN_ROWS),
            _ => (size.width / shown as u32, DOUBLE_COLUMN_ROWS),
        };

        let mut columns = Vec::new();
        for index in 0..shown {
            columns
                .push(Column {
                    index,
                    x: index as i32 * width as i32,
                    width,
                    max_rows,
                })
                .ok();
        }

        Self { size, columns }
    }

    /// Display size the layout was computed for.
    #[inline]
    pub const fn size(&self) -> Size { self.size }

    /// Station columns, left to right.
    #[inline]
    pub fn columns(&self) -> &[Column] { &self.columns }

    /// X of the vertical divider between the columns, if there are two.
    pub fn divider_x(&self) -> Option<i32> { self.columns.get(1).map(|c| c.x) }

    /// Y of the 2px rule under the header.
    #[inline]
    pub const fn header_rule_y(&self) -> i32 { HEADER_HEIGHT as i32 }

    /// Y of the legend text line.
    #[inline]
    pub const fn legend_y(&self) -> i32 { self.size.height as i32 - LEGEND_HEIGHT as i32 }

    /// Y of the separator above the legend. Rows end above it.
    #[inline]
    pub const fn legend_separator_y(&self) -> i32 { self.legend_y() - LEGEND_GAP }

    /// Header positions and row area of a station in `column`.
    pub fn station_plan(
        &self,
        column: &Column,
        has_warning: bool,
    ) -> StationPlan {
        let text_x = column.x + COLUMN_PADDING;
        let warning_origin = has_warning.then(|| Point::new(text_x, STATION_TOP + WARNING_OFFSET));
        let header_bottom = STATION_TOP + if has_warning { DISRUPTION_HEIGHT } else { 0 } + STATION_HEADER_HEIGHT;
        let rows_top = header_bottom + CAPTION_HEIGHT;

        let space = (self.legend_separator_y() - rows_top).max(0) as u32;
        let fitting = if space >= BADGE_SIZE { ((space - BADGE_SIZE) / ROW_HEIGHT + 1) as usize } else { 0 };

        StationPlan {
            name_origin: Point::new(text_x, STATION_TOP),
            walk_origin: Point::new(text_x, STATION_TOP + WALK_OFFSET),
            warning_origin,
            caption_origin: Point::new(column.x + column.width as i32 - CAPTION_RIGHT, header_bottom),
            empty_origin: Point::new(column.x + 2 * ROW_INSET, rows_top),
            row_x: column.x + ROW_INSET,
            row_width: column.width.saturating_sub(2 * ROW_INSET as u32),
            rows_top,
            visible_rows: column.max_rows.min(fitting),
        }
    }
}

// =============================================================================
// Station Plan
// =============================================================================

/// Positions inside one station column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StationPlan {
    pub name_origin: Point,
    pub walk_origin: Point,
    /// Present only when the station shows a disruption warning.
    pub warning_origin: Option<Point>,
    pub caption_origin: Point,
    /// Where "Keine Abfahrten" goes when there is nothing to list.
    pub empty_origin: Point,
    pub row_x: i32,
    pub row_width: u32,
    pub rows_top: i32,
    /// Rows that can be drawn: the column maximum, limited by the legend.
    pub visible_rows: usize,
}

impl StationPlan {
    /// Geometry of the row in `slot` (0 = top), or `None` past the visible rows.
    pub fn row(
        &self,
        slot: usize,
    ) -> Option<RowGeometry> {
        (slot < self.visible_rows).then(|| RowGeometry {
            origin: Point::new(self.row_x, self.rows_top + (slot as u32 * ROW_HEIGHT) as i32),
            width: self.row_width,
        })
    }
}

// =============================================================================
// Row Geometry
// =============================================================================

/// Placement of one departure row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowGeometry {
    /// Top-left corner; the badge sits here.
    pub origin: Point,
    /// Usable row width.
    pub width: u32,
}

impl RowGeometry {
    /// Top-left of the direction viewport.
    pub fn direction_origin(&self) -> Point { self.origin + Point::new(BADGE_SIZE as i32 + BADGE_GAP, ROW_TEXT_OFFSET) }

    /// Width of the direction viewport.
    pub fn direction_width(&self) -> u32 { self.width.saturating_sub(BADGE_SIZE + TIME_AREA_WIDTH) }

    /// Top-left of a right-aligned time label `time_width` pixels wide.
    pub fn time_origin(
        &self,
        time_width: u32,
    ) -> Point {
        Point::new(
            self.origin.x + self.width as i32 - time_width as i32 - TIME_MARGIN,
            self.origin.y + ROW_TEXT_OFFSET,
        )
    }

    /// Top-left of the delay annotation, aligned with the time label.
    pub fn delay_origin(
        &self,
        time_width: u32,
    ) -> Point {
        Point::new(self.time_origin(time_width).x, self.origin.y + DELAY_OFFSET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

    const SCREEN: Size = Size::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    const TALL: Size = Size::new(800, 800);

    #[test]
    fn test_no_stations_no_columns() {
        let layout = BoardLayout::compute(0, SCREEN);
        assert!(layout.columns().is_empty());
        assert_eq!(layout.divider_x(), None);
    }

    #[test]
    fn test_single_station_full_width() {
        let layout = BoardLayout::compute(1, SCREEN);
        assert_eq!(layout.columns().len(), 1);
        let col = layout.columns()[0];
        assert_eq!((col.x, col.width, col.max_rows), (0, 800, 8));
        assert_eq!(layout.divider_x(), None);
    }

    #[test]
    fn test_two_stations_split_with_divider() {
        let layout = BoardLayout::compute(2, SCREEN);
        let cols = layout.columns();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].width, cols[1].width);
        assert_eq!((cols[0].x, cols[1].x), (0, 400));
        assert!(cols.iter().all(|c| c.max_rows == 5));
        assert_eq!(layout.divider_x(), Some(400));
    }

    #[test]
    fn test_extra_stations_truncated() {
        assert_eq!(BoardLayout::compute(5, SCREEN), BoardLayout::compute(2, SCREEN));
    }

    #[test]
    fn test_rows_have_constant_height() {
        let layout = BoardLayout::compute(1, TALL);
        let plan = layout.station_plan(&layout.columns()[0], false);
        assert_eq!(plan.visible_rows, 8);
        let ys: std::vec::Vec<i32> = (0..plan.visible_rows).map(|s| plan.row(s).unwrap().origin.y).collect();
        assert!(ys.windows(2).all(|w| w[1] - w[0] == ROW_HEIGHT as i32));
        assert!(plan.row(8).is_none());
    }

    #[test]
    fn test_station_header_positions() {
        let layout = BoardLayout::compute(2, SCREEN);
        let right = layout.columns()[1];

        let plain = layout.station_plan(&right, false);
        assert_eq!(plain.name_origin, Point::new(415, 50));
        assert_eq!(plain.walk_origin, Point::new(415, 78));
        assert_eq!(plain.warning_origin, None);
        assert_eq!(plain.caption_origin, Point::new(720, 110));
        assert_eq!(plain.rows_top, 128);

        let warned = layout.station_plan(&right, true);
        assert_eq!(warned.warning_origin, Some(Point::new(415, 95)));
        assert_eq!(warned.rows_top, plain.rows_top + DISRUPTION_HEIGHT);
    }

    #[test]
    fn test_rows_stop_above_legend() {
        let layout = BoardLayout::compute(1, SCREEN);
        let plan = layout.station_plan(&layout.columns()[0], false);
        assert!(plan.visible_rows < SINGLE_COLUMN_ROWS);
        let last = plan.row(plan.visible_rows - 1).unwrap();
        assert!(last.origin.y + BADGE_SIZE as i32 <= layout.legend_separator_y());
        assert!(last.origin.y + (ROW_HEIGHT + BADGE_SIZE) as i32 > layout.legend_separator_y());
    }

    #[test]
    fn test_two_columns_with_warning_keep_five_rows() {
        let layout = BoardLayout::compute(2, SCREEN);
        for column in layout.columns() {
            let warned = layout.station_plan(column, true);
            assert_eq!(warned.rows_top, 153);
            assert_eq!(warned.visible_rows, DOUBLE_COLUMN_ROWS);
            let last = warned.row(DOUBLE_COLUMN_ROWS - 1).unwrap();
            assert_eq!(last.origin.y, 393);
            assert!(last.origin.y + BADGE_SIZE as i32 <= layout.legend_separator_y());
            assert_eq!(layout.station_plan(column, false).visible_rows, DOUBLE_COLUMN_ROWS);
        }
    }

    #[test]
    fn test_short_display_fits_partial_row_area() {
        // 153 + 45 = 198 is the separator: exactly one badge fits.
        let layout = BoardLayout::compute(2, Size::new(800, 228));
        assert_eq!(layout.legend_separator_y(), 198);
        let plan = layout.station_plan(&layout.columns()[0], true);
        assert_eq!(plan.visible_rows, 1);

        let lower = BoardLayout::compute(2, Size::new(800, 227));
        assert_eq!(lower.station_plan(&lower.columns()[0], true).visible_rows, 0);
    }

    #[test]
    fn test_tiny_display_has_no_rows() {
        let layout = BoardLayout::compute(1, Size::new(200, 100));
        let plan = layout.station_plan(&layout.columns()[0], true);
        assert_eq!(plan.visible_rows, 0);
        assert!(plan.row(0).is_none());
    }

    #[test]
    fn test_row_geometry() {
        let layout = BoardLayout::compute(2, SCREEN);
        let plan = layout.station_plan(&layout.columns()[0], false);
        let row = plan.row(0).unwrap();
        assert_eq!(row.origin, Point::new(10, 128));
        assert_eq!(row.width, 380);
        assert_eq!(row.direction_origin(), Point::new(65, 133));
        assert_eq!(row.direction_width(), 380 - 45 - 105);
        assert_eq!(row.time_origin(30), Point::new(10 + 380 - 30 - 5, 133));
        assert_eq!(row.delay_origin(30).y, 128 + 43);
    }
}
