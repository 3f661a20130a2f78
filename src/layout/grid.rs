//! 8-point layout grid.
//!
//! All geometry is expressed in points as `f64`. Both render backends consume
//! these values unchanged (the portable writer rounds to EMU at the very end),
//! so a node placed here lands on the same coordinate on either backend.
use crate::config::{CanvasConfig, MarginSize};

pub const SPACING_UNIT: f64 = 8.0;
pub const MARGIN_SMALL: f64 = 3.0 * SPACING_UNIT;
pub const MARGIN_MEDIUM: f64 = 5.0 * SPACING_UNIT;
pub const MARGIN_LARGE: f64 = 8.0 * SPACING_UNIT;
pub const GUTTER: f64 = 2.0 * SPACING_UNIT;
pub const COMPONENT_GAP: f64 = 4.0 * SPACING_UNIT;
pub const TITLE_HEIGHT: f64 = 10.0 * SPACING_UNIT;
pub const BASE_LINE_HEIGHT: f64 = 3.0 * SPACING_UNIT;
pub const GRID_COLUMNS: u32 = 12;

/// Smallest font size any responsive computation may return.
pub const MIN_FONT_SIZE: u32 = 10;

pub const FONT_GIANT: u32 = 48;
pub const FONT_LARGE: u32 = 36;
pub const FONT_TITLE: u32 = 32;
pub const FONT_SUBTITLE: u32 = 24;
pub const FONT_BODY: u32 = 18;
pub const FONT_CAPTION: u32 = 14;
pub const FONT_SMALL: u32 = 12;

pub fn margin_for(size: MarginSize) -> f64 {
    match size {
        MarginSize::Small => MARGIN_SMALL,
        MarginSize::Medium => MARGIN_MEDIUM,
        MarginSize::Large => MARGIN_LARGE,
    }
}

/// Axis-aligned rectangle in points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of the given size centered on `(cx, cy)`.
    pub fn centered(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn top_mid(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y)
    }

    pub fn bottom_mid(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.bottom())
    }

    pub fn left_mid(&self) -> Point {
        Point::new(self.x, self.y + self.height / 2.0)
    }

    pub fn right_mid(&self) -> Point {
        Point::new(self.right(), self.y + self.height / 2.0)
    }

    /// Shrink every edge by `amount`.
    pub fn inset(&self, amount: f64) -> Self {
        let dx = amount.min(self.width / 2.0);
        let dy = amount.min(self.height / 2.0);
        Self::new(self.x + dx, self.y + dy, self.width - 2.0 * dx, self.height - 2.0 * dy)
    }

    pub fn contains(&self, other: &Rect) -> bool {
        const EPS: f64 = 1e-6;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Slide canvas with margins and spacing constants. Constant for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutGrid {
    width: f64,
    height: f64,
    margin: f64,
}

impl Default for LayoutGrid {
    fn default() -> Self {
        Self::from_canvas(&CanvasConfig::default())
    }
}

impl LayoutGrid {
    pub fn from_canvas(canvas: &CanvasConfig) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            margin: margin_for(canvas.margin),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Content margin on every side.
    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn gutter(&self) -> f64 {
        GUTTER
    }

    pub fn component_gap(&self) -> f64 {
        COMPONENT_GAP
    }

    pub fn spacing(&self, multiple: u32) -> f64 {
        SPACING_UNIT * multiple as f64
    }

    /// Width spanned by `columns` out of `total_columns`.
    ///
    /// `(width - 2 * margin) * columns / total_columns`. A zero
    /// `total_columns` yields zero and `columns` is capped at the total.
    pub fn grid_width(&self, columns: u32, total_columns: u32) -> f64 {
        if total_columns == 0 {
            return 0.0;
        }
        let columns = columns.min(total_columns);
        self.content_width() * columns as f64 / total_columns as f64
    }

    pub fn content_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    pub fn vertical_rhythm(&self, line_count: u32) -> f64 {
        BASE_LINE_HEIGHT * line_count as f64
    }

    pub fn responsive_font_size(&self, base: u32, scale: f64) -> u32 {
        responsive_font_size(base, scale)
    }

    /// Whole canvas.
    pub fn slide_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Title band at the top of the content margin.
    pub fn title_area(&self) -> Rect {
        Rect::new(self.margin, self.margin, self.content_width(), TITLE_HEIGHT)
    }

    /// Everything below the title band.
    pub fn content_area(&self) -> Rect {
        let y = self.margin + TITLE_HEIGHT + COMPONENT_GAP;
        Rect::new(self.margin, y, self.content_width(), (self.height - self.margin - y).max(0.0))
    }

    /// Content area minus a caption line at the bottom.
    pub fn diagram_area(&self) -> Rect {
        let content = self.content_area();
        let caption = self.vertical_rhythm(2);
        Rect::new(
            content.x,
            content.y,
            content.width,
            (content.height - caption - GUTTER).max(0.0),
        )
    }
}

/// `round(base * scale)`, never below [`MIN_FONT_SIZE`].
pub fn responsive_font_size(base: u32, scale: f64) -> u32 {
    if !scale.is_finite() || scale <= 0.0 {
        return MIN_FONT_SIZE;
    }
    let scaled = (base as f64 * scale).round();
    if scaled >= u32::MAX as f64 {
        return u32::MAX;
    }
    (scaled as u32).max(MIN_FONT_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_width_full_and_half() {
        let grid = LayoutGrid::default();
        assert_eq!(grid.grid_width(12, 12), grid.width() - 2.0 * grid.margin());
        assert_eq!(grid.grid_width(12, 12), 832.0);
        assert_eq!(grid.grid_width(6, 12) * 2.0, grid.grid_width(12, 12));
        assert_eq!(grid.grid_width(3, 12), 208.0);
    }

    #[test]
    fn test_grid_width_degenerate_inputs() {
        let grid = LayoutGrid::default();
        assert_eq!(grid.grid_width(4, 0), 0.0);
        assert_eq!(grid.grid_width(20, 12), grid.grid_width(12, 12));
        assert_eq!(grid.grid_width(0, 12), 0.0);
    }

    #[test]
    fn test_margins_follow_canvas() {
        let canvas = CanvasConfig {
            margin: MarginSize::Small,
            ..CanvasConfig::default()
        };
        let grid = LayoutGrid::from_canvas(&canvas);
        assert_eq!(grid.margin(), 24.0);
        assert_eq!(grid.grid_width(12, 12), 912.0);
        assert!((grid.aspect_ratio() - 16.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_vertical_rhythm_is_on_the_8pt_grid() {
        let grid = LayoutGrid::default();
        for lines in 0..20 {
            assert_eq!(grid.vertical_rhythm(lines) % SPACING_UNIT, 0.0);
        }
        assert_eq!(grid.vertical_rhythm(3), 72.0);
    }

    #[test]
    fn test_responsive_font_floor() {
        assert_eq!(responsive_font_size(18, 1.0), 18);
        assert_eq!(responsive_font_size(18, 0.75), 14);
        assert_eq!(responsive_font_size(18, 0.01), MIN_FONT_SIZE);
        assert_eq!(responsive_font_size(18, 0.0), MIN_FONT_SIZE);
        assert_eq!(responsive_font_size(18, -2.0), MIN_FONT_SIZE);
        assert_eq!(responsive_font_size(18, f64::NAN), MIN_FONT_SIZE);
        assert_eq!(responsive_font_size(32, 1.5), 48);
    }

    #[test]
    fn test_areas_stack_inside_canvas() {
        let grid = LayoutGrid::default();
        let slide = grid.slide_rect();
        let title = grid.title_area();
        let content = grid.content_area();
        let diagram = grid.diagram_area();
        assert!(slide.contains(&title));
        assert!(slide.contains(&content));
        assert!(content.contains(&diagram));
        assert!(content.y >= title.bottom());
        assert_eq!(content.y, 64.0 + 80.0 + 32.0);
    }

    #[test]
    fn test_rect_anchors() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.right_mid(), Point::new(110.0, 45.0));
        assert_eq!(r.bottom_mid(), Point::new(60.0, 70.0));
        assert_eq!(Rect::centered(60.0, 45.0, 100.0, 50.0), r);
        assert_eq!(r.inset(5.0), Rect::new(15.0, 25.0, 90.0, 40.0));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn prop_font_size_never_below_floor(base in 0u32..200, scale in -10.0f64..10.0) {
                prop_assert!(responsive_font_size(base, scale) >= MIN_FONT_SIZE);
            }

            #[test]
            fn prop_grid_width_is_monotonic(columns in 0u32..12) {
                let grid = LayoutGrid::default();
                prop_assert!(grid.grid_width(columns, 12) <= grid.grid_width(columns + 1, 12));
            }
        }
    }
}
