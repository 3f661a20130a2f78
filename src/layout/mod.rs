//! Grid layout, slide regions and text fitting.

pub mod grid;
pub mod regions;

pub use grid::{
    BASE_LINE_HEIGHT, COMPONENT_GAP, FONT_BODY, FONT_CAPTION, FONT_GIANT, FONT_LARGE, FONT_SMALL,
    FONT_SUBTITLE, FONT_TITLE, GRID_COLUMNS, GUTTER, LayoutGrid, MIN_FONT_SIZE, Point, Rect,
    SPACING_UNIT, margin_for, responsive_font_size,
};
pub use regions::{Alignment, LayoutKind, Region, RegionName, clean_text, fit_text, optimize_bullets};
