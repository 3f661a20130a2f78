//! Color system, palettes, themes and theme selection.
//!
//! Everything here is pure and deterministic. Palettes are immutable `Copy`
//! values, so a [`DesignContext`] can be shared across threads freely once a
//! theme is chosen for the run.

pub mod color;
pub mod palette;
pub mod selector;
pub mod theme;

pub use color::{
    HarmonyKind, Hsl, RgbColor, contrast_ratio, contrast_ratio_directed, harmony_colors, is_dark,
    is_dark_default, mix, readable_text_color, shade, tint,
};
pub use palette::{
    ColorPalette, DesignContext, MIN_TEXT_CONTRAST, PaletteBuilder, PaletteSlot, palette_for,
    palette_for_tag,
};
pub use selector::{select_by_file_types, select_by_keywords, select_smart};
pub use theme::DesignTheme;
