//! Palettes and the theme→palette table.
use std::fmt;

use serde::Deserialize;

use super::color::{RgbColor, contrast_ratio};
use super::theme::DesignTheme;
use crate::error::{Error, Result};

/// WCAG AA threshold for body text.
pub const MIN_TEXT_CONTRAST: f64 = 4.5;

/// Named palette slot. Diagram plans reference colors by slot so that the
/// palette is resolved only at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteSlot {
    Primary,
    Secondary,
    Accent,
    Background,
    TextPrimary,
    TextSecondary,
    Success,
    Warning,
    GradientStart,
    GradientEnd,
}

impl fmt::Display for PaletteSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaletteSlot::Primary => "primary",
            PaletteSlot::Secondary => "secondary",
            PaletteSlot::Accent => "accent",
            PaletteSlot::Background => "background",
            PaletteSlot::TextPrimary => "text_primary",
            PaletteSlot::TextSecondary => "text_secondary",
            PaletteSlot::Success => "success",
            PaletteSlot::Warning => "warning",
            PaletteSlot::GradientStart => "gradient_start",
            PaletteSlot::GradientEnd => "gradient_end",
        };
        f.write_str(name)
    }
}

/// Ten-slot color palette. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    primary: RgbColor,
    secondary: RgbColor,
    accent: RgbColor,
    background: RgbColor,
    text_primary: RgbColor,
    text_secondary: RgbColor,
    success: RgbColor,
    warning: RgbColor,
    gradient_start: RgbColor,
    gradient_end: RgbColor,
}

impl ColorPalette {
    /// Packed `0xRRGGBB` slots in declaration order.
    const fn from_packed(slots: [u32; 10]) -> Self {
        Self {
            primary: RgbColor::from_u32(slots[0]),
            secondary: RgbColor::from_u32(slots[1]),
            accent: RgbColor::from_u32(slots[2]),
            background: RgbColor::from_u32(slots[3]),
            text_primary: RgbColor::from_u32(slots[4]),
            text_secondary: RgbColor::from_u32(slots[5]),
            success: RgbColor::from_u32(slots[6]),
            warning: RgbColor::from_u32(slots[7]),
            gradient_start: RgbColor::from_u32(slots[8]),
            gradient_end: RgbColor::from_u32(slots[9]),
        }
    }

    pub fn builder() -> PaletteBuilder {
        PaletteBuilder::default()
    }

    pub fn slot(&self, slot: PaletteSlot) -> RgbColor {
        match slot {
            PaletteSlot::Primary => self.primary,
            PaletteSlot::Secondary => self.secondary,
            PaletteSlot::Accent => self.accent,
            PaletteSlot::Background => self.background,
            PaletteSlot::TextPrimary => self.text_primary,
            PaletteSlot::TextSecondary => self.text_secondary,
            PaletteSlot::Success => self.success,
            PaletteSlot::Warning => self.warning,
            PaletteSlot::GradientStart => self.gradient_start,
            PaletteSlot::GradientEnd => self.gradient_end,
        }
    }

    pub fn primary(&self) -> RgbColor {
        self.primary
    }

    pub fn secondary(&self) -> RgbColor {
        self.secondary
    }

    pub fn accent(&self) -> RgbColor {
        self.accent
    }

    pub fn background(&self) -> RgbColor {
        self.background
    }

    pub fn text_primary(&self) -> RgbColor {
        self.text_primary
    }

    pub fn text_secondary(&self) -> RgbColor {
        self.text_secondary
    }

    pub fn success(&self) -> RgbColor {
        self.success
    }

    pub fn warning(&self) -> RgbColor {
        self.warning
    }

    pub fn gradient_start(&self) -> RgbColor {
        self.gradient_start
    }

    pub fn gradient_end(&self) -> RgbColor {
        self.gradient_end
    }

    /// Contrast between body text and the slide background.
    pub fn text_contrast(&self) -> f64 {
        contrast_ratio(self.text_primary, self.background)
    }
}

/// Builder for custom palettes. Missing slots are taken from the
/// corporate-modern palette.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PaletteBuilder {
    primary: Option<RgbColor>,
    secondary: Option<RgbColor>,
    accent: Option<RgbColor>,
    background: Option<RgbColor>,
    text_primary: Option<RgbColor>,
    text_secondary: Option<RgbColor>,
    success: Option<RgbColor>,
    warning: Option<RgbColor>,
    gradient_start: Option<RgbColor>,
    gradient_end: Option<RgbColor>,
}

impl PaletteBuilder {
    pub fn set(mut self, slot: PaletteSlot, color: RgbColor) -> Self {
        let field = match slot {
            PaletteSlot::Primary => &mut self.primary,
            PaletteSlot::Secondary => &mut self.secondary,
            PaletteSlot::Accent => &mut self.accent,
            PaletteSlot::Background => &mut self.background,
            PaletteSlot::TextPrimary => &mut self.text_primary,
            PaletteSlot::TextSecondary => &mut self.text_secondary,
            PaletteSlot::Success => &mut self.success,
            PaletteSlot::Warning => &mut self.warning,
            PaletteSlot::GradientStart => &mut self.gradient_start,
            PaletteSlot::GradientEnd => &mut self.gradient_end,
        };
        *field = Some(color);
        self
    }

    /// Build the palette, rejecting text/background pairs below WCAG AA.
    pub fn build(self) -> Result<ColorPalette> {
        let base = CORPORATE_MODERN;
        let palette = ColorPalette {
            primary: self.primary.unwrap_or(base.primary),
            secondary: self.secondary.unwrap_or(base.secondary),
            accent: self.accent.unwrap_or(base.accent),
            background: self.background.unwrap_or(base.background),
            text_primary: self.text_primary.unwrap_or(base.text_primary),
            text_secondary: self.text_secondary.unwrap_or(base.text_secondary),
            success: self.success.unwrap_or(base.success),
            warning: self.warning.unwrap_or(base.warning),
            gradient_start: self.gradient_start.unwrap_or(base.gradient_start),
            gradient_end: self.gradient_end.unwrap_or(base.gradient_end),
        };

        let contrast = palette.text_contrast();
        if contrast < MIN_TEXT_CONTRAST {
            return Err(Error::Design(format!(
                "text {} on background {} has contrast {:.2}, below {}",
                palette.text_primary, palette.background, contrast, MIN_TEXT_CONTRAST
            )));
        }
        Ok(palette)
    }
}

const CORPORATE_MODERN: ColorPalette = ColorPalette::from_packed([
    0x2C3E50, 0x34495E, 0x3498DB, 0xF8F9FA, 0x2C3E50, 0x7F8C8D, 0x27AE60, 0xF39C12, 0x667EEA, 0x764BA2,
]);

const CREATIVE_GRADIENT: ColorPalette = ColorPalette::from_packed([
    0xFF6B6B, 0x4ECDC4, 0xFFE66D, 0x1A1A2E, 0xFFFFFF, 0xE0E0E0, 0x95E1D3, 0xFFA07A, 0xFF6B6B, 0x4ECDC4,
]);

const MINIMALIST_LUXURY: ColorPalette = ColorPalette::from_packed([
    0x1C1C1C, 0xF5F5F5, 0xC9B037, 0xFFFFFF, 0x1C1C1C, 0x666666, 0x28A745, 0xFFC107, 0xC9B037, 0xFFF8DC,
]);

const TECH_INNOVATION: ColorPalette = ColorPalette::from_packed([
    0x0D47A1, 0x1565C0, 0x00E5FF, 0x0A0E27, 0xFFFFFF, 0xB0BEC5, 0x00C853, 0xFF9800, 0x0D47A1, 0x00E5FF,
]);

const ADOBE_INSPIRED: ColorPalette = ColorPalette::from_packed([
    0xFF0000, 0x9900FF, 0xFF6600, 0xF6F6F6, 0x2D2D2D, 0x666666, 0x00CC66, 0xFFCC00, 0xFF0000, 0x9900FF,
]);

const BEHANCE_STYLE: ColorPalette = ColorPalette::from_packed([
    0x053EFF, 0x4A90E2, 0x1769FF, 0xFAFAFA, 0x191919, 0x696969, 0x7ED321, 0xF5A623, 0x053EFF, 0x4A90E2,
]);

static PALETTES: [(DesignTheme, ColorPalette); 6] = [
    (DesignTheme::CorporateModern, CORPORATE_MODERN),
    (DesignTheme::CreativeGradient, CREATIVE_GRADIENT),
    (DesignTheme::MinimalistLuxury, MINIMALIST_LUXURY),
    (DesignTheme::TechInnovation, TECH_INNOVATION),
    (DesignTheme::AdobeInspired, ADOBE_INSPIRED),
    (DesignTheme::BehanceStyle, BEHANCE_STYLE),
];

/// Look up the palette registered for `theme`.
pub fn palette_for(theme: DesignTheme) -> Result<ColorPalette> {
    PALETTES
        .iter()
        .find(|(t, _)| *t == theme)
        .map(|(_, palette)| *palette)
        .ok_or_else(|| Error::UnknownTheme(theme.to_string()))
}

/// Parse a theme tag and look up its palette.
pub fn palette_for_tag(tag: &str) -> Result<ColorPalette> {
    palette_for(tag.parse()?)
}

/// Theme plus its resolved palette, passed explicitly through composition
/// and synthesis for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesignContext {
    theme: DesignTheme,
    palette: ColorPalette,
}

impl DesignContext {
    pub fn for_theme(theme: DesignTheme) -> Result<Self> {
        Ok(Self {
            theme,
            palette: palette_for(theme)?,
        })
    }

    /// Pair a custom palette with the theme whose typography it borrows.
    pub fn with_palette(theme: DesignTheme, palette: ColorPalette) -> Self {
        Self { theme, palette }
    }

    pub fn theme(&self) -> DesignTheme {
        self.theme
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }
}
