//! Color math: RGB/HSL conversion, harmony, WCAG contrast and luminance.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

/// RGB color with 8-bit channels.
///
/// # Examples
///
/// ```rust
/// use deckwright::design::RgbColor;
///
/// let navy = RgbColor::from_hex("#2C3E50").unwrap();
/// assert_eq!(navy, RgbColor::new(0x2C, 0x3E, 0x50));
/// assert_eq!(navy.to_hex(), "2C3E50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbColor {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor::new(0, 0, 0);
    pub const WHITE: RgbColor = RgbColor::new(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a packed `0xRRGGBB` integer.
    ///
    /// Values above `0xFFFFFF` are clamped to white rather than rejected.
    #[inline]
    pub const fn from_u32(value: u32) -> Self {
        let v = if value > 0xFF_FFFF { 0xFF_FFFF } else { value };
        Self::new((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    #[inline]
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Packed value in the `0xBBGGRR` order used by Office automation.
    #[inline]
    pub const fn to_bgr_u32(self) -> u32 {
        ((self.b as u32) << 16) | ((self.g as u32) << 8) | self.r as u32
    }

    /// Parse `RRGGBB`, `#RRGGBB` or the short `#RGB` form.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        // byte slicing below needs ASCII; also rejects the `+` sign from_str_radix allows
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::new(r, g, b))
            },
            3 => {
                let mut channels = [0u8; 3];
                for (slot, c) in channels.iter_mut().zip(hex.chars()) {
                    let v = c.to_digit(16)? as u8;
                    *slot = v * 17;
                }
                Some(Self::new(channels[0], channels[1], channels[2]))
            },
            _ => None,
        }
    }

    /// Uppercase hex without the `#` prefix, as OOXML `srgbClr` expects.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// WCAG 2.x relative luminance in `[0, 1]`.
    pub fn relative_luminance(self) -> f64 {
        0.2126 * linearize(self.r) + 0.7152 * linearize(self.g) + 0.0722 * linearize(self.b)
    }

    pub fn to_hsl(self) -> Hsl {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let delta = max - min;

        if delta == 0.0 {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let s = delta / (1.0 - (2.0 * l - 1.0).abs());
        let h = if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };

        Hsl {
            h: h.rem_euclid(360.0),
            s: s.clamp(0.0, 1.0),
            l,
        }
    }

    pub fn from_hsl(hsl: Hsl) -> Self {
        let h = hsl.h.rem_euclid(360.0);
        let s = hsl.s.clamp(0.0, 1.0);
        let l = hsl.l.clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
        let m = l - c / 2.0;
        let (r, g, b) = match (h / 60.0) as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self::new(to_channel(r + m), to_channel(g + m), to_channel(b + m))
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for RgbColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s).ok_or_else(|| Error::Design(format!("invalid hex color: {s}")))
    }
}

impl<'de> Deserialize<'de> for RgbColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Hue (degrees), saturation and lightness (both `0..=1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn rotate(self, degrees: f64) -> Self {
        Self {
            h: (self.h + degrees).rem_euclid(360.0),
            ..self
        }
    }
}

/// Shortest angular distance between two hues, in degrees.
pub fn hue_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmonyKind {
    Complementary,
    Triadic,
    Analogous,
}

impl HarmonyKind {
    fn offsets(self) -> &'static [f64] {
        match self {
            HarmonyKind::Complementary => &[180.0],
            HarmonyKind::Triadic => &[120.0, -120.0],
            HarmonyKind::Analogous => &[-30.0, 30.0],
        }
    }
}

/// Colors derived from `base` by the fixed hue rotations of `kind`.
///
/// The base itself is not part of the result.
///
/// ```rust
/// use deckwright::design::{harmony_colors, HarmonyKind, RgbColor};
///
/// let red = RgbColor::new(255, 0, 0);
/// assert_eq!(harmony_colors(red, HarmonyKind::Complementary), vec![RgbColor::new(0, 255, 255)]);
/// assert_eq!(harmony_colors(red, HarmonyKind::Triadic).len(), 2);
/// ```
pub fn harmony_colors(base: RgbColor, kind: HarmonyKind) -> Vec<RgbColor> {
    let hsl = base.to_hsl();
    kind.offsets()
        .iter()
        .map(|&offset| RgbColor::from_hsl(hsl.rotate(offset)))
        .collect()
}

/// WCAG contrast ratio, always `>= 1.0` and symmetric in its arguments.
pub fn contrast_ratio(a: RgbColor, b: RgbColor) -> f64 {
    let la = a.relative_luminance();
    let lb = b.relative_luminance();
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

/// Contrast of `foreground` over `background` without ordering the pair.
///
/// `contrast_ratio_directed(a, b) == 1.0 / contrast_ratio_directed(b, a)`.
pub fn contrast_ratio_directed(foreground: RgbColor, background: RgbColor) -> f64 {
    (foreground.relative_luminance() + 0.05) / (background.relative_luminance() + 0.05)
}

pub const DEFAULT_DARK_THRESHOLD: f64 = 0.5;

pub fn is_dark(color: RgbColor, threshold: f64) -> bool {
    color.relative_luminance() < threshold
}

#[inline]
pub fn is_dark_default(color: RgbColor) -> bool {
    is_dark(color, DEFAULT_DARK_THRESHOLD)
}

/// Black or white, whichever contrasts more with `background`. Ties give black.
pub fn readable_text_color(background: RgbColor) -> RgbColor {
    let on_black = contrast_ratio(RgbColor::BLACK, background);
    let on_white = contrast_ratio(RgbColor::WHITE, background);
    if on_white > on_black {
        RgbColor::WHITE
    } else {
        RgbColor::BLACK
    }
}

/// Linear blend from `a` (t = 0) to `b` (t = 1).
pub fn mix(a: RgbColor, b: RgbColor, t: f64) -> RgbColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let lerp = |x: u8, y: u8| to_channel((x as f64 + (y as f64 - x as f64) * t) / 255.0);
    RgbColor::new(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b))
}

/// Lighten toward white by `amount` in `[0, 1]`.
#[inline]
pub fn tint(color: RgbColor, amount: f64) -> RgbColor {
    mix(color, RgbColor::WHITE, amount)
}

/// Darken toward black by `amount` in `[0, 1]`.
#[inline]
pub fn shade(color: RgbColor, amount: f64) -> RgbColor {
    mix(color, RgbColor::BLACK, amount)
}

#[inline]
fn linearize(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn to_channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_forms() {
        assert_eq!(RgbColor::from_hex("FF0000"), Some(RgbColor::new(255, 0, 0)));
        assert_eq!(RgbColor::from_hex("#0000ff"), Some(RgbColor::new(0, 0, 255)));
        assert_eq!(RgbColor::from_hex("#fa0"), Some(RgbColor::new(0xFF, 0xAA, 0x00)));
        assert_eq!(RgbColor::from_hex("#12345"), None);
        assert_eq!(RgbColor::from_hex("GG0000"), None);
    }

    #[test]
    fn test_from_hex_rejects_non_ascii() {
        // six bytes but only four chars; slicing at byte 2 would split a char
        assert_eq!(RgbColor::from_hex("a\u{e9}\u{e9}a"), None);
        assert_eq!(RgbColor::from_hex("\u{e9}\u{e9}\u{e9}"), None);
        assert_eq!(RgbColor::from_hex("#\u{1F600}ab"), None);
        assert_eq!(RgbColor::from_hex("+F0000"), None);
        assert!("a\u{e9}\u{e9}a".parse::<RgbColor>().is_err());
    }

    #[test]
    fn test_from_u32_clamps() {
        assert_eq!(RgbColor::from_u32(0x3498DB).to_hex(), "3498DB");
        assert_eq!(RgbColor::from_u32(0x1_000_000), RgbColor::WHITE);
        assert_eq!(RgbColor::new(0x11, 0x22, 0x33).to_bgr_u32(), 0x332211);
    }

    #[test]
    fn test_display_uses_hash_prefix() {
        assert_eq!(RgbColor::new(0x2C, 0x3E, 0x50).to_string(), "#2C3E50");
    }

    #[test]
    fn test_hsl_primaries() {
        let hsl = RgbColor::new(0, 255, 0).to_hsl();
        assert_eq!(hsl.h, 120.0);
        assert_eq!(hsl.s, 1.0);
        assert_eq!(hsl.l, 0.5);
        assert_eq!(RgbColor::from_hsl(Hsl { h: 240.0, s: 1.0, l: 0.5 }), RgbColor::new(0, 0, 255));
        assert_eq!(RgbColor::new(128, 128, 128).to_hsl().s, 0.0);
    }

    #[test]
    fn test_harmony_rotations() {
        let red = RgbColor::new(255, 0, 0);
        assert_eq!(
            harmony_colors(red, HarmonyKind::Triadic),
            vec![RgbColor::new(0, 255, 0), RgbColor::new(0, 0, 255)]
        );
        let analogous = harmony_colors(red, HarmonyKind::Analogous);
        assert_eq!(analogous.len(), 2);
        assert_eq!(analogous[0].to_hsl().h.round(), 330.0);
        assert_eq!(analogous[1].to_hsl().h.round(), 30.0);
    }

    #[test]
    fn test_contrast_black_white() {
        let ratio = contrast_ratio(RgbColor::BLACK, RgbColor::WHITE);
        assert!((ratio - 21.0).abs() < 1e-9);
        assert_eq!(contrast_ratio(RgbColor::WHITE, RgbColor::WHITE), 1.0);
    }

    #[test]
    fn test_is_dark_threshold() {
        assert!(is_dark_default(RgbColor::from_u32(0x0A0E27)));
        assert!(!is_dark_default(RgbColor::from_u32(0xF8F9FA)));
        // mid gray sits well below 0.5 luminance
        assert!(is_dark_default(RgbColor::new(128, 128, 128)));
        assert!(!is_dark(RgbColor::new(128, 128, 128), 0.2));
    }

    #[test]
    fn test_readable_text_color() {
        assert_eq!(readable_text_color(RgbColor::from_u32(0x1A1A2E)), RgbColor::WHITE);
        assert_eq!(readable_text_color(RgbColor::from_u32(0xFFE66D)), RgbColor::BLACK);
        assert_eq!(readable_text_color(RgbColor::WHITE), RgbColor::BLACK);
    }

    #[test]
    fn test_tint_and_shade() {
        let base = RgbColor::new(100, 100, 100);
        assert_eq!(tint(base, 0.0), base);
        assert_eq!(tint(base, 1.0), RgbColor::WHITE);
        assert_eq!(shade(base, 1.0), RgbColor::BLACK);
        assert_eq!(shade(base, 0.5), RgbColor::new(50, 50, 50));
        assert_eq!(mix(RgbColor::BLACK, RgbColor::WHITE, 7.0), RgbColor::WHITE);
    }

    #[test]
    fn test_hue_distance_wraps() {
        assert_eq!(hue_distance(350.0, 10.0), 20.0);
        assert_eq!(hue_distance(0.0, 180.0), 180.0);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn any_color() -> impl Strategy<Value = RgbColor> {
            (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| RgbColor::new(r, g, b))
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            #[test]
            fn prop_contrast_with_self_is_one(c in any_color()) {
                prop_assert_eq!(contrast_ratio(c, c), 1.0);
            }

            #[test]
            fn prop_contrast_symmetric(a in any_color(), b in any_color()) {
                prop_assert_eq!(contrast_ratio(a, b), contrast_ratio(b, a));
                let forward = contrast_ratio_directed(a, b);
                let backward = contrast_ratio_directed(b, a);
                prop_assert!((forward - 1.0 / backward).abs() < 1e-12);
                prop_assert!(contrast_ratio(a, b) >= 1.0);
            }

            #[test]
            fn prop_readable_text_has_higher_contrast(bg in any_color()) {
                let chosen = readable_text_color(bg);
                let other = if chosen == RgbColor::BLACK { RgbColor::WHITE } else { RgbColor::BLACK };
                prop_assert!(contrast_ratio(chosen, bg) >= contrast_ratio(other, bg));
            }

            #[test]
            fn prop_hsl_round_trip_is_close(c in any_color()) {
                let back = RgbColor::from_hsl(c.to_hsl());
                prop_assert!((back.r as i16 - c.r as i16).abs() <= 1);
                prop_assert!((back.g as i16 - c.g as i16).abs() <= 1);
                prop_assert!((back.b as i16 - c.b as i16).abs() <= 1);
            }

            #[test]
            fn prop_complement_of_complement_returns_near_base(c in any_color()) {
                let comp = harmony_colors(c, HarmonyKind::Complementary)[0];
                let back = harmony_colors(comp, HarmonyKind::Complementary)[0];
                prop_assert!((back.r as i16 - c.r as i16).abs() <= 2);
                prop_assert!((back.g as i16 - c.g as i16).abs() <= 2);
                prop_assert!((back.b as i16 - c.b as i16).abs() <= 2);
            }
        }
    }
}
