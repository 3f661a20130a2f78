//! Design themes.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

/// Named design variants. Each maps to exactly one palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DesignTheme {
    #[default]
    CorporateModern,
    CreativeGradient,
    MinimalistLuxury,
    TechInnovation,
    AdobeInspired,
    BehanceStyle,
}

impl DesignTheme {
    pub const ALL: [DesignTheme; 6] = [
        DesignTheme::CorporateModern,
        DesignTheme::CreativeGradient,
        DesignTheme::MinimalistLuxury,
        DesignTheme::TechInnovation,
        DesignTheme::AdobeInspired,
        DesignTheme::BehanceStyle,
    ];

    /// Tie-break order used by the selectors. The first entry is the fallback.
    pub const PRIORITY: [DesignTheme; 6] = [
        DesignTheme::CorporateModern,
        DesignTheme::TechInnovation,
        DesignTheme::CreativeGradient,
        DesignTheme::MinimalistLuxury,
        DesignTheme::AdobeInspired,
        DesignTheme::BehanceStyle,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            DesignTheme::CorporateModern => "corporate-modern",
            DesignTheme::CreativeGradient => "creative-gradient",
            DesignTheme::MinimalistLuxury => "minimalist-luxury",
            DesignTheme::TechInnovation => "tech-innovation",
            DesignTheme::AdobeInspired => "adobe-inspired",
            DesignTheme::BehanceStyle => "behance-style",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DesignTheme::CorporateModern => "Corporate Modern",
            DesignTheme::CreativeGradient => "Creative Gradient",
            DesignTheme::MinimalistLuxury => "Minimalist Luxury",
            DesignTheme::TechInnovation => "Tech Innovation",
            DesignTheme::AdobeInspired => "Adobe Inspired",
            DesignTheme::BehanceStyle => "Behance Style",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DesignTheme::CorporateModern => "Professional business design with clean lines and modern typography",
            DesignTheme::CreativeGradient => "Vibrant gradient design for creative and design-focused projects",
            DesignTheme::MinimalistLuxury => "Elegant minimalist design with premium typography and spacing",
            DesignTheme::TechInnovation => "Futuristic design for technology and software projects",
            DesignTheme::AdobeInspired => "Bold creative-suite styling for media and design tooling",
            DesignTheme::BehanceStyle => "Portfolio-style layout for showcases and case studies",
        }
    }

    pub fn mood(&self) -> &'static str {
        match self {
            DesignTheme::CorporateModern => "trustworthy",
            DesignTheme::CreativeGradient => "energetic",
            DesignTheme::MinimalistLuxury => "refined",
            DesignTheme::TechInnovation => "futuristic",
            DesignTheme::AdobeInspired => "bold",
            DesignTheme::BehanceStyle => "polished",
        }
    }

    /// Position in [`DesignTheme::PRIORITY`]; lower wins ties.
    pub(crate) fn priority(&self) -> usize {
        Self::PRIORITY.iter().position(|t| t == self).unwrap_or(usize::MAX)
    }
}

impl fmt::Display for DesignTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DesignTheme {
    type Err = Error;

    /// Accepts kebab-case, snake_case and any letter case.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|t| t.tag() == normalized)
            .ok_or_else(|| Error::UnknownTheme(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for DesignTheme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
