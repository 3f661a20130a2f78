//! Deck configuration loaded from YAML.
//!
//! Every section has defaults, so an empty document is a valid configuration.
//!
//! ```yaml
//! canvas:
//!   width: 960
//!   height: 540
//!   margin: large
//! render:
//!   prefer_native: true
//!   handshake_timeout_ms: 15000
//! diagram:
//!   max_per_row: 6
//!   overflow: wrap
//! logging:
//!   filter: info
//! ```
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::design::{DesignTheme, PaletteBuilder};

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    pub canvas: CanvasConfig,
    pub design: DesignConfig,
    pub render: RenderConfig,
    pub diagram: DiagramConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginSize {
    Small,
    Medium,
    #[default]
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Slide width in points.
    pub width: f64,
    /// Slide height in points.
    pub height: f64,
    /// Margin used for content and grid columns.
    pub margin: MarginSize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 540.0,
            margin: MarginSize::Large,
        }
    }
}

/// Theme choice for the run. When `theme` is unset the selectors decide.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    pub theme: Option<DesignTheme>,
    /// Slot overrides applied on top of the corporate palette.
    pub palette: Option<PaletteBuilder>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub prefer_native: bool,
    pub handshake_timeout_ms: u64,
    pub command_timeout_ms: u64,
    /// Executable used by the native automation host.
    pub powershell: PathBuf,
}

impl RenderConfig {
    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            prefer_native: true,
            handshake_timeout_ms: 15_000,
            command_timeout_ms: 60_000,
            powershell: PathBuf::from("powershell"),
        }
    }
}

/// What happens when a row-based diagram has more items than fit in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Continue on additional rows.
    #[default]
    Wrap,
    /// Keep `max_per_row - 1` items and add a "+K more" node.
    Truncate,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub max_per_row: usize,
    pub overflow: OverflowPolicy,
    pub min_card_width: f64,
    pub min_card_height: f64,
    pub max_card_width: f64,
    pub max_card_height: f64,
    /// Width ratio between a pyramid level and the level above it.
    pub pyramid_ratio: f64,
    /// Overlap depth of Venn circles as a fraction of their radius.
    pub venn_overlap: f64,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            max_per_row: 6,
            overflow: OverflowPolicy::Wrap,
            min_card_width: 96.0,
            min_card_height: 48.0,
            max_card_width: 240.0,
            max_card_height: 120.0,
            pyramid_ratio: 1.15,
            venn_overlap: 0.35,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl DeckConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DeckConfig = if content.trim().is_empty() {
            DeckConfig::default()
        } else {
            serde_saphyr::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_canvas(&self.canvas)?;
        validate_render(&self.render)?;
        validate_diagram(&self.diagram)?;
        Ok(())
    }
}

/// Load deck configuration from a YAML file.
pub fn load_config(path: &Path) -> Result<DeckConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    DeckConfig::from_yaml_str(&content)
}

#[inline]
fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn validate_canvas(canvas: &CanvasConfig) -> Result<(), ConfigError> {
    if !positive(canvas.width) || !positive(canvas.height) {
        return Err(ConfigError::Invalid(
            "canvas.width and canvas.height must be > 0".to_string(),
        ));
    }
    let margin = crate::layout::margin_for(canvas.margin);
    if canvas.width <= 2.0 * margin || canvas.height <= 2.0 * margin {
        return Err(ConfigError::Invalid(format!(
            "canvas must be larger than twice the {margin}pt margin"
        )));
    }
    Ok(())
}

fn validate_render(render: &RenderConfig) -> Result<(), ConfigError> {
    if render.handshake_timeout_ms == 0 {
        return Err(ConfigError::Invalid(
            "render.handshake_timeout_ms must be > 0".to_string(),
        ));
    }
    if render.command_timeout_ms == 0 {
        return Err(ConfigError::Invalid(
            "render.command_timeout_ms must be > 0".to_string(),
        ));
    }
    if render.powershell.as_os_str().is_empty() {
        return Err(ConfigError::Invalid(
            "render.powershell must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_diagram(diagram: &DiagramConfig) -> Result<(), ConfigError> {
    if diagram.max_per_row < 2 {
        return Err(ConfigError::Invalid(
            "diagram.max_per_row must be >= 2".to_string(),
        ));
    }
    if !positive(diagram.min_card_width) || !positive(diagram.min_card_height) {
        return Err(ConfigError::Invalid(
            "diagram.min_card_width and diagram.min_card_height must be > 0".to_string(),
        ));
    }
    if diagram.max_card_width < diagram.min_card_width
        || diagram.max_card_height < diagram.min_card_height
    {
        return Err(ConfigError::Invalid(
            "diagram max card size must not be below the min card size".to_string(),
        ));
    }
    if !diagram.pyramid_ratio.is_finite() || diagram.pyramid_ratio <= 1.0 {
        return Err(ConfigError::Invalid(
            "diagram.pyramid_ratio must be > 1".to_string(),
        ));
    }
    if !positive(diagram.venn_overlap) || diagram.venn_overlap >= 1.0 {
        return Err(ConfigError::Invalid(
            "diagram.venn_overlap must be within (0, 1)".to_string(),
        ));
    }
    Ok(())
}
