//! Rendering backends.
//!
//! A backend receives slides as [`SlideFrame`]s (background, text blocks,
//! decorations in slide points) and diagrams as [`GeometryPlan`]s, and writes
//! one presentation file on [`finalize`](RenderBackend::finalize).
//!
//! Two implementations exist: [`native::NativeBackend`] drives an installed
//! presentation application through an [`AutomationHost`](native::AutomationHost),
//! and [`portable::PortableBackend`] writes the OOXML package itself.
//! [`BackendFactory`] picks one per run.
use std::fmt;
use std::path::{Path, PathBuf};

use bitflags::bitflags;

use crate::design::{ColorPalette, RgbColor};
use crate::diagram::{GeometryPlan, PlanNode};
use crate::error::Result;
use crate::layout::{Alignment, FONT_BODY, Rect, responsive_font_size};

pub mod factory;
pub mod native;
pub mod portable;

pub use factory::BackendFactory;

/// Default typeface for every text run.
pub const DEFAULT_FONT: &str = "Segoe UI";

/// Label size for a diagram node, shrinking with the node.
pub fn node_font_size(node: &PlanNode) -> u32 {
    let scale = (node.bounds.height / 96.0).min(node.bounds.width / 160.0).min(1.0);
    responsive_font_size(FONT_BODY, scale)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Native,
    Portable,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BackendKind::Native => "native",
            BackendKind::Portable => "portable",
        })
    }
}

/// Slide background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(RgbColor),
    /// Linear gradient; `angle` in degrees, 0 meaning left to right.
    Gradient { start: RgbColor, end: RgbColor, angle: f64 },
}

bitflags! {
    /// Character formatting applied to a whole text block.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TextStyle: u8 {
        const BOLD = 0x01;
        const ITALIC = 0x02;
        /// Paragraphs are rendered as a bulleted list.
        const BULLETED = 0x04;
    }
}

/// Positioned text, one entry per paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub bounds: Rect,
    pub paragraphs: Vec<String>,
    pub font_size: u32,
    pub color: RgbColor,
    pub style: TextStyle,
    pub align: Alignment,
}

impl TextBlock {
    pub fn new(bounds: Rect, text: impl Into<String>, font_size: u32, color: RgbColor) -> Self {
        Self {
            bounds,
            paragraphs: vec![text.into()],
            font_size,
            color,
            style: TextStyle::empty(),
            align: Alignment::Left,
        }
    }

    pub fn bulleted(bounds: Rect, items: Vec<String>, font_size: u32, color: RgbColor) -> Self {
        Self {
            bounds,
            paragraphs: items,
            font_size,
            color,
            style: TextStyle::BULLETED,
            align: Alignment::Left,
        }
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style |= style;
        self
    }

    pub fn aligned(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }
}

/// Filled rectangle with no text (accent bars and similar).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decoration {
    pub bounds: Rect,
    pub fill: RgbColor,
}

/// Everything on a slide except its diagram, in slide points.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideFrame {
    pub background: Fill,
    pub texts: Vec<TextBlock>,
    pub decorations: Vec<Decoration>,
    /// Speaker notes; not counted as a shape.
    pub notes: Option<String>,
}

impl SlideFrame {
    pub fn new(background: Fill) -> Self {
        Self {
            background,
            texts: Vec::new(),
            decorations: Vec::new(),
            notes: None,
        }
    }

    /// Shapes a backend creates for this frame.
    pub fn shape_count(&self) -> usize {
        self.texts.len() + self.decorations.len()
    }
}

/// Outcome of rendering one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedSlide {
    /// Zero-based slide position in the deck.
    pub index: usize,
    pub backend: BackendKind,
    /// Shapes placed on the slide, diagram included.
    pub shape_count: usize,
}

/// Sink for slides; one instance per deck.
///
/// Calls are strictly sequential. `render_diagram` draws onto the slide most
/// recently added by `render_slide`.
pub trait RenderBackend: Send {
    fn kind(&self) -> BackendKind;

    /// Append a slide.
    fn render_slide(&mut self, frame: &SlideFrame) -> Result<RenderedSlide>;

    /// Draw `plan` on the current slide, resolving slots through `palette`.
    /// Fails with [`Error::Session`](crate::Error::Session) when no slide exists.
    fn render_diagram(&mut self, plan: GeometryPlan, palette: &ColorPalette) -> Result<()>;

    fn slide_count(&self) -> usize;

    /// Write the deck to `path` and release the backend.
    fn finalize(self: Box<Self>, path: &Path) -> Result<PathBuf>;

    /// Drop the deck without writing anything.
    fn discard(self: Box<Self>);
}
