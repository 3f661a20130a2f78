//! Backend that writes the `.pptx` package directly.
//!
//! Slides are kept as [`SlidePart`]s until [`finalize`](RenderBackend::finalize),
//! which serialises them and writes the whole package in one pass.
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::design::{ColorPalette, DesignContext};
use crate::diagram::GeometryPlan;
use crate::error::{Error, Result};
use crate::layout::LayoutGrid;
use crate::render::{BackendKind, RenderBackend, RenderedSlide, SlideFrame};

mod package;
mod shape;
mod slide;
mod template;

use package::Package;
use slide::SlidePart;

#[derive(Debug)]
pub struct PortableBackend {
    width: f64,
    height: f64,
    design: DesignContext,
    title: String,
    slides: Vec<SlidePart>,
}

impl PortableBackend {
    /// Fails when the canvas has no usable size.
    pub fn new(grid: &LayoutGrid, design: &DesignContext) -> Result<Self> {
        let (width, height) = (grid.width(), grid.height());
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::Render(format!("invalid canvas {width}x{height}")));
        }
        Ok(Self {
            width,
            height,
            design: *design,
            title: String::new(),
            slides: Vec::new(),
        })
    }

    /// Document title stored in the package properties.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl RenderBackend for PortableBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Portable
    }

    fn render_slide(&mut self, frame: &SlideFrame) -> Result<RenderedSlide> {
        let part = SlidePart::from_frame(frame);
        let rendered = RenderedSlide {
            index: self.slides.len(),
            backend: BackendKind::Portable,
            shape_count: part.shape_count(),
        };
        self.slides.push(part);
        debug!(index = rendered.index, shapes = rendered.shape_count, "portable slide added");
        Ok(rendered)
    }

    fn render_diagram(&mut self, plan: GeometryPlan, palette: &ColorPalette) -> Result<()> {
        let slide = self
            .slides
            .last_mut()
            .ok_or_else(|| Error::Session("diagram rendered before any slide".to_string()))?;
        let archetype = plan.archetype();
        let added = slide.add_diagram(plan, palette);
        debug!(%archetype, shapes = added, "portable diagram added");
        Ok(())
    }

    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn finalize(self: Box<Self>, path: &Path) -> Result<PathBuf> {
        let package = Package {
            title: &self.title,
            theme_name: self.design.theme().display_name(),
            width: self.width,
            height: self.height,
            palette: self.design.palette(),
            slides: &self.slides,
        };
        package.write_to(path)?;
        let written = std::path::absolute(path)?;
        info!(path = %written.display(), slides = self.slides.len(), "deck written");
        Ok(written)
    }

    fn discard(self: Box<Self>) {
        debug!(slides = self.slides.len(), "portable deck discarded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CanvasConfig;
    use crate::design::{DesignTheme, RgbColor};
    use crate::diagram::{Archetype, DiagramIntent, DiagramSynthesizer};
    use crate::render::Fill;

    fn design() -> DesignContext {
        DesignContext::for_theme(DesignTheme::CorporateModern).unwrap()
    }

    #[test]
    fn test_rejects_empty_canvas() {
        let canvas = CanvasConfig {
            width: 0.0,
            ..CanvasConfig::default()
        };
        let err = PortableBackend::new(&LayoutGrid::from_canvas(&canvas), &design()).unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }

    #[test]
    fn test_diagram_needs_a_slide() {
        let grid = LayoutGrid::default();
        let design = design();
        let mut backend = PortableBackend::new(&grid, &design).unwrap();
        let plan = DiagramSynthesizer::default().synthesize(
            &DiagramIntent::new(Archetype::List, ["a"]),
            &design,
            &grid,
        );
        let err = backend.render_diagram(plan, design.palette()).unwrap_err();
        assert!(matches!(err, Error::Session(_)));
    }

    #[test]
    fn test_finalize_writes_file() {
        let grid = LayoutGrid::default();
        let design = design();
        let mut backend = Box::new(PortableBackend::new(&grid, &design).unwrap().with_title("Test"));
        let rendered = backend.render_slide(&SlideFrame::new(Fill::Solid(RgbColor::WHITE))).unwrap();
        assert_eq!(rendered.index, 0);
        assert_eq!(backend.slide_count(), 1);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        let written = backend.finalize(&path).unwrap();
        assert_eq!(written, path);
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_finalize_returns_absolute_path() {
        let grid = LayoutGrid::default();
        let design = design();
        let mut backend = Box::new(PortableBackend::new(&grid, &design).unwrap());
        backend.render_slide(&SlideFrame::new(Fill::Solid(RgbColor::WHITE))).unwrap();

        // relative to the working directory, which is the crate root under cargo test
        let dir = tempfile::tempdir_in(".").unwrap();
        let name = dir.path().file_name().unwrap();
        let relative = std::path::Path::new(name).join("deck.pptx");
        assert!(relative.is_relative());

        let written = backend.finalize(&relative).unwrap();
        assert!(written.is_absolute());
        assert!(written.ends_with(&relative));
        assert!(written.exists());
    }
}
