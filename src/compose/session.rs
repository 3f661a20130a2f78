//! Deck session state machine.
//!
//! ```text
//! DeckBuilder ──select_backend()──▶ DeckSession ──finalize()──▶ output path
//!  (Uninitialized)                  (BackendSelected,            (Finalized)
//!                                    Rendering)      ──abort()──▶ discarded
//! ```
//!
//! The backend is chosen once and owned privately by the session; nothing can
//! swap it afterwards.
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::DeckConfig;
use crate::design::{DesignContext, palette_for, select_smart};
use crate::error::{Error, Result};
use crate::layout::LayoutGrid;
use crate::render::native::AutomationHost;
use crate::render::{BackendFactory, BackendKind, RenderBackend, RenderedSlide};

use super::composer::{PreparedSlide, SlideComposer, SlideSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    BackendSelected,
    Rendering,
    Finalized,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionPhase::Uninitialized => "uninitialized",
            SessionPhase::BackendSelected => "backend-selected",
            SessionPhase::Rendering => "rendering",
            SessionPhase::Finalized => "finalized",
        })
    }
}

/// Shared abort switch checked between slides.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Deck before a backend exists.
#[derive(Debug, Clone)]
pub struct DeckBuilder {
    config: DeckConfig,
    design: DesignContext,
    title: String,
}

impl DeckBuilder {
    pub fn new(config: DeckConfig, design: DesignContext) -> Self {
        Self {
            config,
            design,
            title: String::new(),
        }
    }

    /// Validate `config` and resolve the run's design: the configured theme
    /// if any, otherwise smart selection from `text` and `extensions`. A
    /// configured palette replaces the theme's own.
    pub fn from_config<S: AsRef<str>>(config: DeckConfig, text: &str, extensions: &[S]) -> Result<Self> {
        config.validate()?;
        let theme = config.design.theme.unwrap_or_else(|| select_smart(text, extensions));
        let palette = match &config.design.palette {
            Some(builder) => builder.clone().build()?,
            None => palette_for(theme)?,
        };
        info!(theme = %theme, custom_palette = config.design.palette.is_some(), "design resolved");
        Ok(Self::new(config, DesignContext::with_palette(theme, palette)))
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn phase(&self) -> SessionPhase {
        SessionPhase::Uninitialized
    }

    pub fn design(&self) -> &DesignContext {
        &self.design
    }

    /// Select through the default factory (PowerShell host, then portable).
    pub fn select_backend(self) -> Result<DeckSession> {
        let backend = BackendFactory::new(&self.config)
            .with_title(self.title.clone())
            .select(&self.design)?;
        Ok(self.into_session(backend))
    }

    /// Select with a caller-supplied automation host.
    pub fn select_backend_with<H: AutomationHost + 'static>(self, host: H) -> Result<DeckSession> {
        let backend = BackendFactory::with_host(&self.config, host)
            .with_title(self.title.clone())
            .select(&self.design)?;
        Ok(self.into_session(backend))
    }

    /// Skip native automation entirely.
    pub fn select_portable(self) -> Result<DeckSession> {
        let backend = BackendFactory::without_native(&self.config)
            .with_title(self.title.clone())
            .select(&self.design)?;
        Ok(self.into_session(backend))
    }

    fn into_session(self, backend: Box<dyn RenderBackend>) -> DeckSession {
        DeckSession {
            composer: SlideComposer::new(self.config.diagram),
            grid: LayoutGrid::from_canvas(&self.config.canvas),
            design: self.design,
            backend,
            phase: SessionPhase::BackendSelected,
        }
    }
}

/// Deck with its backend; consumed by `finalize` or `abort`.
pub struct DeckSession {
    backend: Box<dyn RenderBackend>,
    composer: SlideComposer,
    design: DesignContext,
    grid: LayoutGrid,
    phase: SessionPhase,
}

impl fmt::Debug for DeckSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeckSession")
            .field("backend", &self.backend.kind())
            .field("slides", &self.backend.slide_count())
            .field("theme", &self.design.theme())
            .field("phase", &self.phase)
            .finish()
    }
}

impl DeckSession {
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn design(&self) -> &DesignContext {
        &self.design
    }

    pub fn grid(&self) -> &LayoutGrid {
        &self.grid
    }

    pub fn slide_count(&self) -> usize {
        self.backend.slide_count()
    }

    /// Compose and render one slide.
    pub fn compose(&mut self, spec: &SlideSpec) -> Result<RenderedSlide> {
        self.phase = SessionPhase::Rendering;
        self.composer
            .compose(spec, &self.design, &self.grid, self.backend.as_mut())
    }

    /// Render every slide in order and write the deck to `path`.
    ///
    /// Preparation runs in parallel on the portable backend; rendering is
    /// always serial. When `cancel` is raised the deck is discarded between
    /// slides and [`Error::Cancelled`] is returned.
    pub fn render_deck(mut self, specs: &[SlideSpec], path: &Path, cancel: &CancelFlag) -> Result<PathBuf> {
        self.phase = SessionPhase::Rendering;
        let prepared: Vec<PreparedSlide> = if self.backend.kind() == BackendKind::Portable {
            specs
                .par_iter()
                .map(|spec| self.composer.prepare(spec, &self.design, &self.grid))
                .collect()
        } else {
            specs
                .iter()
                .map(|spec| self.composer.prepare(spec, &self.design, &self.grid))
                .collect()
        };

        for (i, slide) in prepared.into_iter().enumerate() {
            if cancel.is_cancelled() {
                warn!(rendered = i, total = specs.len(), "render cancelled, discarding deck");
                self.abort();
                return Err(Error::Cancelled);
            }
            if let Err(e) = self
                .composer
                .render(slide, self.backend.as_mut(), self.design.palette())
            {
                self.abort();
                return Err(e);
            }
        }
        if cancel.is_cancelled() {
            self.abort();
            return Err(Error::Cancelled);
        }
        self.finalize(path)
    }

    pub fn finalize(self, path: &Path) -> Result<PathBuf> {
        let slides = self.backend.slide_count();
        let kind = self.backend.kind();
        let written = self.backend.finalize(path)?;
        info!(backend = %kind, slides, phase = %SessionPhase::Finalized, path = %written.display(), "deck finalized");
        Ok(written)
    }

    /// Drop the deck; nothing is written.
    pub fn abort(self) {
        info!(slides = self.backend.slide_count(), "deck aborted");
        self.backend.discard();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::SlideKind;
    use crate::config::DesignConfig;
    use crate::design::{DesignTheme, PaletteSlot, RgbColor};
    use crate::design::PaletteBuilder;

    fn specs() -> Vec<SlideSpec> {
        vec![
            SlideSpec::new(SlideKind::Title, "Deck"),
            SlideSpec::new(SlideKind::Roadmap, "Plan").with_bullets(["Ingest", "Analyze", "Render", "Export"]),
            SlideSpec::new(SlideKind::Content, "Notes").with_bullets(["One", "Two"]),
        ]
    }

    fn portable_session() -> DeckSession {
        let design = DesignContext::for_theme(DesignTheme::CorporateModern).unwrap();
        DeckBuilder::new(DeckConfig::default(), design).select_portable().unwrap()
    }

    #[test]
    fn test_phases() {
        let design = DesignContext::for_theme(DesignTheme::CorporateModern).unwrap();
        let builder = DeckBuilder::new(DeckConfig::default(), design);
        assert_eq!(builder.phase(), SessionPhase::Uninitialized);

        let mut session = builder.select_portable().unwrap();
        assert_eq!(session.phase(), SessionPhase::BackendSelected);
        assert_eq!(session.backend_kind(), BackendKind::Portable);

        let rendered = session.compose(&specs()[1]).unwrap();
        assert_eq!(session.phase(), SessionPhase::Rendering);
        assert_eq!(rendered.index, 0);
        // title text, accent bar, 4 nodes and 3 connectors
        assert_eq!(rendered.shape_count, 9);
        session.abort();
    }

    #[test]
    fn test_render_deck_writes_every_slide() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        let written = portable_session()
            .render_deck(&specs(), &path, &CancelFlag::new())
            .unwrap();
        assert_eq!(written, path);
        assert!(path.exists());
    }

    #[test]
    fn test_cancelled_deck_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        let cancel = CancelFlag::new();
        cancel.cancel();
        let err = portable_session().render_deck(&specs(), &path, &cancel).unwrap_err();
        assert!(matches!(err, Error::Cancelled));
        assert!(!path.exists());
    }

    #[test]
    fn test_from_config_resolves_theme() {
        let builder = DeckBuilder::from_config(DeckConfig::default(), "neural network api", &[".py"]).unwrap();
        assert_eq!(builder.design().theme(), DesignTheme::TechInnovation);

        let config = DeckConfig {
            design: DesignConfig {
                theme: Some(DesignTheme::MinimalistLuxury),
                palette: Some(PaletteBuilder::default().set(PaletteSlot::Accent, RgbColor::new(0xAA, 0x00, 0x00))),
            },
            ..DeckConfig::default()
        };
        let builder = DeckBuilder::from_config(config, "", &[] as &[&str]).unwrap();
        assert_eq!(builder.design().theme(), DesignTheme::MinimalistLuxury);
        assert_eq!(builder.design().palette().accent(), RgbColor::new(0xAA, 0x00, 0x00));
    }
}
