//! Per-slide assembly: text, decoration and diagram placed on the grid.
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::config::DiagramConfig;
use crate::design::{ColorPalette, DesignContext, mix, readable_text_color};
use crate::diagram::{Archetype, DiagramIntent, DiagramSynthesizer, GeometryPlan};
use crate::error::Result;
use crate::layout::{
    Alignment, FONT_BODY, FONT_GIANT, FONT_SUBTITLE, LayoutGrid, LayoutKind, Rect, RegionName, SPACING_UNIT,
    fit_text, optimize_bullets, responsive_font_size,
};
use crate::render::{Decoration, Fill, RenderBackend, RenderedSlide, SlideFrame, TextBlock, TextStyle};

/// Bullets kept on a content slide.
pub const MAX_BULLETS: usize = 6;
/// Characters kept per bullet.
pub const MAX_BULLET_LEN: usize = 120;
/// Bullet count up to which the body font is not scaled down.
const FULL_SIZE_BULLETS: usize = 4;
const TITLE_GRADIENT_ANGLE: f64 = 45.0;
const ACCENT_BAR_WIDTH: f64 = 96.0;
const ACCENT_BAR_HEIGHT: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideKind {
    Title,
    #[default]
    Content,
    Architecture,
    Features,
    Metrics,
    Roadmap,
}

impl FromStr for SlideKind {
    type Err = ();

    /// Accepts `features`, `features_slide` and `features-slide`, any case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase().replace('-', "_");
        let name = lower.strip_suffix("_slide").unwrap_or(&lower);
        match name {
            "title" => Ok(SlideKind::Title),
            "content" => Ok(SlideKind::Content),
            "architecture" => Ok(SlideKind::Architecture),
            "features" => Ok(SlideKind::Features),
            "metrics" => Ok(SlideKind::Metrics),
            "roadmap" => Ok(SlideKind::Roadmap),
            _ => Err(()),
        }
    }
}

/// One slide as delivered by the content producer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SlideSpec {
    pub kind: SlideKind,
    pub title: String,
    pub subtitle: Option<String>,
    pub bullets: Vec<String>,
    pub diagram: Option<DiagramIntent>,
    /// Speaker notes, written to the slide's notes page.
    #[serde(alias = "speaker_notes")]
    pub notes: Option<String>,
}

impl SlideSpec {
    pub fn new(kind: SlideKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_bullets<I, S>(mut self, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bullets = bullets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_diagram(mut self, intent: DiagramIntent) -> Self {
        self.diagram = Some(intent);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A slide laid out and ready to hand to a backend.
#[derive(Debug, PartialEq)]
pub struct PreparedSlide {
    pub frame: SlideFrame,
    pub diagram: Option<GeometryPlan>,
}

#[derive(Debug, Clone, Default)]
pub struct SlideComposer {
    synthesizer: DiagramSynthesizer,
}

impl SlideComposer {
    pub fn new(config: DiagramConfig) -> Self {
        Self {
            synthesizer: DiagramSynthesizer::new(config),
        }
    }

    /// Lay out a slide. Pure: no backend is involved.
    pub fn prepare(&self, spec: &SlideSpec, design: &DesignContext, grid: &LayoutGrid) -> PreparedSlide {
        if spec.kind == SlideKind::Title {
            let mut frame = title_frame(spec, design.palette(), grid);
            frame.notes = speaker_notes(spec);
            return PreparedSlide { frame, diagram: None };
        }

        let palette = design.palette();
        let bullets = optimize_bullets(&spec.bullets, MAX_BULLETS);
        let explicit = spec.diagram.is_some();
        let intent = spec.diagram.clone().or_else(|| default_intent(spec.kind, &bullets));
        let layout = LayoutKind::for_content(false, intent.is_some(), false, false);

        let mut frame = SlideFrame::new(Fill::Solid(palette.background()));
        place_heading(&mut frame, spec, layout, palette, grid);

        let diagram = match intent {
            Some(intent) => {
                let area = layout
                    .region(grid, RegionName::Diagram)
                    .map_or_else(|| grid.diagram_area(), |r| r.bounds);
                let plan = self.synthesizer.synthesize_in(&intent, &spec.title, design, area);
                // derived diagrams already show the bullets
                if explicit {
                    place_caption(&mut frame, bullets.first(), layout, palette, grid);
                }
                Some(plan)
            },
            None => {
                place_body(&mut frame, &bullets, layout, palette, grid);
                None
            },
        };

        frame.notes = speaker_notes(spec);
        PreparedSlide { frame, diagram }
    }

    /// Hand a prepared slide to `backend`.
    pub fn render(
        &self,
        prepared: PreparedSlide,
        backend: &mut dyn RenderBackend,
        palette: &ColorPalette,
    ) -> Result<RenderedSlide> {
        let mut rendered = backend.render_slide(&prepared.frame)?;
        if let Some(plan) = prepared.diagram {
            let shapes = plan.nodes().len() + plan.connectors().len();
            backend.render_diagram(plan, palette)?;
            rendered.shape_count += shapes;
        }
        debug!(index = rendered.index, shapes = rendered.shape_count, "slide composed");
        Ok(rendered)
    }

    pub fn compose(
        &self,
        spec: &SlideSpec,
        design: &DesignContext,
        grid: &LayoutGrid,
        backend: &mut dyn RenderBackend,
    ) -> Result<RenderedSlide> {
        let prepared = self.prepare(spec, design, grid);
        self.render(prepared, backend, design.palette())
    }
}

/// Diagram implied by the slide kind when none is given.
pub fn default_intent(kind: SlideKind, bullets: &[String]) -> Option<DiagramIntent> {
    if bullets.is_empty() {
        return None;
    }
    match kind {
        SlideKind::Title | SlideKind::Content => None,
        SlideKind::Features => Some(DiagramIntent::new(Archetype::List, bullets.iter().cloned())),
        SlideKind::Roadmap => Some(DiagramIntent::new(Archetype::Process, bullets.iter().cloned())),
        SlideKind::Metrics if bullets.len() == 4 => {
            Some(DiagramIntent::new(Archetype::Matrix, bullets.iter().cloned()))
        },
        SlideKind::Metrics => Some(DiagramIntent::new(Archetype::List, bullets.iter().cloned())),
        SlideKind::Architecture => Some(architecture_intent(bullets)),
    }
}

/// Bullets of the form `A -> B` become a hierarchy; anything else a list.
fn architecture_intent(bullets: &[String]) -> DiagramIntent {
    let mut items: Vec<String> = Vec::new();
    let mut edges = Vec::new();
    for bullet in bullets {
        let Some((from, to)) = bullet.split_once("->").or_else(|| bullet.split_once('\u{2192}')) else {
            continue;
        };
        let (from, to) = (from.trim(), to.trim());
        if from.is_empty() || to.is_empty() {
            continue;
        }
        for label in [from, to] {
            if !items.iter().any(|i| i == label) {
                items.push(label.to_string());
            }
        }
        edges.push((from.to_string(), to.to_string()));
    }
    if edges.is_empty() {
        return DiagramIntent::new(Archetype::List, bullets.iter().cloned());
    }
    edges
        .into_iter()
        .fold(DiagramIntent::new(Archetype::Hierarchy, items), |intent, (from, to)| {
            intent.with_edge(from, to)
        })
}

/// Notes with surrounding blank space removed; blank notes are dropped.
fn speaker_notes(spec: &SlideSpec) -> Option<String> {
    spec.notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

fn title_frame(spec: &SlideSpec, palette: &ColorPalette, grid: &LayoutGrid) -> SlideFrame {
    let (start, end) = (palette.gradient_start(), palette.gradient_end());
    let mut frame = SlideFrame::new(Fill::Gradient {
        start,
        end,
        angle: TITLE_GRADIENT_ANGLE,
    });
    let text_color = readable_text_color(mix(start, end, 0.5));

    if let Some(region) = LayoutKind::TitleSlide.region(grid, RegionName::Title) {
        frame.texts.push(
            TextBlock::new(region.bounds, fit_text(&spec.title, 80), FONT_GIANT, text_color)
                .with_style(TextStyle::BOLD)
                .aligned(Alignment::Center),
        );
    }
    let subtitle = spec.subtitle.as_deref().filter(|s| !s.trim().is_empty());
    if let (Some(text), Some(region)) = (subtitle, LayoutKind::TitleSlide.region(grid, RegionName::Subtitle)) {
        frame.texts.push(
            TextBlock::new(region.bounds, fit_text(text, 120), FONT_SUBTITLE, text_color)
                .aligned(Alignment::Center),
        );
    }
    frame
}

fn place_heading(frame: &mut SlideFrame, spec: &SlideSpec, layout: LayoutKind, palette: &ColorPalette, grid: &LayoutGrid) {
    let Some(region) = layout.region(grid, RegionName::Title) else {
        return;
    };
    let bounds = region.bounds;
    let subtitle = spec.subtitle.as_deref().filter(|s| !s.trim().is_empty());
    let title_h = if subtitle.is_some() { bounds.height * 0.6 } else { bounds.height };

    frame.texts.push(
        TextBlock::new(
            Rect::new(bounds.x, bounds.y, bounds.width, title_h),
            fit_text(&spec.title, 80),
            region.font_size_for(&spec.title),
            palette.primary(),
        )
        .with_style(TextStyle::BOLD),
    );
    if let Some(text) = subtitle {
        frame.texts.push(TextBlock::new(
            Rect::new(bounds.x, bounds.y + title_h, bounds.width, bounds.height - title_h),
            fit_text(text, 120),
            responsive_font_size(FONT_SUBTITLE, 0.75),
            palette.text_secondary(),
        ));
    }
    frame.decorations.push(Decoration {
        bounds: Rect::new(bounds.x, bounds.bottom() + SPACING_UNIT, ACCENT_BAR_WIDTH, ACCENT_BAR_HEIGHT),
        fill: palette.accent(),
    });
}

fn place_body(frame: &mut SlideFrame, bullets: &[String], layout: LayoutKind, palette: &ColorPalette, grid: &LayoutGrid) {
    if bullets.is_empty() {
        return;
    }
    let Some(region) = layout.region(grid, RegionName::Content) else {
        return;
    };
    let scale = (FULL_SIZE_BULLETS as f64 / bullets.len() as f64).min(1.0);
    let font_size = responsive_font_size(FONT_BODY, scale).max(region.font_range.0);
    let items = bullets
        .iter()
        .map(|b| fit_text(b, MAX_BULLET_LEN).into_owned())
        .collect();
    frame
        .texts
        .push(TextBlock::bulleted(region.bounds, items, font_size, palette.text_primary()));
}

fn place_caption(
    frame: &mut SlideFrame,
    text: Option<&String>,
    layout: LayoutKind,
    palette: &ColorPalette,
    grid: &LayoutGrid,
) {
    let (Some(text), Some(region)) = (text, layout.region(grid, RegionName::Caption)) else {
        return;
    };
    frame.texts.push(
        TextBlock::new(region.bounds, region.fit(text), region.font_size_for(text), palette.text_secondary())
            .aligned(region.alignment),
    );
}
