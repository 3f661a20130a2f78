//! Backend that drives an installed presentation application.
//!
//! Slides are added blank and every shape is positioned from the frame. A
//! diagram is drawn in three passes: a SmartArt object of the archetype's
//! layout is inserted with one node per plan node, each node is re-placed and
//! re-colored from the plan, then SmartArt's own transitions are hidden and the
//! plan's connectors are drawn with the host's connector and curve primitives.
use std::path::{Path, PathBuf};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::design::ColorPalette;
use crate::diagram::coloring::node_text_color;
use crate::diagram::{ConnectorKind, GeometryPlan};
use crate::error::{Error, HandshakeError, Result};
use crate::layout::LayoutGrid;
use crate::render::{BackendKind, RenderBackend, RenderedSlide, SlideFrame, node_font_size};

mod host;
mod powershell;
mod script;

pub use host::{AutomationHost, HostCommand, smartart_layout};
pub use powershell::PowerShellHost;

static SESSION_GATE: Mutex<bool> = parking_lot::const_mutex(false);

/// Process-wide claim on the single native session. Released on drop.
#[derive(Debug)]
pub struct SessionLease {
    _private: (),
}

impl SessionLease {
    pub fn acquire() -> std::result::Result<Self, HandshakeError> {
        let mut busy = SESSION_GATE.lock();
        if *busy {
            return Err(HandshakeError::SessionBusy);
        }
        *busy = true;
        Ok(Self { _private: () })
    }
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        *SESSION_GATE.lock() = false;
    }
}

pub struct NativeBackend<H: AutomationHost> {
    host: Mutex<H>,
    slides: usize,
    _lease: SessionLease,
}

impl<H: AutomationHost> NativeBackend<H> {
    /// Claim the session gate, handshake within `timeout` and open an empty
    /// presentation sized to `grid`.
    pub fn connect(mut host: H, grid: &LayoutGrid, timeout: Duration) -> Result<Self> {
        let lease = SessionLease::acquire()?;
        debug!(host = host.name(), ?timeout, "native handshake");
        if let Err(e) = host.handshake(timeout) {
            host.shutdown();
            return Err(e.into());
        }
        if let Err(e) = host.execute(&[HostCommand::NewPresentation {
            width: grid.width(),
            height: grid.height(),
        }]) {
            host.shutdown();
            return Err(e);
        }
        info!(host = host.name(), "native backend connected");
        Ok(Self {
            host: Mutex::new(host),
            slides: 0,
            _lease: lease,
        })
    }

    fn diagram_commands(plan: GeometryPlan, palette: &ColorPalette) -> Vec<HostCommand> {
        let archetype = plan.archetype();
        let area = plan.area();
        let (nodes, connectors) = plan.into_parts();

        let mut commands = Vec::with_capacity(nodes.len() + connectors.len() + 2);
        commands.push(HostCommand::InsertSmartArt {
            layout: smartart_layout(archetype),
            bounds: area,
            labels: nodes.iter().map(|n| n.label.clone()).collect(),
        });
        for (i, node) in nodes.iter().enumerate() {
            commands.push(HostCommand::StyleNode {
                index: i + 1,
                shape: node.shape,
                bounds: node.bounds,
                fill: palette.slot(node.fill),
                opacity: node.opacity,
                text_color: node_text_color(palette, node),
                font_size: node_font_size(node),
            });
        }
        commands.push(HostCommand::HideTransitions);
        for connector in &connectors {
            let color = palette.slot(connector.color);
            commands.push(match connector.kind {
                ConnectorKind::Curved => HostCommand::AddCurve {
                    points: connector.bezier_points(),
                    color,
                    arrow: connector.arrow,
                },
                kind => HostCommand::AddConnector {
                    kind,
                    start: connector.start,
                    end: connector.end,
                    color,
                    arrow: connector.arrow,
                },
            });
        }
        commands
    }
}

impl<H: AutomationHost> RenderBackend for NativeBackend<H> {
    fn kind(&self) -> BackendKind {
        BackendKind::Native
    }

    fn render_slide(&mut self, frame: &SlideFrame) -> Result<RenderedSlide> {
        let index = self.slides;
        let mut commands = Vec::with_capacity(frame.shape_count() + 2);
        commands.push(HostCommand::AddSlide { index: index + 1 });
        commands.push(HostCommand::SetBackground(frame.background));
        commands.extend(frame.decorations.iter().map(|d| HostCommand::AddRectangle {
            bounds: d.bounds,
            color: d.fill,
        }));
        commands.extend(frame.texts.iter().cloned().map(HostCommand::AddTextBox));
        commands.extend(frame.notes.clone().map(HostCommand::SetNotes));

        self.host.lock().execute(&commands)?;
        self.slides += 1;
        debug!(index, shapes = frame.shape_count(), "native slide added");
        Ok(RenderedSlide {
            index,
            backend: BackendKind::Native,
            shape_count: frame.shape_count(),
        })
    }

    fn render_diagram(&mut self, plan: GeometryPlan, palette: &ColorPalette) -> Result<()> {
        if self.slides == 0 {
            return Err(Error::Session("diagram rendered before any slide".to_string()));
        }
        let commands = Self::diagram_commands(plan, palette);
        self.host.lock().execute(&commands)
    }

    fn slide_count(&self) -> usize {
        self.slides
    }

    fn finalize(self: Box<Self>, path: &Path) -> Result<PathBuf> {
        let target = std::path::absolute(path)?;
        let mut host = self.host.into_inner();
        let saved = host.execute(&[HostCommand::SaveAs(target.clone()), HostCommand::Close]);
        host.shutdown();
        saved?;
        info!(path = %target.display(), slides = self.slides, "deck saved by automation host");
        Ok(target)
    }

    fn discard(self: Box<Self>) {
        let mut host = self.host.into_inner();
        if let Err(e) = host.execute(&[HostCommand::Close]) {
            warn!(error = %e, "failed to close native deck");
        }
        host.shutdown();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use super::*;

    /// Serialises tests that claim the process-wide session gate.
    pub(crate) static GATE_TESTS: Mutex<()> = parking_lot::const_mutex(());

    /// Host that records every command it receives.
    #[derive(Debug, Default, Clone)]
    pub(crate) struct RecordingHost {
        pub log: Arc<Mutex<Vec<HostCommand>>>,
        pub refuse: Option<&'static str>,
    }

    impl RecordingHost {
        pub(crate) fn refusing(reason: &'static str) -> Self {
            Self {
                refuse: Some(reason),
                ..Self::default()
            }
        }
    }

    impl AutomationHost for RecordingHost {
        fn name(&self) -> &str {
            "recording"
        }

        fn handshake(&mut self, _timeout: Duration) -> std::result::Result<(), HandshakeError> {
            match self.refuse {
                Some(reason) => Err(HandshakeError::Denied(reason.to_string())),
                None => Ok(()),
            }
        }

        fn execute(&mut self, commands: &[HostCommand]) -> Result<()> {
            self.log.lock().extend_from_slice(commands);
            Ok(())
        }

        fn shutdown(&mut self) {}
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{GATE_TESTS, RecordingHost};
    use super::*;
    use crate::design::{DesignContext, DesignTheme, RgbColor};
    use crate::diagram::{Archetype, DiagramIntent, DiagramSynthesizer};
    use crate::layout::Rect;
    use crate::render::{Fill, TextBlock};

    #[test]
    fn test_gate_allows_one_session() {
        let _serial = GATE_TESTS.lock();
        let grid = LayoutGrid::default();
        let first = NativeBackend::connect(RecordingHost::default(), &grid, Duration::from_secs(1)).unwrap();
        let second = NativeBackend::connect(RecordingHost::default(), &grid, Duration::from_secs(1));
        assert!(matches!(
            second,
            Err(Error::BackendHandshake(HandshakeError::SessionBusy))
        ));
        drop(first);
        assert!(NativeBackend::connect(RecordingHost::default(), &grid, Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn test_refused_handshake_releases_gate() {
        let _serial = GATE_TESTS.lock();
        let grid = LayoutGrid::default();
        let err = NativeBackend::connect(RecordingHost::refusing("no app"), &grid, Duration::from_secs(1)).err();
        assert!(matches!(err, Some(Error::BackendHandshake(HandshakeError::Denied(_)))));
        assert!(SessionLease::acquire().is_ok());
    }

    #[test]
    fn test_diagram_pipeline() {
        let _serial = GATE_TESTS.lock();
        let grid = LayoutGrid::default();
        let design = DesignContext::for_theme(DesignTheme::CorporateModern).unwrap();
        let host = RecordingHost::default();
        let log = host.log.clone();
        let mut backend = Box::new(NativeBackend::connect(host, &grid, Duration::from_secs(1)).unwrap());

        let plan = DiagramSynthesizer::default().synthesize(
            &DiagramIntent::new(Archetype::Cycle, ["a", "b", "c"]),
            &design,
            &grid,
        );
        assert!(matches!(
            backend.render_diagram(plan, design.palette()),
            Err(Error::Session(_))
        ));

        backend.render_slide(&SlideFrame::new(Fill::Solid(RgbColor::WHITE))).unwrap();
        let plan = DiagramSynthesizer::default().synthesize(
            &DiagramIntent::new(Archetype::Cycle, ["a", "b", "c"]),
            &design,
            &grid,
        );
        backend.render_diagram(plan, design.palette()).unwrap();
        backend.discard();

        let log = log.lock();
        assert!(matches!(log[0], HostCommand::NewPresentation { .. }));
        assert!(matches!(log[1], HostCommand::AddSlide { index: 1 }));
        let art = log.iter().position(|c| matches!(c, HostCommand::InsertSmartArt { .. })).unwrap();
        let hide = log.iter().position(|c| matches!(c, HostCommand::HideTransitions)).unwrap();
        let styled = log.iter().filter(|c| matches!(c, HostCommand::StyleNode { .. })).count();
        let curves = log.iter().filter(|c| matches!(c, HostCommand::AddCurve { .. })).count();
        assert!(art < hide);
        assert_eq!(styled, 3);
        assert_eq!(curves, 3);
        assert!(matches!(log.last(), Some(HostCommand::Close)));
    }

    #[test]
    fn test_notes_sent_after_slide_content() {
        let _serial = GATE_TESTS.lock();
        let grid = LayoutGrid::default();
        let host = RecordingHost::default();
        let log = host.log.clone();
        let mut backend = Box::new(NativeBackend::connect(host, &grid, Duration::from_secs(1)).unwrap());

        let mut frame = SlideFrame::new(Fill::Solid(RgbColor::WHITE));
        frame.texts.push(TextBlock::new(Rect::new(0.0, 0.0, 100.0, 40.0), "Title", 32, RgbColor::BLACK));
        frame.notes = Some("Thank the sponsors".to_string());
        let rendered = backend.render_slide(&frame).unwrap();
        assert_eq!(rendered.shape_count, 1);
        backend.render_slide(&SlideFrame::new(Fill::Solid(RgbColor::WHITE))).unwrap();
        backend.discard();

        let log = log.lock();
        let text = log.iter().position(|c| matches!(c, HostCommand::AddTextBox(_))).unwrap();
        let notes: Vec<_> = log
            .iter()
            .enumerate()
            .filter_map(|(i, c)| match c {
                HostCommand::SetNotes(text) => Some((i, text.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].1, "Thank the sponsors");
        assert!(notes[0].0 > text);
        let second = log.iter().position(|c| matches!(c, HostCommand::AddSlide { index: 2 })).unwrap();
        assert!(notes[0].0 < second);
    }
}
