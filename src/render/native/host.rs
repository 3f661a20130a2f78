//! Automation host contract and the command model sent through it.
use std::path::PathBuf;
use std::time::Duration;

use crate::design::RgbColor;
use crate::diagram::{Archetype, ArrowHead, ConnectorKind, NodeShape};
use crate::error::{HandshakeError, Result};
use crate::layout::{Point, Rect};
use crate::render::{Fill, TextBlock};

/// SmartArt layout inserted for an archetype before its nodes are re-placed.
pub fn smartart_layout(archetype: Archetype) -> &'static str {
    match archetype {
        Archetype::List => "urn:microsoft.com/office/officeart/2005/8/layout/default",
        Archetype::Process => "urn:microsoft.com/office/officeart/2005/8/layout/process1",
        Archetype::Cycle => "urn:microsoft.com/office/officeart/2005/8/layout/cycle2",
        Archetype::Hierarchy => "urn:microsoft.com/office/officeart/2005/8/layout/orgChart1",
        Archetype::Relationship => "urn:microsoft.com/office/officeart/2005/8/layout/venn1",
        Archetype::Matrix => "urn:microsoft.com/office/officeart/2005/8/layout/matrix3",
        Archetype::Pyramid => "urn:microsoft.com/office/officeart/2005/8/layout/pyramid1",
    }
}

/// One drawing instruction. The host keeps "current presentation", "current
/// slide" and "current SmartArt" state between commands.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    NewPresentation { width: f64, height: f64 },
    /// Add a blank slide at a 1-based position and make it current.
    AddSlide { index: usize },
    SetBackground(Fill),
    AddRectangle { bounds: Rect, color: RgbColor },
    AddTextBox(TextBlock),
    /// Insert a SmartArt object with one node per label and make it current.
    InsertSmartArt {
        layout: &'static str,
        bounds: Rect,
        labels: Vec<String>,
    },
    /// Re-place and re-color a node (1-based) of the current SmartArt.
    StyleNode {
        index: usize,
        shape: NodeShape,
        bounds: Rect,
        fill: RgbColor,
        opacity: f64,
        text_color: RgbColor,
        font_size: u32,
    },
    /// Hide every SmartArt part that is not a node.
    HideTransitions,
    AddConnector {
        kind: ConnectorKind,
        start: Point,
        end: Point,
        color: RgbColor,
        arrow: ArrowHead,
    },
    AddCurve {
        points: [Point; 4],
        color: RgbColor,
        arrow: ArrowHead,
    },
    /// Replace the speaker notes of the current slide.
    SetNotes(String),
    SaveAs(PathBuf),
    Close,
}

/// A process that can drive an installed presentation application.
pub trait AutomationHost: Send {
    fn name(&self) -> &str;

    /// Start the application and wait until it answers, at most `timeout`.
    fn handshake(&mut self, timeout: Duration) -> std::result::Result<(), HandshakeError>;

    /// Run a batch of commands in order. A failing command aborts the batch.
    fn execute(&mut self, commands: &[HostCommand]) -> Result<()>;

    /// Release the application. Safe to call more than once.
    fn shutdown(&mut self);
}
