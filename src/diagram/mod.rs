//! Diagram synthesis.
//!
//! Content arrives as a [`DiagramIntent`]: labels, optional labelled edges and
//! an optional archetype tag. The synthesizer classifies it when no tag is
//! given, validates it into a [`DiagramSpec`], and lays it out as a
//! [`GeometryPlan`] in slide points with palette slot references for color.
//!
//! ```rust
//! use deckwright::design::{DesignContext, DesignTheme};
//! use deckwright::diagram::{Archetype, DiagramIntent, DiagramSynthesizer};
//! use deckwright::layout::LayoutGrid;
//!
//! let design = DesignContext::for_theme(DesignTheme::CorporateModern).unwrap();
//! let synth = DiagramSynthesizer::default();
//! let intent = DiagramIntent::new(Archetype::Process, ["Ingest", "Analyze", "Render"]);
//! let plan = synth.synthesize(&intent, &design, &LayoutGrid::default());
//! assert_eq!(plan.nodes().len(), 3);
//! assert_eq!(plan.connectors().len(), 2);
//! ```
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::DiagramSpecError;

pub mod classify;
pub mod coloring;
pub mod geometry;
mod layouts;
pub mod spec;
pub mod synth;

pub use classify::classify;
pub use geometry::{
    ArrowHead, Connector, ConnectorKind, FallbackReason, GeometryPlan, NodeShape, PlanNode,
};
pub use spec::{DiagramIntent, DiagramSpec, Edge, IntentEdge};
pub use synth::DiagramSynthesizer;

/// The seven diagram shapes content can be rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    List,
    Hierarchy,
    Process,
    Cycle,
    Relationship,
    Matrix,
    Pyramid,
}

impl Archetype {
    pub const ALL: [Archetype; 7] = [
        Archetype::List,
        Archetype::Hierarchy,
        Archetype::Process,
        Archetype::Cycle,
        Archetype::Relationship,
        Archetype::Matrix,
        Archetype::Pyramid,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Archetype::List => "list",
            Archetype::Hierarchy => "hierarchy",
            Archetype::Process => "process",
            Archetype::Cycle => "cycle",
            Archetype::Relationship => "relationship",
            Archetype::Matrix => "matrix",
            Archetype::Pyramid => "pyramid",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Archetype {
    type Err = DiagramSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let found = match lowered.as_str() {
            "venn" => Some(Archetype::Relationship),
            "org" | "orgchart" | "tree" => Some(Archetype::Hierarchy),
            "timeline" | "steps" => Some(Archetype::Process),
            other => Self::ALL.into_iter().find(|a| a.tag() == other),
        };
        found.ok_or_else(|| DiagramSpecError::UnknownArchetype(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Archetype {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archetype_tags_round_trip() {
        for archetype in Archetype::ALL {
            assert_eq!(archetype.tag().parse::<Archetype>().unwrap(), archetype);
        }
    }

    #[test]
    fn test_archetype_aliases() {
        assert_eq!("Venn".parse::<Archetype>().unwrap(), Archetype::Relationship);
        assert_eq!("orgChart".parse::<Archetype>().unwrap(), Archetype::Hierarchy);
        assert!(matches!(
            "spiral".parse::<Archetype>(),
            Err(DiagramSpecError::UnknownArchetype(_))
        ));
    }
}
