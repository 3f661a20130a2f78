//! Intent → validated spec → colored geometry plan.
use tracing::{debug, warn};

use super::classify::classify_with_context;
use super::coloring;
use super::geometry::{FallbackReason, GeometryPlan};
use super::layouts;
use super::spec::{DiagramIntent, DiagramSpec};
use crate::config::DiagramConfig;
use crate::design::DesignContext;
use crate::error::DiagramSpecError;
use crate::layout::{LayoutGrid, Rect};

/// Turns diagram intents into geometry plans.
///
/// Synthesis is pure: the same intent, palette and area always give the same
/// plan.
#[derive(Debug, Clone, Default)]
pub struct DiagramSynthesizer {
    config: DiagramConfig,
}

impl DiagramSynthesizer {
    pub fn new(config: DiagramConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    /// Classify and validate `intent`, returning the validation error instead
    /// of falling back.
    pub fn try_synthesize(
        &self,
        intent: &DiagramIntent,
        design: &DesignContext,
        grid: &LayoutGrid,
    ) -> Result<GeometryPlan, DiagramSpecError> {
        let archetype = classify_with_context(intent, "");
        let spec = DiagramSpec::from_intent(intent, archetype)?;
        Ok(self.plan(&spec, design, grid.diagram_area()))
    }

    /// Lay out `intent` in the grid's diagram area. Never fails: a rejected
    /// intent becomes a list of its items.
    pub fn synthesize(&self, intent: &DiagramIntent, design: &DesignContext, grid: &LayoutGrid) -> GeometryPlan {
        self.synthesize_in(intent, "", design, grid.diagram_area())
    }

    /// Like [`synthesize`](Self::synthesize) with an explicit area and extra
    /// text (usually the slide title) for classification.
    pub fn synthesize_in(
        &self,
        intent: &DiagramIntent,
        context: &str,
        design: &DesignContext,
        area: Rect,
    ) -> GeometryPlan {
        let archetype = classify_with_context(intent, context);
        match DiagramSpec::from_intent(intent, archetype) {
            Ok(spec) => self.plan(&spec, design, area),
            Err(err) => {
                warn!(%archetype, error = %err, "diagram intent rejected, falling back to a list");
                let mut plan = self.plan(&DiagramSpec::list(intent.items.clone()), design, area);
                plan.fallback = Some(FallbackReason::SpecRejected(err.to_string()));
                plan
            },
        }
    }

    /// Lay out an already validated spec.
    pub fn plan(&self, spec: &DiagramSpec, design: &DesignContext, area: Rect) -> GeometryPlan {
        let mut plan = layouts::layout(spec, &self.config, area);
        coloring::apply(&mut plan, design.palette());
        debug!(
            archetype = %plan.archetype(),
            nodes = plan.nodes().len(),
            connectors = plan.connectors().len(),
            "diagram planned"
        );
        plan
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::design::DesignTheme;
    use crate::diagram::Archetype;
    use proptest::prelude::*;

    fn archetype() -> impl Strategy<Value = Archetype> {
        prop::sample::select(Archetype::ALL.to_vec())
    }

    fn theme() -> impl Strategy<Value = DesignTheme> {
        prop::sample::select(DesignTheme::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn prop_synthesis_is_deterministic(
            archetype in archetype(),
            theme in theme(),
            items in prop::collection::vec("[a-z]{1,12}", 0..10),
        ) {
            let design = DesignContext::for_theme(theme).unwrap();
            let intent = DiagramIntent::new(archetype, items);
            let synth = DiagramSynthesizer::default();
            let grid = LayoutGrid::default();
            prop_assert_eq!(
                synth.synthesize(&intent, &design, &grid),
                synth.synthesize(&intent, &design, &grid)
            );
        }

        #[test]
        fn prop_list_never_falls_back(items in prop::collection::vec(".{0,40}", 0..20)) {
            let design = DesignContext::for_theme(DesignTheme::CorporateModern).unwrap();
            let intent = DiagramIntent::new(Archetype::List, items.clone());
            let plan = DiagramSynthesizer::default()
                .try_synthesize(&intent, &design, &LayoutGrid::default());
            prop_assert!(plan.is_ok());
            let plan = plan.unwrap();
            prop_assert!(plan.fallback().is_none());
            prop_assert_eq!(plan.nodes().len(), items.len());
        }

        #[test]
        fn prop_connectors_reference_existing_nodes(
            archetype in archetype(),
            items in prop::collection::vec("[a-z]{1,8}", 1..9),
        ) {
            let design = DesignContext::for_theme(DesignTheme::TechInnovation).unwrap();
            let intent = DiagramIntent::new(archetype, items);
            let plan = DiagramSynthesizer::default()
                .synthesize(&intent, &design, &LayoutGrid::default());
            for c in plan.connectors() {
                if let Some((a, b)) = c.nodes {
                    prop_assert!(a < plan.nodes().len());
                    prop_assert!(b < plan.nodes().len());
                    prop_assert_ne!(a, b);
                }
            }
        }
    }
}
