//! Per-archetype placement rules.
use tracing::warn;

use super::geometry::{FallbackReason, GeometryPlan};
use super::spec::DiagramSpec;
use super::Archetype;
use crate::config::DiagramConfig;
use crate::layout::Rect;

mod cycle;
mod hierarchy;
mod matrix;
mod pyramid;
mod relationship;
mod rows;

/// Largest Venn group placed as overlapping circles.
pub const MAX_VENN_ITEMS: usize = 3;

/// Lay out a validated spec in `area`. Colors are assigned afterwards.
pub(super) fn layout(spec: &DiagramSpec, config: &DiagramConfig, area: Rect) -> GeometryPlan {
    let items = spec.items();
    match spec.archetype() {
        Archetype::List => rows::list(items, config, area),
        Archetype::Process => rows::process(items, config, area),
        Archetype::Hierarchy => hierarchy::layout(items, spec.edges(), config, area),
        Archetype::Cycle => cycle::layout(items, config, area),
        Archetype::Relationship if items.len() > MAX_VENN_ITEMS => {
            warn!(
                items = items.len(),
                max = MAX_VENN_ITEMS,
                "too many overlapping items for a venn layout, using a list"
            );
            let mut plan = rows::list(items, config, area);
            plan.fallback = Some(FallbackReason::VennOverflow { items: items.len() });
            plan
        },
        Archetype::Relationship => relationship::layout(items, config, area),
        Archetype::Matrix => matrix::layout(items, area),
        Archetype::Pyramid => pyramid::layout(items, spec.levels().unwrap_or(&[]), config, area),
    }
}

/// Clamp without panicking on an inverted range; `hi` wins.
fn clamp_to(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

fn overflow_label(hidden: usize) -> String {
    format!("+{hidden} more")
}
