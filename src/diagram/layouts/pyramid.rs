//! Stacked trapezoids, foundation at the bottom.
use crate::config::DiagramConfig;
use crate::diagram::Archetype;
use crate::diagram::geometry::{GeometryPlan, NodeShape, PlanNode};
use crate::layout::Rect;

/// `levels[i]` is the dense level of item `i`, 0 being the foundation.
/// Items missing a level sit on the foundation.
pub(super) fn layout(items: &[String], levels: &[u32], config: &DiagramConfig, area: Rect) -> GeometryPlan {
    let mut plan = GeometryPlan::new(Archetype::Pyramid, area);
    if items.is_empty() {
        return plan;
    }
    let level_of = |i: usize| levels.get(i).copied().unwrap_or(0);
    let count = (0..items.len()).map(level_of).max().unwrap_or(0) as usize + 1;

    let ratio = config.pyramid_ratio.max(1.0);
    let level_h = area.height / count as f64;
    let cx = area.center().x;

    let mut shared = vec![0usize; count];
    for i in 0..items.len() {
        shared[level_of(i) as usize] += 1;
    }
    let mut placed = vec![0usize; count];

    for (i, label) in items.iter().enumerate() {
        let level = level_of(i) as usize;
        let width = area.width / ratio.powi(level as i32);
        let top_width = width / ratio;
        let inset = (width - top_width) / 2.0;
        let y = area.bottom() - (level + 1) as f64 * level_h;

        let m = shared[level];
        let piece_w = width / m as f64;
        let k = placed[level];
        placed[level] += 1;

        let bounds = Rect::new(cx - width / 2.0 + k as f64 * piece_w, y, piece_w, level_h);
        let shape = NodeShape::Trapezoid {
            top_inset: inset / m as f64,
        };
        plan.nodes.push(PlanNode::new(label.as_str(), shape, bounds).at_level(level as u32));
    }
    plan
}
