//! Row tiling shared by list and process diagrams.
use std::borrow::Cow;

use super::{clamp_to, overflow_label};
use crate::config::{DiagramConfig, OverflowPolicy};
use crate::diagram::Archetype;
use crate::diagram::geometry::{Connector, ConnectorKind, GeometryPlan, NodeShape, PlanNode};
use crate::layout::{COMPONENT_GAP, GUTTER, Rect};

pub(super) fn list(items: &[String], config: &DiagramConfig, area: Rect) -> GeometryPlan {
    let mut plan = GeometryPlan::new(Archetype::List, area);
    plan.nodes = tile(items, config, area, GUTTER, NodeShape::Rect);
    plan
}

pub(super) fn process(items: &[String], config: &DiagramConfig, area: Rect) -> GeometryPlan {
    let mut plan = GeometryPlan::new(Archetype::Process, area);
    plan.nodes = tile(items, config, area, COMPONENT_GAP, NodeShape::RoundedRect);
    plan.connectors = plan
        .nodes
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let (a, b) = (&pair[0], &pair[1]);
            if a.level == b.level {
                Connector::between(i, i + 1, a.bounds.right_mid(), b.bounds.left_mid(), ConnectorKind::Straight)
            } else {
                Connector::between(i, i + 1, a.bounds.bottom_mid(), b.bounds.top_mid(), ConnectorKind::Elbow)
            }
        })
        .collect();
    plan
}

/// Apply the overflow policy to a run of labels.
///
/// Returns the labels to place and whether the last one is a synthetic
/// "+K more" marker.
pub(super) fn apply_overflow<'a>(
    labels: &[&'a str],
    config: &DiagramConfig,
) -> (Vec<Cow<'a, str>>, bool) {
    let max = config.max_per_row.max(2);
    if config.overflow == OverflowPolicy::Truncate && labels.len() > max {
        let keep = max - 1;
        let mut kept: Vec<Cow<'a, str>> =
            labels[..keep].iter().map(|l| Cow::Borrowed(*l)).collect();
        kept.push(Cow::Owned(overflow_label(labels.len() - keep)));
        (kept, true)
    } else {
        (labels.iter().map(|l| Cow::Borrowed(*l)).collect(), false)
    }
}

/// Place cards in centered rows of at most `max_per_row`.
///
/// The row index of each card is stored in its `level`.
fn tile(items: &[String], config: &DiagramConfig, area: Rect, gap: f64, shape: NodeShape) -> Vec<PlanNode> {
    if items.is_empty() {
        return Vec::new();
    }
    let labels: Vec<&str> = items.iter().map(String::as_str).collect();
    let (labels, truncated) = apply_overflow(&labels, config);

    let n = labels.len();
    let max = config.max_per_row.max(2);
    let cols = n.min(max);
    let rows = n.div_ceil(cols);

    let card_w = clamp_to(
        (area.width - (cols - 1) as f64 * gap) / cols as f64,
        config.min_card_width,
        config.max_card_width,
    );
    let card_h = clamp_to(
        (area.height - (rows - 1) as f64 * GUTTER) / rows as f64,
        config.min_card_height,
        config.max_card_height,
    );

    let total_h = rows as f64 * card_h + (rows - 1) as f64 * GUTTER;
    let top = area.y + (area.height - total_h) / 2.0;

    let mut nodes = Vec::with_capacity(n);
    for (i, label) in labels.into_iter().enumerate() {
        let row = i / cols;
        let col = i % cols;
        let in_row = (n - row * cols).min(cols);
        let row_w = in_row as f64 * card_w + (in_row - 1) as f64 * gap;
        let left = area.x + (area.width - row_w) / 2.0;
        let bounds = Rect::new(
            left + col as f64 * (card_w + gap),
            top + row as f64 * (card_h + GUTTER),
            card_w,
            card_h,
        );
        let mut node = PlanNode::new(label, shape, bounds).at_level(row as u32);
        if truncated && i == n - 1 {
            node = node.synthetic();
        }
        nodes.push(node);
    }
    nodes
}
