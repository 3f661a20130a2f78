//! Top-down tree placement.
use super::{clamp_to, overflow_label};
use crate::config::{DiagramConfig, OverflowPolicy};
use crate::diagram::Archetype;
use crate::diagram::geometry::{Connector, ConnectorKind, GeometryPlan, NodeShape, PlanNode};
use crate::diagram::spec::Edge;
use crate::layout::{GUTTER, Rect};

/// Node height as a share of its band.
const BAND_FILL: f64 = 0.6;

#[derive(Debug, Clone, Copy)]
enum Slot {
    Item(usize),
    /// Overflow marker standing in for this many hidden nodes.
    More(usize),
}

pub(super) fn layout(items: &[String], edges: &[Edge], config: &DiagramConfig, area: Rect) -> GeometryPlan {
    let mut plan = GeometryPlan::new(Archetype::Hierarchy, area);
    let n = items.len();
    if n == 0 {
        return plan;
    }

    let mut parent = vec![None; n];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    for e in edges {
        parent[e.to] = Some(e.from);
        children[e.from].push(e.to);
    }
    for list in &mut children {
        list.sort_unstable();
    }

    let max = config.max_per_row.max(2);
    // (depth, slots) per horizontal band
    let mut bands: Vec<(u32, Vec<Slot>)> = Vec::new();
    let mut frontier: Vec<usize> = (0..n).filter(|&i| parent[i].is_none()).collect();
    let mut depth = 0u32;
    while !frontier.is_empty() {
        if config.overflow == OverflowPolicy::Truncate && frontier.len() > max {
            let hidden = frontier.len() - (max - 1);
            frontier.truncate(max - 1);
            let mut slots: Vec<Slot> = frontier.iter().map(|&i| Slot::Item(i)).collect();
            slots.push(Slot::More(hidden));
            bands.push((depth, slots));
        } else {
            for chunk in frontier.chunks(max) {
                bands.push((depth, chunk.iter().map(|&i| Slot::Item(i)).collect()));
            }
        }
        // descendants of truncated nodes are never reached
        frontier = frontier.iter().flat_map(|&i| children[i].iter().copied()).collect();
        depth += 1;
    }

    let band_h = area.height / bands.len() as f64;
    let node_h = clamp_to(band_h * BAND_FILL, config.min_card_height, config.max_card_height).min(band_h);

    let mut index_of: Vec<Option<usize>> = vec![None; n];
    for (b, (depth, band)) in bands.iter().enumerate() {
        let slot_w = area.width / band.len() as f64;
        let node_w = clamp_to(slot_w - GUTTER, config.min_card_width.min(slot_w), config.max_card_width);
        let cy = area.y + band_h * (b as f64 + 0.5);
        for (k, slot) in band.iter().enumerate() {
            let cx = area.x + slot_w * (k as f64 + 0.5);
            let bounds = Rect::centered(cx, cy, node_w, node_h);
            let node = match *slot {
                Slot::Item(i) => {
                    index_of[i] = Some(plan.nodes.len());
                    PlanNode::new(items[i].as_str(), NodeShape::RoundedRect, bounds)
                },
                Slot::More(hidden) => {
                    PlanNode::new(overflow_label(hidden), NodeShape::RoundedRect, bounds).synthetic()
                },
            };
            plan.nodes.push(node.at_level(*depth));
        }
    }

    let mut connectors = Vec::new();
    for (ci, item) in index_of.iter().enumerate().filter_map(|(i, idx)| idx.map(|idx| (idx, i))) {
        let Some(pi) = parent[item].and_then(|p| index_of[p]) else {
            continue;
        };
        let start = plan.nodes[pi].bounds.bottom_mid();
        let end = plan.nodes[ci].bounds.top_mid();
        connectors.push(Connector::between(pi, ci, start, end, ConnectorKind::Elbow));
    }
    connectors.sort_by_key(|c| c.nodes.map(|(_, child)| child));
    plan.connectors = connectors;
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect::new(64.0, 176.0, 832.0, 236.0)
    }

    fn items(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tree_levels_and_connectors() {
        let items = items(&["CEO", "CTO", "CFO", "Dev"]);
        let edges = [Edge::new(0, 1), Edge::new(0, 2), Edge::new(1, 3)];
        let plan = layout(&items, &edges, &DiagramConfig::default(), area());

        let labels: Vec<_> = plan.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, ["CEO", "CTO", "CFO", "Dev"]);
        let levels: Vec<_> = plan.nodes.iter().map(|n| n.level).collect();
        assert_eq!(levels, [0, 1, 1, 2]);

        assert_eq!(plan.connectors.len(), 3);
        for c in &plan.connectors {
            let (p, ch) = c.nodes.unwrap();
            assert_eq!(c.kind, ConnectorKind::Elbow);
            assert_eq!(c.start, plan.nodes[p].bounds.bottom_mid());
            assert_eq!(c.end, plan.nodes[ch].bounds.top_mid());
            assert!(plan.nodes[p].bounds.bottom() < plan.nodes[ch].bounds.y);
        }
    }

    #[test]
    fn test_nodes_centered_in_equal_slots() {
        let items = items(&["root", "a", "b"]);
        let edges = [Edge::new(0, 1), Edge::new(0, 2)];
        let plan = layout(&items, &edges, &DiagramConfig::default(), area());
        let root = plan.nodes[0].bounds.center();
        assert!((root.x - area().center().x).abs() < 1e-9);
        let a = plan.nodes[1].bounds.center();
        let b = plan.nodes[2].bounds.center();
        assert!((a.x - (area().x + area().width * 0.25)).abs() < 1e-9);
        assert!((b.x - (area().x + area().width * 0.75)).abs() < 1e-9);
    }

    #[test]
    fn test_children_follow_parent_order() {
        // b's parent (1) comes before a's parent (2)
        let items = items(&["root", "p1", "p2", "a", "b"]);
        let edges = [Edge::new(0, 1), Edge::new(0, 2), Edge::new(2, 3), Edge::new(1, 4)];
        let plan = layout(&items, &edges, &DiagramConfig::default(), area());
        let labels: Vec<_> = plan.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, ["root", "p1", "p2", "b", "a"]);
    }

    #[test]
    fn test_wide_level_truncates() {
        let mut labels = vec!["root".to_string()];
        labels.extend((0..8).map(|i| format!("leaf {i}")));
        let edges: Vec<_> = (1..9).map(|i| Edge::new(0, i)).collect();
        let config = DiagramConfig {
            overflow: OverflowPolicy::Truncate,
            ..DiagramConfig::default()
        };
        let plan = layout(&labels, &edges, &config, area());
        assert_eq!(plan.nodes.len(), 1 + 6);
        let marker = plan.nodes.last().unwrap();
        assert!(marker.synthetic);
        assert_eq!(marker.label, "+3 more");
        assert_eq!(plan.connectors.len(), 5);
    }

    #[test]
    fn test_wide_level_wraps() {
        let mut labels = vec!["root".to_string()];
        labels.extend((0..8).map(|i| format!("leaf {i}")));
        let edges: Vec<_> = (1..9).map(|i| Edge::new(0, i)).collect();
        let plan = layout(&labels, &edges, &DiagramConfig::default(), area());
        assert_eq!(plan.nodes.len(), 9);
        assert_eq!(plan.connectors.len(), 8);
        // second sub-row sits below the first
        assert!(plan.nodes[7].bounds.y > plan.nodes[1].bounds.y);
        assert_eq!(plan.nodes[7].level, 1);
    }

    #[test]
    fn test_forest_has_several_roots() {
        let items = items(&["a", "b", "c"]);
        let plan = layout(&items, &[Edge::new(0, 2)], &DiagramConfig::default(), area());
        assert_eq!(plan.nodes[0].level, 0);
        assert_eq!(plan.nodes[1].level, 0);
        assert_eq!(plan.nodes[2].level, 1);
    }
}
