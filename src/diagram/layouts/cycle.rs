//! Nodes on a circle joined by outward-bowing arcs.
use std::f64::consts::{FRAC_PI_2, PI};

use crate::config::DiagramConfig;
use crate::diagram::Archetype;
use crate::diagram::geometry::{Connector, ConnectorKind, GeometryPlan, NodeShape, PlanNode};
use crate::layout::{Point, Rect};

/// Node diameter as a share of the shorter area side.
const NODE_SHARE: f64 = 0.25;
/// Node diameter as a share of the chord between neighbours.
const CHORD_SHARE: f64 = 0.8;
/// Clearance between a node disc and the end of an arc.
const ARC_CLEARANCE: f64 = 4.0;

pub(super) fn layout(items: &[String], config: &DiagramConfig, area: Rect) -> GeometryPlan {
    let mut plan = GeometryPlan::new(Archetype::Cycle, area);
    let n = items.len();
    if n == 0 {
        return plan;
    }

    let side = area.width.min(area.height);
    let step = 2.0 * PI / n as f64;
    let first_guess = side * NODE_SHARE;
    let chord = 2.0 * (side / 2.0 - first_guess / 2.0).max(0.0) * (step / 2.0).sin();
    let diameter = first_guess.min(chord * CHORD_SHARE).max(config.min_card_height);
    let radius = (side / 2.0 - diameter / 2.0).max(0.0);
    let center = area.center();

    let angle = |i: usize| -FRAC_PI_2 + i as f64 * step;
    let on_circle = |theta: f64| Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin());

    plan.nodes = items
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let c = on_circle(angle(i));
            PlanNode::new(label.as_str(), NodeShape::Ellipse, Rect::centered(c.x, c.y, diameter, diameter))
        })
        .collect();

    // Angle from a node center to the point where its disc (plus clearance) meets the circle.
    let clearance = if radius > 0.0 {
        2.0 * ((diameter / 2.0 + ARC_CLEARANCE) / (2.0 * radius)).min(1.0).asin()
    } else {
        0.0
    };
    let clearance = clearance.min(step * 0.4);
    let sweep = step - 2.0 * clearance;
    let arc_chord = 2.0 * radius * (sweep / 2.0).sin();
    let curvature = if arc_chord > 0.0 {
        radius * (1.0 - (sweep / 2.0).cos()) / arc_chord
    } else {
        0.0
    };

    plan.connectors = (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            let start = on_circle(angle(i) + clearance);
            let end = on_circle(angle(i) + step - clearance);
            Connector::between(i, j, start, end, ConnectorKind::Curved).with_curvature(curvature)
        })
        .collect();
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect::new(64.0, 176.0, 832.0, 236.0)
    }

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Stage {i}")).collect()
    }

    #[test]
    fn test_four_nodes_at_right_angles() {
        let plan = layout(&labels(4), &DiagramConfig::default(), area());
        let c = area().center();
        let centers: Vec<Point> = plan.nodes.iter().map(|n| n.bounds.center()).collect();
        let r = centers[0].distance(c);
        for p in &centers {
            assert!((p.distance(c) - r).abs() < 1e-9);
        }
        // first node straight above the center, then clockwise
        assert!((centers[0].x - c.x).abs() < 1e-9 && centers[0].y < c.y);
        assert!(centers[1].x > c.x && (centers[1].y - c.y).abs() < 1e-9);
        assert!((centers[2].x - c.x).abs() < 1e-9 && centers[2].y > c.y);
        assert!(centers[3].x < c.x);
    }

    #[test]
    fn test_connectors_close_the_loop() {
        let plan = layout(&labels(4), &DiagramConfig::default(), area());
        assert_eq!(plan.connectors.len(), 4);
        assert_eq!(plan.connectors[3].nodes, Some((3, 0)));
        for c in &plan.connectors {
            assert_eq!(c.kind, ConnectorKind::Curved);
            assert!(c.curvature > 0.0);
        }
    }

    #[test]
    fn test_arcs_stay_outside_node_discs() {
        let plan = layout(&labels(5), &DiagramConfig::default(), area());
        for c in &plan.connectors {
            let (a, b) = c.nodes.unwrap();
            let ra = plan.nodes[a].bounds.width / 2.0;
            let rb = plan.nodes[b].bounds.width / 2.0;
            assert!(c.start.distance(plan.nodes[a].bounds.center()) >= ra);
            assert!(c.end.distance(plan.nodes[b].bounds.center()) >= rb);
        }
    }

    #[test]
    fn test_diameter_floor() {
        let plan = layout(&labels(12), &DiagramConfig::default(), area());
        for node in &plan.nodes {
            assert!(node.bounds.width >= DiagramConfig::default().min_card_height);
        }
    }
}
