//! Overlapping Venn circles for up to three items.
use crate::config::DiagramConfig;
use crate::diagram::Archetype;
use crate::diagram::geometry::{GeometryPlan, NodeShape, PlanNode};
use crate::layout::{Point, Rect};

const VENN_OPACITY: f64 = 0.6;
const SQRT3_2: f64 = 0.866_025_403_784_438_6;

pub(super) fn layout(items: &[String], config: &DiagramConfig, area: Rect) -> GeometryPlan {
    let mut plan = GeometryPlan::new(Archetype::Relationship, area);
    let n = items.len();
    let f = config.venn_overlap;
    let c = area.center();

    // Radius such that the whole group fits, then centers relative to the group center.
    let (radius, centers): (f64, Vec<Point>) = match n {
        0 => return plan,
        1 => {
            let r = area.width.min(area.height) / 2.0;
            (r, vec![c])
        },
        2 => {
            let r = (area.width / (4.0 - f)).min(area.height / 2.0);
            let half = r * (2.0 - f) / 2.0;
            (r, vec![Point::new(c.x - half, c.y), Point::new(c.x + half, c.y)])
        },
        _ => {
            let r = (area.width / (4.0 - f)).min(area.height / (2.0 + (2.0 - f) * SQRT3_2));
            let side = r * (2.0 - f);
            let tri_h = side * SQRT3_2;
            let top = c.y - (2.0 * r + tri_h) / 2.0 + r;
            (
                r,
                vec![
                    Point::new(c.x, top),
                    Point::new(c.x + side / 2.0, top + tri_h),
                    Point::new(c.x - side / 2.0, top + tri_h),
                ],
            )
        },
    };

    plan.nodes = items
        .iter()
        .zip(centers)
        .map(|(label, p)| {
            let mut node = PlanNode::new(
                label.as_str(),
                NodeShape::Ellipse,
                Rect::centered(p.x, p.y, 2.0 * radius, 2.0 * radius),
            );
            node.opacity = VENN_OPACITY;
            node
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
        (0..n).map(|i| format!("Set {i}")).collect()
    }

    #[test]
    fn test_pair_overlaps_by_configured_fraction() {
        let config = DiagramConfig::default();
        let plan = layout(&labels(2), &config, area());
        let a = plan.nodes[0].bounds;
        let b = plan.nodes[1].bounds;
        let r = a.width / 2.0;
        let d = a.center().distance(b.center());
        assert!((d - r * (2.0 - config.venn_overlap)).abs() < 1e-9);
        assert!(plan.connectors.is_empty());
        assert!(plan.nodes.iter().all(|n| n.opacity == 0.6));
    }

    #[test]
    fn test_triangle_apex_on_top_and_fits() {
        let plan = layout(&labels(3), &DiagramConfig::default(), area());
        let apex = plan.nodes[0].bounds.center();
        let left = plan.nodes[2].bounds.center();
        let right = plan.nodes[1].bounds.center();
        assert!(apex.y < left.y);
        assert!((left.y - right.y).abs() < 1e-9);
        let side = left.distance(right);
        assert!((apex.distance(left) - side).abs() < 1e-9);
        let bounds = plan.bounds().unwrap();
        assert!(area().contains(&bounds));
    }
}
