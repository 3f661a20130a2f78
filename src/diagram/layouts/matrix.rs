//! 2×2 quadrant grid.
use crate::diagram::Archetype;
use crate::diagram::geometry::{Connector, GeometryPlan, NodeShape, PlanNode};
use crate::layout::{GUTTER, Point, Rect};

pub(super) fn layout(items: &[String], area: Rect) -> GeometryPlan {
    let mut plan = GeometryPlan::new(Archetype::Matrix, area);
    let cell_w = ((area.width - GUTTER) / 2.0).max(0.0);
    let cell_h = ((area.height - GUTTER) / 2.0).max(0.0);

    plan.nodes = items
        .iter()
        .take(4)
        .enumerate()
        .map(|(i, label)| {
            let (row, col) = (i / 2, i % 2);
            let bounds = Rect::new(
                area.x + col as f64 * (cell_w + GUTTER),
                area.y + row as f64 * (cell_h + GUTTER),
                cell_w,
                cell_h,
            );
            PlanNode::new(label.as_str(), NodeShape::Rect, bounds).at_level(row as u32)
        })
        .collect();

    let mid = area.center();
    plan.connectors = vec![
        Connector::divider(Point::new(mid.x, area.y), Point::new(mid.x, area.bottom())),
        Connector::divider(Point::new(area.x, mid.y), Point::new(area.right(), mid.y)),
    ];
    plan
}
