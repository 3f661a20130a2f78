//! Geometry plans: positioned nodes and connectors in slide points.
use std::fmt;

use super::Archetype;
use crate::design::PaletteSlot;
use crate::layout::{Point, Rect};

/// Outline of a diagram node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeShape {
    Rect,
    RoundedRect,
    Ellipse,
    /// Trapezoid whose top edge is inset by `top_inset` points on each side.
    Trapezoid { top_inset: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanNode {
    pub label: String,
    pub shape: NodeShape,
    pub bounds: Rect,
    pub fill: PaletteSlot,
    /// Fill opacity in `[0, 1]`.
    pub opacity: f64,
    /// Depth for hierarchies, level for pyramids, row for tiled layouts.
    pub level: u32,
    /// Node inserted by the layout (the "+K more" overflow marker).
    pub synthetic: bool,
}

impl PlanNode {
    pub(crate) fn new(label: impl Into<String>, shape: NodeShape, bounds: Rect) -> Self {
        Self {
            label: label.into(),
            shape,
            bounds,
            fill: PaletteSlot::Accent,
            opacity: 1.0,
            level: 0,
            synthetic: false,
        }
    }

    pub(crate) fn at_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub(crate) fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorKind {
    Straight,
    /// Vertical, then horizontal, then vertical.
    Elbow,
    /// Circular arc; see [`Connector::curvature`].
    Curved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowHead {
    None,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub start: Point,
    pub end: Point,
    pub kind: ConnectorKind,
    /// Signed bulge of a curved connector: sagitta divided by chord length.
    /// Positive values bow to the left of the start→end direction
    /// (outward for a clockwise cycle). Zero for straight and elbow connectors.
    pub curvature: f64,
    pub color: PaletteSlot,
    pub arrow: ArrowHead,
    /// Node indices joined by this connector; `None` for dividers.
    pub nodes: Option<(usize, usize)>,
}

impl Connector {
    pub(crate) fn between(from: usize, to: usize, start: Point, end: Point, kind: ConnectorKind) -> Self {
        Self {
            start,
            end,
            kind,
            curvature: 0.0,
            color: PaletteSlot::Secondary,
            arrow: ArrowHead::End,
            nodes: Some((from, to)),
        }
    }

    pub(crate) fn divider(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            kind: ConnectorKind::Straight,
            curvature: 0.0,
            color: PaletteSlot::Secondary,
            arrow: ArrowHead::None,
            nodes: None,
        }
    }

    pub(crate) fn with_curvature(mut self, curvature: f64) -> Self {
        self.curvature = curvature;
        self
    }

    /// Cubic Bézier control polygon `[start, c1, c2, end]`.
    ///
    /// Straight connectors return the chord's third points; curved ones
    /// approximate the circular arc given by `curvature`. Both backends draw
    /// curves from these points, so they agree exactly.
    pub fn bezier_points(&self) -> [Point; 4] {
        let (s, e) = (self.start, self.end);
        let dx = e.x - s.x;
        let dy = e.y - s.y;
        let chord = dx.hypot(dy);
        if self.kind != ConnectorKind::Curved || chord == 0.0 || self.curvature == 0.0 {
            return [
                s,
                Point::new(s.x + dx / 3.0, s.y + dy / 3.0),
                Point::new(s.x + 2.0 * dx / 3.0, s.y + 2.0 * dy / 3.0),
                e,
            ];
        }

        // Arc through s and e with sagitta h = curvature * chord.
        let h = self.curvature * chord;
        let half = chord / 2.0;
        let radius = (half * half + h * h) / (2.0 * h.abs());
        let sweep = 2.0 * (half / radius).clamp(-1.0, 1.0).asin();
        let sweep = if h.abs() > radius { 2.0 * std::f64::consts::PI - sweep } else { sweep };
        let k = 4.0 / 3.0 * (sweep / 4.0).tan() * radius;

        // Tangents at s and e, rotated toward the bulge side.
        let (ux, uy) = (dx / chord, dy / chord);
        let (nx, ny) = if h > 0.0 { (uy, -ux) } else { (-uy, ux) };
        let tilt = sweep / 2.0;
        let (c, sn) = (tilt.cos(), tilt.sin());
        let t_start = (ux * c + nx * sn, uy * c + ny * sn);
        let t_end = (ux * c - nx * sn, uy * c - ny * sn);
        [
            s,
            Point::new(s.x + t_start.0 * k, s.y + t_start.1 * k),
            Point::new(e.x - t_end.0 * k, e.y - t_end.1 * k),
            e,
        ]
    }

    /// Polyline of an elbow connector: down from `start` to the midway row,
    /// across, then down into `end`.
    pub fn elbow_points(&self) -> [Point; 4] {
        let mid_y = (self.start.y + self.end.y) / 2.0;
        [
            self.start,
            Point::new(self.start.x, mid_y),
            Point::new(self.end.x, mid_y),
            self.end,
        ]
    }
}

/// Why a plan is not the archetype that was requested.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// The intent failed validation; the message is the validation error.
    SpecRejected(String),
    /// More circles than the Venn placement supports.
    VennOverflow { items: usize },
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::SpecRejected(msg) => write!(f, "spec rejected: {msg}"),
            FallbackReason::VennOverflow { items } => {
                write!(f, "{items} overlapping items exceed the 3-circle layout")
            },
        }
    }
}

/// Fully positioned diagram, ready for exactly one render call.
#[derive(Debug, PartialEq)]
pub struct GeometryPlan {
    pub(crate) archetype: Archetype,
    pub(crate) area: Rect,
    pub(crate) nodes: Vec<PlanNode>,
    pub(crate) connectors: Vec<Connector>,
    pub(crate) fallback: Option<FallbackReason>,
}

impl GeometryPlan {
    pub(crate) fn new(archetype: Archetype, area: Rect) -> Self {
        Self {
            archetype,
            area,
            nodes: Vec::new(),
            connectors: Vec::new(),
            fallback: None,
        }
    }

    /// Archetype actually laid out (a fallback plan reports `List`).
    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn nodes(&self) -> &[PlanNode] {
        &self.nodes
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn fallback(&self) -> Option<&FallbackReason> {
        self.fallback.as_ref()
    }

    /// Smallest rectangle enclosing every node.
    pub fn bounds(&self) -> Option<Rect> {
        let first = self.nodes.first()?.bounds;
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.right(), first.bottom());
        for node in &self.nodes[1..] {
            x0 = x0.min(node.bounds.x);
            y0 = y0.min(node.bounds.y);
            x1 = x1.max(node.bounds.right());
            y1 = y1.max(node.bounds.bottom());
        }
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }

    pub fn into_parts(self) -> (Vec<PlanNode>, Vec<Connector>) {
        (self.nodes, self.connectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
    }

    #[test]
    fn test_straight_bezier_is_on_chord() {
        let c = Connector::between(0, 1, Point::new(0.0, 0.0), Point::new(30.0, 0.0), ConnectorKind::Straight);
        let pts = c.bezier_points();
        assert!(close(pts[1], Point::new(10.0, 0.0)));
        assert!(close(pts[2], Point::new(20.0, 0.0)));
    }

    #[test]
    fn test_quarter_arc_bezier() {
        // Quarter circle of radius 100 around the origin, from (100,0) to (0,100)
        let r: f64 = 100.0;
        let start = Point::new(r, 0.0);
        let end = Point::new(0.0, r);
        let chord = start.distance(end);
        let sagitta = r * (1.0 - (std::f64::consts::FRAC_PI_4).cos());
        // bulge away from the origin, which lies to the right of start->end
        let c = Connector::between(0, 1, start, end, ConnectorKind::Curved).with_curvature(sagitta / chord);
        let pts = c.bezier_points();
        let k = 4.0 / 3.0 * (std::f64::consts::PI / 8.0).tan() * r;
        assert!(close(pts[1], Point::new(r, k)), "{:?}", pts[1]);
        assert!(close(pts[2], Point::new(k, r)), "{:?}", pts[2]);
    }

    #[test]
    fn test_elbow_points() {
        let c = Connector::between(0, 1, Point::new(10.0, 0.0), Point::new(50.0, 40.0), ConnectorKind::Elbow);
        let pts = c.elbow_points();
        assert_eq!(pts[1], Point::new(10.0, 20.0));
        assert_eq!(pts[2], Point::new(50.0, 20.0));
    }

    #[test]
    fn test_plan_bounds() {
        let mut plan = GeometryPlan::new(Archetype::List, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(plan.bounds().is_none());
        plan.nodes.push(PlanNode::new("a", NodeShape::Rect, Rect::new(10.0, 10.0, 20.0, 20.0)));
        plan.nodes.push(PlanNode::new("b", NodeShape::Rect, Rect::new(50.0, 5.0, 20.0, 40.0)));
        assert_eq!(plan.bounds(), Some(Rect::new(10.0, 5.0, 60.0, 40.0)));
    }
}
