//! Slide parts of the portable package.
use crate::design::ColorPalette;
use crate::diagram::{ConnectorKind, GeometryPlan};
use crate::diagram::coloring::node_text_color;
use crate::error::Result;
use crate::render::{Fill, SlideFrame, node_font_size};

use super::shape::{SlideShape, write_background};

/// One slide: background plus shapes in z-order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SlidePart {
    background: Fill,
    shapes: Vec<SlideShape>,
    notes: Option<String>,
}

impl SlidePart {
    pub(crate) fn from_frame(frame: &SlideFrame) -> Self {
        let mut shapes = Vec::with_capacity(frame.shape_count());
        shapes.extend(frame.decorations.iter().copied().map(SlideShape::Bar));
        shapes.extend(frame.texts.iter().cloned().map(SlideShape::Text));
        Self {
            background: frame.background,
            shapes,
            notes: frame.notes.clone(),
        }
    }

    /// Append a diagram. Connectors go underneath the nodes.
    ///
    /// Returns the number of shapes added.
    pub(crate) fn add_diagram(&mut self, plan: GeometryPlan, palette: &ColorPalette) -> usize {
        let before = self.shapes.len();
        let (nodes, connectors) = plan.into_parts();
        for connector in &connectors {
            let color = palette.slot(connector.color);
            let shape = match connector.kind {
                ConnectorKind::Curved => SlideShape::Curve {
                    points: connector.bezier_points(),
                    color,
                    arrow: connector.arrow,
                },
                kind => SlideShape::Connector {
                    kind,
                    start: connector.start,
                    end: connector.end,
                    color,
                    arrow: connector.arrow,
                },
            };
            self.shapes.push(shape);
        }
        for node in nodes {
            let text_color = node_text_color(palette, &node);
            let font_size = node_font_size(&node);
            self.shapes.push(SlideShape::Node {
                fill: palette.slot(node.fill),
                label: node.label,
                shape: node.shape,
                bounds: node.bounds,
                opacity: node.opacity,
                text_color,
                font_size,
            });
        }
        self.shapes.len() - before
    }

    pub(crate) fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub(crate) fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub(crate) fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(4096);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<p:sld xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" "#);
        xml.push_str(r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#);
        xml.push_str(r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);
        xml.push_str("<p:cSld>");

        // background precedes the shape tree
        write_background(&mut xml, &self.background)?;

        xml.push_str("<p:spTree>");
        xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
        xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);
        for (i, shape) in self.shapes.iter().enumerate() {
            shape.to_xml(i as u32 + 2, &mut xml)?;
        }
        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
        xml.push_str("</p:sld>");
        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{DesignContext, DesignTheme, RgbColor};
    use crate::diagram::{Archetype, DiagramIntent, DiagramSynthesizer};
    use crate::layout::{LayoutGrid, Rect};
    use crate::render::{Decoration, TextBlock};

    fn frame() -> SlideFrame {
        let mut frame = SlideFrame::new(Fill::Solid(RgbColor::WHITE));
        frame.texts.push(TextBlock::new(Rect::new(64.0, 64.0, 832.0, 80.0), "Title", 32, RgbColor::BLACK));
        frame.decorations.push(Decoration {
            bounds: Rect::new(64.0, 150.0, 96.0, 4.0),
            fill: RgbColor::new(0x34, 0x98, 0xDB),
        });
        frame
    }

    #[test]
    fn test_frame_shapes_and_ids() {
        let part = SlidePart::from_frame(&frame());
        assert_eq!(part.shape_count(), 2);
        let xml = part.to_xml().unwrap();
        assert!(xml.contains(r#"<p:cNvPr id="2" name="Rectangle 2"/>"#));
        assert!(xml.contains(r#"<p:cNvPr id="3" name="Text Box 3"/>"#));
        let bg = xml.find("<p:bg>").unwrap();
        let tree = xml.find("<p:spTree>").unwrap();
        assert!(bg < tree);
        assert_eq!(part.notes(), None);
    }

    #[test]
    fn test_notes_stay_off_the_slide() {
        let mut frame = frame();
        frame.notes = Some("Pause for questions".to_string());
        let part = SlidePart::from_frame(&frame);
        assert_eq!(part.notes(), Some("Pause for questions"));
        assert_eq!(part.shape_count(), 2);
        assert!(!part.to_xml().unwrap().contains("Pause for questions"));
    }

    #[test]
    fn test_diagram_connectors_below_nodes() {
        let design = DesignContext::for_theme(DesignTheme::CreativeGradient).unwrap();
        let intent = DiagramIntent::new(Archetype::Cycle, ["a", "b", "c"]);
        let plan = DiagramSynthesizer::default().synthesize(&intent, &design, &LayoutGrid::default());

        let mut part = SlidePart::from_frame(&frame());
        let added = part.add_diagram(plan, design.palette());
        assert_eq!(added, 6);
        let xml = part.to_xml().unwrap();
        assert_eq!(xml.matches("<a:cubicBezTo>").count(), 3);
        let last_curve = xml.rfind("name=\"Curve").unwrap();
        let first_node = xml.find("name=\"Diagram Node").unwrap();
        assert!(last_curve < first_node);
    }
}
