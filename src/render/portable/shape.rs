//! DrawingML shape serialization for slide parts.
use std::fmt::Write as FmtWrite;

use crate::common::unit::{degrees_to_angle_units, fraction_to_percent_units};
use crate::common::{pt_to_emu, write_int};
use crate::common::xml::escape_xml;
use crate::design::RgbColor;
use crate::diagram::{ArrowHead, ConnectorKind, NodeShape};
use crate::error::Result;
use crate::layout::{Alignment, Point, Rect};
use crate::render::{DEFAULT_FONT, Decoration, Fill, TextBlock, TextStyle};

/// Connector line width in EMU (1.5 pt).
const LINE_WIDTH: i64 = 19_050;
/// Bullet indent in EMU.
const BULLET_INDENT: i64 = 285_750;

/// One shape on a slide, already resolved to concrete colors.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SlideShape {
    Text(TextBlock),
    Bar(Decoration),
    Node {
        label: String,
        shape: NodeShape,
        bounds: Rect,
        fill: RgbColor,
        opacity: f64,
        text_color: RgbColor,
        font_size: u32,
    },
    Connector {
        kind: ConnectorKind,
        start: Point,
        end: Point,
        color: RgbColor,
        arrow: ArrowHead,
    },
    Curve {
        points: [Point; 4],
        color: RgbColor,
        arrow: ArrowHead,
    },
}

/// Offset and extent of a rectangle in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Xfrm {
    x: i64,
    y: i64,
    cx: i64,
    cy: i64,
}

impl Xfrm {
    fn from_rect(rect: &Rect) -> Self {
        Self {
            x: pt_to_emu(rect.x),
            y: pt_to_emu(rect.y),
            cx: pt_to_emu(rect.width).max(0),
            cy: pt_to_emu(rect.height).max(0),
        }
    }

    fn write(&self, xml: &mut String, attrs: &str) -> Result<()> {
        write!(
            xml,
            r#"<a:xfrm{attrs}><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
            self.x, self.y, self.cx, self.cy
        )?;
        Ok(())
    }
}

impl SlideShape {
    pub(crate) fn to_xml(&self, id: u32, xml: &mut String) -> Result<()> {
        match self {
            SlideShape::Text(block) => write_text_box(xml, id, block),
            SlideShape::Bar(bar) => {
                open_sp(xml, id, "Rectangle", false)?;
                xml.push_str("<p:spPr>");
                Xfrm::from_rect(&bar.bounds).write(xml, "")?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                write_solid_fill(xml, bar.fill, 1.0)?;
                xml.push_str("<a:ln><a:noFill/></a:ln></p:spPr></p:sp>");
                Ok(())
            },
            SlideShape::Node {
                label,
                shape,
                bounds,
                fill,
                opacity,
                text_color,
                font_size,
            } => {
                open_sp(xml, id, "Diagram Node", false)?;
                xml.push_str("<p:spPr>");
                Xfrm::from_rect(bounds).write(xml, "")?;
                write_preset(xml, *shape, bounds)?;
                write_solid_fill(xml, *fill, *opacity)?;
                xml.push_str("<a:ln><a:noFill/></a:ln></p:spPr>");
                xml.push_str(r#"<p:txBody><a:bodyPr wrap="square" lIns="45720" rIns="45720" anchor="ctr"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#);
                xml.push_str(r#"<a:p><a:pPr algn="ctr"/>"#);
                write_run(xml, label, *font_size, *text_color, TextStyle::empty())?;
                xml.push_str("</a:p></p:txBody></p:sp>");
                Ok(())
            },
            SlideShape::Connector {
                kind,
                start,
                end,
                color,
                arrow,
            } => write_connector(xml, id, *kind, *start, *end, *color, *arrow),
            SlideShape::Curve { points, color, arrow } => write_curve(xml, id, points, *color, *arrow),
        }
    }
}

fn open_sp(xml: &mut String, id: u32, name: &str, text_box: bool) -> Result<()> {
    write!(xml, r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name} {id}"/>"#)?;
    xml.push_str(if text_box {
        r#"<p:cNvSpPr txBox="1"/>"#
    } else {
        "<p:cNvSpPr/>"
    });
    xml.push_str("<p:nvPr/></p:nvSpPr>");
    Ok(())
}

fn write_solid_fill(xml: &mut String, color: RgbColor, opacity: f64) -> Result<()> {
    if opacity < 1.0 {
        write!(
            xml,
            r#"<a:solidFill><a:srgbClr val="{}"><a:alpha val="{}"/></a:srgbClr></a:solidFill>"#,
            color.to_hex(),
            fraction_to_percent_units(opacity)
        )?;
    } else {
        write!(xml, r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#, color.to_hex())?;
    }
    Ok(())
}

fn write_preset(xml: &mut String, shape: NodeShape, bounds: &Rect) -> Result<()> {
    match shape {
        NodeShape::Rect => xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#),
        NodeShape::RoundedRect => xml.push_str(r#"<a:prstGeom prst="roundRect"><a:avLst/></a:prstGeom>"#),
        NodeShape::Ellipse => xml.push_str(r#"<a:prstGeom prst="ellipse"><a:avLst/></a:prstGeom>"#),
        NodeShape::Trapezoid { top_inset } => {
            // adj is relative to the shorter side, capped at half the width
            let ss = bounds.width.min(bounds.height);
            let adj = if ss > 0.0 {
                (top_inset / ss * 100_000.0).round().clamp(0.0, 50_000.0 * bounds.width / ss) as i64
            } else {
                0
            };
            write!(
                xml,
                r#"<a:prstGeom prst="trapezoid"><a:avLst><a:gd name="adj" fmla="val {adj}"/></a:avLst></a:prstGeom>"#
            )?;
        },
    }
    Ok(())
}

fn write_run(xml: &mut String, text: &str, size: u32, color: RgbColor, style: TextStyle) -> Result<()> {
    write!(xml, r#"<a:r><a:rPr lang="en-US" sz="{}""#, size * 100)?;
    if style.contains(TextStyle::BOLD) {
        xml.push_str(r#" b="1""#);
    }
    if style.contains(TextStyle::ITALIC) {
        xml.push_str(r#" i="1""#);
    }
    xml.push_str(r#" dirty="0">"#);
    write!(xml, r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#, color.to_hex())?;
    write!(xml, r#"<a:latin typeface="{}"/>"#, escape_xml(DEFAULT_FONT))?;
    write!(xml, "</a:rPr><a:t>{}</a:t></a:r>", escape_xml(text))?;
    Ok(())
}

fn align_attr(align: Alignment) -> &'static str {
    match align {
        Alignment::Left => "l",
        Alignment::Center => "ctr",
        Alignment::Right => "r",
    }
}

fn write_text_box(xml: &mut String, id: u32, block: &TextBlock) -> Result<()> {
    open_sp(xml, id, "Text Box", true)?;
    xml.push_str("<p:spPr>");
    Xfrm::from_rect(&block.bounds).write(xml, "")?;
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#);
    xml.push_str(r#"<p:txBody><a:bodyPr wrap="square" rtlCol="0"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#);

    let bulleted = block.style.contains(TextStyle::BULLETED);
    for paragraph in &block.paragraphs {
        write!(xml, r#"<a:p><a:pPr algn="{}""#, align_attr(block.align))?;
        if bulleted {
            xml.push_str(r#" marL=""#);
            write_int(xml, BULLET_INDENT);
            xml.push_str(r#"" indent=""#);
            write_int(xml, -BULLET_INDENT);
            xml.push_str(r#""><a:buFont typeface="Arial"/><a:buChar char="•"/></a:pPr>"#);
        } else {
            xml.push_str("><a:buNone/></a:pPr>");
        }
        write_run(xml, paragraph, block.font_size, block.color, block.style)?;
        xml.push_str("</a:p>");
    }
    if block.paragraphs.is_empty() {
        xml.push_str("<a:p/>");
    }
    xml.push_str("</p:txBody></p:sp>");
    Ok(())
}

fn write_line(xml: &mut String, color: RgbColor, arrow: ArrowHead) -> Result<()> {
    write!(
        xml,
        r#"<a:ln w="{LINE_WIDTH}"><a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
        color.to_hex()
    )?;
    if arrow == ArrowHead::End {
        xml.push_str(r#"<a:tailEnd type="triangle"/>"#);
    }
    xml.push_str("</a:ln>");
    Ok(())
}

/// Straight or elbow connector between two points.
///
/// Elbow connectors run vertical-horizontal-vertical, which is a
/// `bentConnector3` rotated by 90°; the extent is given for the unrotated
/// shape and the flips select which corners the ends land on.
fn write_connector(
    xml: &mut String,
    id: u32,
    kind: ConnectorKind,
    start: Point,
    end: Point,
    color: RgbColor,
    arrow: ArrowHead,
) -> Result<()> {
    write!(
        xml,
        r#"<p:cxnSp><p:nvCxnSpPr><p:cNvPr id="{id}" name="Connector {id}"/><p:cNvCxnSpPr/><p:nvPr/></p:nvCxnSpPr><p:spPr>"#
    )?;

    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let center = start.midpoint(end);
    let (preset, xfrm, attrs) = match kind {
        ConnectorKind::Elbow => {
            let (w, h) = (dy.abs(), dx.abs());
            let rect = Rect::centered(center.x, center.y, w, h);
            let mut attrs = format!(r#" rot="{}""#, degrees_to_angle_units(90.0));
            match (dy >= 0.0, dx <= 0.0) {
                (true, true) => {},
                (true, false) => attrs.push_str(r#" flipV="1""#),
                (false, true) => attrs.push_str(r#" flipH="1""#),
                (false, false) => attrs.push_str(r#" flipH="1" flipV="1""#),
            }
            ("bentConnector3", Xfrm::from_rect(&rect), attrs)
        },
        ConnectorKind::Straight | ConnectorKind::Curved => {
            let rect = Rect::new(start.x.min(end.x), start.y.min(end.y), dx.abs(), dy.abs());
            let mut attrs = String::new();
            if dx < 0.0 {
                attrs.push_str(r#" flipH="1""#);
            }
            if dy < 0.0 {
                attrs.push_str(r#" flipV="1""#);
            }
            ("straightConnector1", Xfrm::from_rect(&rect), attrs)
        },
    };
    xfrm.write(xml, &attrs)?;
    write!(xml, r#"<a:prstGeom prst="{preset}"><a:avLst/></a:prstGeom>"#)?;
    write_line(xml, color, arrow)?;
    xml.push_str("</p:spPr></p:cxnSp>");
    Ok(())
}

/// Cubic Bézier drawn as a custom-geometry shape with no fill.
fn write_curve(xml: &mut String, id: u32, points: &[Point; 4], color: RgbColor, arrow: ArrowHead) -> Result<()> {
    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    let mut xfrm = Xfrm::from_rect(&Rect::new(min_x, min_y, max_x - min_x, max_y - min_y));
    xfrm.cx = xfrm.cx.max(1);
    xfrm.cy = xfrm.cy.max(1);

    open_sp(xml, id, "Curve", false)?;
    xml.push_str("<p:spPr>");
    xfrm.write(xml, "")?;
    xml.push_str(r#"<a:custGeom><a:avLst/><a:gdLst/><a:ahLst/><a:cxnLst/><a:rect l="0" t="0" r="r" b="b"/><a:pathLst>"#);
    write!(xml, r#"<a:path w="{}" h="{}" fill="none">"#, xfrm.cx, xfrm.cy)?;

    let local = |p: &Point| (pt_to_emu(p.x) - xfrm.x, pt_to_emu(p.y) - xfrm.y);
    let (sx, sy) = local(&points[0]);
    write!(xml, r#"<a:moveTo><a:pt x="{sx}" y="{sy}"/></a:moveTo><a:cubicBezTo>"#)?;
    for p in &points[1..] {
        let (x, y) = local(p);
        write!(xml, r#"<a:pt x="{x}" y="{y}"/>"#)?;
    }
    xml.push_str("</a:cubicBezTo></a:path></a:pathLst></a:custGeom><a:noFill/>");
    write_line(xml, color, arrow)?;
    xml.push_str("</p:spPr></p:sp>");
    Ok(())
}

/// `<p:bg>` element for a slide background.
pub(crate) fn write_background(xml: &mut String, fill: &Fill) -> Result<()> {
    xml.push_str("<p:bg><p:bgPr>");
    match fill {
        Fill::Solid(color) => {
            write!(xml, r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#, color.to_hex())?;
        },
        Fill::Gradient { start, end, angle } => {
            write!(
                xml,
                r#"<a:gradFill rotWithShape="1"><a:gsLst><a:gs pos="0"><a:srgbClr val="{}"/></a:gs><a:gs pos="100000"><a:srgbClr val="{}"/></a:gs></a:gsLst><a:lin ang="{}" scaled="0"/></a:gradFill>"#,
                start.to_hex(),
                end.to_hex(),
                degrees_to_angle_units(*angle)
            )?;
        },
    }
    xml.push_str("<a:effectLst/></p:bgPr></p:bg>");
    Ok(())
}
