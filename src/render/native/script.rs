//! PowerShell text for host commands.
//!
//! Every batch is a single line: `-Command -` executes stdin line by line, so
//! a batch must not contain raw newlines. Each batch reports back with an
//! `<<ack:N>>` or `<<err:N:message>>` line.
use std::fmt::Write as FmtWrite;
use std::path::Path;

use crate::common::write_num;
use crate::common::xml::escape_ps_single_quoted;
use crate::design::RgbColor;
use crate::diagram::{ArrowHead, ConnectorKind, NodeShape};
use crate::error::Result;
use crate::layout::{Alignment, Point, Rect};
use crate::render::{DEFAULT_FONT, Fill, TextBlock, TextStyle};

use super::host::HostCommand;

const PP_LAYOUT_BLANK: u32 = 12;
const PP_SAVE_AS_OPEN_XML: u32 = 24;
const MSO_TRUE: i32 = -1;
const MSO_FALSE: i32 = 0;
const MSO_SEND_TO_BACK: u32 = 1;
const MSO_TEXT_ORIENTATION_HORIZONTAL: u32 = 1;
const MSO_GRADIENT_HORIZONTAL: u32 = 1;
const MSO_ARROWHEAD_NONE: u32 = 1;
const MSO_ARROWHEAD_TRIANGLE: u32 = 2;
const LINE_WEIGHT: f64 = 1.5;

/// Reply line parsed from the host's stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Reply {
    Ack(u64),
    Failed(u64, String),
}

pub(crate) fn parse_reply(line: &str) -> Option<Reply> {
    let body = line.trim().strip_prefix("<<")?.strip_suffix(">>")?;
    if let Some(seq) = body.strip_prefix("ack:") {
        return seq.parse().ok().map(Reply::Ack);
    }
    let rest = body.strip_prefix("err:")?;
    let (seq, message) = rest.split_once(':')?;
    Some(Reply::Failed(seq.parse().ok()?, message.to_string()))
}

fn wrap(seq: u64, body: &str) -> String {
    format!(
        "try {{ {body}; [Console]::Out.WriteLine('<<ack:{seq}>>') }} catch {{ [Console]::Out.WriteLine('<<err:{seq}:' + ($_.Exception.Message -replace '[\\r\\n]', ' ') + '>>') }}; [Console]::Out.Flush()\n"
    )
}

pub(crate) fn handshake_script(seq: u64) -> String {
    wrap(
        seq,
        "$ErrorActionPreference = 'Stop'; $app = New-Object -ComObject PowerPoint.Application; $deck = $null; $slide = $null; $art = $null",
    )
}

pub(crate) fn batch_script(seq: u64, commands: &[HostCommand]) -> Result<String> {
    let mut body = String::with_capacity(commands.len() * 160);
    for (i, command) in commands.iter().enumerate() {
        if i > 0 {
            body.push_str("; ");
        }
        write_command(&mut body, command)?;
    }
    Ok(wrap(seq, &body))
}

pub(crate) fn shutdown_script() -> &'static str {
    "try { if ($deck) { $deck.Close() } } catch {}; try { $app.Quit() } catch {}; exit\n"
}

fn quoted(buf: &mut String, text: &str) {
    buf.push('\'');
    let flat = text.replace(['\r', '\n'], " ");
    buf.push_str(&escape_ps_single_quoted(&flat));
    buf.push('\'');
}

fn color(buf: &mut String, color: RgbColor) -> Result<()> {
    write!(buf, "{}", color.to_bgr_u32())?;
    Ok(())
}

fn rect_args(buf: &mut String, r: &Rect) {
    for (i, v) in [r.x, r.y, r.width, r.height].into_iter().enumerate() {
        if i > 0 {
            buf.push_str(", ");
        }
        write_num(buf, v);
    }
}

fn point_args(buf: &mut String, points: &[Point]) {
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            buf.push_str(", ");
        }
        write_num(buf, p.x);
        buf.push_str(", ");
        write_num(buf, p.y);
    }
}

fn place(buf: &mut String, target: &str, r: &Rect) {
    for (prop, v) in [("Left", r.x), ("Top", r.y), ("Width", r.width), ("Height", r.height)] {
        buf.push_str(target);
        buf.push('.');
        buf.push_str(prop);
        buf.push_str(" = ");
        write_num(buf, v);
        buf.push_str("; ");
    }
}

fn shape_type(shape: NodeShape) -> u32 {
    match shape {
        NodeShape::Rect => 1,
        NodeShape::RoundedRect => 5,
        NodeShape::Ellipse => 9,
        NodeShape::Trapezoid { .. } => 3,
    }
}

fn connector_type(kind: ConnectorKind) -> u32 {
    match kind {
        ConnectorKind::Straight => 1,
        ConnectorKind::Elbow => 2,
        ConnectorKind::Curved => 3,
    }
}

fn arrowhead(arrow: ArrowHead) -> u32 {
    match arrow {
        ArrowHead::None => MSO_ARROWHEAD_NONE,
        ArrowHead::End => MSO_ARROWHEAD_TRIANGLE,
    }
}

fn alignment(align: Alignment) -> u32 {
    match align {
        Alignment::Left => 1,
        Alignment::Center => 2,
        Alignment::Right => 3,
    }
}

fn flag(on: bool) -> i32 {
    if on { MSO_TRUE } else { MSO_FALSE }
}

fn write_line_style(buf: &mut String, target: &str, line: RgbColor, arrow: ArrowHead) -> Result<()> {
    write!(buf, "{target}.Line.ForeColor.RGB = ")?;
    color(buf, line)?;
    write!(buf, "; {target}.Line.Weight = ")?;
    write_num(buf, LINE_WEIGHT);
    write!(
        buf,
        "; {target}.Line.EndArrowheadStyle = {}; {target}.ZOrder({MSO_SEND_TO_BACK})",
        arrowhead(arrow)
    )?;
    Ok(())
}

fn write_text_box(buf: &mut String, block: &TextBlock) -> Result<()> {
    write!(buf, "$s = $slide.Shapes.AddTextbox({MSO_TEXT_ORIENTATION_HORIZONTAL}, ")?;
    rect_args(buf, &block.bounds);
    write!(buf, "); $s.TextFrame.WordWrap = {MSO_TRUE}; $r = $s.TextFrame.TextRange; $r.Text = (@(")?;
    for (i, paragraph) in block.paragraphs.iter().enumerate() {
        if i > 0 {
            buf.push_str(", ");
        }
        quoted(buf, paragraph);
    }
    buf.push_str(") -join [char]13); $r.Font.Name = ");
    quoted(buf, DEFAULT_FONT);
    write!(buf, "; $r.Font.Size = {}; $r.Font.Color.RGB = ", block.font_size)?;
    color(buf, block.color)?;
    write!(
        buf,
        "; $r.Font.Bold = {}; $r.Font.Italic = {}; $r.ParagraphFormat.Alignment = {}; $r.ParagraphFormat.Bullet.Visible = {}",
        flag(block.style.contains(TextStyle::BOLD)),
        flag(block.style.contains(TextStyle::ITALIC)),
        alignment(block.align),
        flag(block.style.contains(TextStyle::BULLETED)),
    )?;
    Ok(())
}

fn write_background(buf: &mut String, fill: &Fill) -> Result<()> {
    write!(buf, "$slide.FollowMasterBackground = {MSO_FALSE}; $bg = $slide.Background.Fill; ")?;
    match fill {
        Fill::Solid(c) => {
            buf.push_str("$bg.Solid(); $bg.ForeColor.RGB = ");
            color(buf, *c)?;
        },
        Fill::Gradient { start, end, angle } => {
            write!(buf, "$bg.TwoColorGradient({MSO_GRADIENT_HORIZONTAL}, 1); $bg.ForeColor.RGB = ")?;
            color(buf, *start)?;
            buf.push_str("; $bg.BackColor.RGB = ");
            color(buf, *end)?;
            buf.push_str("; $bg.GradientAngle = ");
            write_num(buf, *angle);
        },
    }
    Ok(())
}

fn write_curve(buf: &mut String, points: &[Point; 4]) -> Result<()> {
    buf.push_str("$pts = New-Object 'single[,]' 4,2; ");
    for (i, p) in points.iter().enumerate() {
        write!(buf, "$pts[{i},0] = ")?;
        write_num(buf, p.x);
        write!(buf, "; $pts[{i},1] = ")?;
        write_num(buf, p.y);
        buf.push_str("; ");
    }
    write!(buf, "$c = $slide.Shapes.AddCurve($pts); $c.Fill.Visible = {MSO_FALSE}; ")?;
    Ok(())
}

fn write_notes(buf: &mut String, text: &str) {
    buf.push_str("$slide.NotesPage.Shapes.Placeholders(2).TextFrame.TextRange.Text = (@(");
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            buf.push_str(", ");
        }
        quoted(buf, line);
    }
    buf.push_str(") -join [char]13)");
}

fn write_save(buf: &mut String, path: &Path) -> Result<()> {
    buf.push_str("$deck.SaveAs(");
    quoted(buf, &path.to_string_lossy());
    write!(buf, ", {PP_SAVE_AS_OPEN_XML})")?;
    Ok(())
}

pub(crate) fn write_command(buf: &mut String, command: &HostCommand) -> Result<()> {
    match command {
        HostCommand::NewPresentation { width, height } => {
            write!(buf, "$deck = $app.Presentations.Add({MSO_FALSE}); $deck.PageSetup.SlideWidth = ")?;
            write_num(buf, *width);
            buf.push_str("; $deck.PageSetup.SlideHeight = ");
            write_num(buf, *height);
        },
        HostCommand::AddSlide { index } => {
            write!(buf, "$slide = $deck.Slides.Add({index}, {PP_LAYOUT_BLANK})")?;
        },
        HostCommand::SetBackground(fill) => write_background(buf, fill)?,
        HostCommand::AddRectangle { bounds, color: fill } => {
            buf.push_str("$s = $slide.Shapes.AddShape(1, ");
            rect_args(buf, bounds);
            write!(buf, "); $s.Line.Visible = {MSO_FALSE}; $s.Fill.ForeColor.RGB = ")?;
            color(buf, *fill)?;
        },
        HostCommand::AddTextBox(block) => write_text_box(buf, block)?,
        HostCommand::InsertSmartArt { layout, bounds, labels } => {
            buf.push_str("$layout = $null; foreach ($l in $app.SmartArtLayouts) { if ($l.Id -eq ");
            quoted(buf, layout);
            buf.push_str(") { $layout = $l; break } }; $art = $slide.Shapes.AddSmartArt($layout, ");
            rect_args(buf, bounds);
            buf.push_str("); while ($art.SmartArt.AllNodes.Count -gt 0) { $art.SmartArt.AllNodes.Item(1).Delete() }; foreach ($label in @(");
            for (i, label) in labels.iter().enumerate() {
                if i > 0 {
                    buf.push_str(", ");
                }
                quoted(buf, label);
            }
            buf.push_str(")) { $n = $art.SmartArt.AllNodes.Add(); $n.TextFrame2.TextRange.Text = $label }");
        },
        HostCommand::StyleNode {
            index,
            shape,
            bounds,
            fill,
            opacity,
            text_color,
            font_size,
        } => {
            write!(buf, "$ns = $art.SmartArt.AllNodes.Item({index}).Shapes.Item(1); $ns.AutoShapeType = {}; ", shape_type(*shape))?;
            place(buf, "$ns", bounds);
            if let NodeShape::Trapezoid { top_inset } = shape {
                let side = bounds.width.min(bounds.height);
                let adj = if side > 0.0 { top_inset / side } else { 0.0 };
                buf.push_str("$ns.Adjustments.Item(1) = ");
                write_num(buf, adj);
                buf.push_str("; ");
            }
            buf.push_str("$ns.Fill.ForeColor.RGB = ");
            color(buf, *fill)?;
            buf.push_str("; $ns.Fill.Transparency = ");
            write_num(buf, 1.0 - opacity.clamp(0.0, 1.0));
            buf.push_str("; $ns.TextFrame2.TextRange.Font.Fill.ForeColor.RGB = ");
            color(buf, *text_color)?;
            write!(buf, "; $ns.TextFrame2.TextRange.Font.Size = {font_size}")?;
        },
        HostCommand::HideTransitions => {
            buf.push_str("$keep = @{}; foreach ($n in $art.SmartArt.AllNodes) { foreach ($s in $n.Shapes) { $keep[$s.Name] = 1 } }; ");
            write!(buf, "foreach ($g in $art.GroupItems) {{ if (-not $keep.ContainsKey($g.Name)) {{ $g.Visible = {MSO_FALSE} }} }}")?;
        },
        HostCommand::AddConnector {
            kind,
            start,
            end,
            color: line,
            arrow,
        } => {
            write!(buf, "$c = $slide.Shapes.AddConnector({}, ", connector_type(*kind))?;
            point_args(buf, &[*start, *end]);
            buf.push_str("); ");
            write_line_style(buf, "$c", *line, *arrow)?;
        },
        HostCommand::AddCurve { points, color: line, arrow } => {
            write_curve(buf, points)?;
            write_line_style(buf, "$c", *line, *arrow)?;
        },
        HostCommand::SetNotes(text) => write_notes(buf, text),
        HostCommand::SaveAs(path) => write_save(buf, path)?,
        HostCommand::Close => buf.push_str("$deck.Close(); $deck = $null"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reply() {
        assert_eq!(parse_reply("<<ack:7>>\r\n"), Some(Reply::Ack(7)));
        assert_eq!(
            parse_reply("<<err:3:Invalid class string>>"),
            Some(Reply::Failed(3, "Invalid class string".to_string()))
        );
        assert_eq!(parse_reply("<<err:3:a:b>>"), Some(Reply::Failed(3, "a:b".to_string())));
        assert_eq!(parse_reply("PS> noise"), None);
        assert_eq!(parse_reply("<<ack:x>>"), None);
    }

    #[test]
    fn test_batch_is_one_line() {
        let block = TextBlock::new(Rect::new(10.0, 20.0, 300.0, 40.5), "it's\nmultiline", 24, RgbColor::BLACK);
        let script = batch_script(4, &[HostCommand::AddSlide { index: 1 }, HostCommand::AddTextBox(block)]).unwrap();
        assert_eq!(script.matches('\n').count(), 1);
        assert!(script.ends_with('\n'));
        assert!(script.contains("$slide = $deck.Slides.Add(1, 12)"));
        assert!(script.contains("AddTextbox(1, 10, 20, 300, 40.5)"));
        assert!(script.contains("'it''s multiline'"));
        assert!(script.contains("<<ack:4>>"));
        assert!(script.contains("<<err:4:"));
    }

    #[test]
    fn test_colors_are_bgr() {
        let mut buf = String::new();
        write_command(
            &mut buf,
            &HostCommand::AddRectangle {
                bounds: Rect::new(0.0, 0.0, 1.0, 1.0),
                color: RgbColor::new(0x11, 0x22, 0x33),
            },
        )
        .unwrap();
        assert!(buf.ends_with(&format!("RGB = {}", 0x332211)));
    }

    #[test]
    fn test_curve_points() {
        let mut buf = String::new();
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 10.0),
            Point::new(20.0, 20.0),
        ];
        write_command(
            &mut buf,
            &HostCommand::AddCurve {
                points,
                color: RgbColor::BLACK,
                arrow: ArrowHead::End,
            },
        )
        .unwrap();
        assert!(buf.contains("$pts[3,1] = 20"));
        assert!(buf.contains("AddCurve($pts)"));
        assert!(buf.contains("EndArrowheadStyle = 2"));
    }

    #[test]
    fn test_notes_keep_line_breaks() {
        let mut buf = String::new();
        write_command(&mut buf, &HostCommand::SetNotes("Open with the demo\nDon't skip Q&A".into())).unwrap();
        assert_eq!(
            buf,
            "$slide.NotesPage.Shapes.Placeholders(2).TextFrame.TextRange.Text = \
             (@('Open with the demo', 'Don''t skip Q&A') -join [char]13)"
        );
    }

    #[test]
    fn test_save_uses_open_xml_format() {
        let mut buf = String::new();
        write_command(&mut buf, &HostCommand::SaveAs("C:\\out\\deck.pptx".into())).unwrap();
        assert_eq!(buf, "$deck.SaveAs('C:\\out\\deck.pptx', 24)");
    }
}
