//! Fixed and palette-derived parts of a minimal presentation package.
use std::fmt::Write as FmtWrite;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::common::xml::escape_xml;
use crate::design::ColorPalette;
use crate::error::Result;

pub(crate) const NS_PRESENTATION: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub(crate) const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const RT_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const RT_CORE: &str = "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const RT_EXTENDED: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
const RT_SLIDE_MASTER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const RT_SLIDE_LAYOUT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const RT_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const RT_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const RT_NOTES_MASTER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesMaster";
const RT_NOTES_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// `notes` lists the 1-based numbers of slides that carry speaker notes.
pub(crate) fn content_types_xml(slide_count: usize, notes: &[usize]) -> Result<String> {
    let mut xml = String::with_capacity(1024 + (slide_count + notes.len()) * 160);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#);
    for i in 1..=slide_count {
        write!(
            xml,
            r#"<Override PartName="/ppt/slides/slide{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
        )?;
    }
    if !notes.is_empty() {
        xml.push_str(r#"<Override PartName="/ppt/notesMasters/notesMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.notesMaster+xml"/>"#);
        xml.push_str(r#"<Override PartName="/ppt/theme/theme2.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#);
    }
    for n in notes {
        write!(
            xml,
            r#"<Override PartName="/ppt/notesSlides/notesSlide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml"/>"#
        )?;
    }
    xml.push_str(r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#);
    xml.push_str(r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#);
    xml.push_str("</Types>");
    Ok(xml)
}

/// Relationship list with `(id, type, target)` entries.
fn rels_xml(entries: &[(String, &str, String)]) -> Result<String> {
    let mut xml = String::with_capacity(256 + entries.len() * 160);
    xml.push_str(XML_DECL);
    write!(xml, r#"<Relationships xmlns="{NS_PKG_REL}">"#)?;
    for (id, kind, target) in entries {
        write!(xml, r#"<Relationship Id="{id}" Type="{kind}" Target="{target}"/>"#)?;
    }
    xml.push_str("</Relationships>");
    Ok(xml)
}

pub(crate) fn root_rels_xml() -> Result<String> {
    rels_xml(&[
        ("rId1".into(), RT_OFFICE_DOCUMENT, "ppt/presentation.xml".into()),
        ("rId2".into(), RT_CORE, "docProps/core.xml".into()),
        ("rId3".into(), RT_EXTENDED, "docProps/app.xml".into()),
    ])
}

/// Presentation relationships: master is rId1, theme rId2, slides from rId3,
/// then the notes master when any slide has notes.
pub(crate) fn presentation_rels_xml(slide_count: usize, with_notes: bool) -> Result<String> {
    let mut entries = vec![
        ("rId1".to_string(), RT_SLIDE_MASTER, "slideMasters/slideMaster1.xml".to_string()),
        ("rId2".to_string(), RT_THEME, "theme/theme1.xml".to_string()),
    ];
    entries.extend((1..=slide_count).map(|i| (format!("rId{}", i + 2), RT_SLIDE, format!("slides/slide{i}.xml"))));
    if with_notes {
        entries.push((notes_master_rid(slide_count), RT_NOTES_MASTER, "notesMasters/notesMaster1.xml".to_string()));
    }
    rels_xml(&entries)
}

fn notes_master_rid(slide_count: usize) -> String {
    format!("rId{}", slide_count + 3)
}

pub(crate) fn presentation_xml(slide_count: usize, with_notes: bool, width_emu: i64, height_emu: i64) -> Result<String> {
    let mut xml = String::with_capacity(1024 + slide_count * 48);
    xml.push_str(XML_DECL);
    write!(
        xml,
        r#"<p:presentation xmlns:a="{NS_DRAWING}" xmlns:r="{NS_REL}" xmlns:p="{NS_PRESENTATION}" saveSubsetFonts="1">"#
    )?;
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);
    if with_notes {
        write!(
            xml,
            r#"<p:notesMasterIdLst><p:notesMasterId r:id="{}"/></p:notesMasterIdLst>"#,
            notes_master_rid(slide_count)
        )?;
    }
    if slide_count > 0 {
        xml.push_str("<p:sldIdLst>");
        for i in 0..slide_count {
            write!(xml, r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 3)?;
        }
        xml.push_str("</p:sldIdLst>");
    }
    write!(xml, r#"<p:sldSz cx="{width_emu}" cy="{height_emu}"/>"#)?;
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");
    Ok(xml)
}

/// `notes` is the slide's own number when it has a notes slide.
pub(crate) fn slide_rels_xml(notes: Option<usize>) -> Result<String> {
    let mut entries = vec![("rId1".to_string(), RT_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml".to_string())];
    if let Some(n) = notes {
        entries.push(("rId2".to_string(), RT_NOTES_SLIDE, format!("../notesSlides/notesSlide{n}.xml")));
    }
    rels_xml(&entries)
}

pub(crate) fn notes_master_rels_xml() -> Result<String> {
    rels_xml(&[("rId1".into(), RT_THEME, "../theme/theme2.xml".into())])
}

pub(crate) fn notes_slide_rels_xml(slide: usize) -> Result<String> {
    rels_xml(&[
        ("rId1".into(), RT_NOTES_MASTER, "../notesMasters/notesMaster1.xml".into()),
        ("rId2".into(), RT_SLIDE, format!("../slides/slide{slide}.xml")),
    ])
}

pub(crate) fn master_rels_xml() -> Result<String> {
    rels_xml(&[
        ("rId1".into(), RT_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml".into()),
        ("rId2".into(), RT_THEME, "../theme/theme1.xml".into()),
    ])
}

pub(crate) fn layout_rels_xml() -> Result<String> {
    rels_xml(&[("rId1".into(), RT_SLIDE_MASTER, "../slideMasters/slideMaster1.xml".into())])
}

const TREE_PROPS: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;
const CLR_MAP: &str = r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#;

pub(crate) fn slide_master_xml() -> Result<String> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    write!(xml, r#"<p:sldMaster xmlns:a="{NS_DRAWING}" xmlns:r="{NS_REL}" xmlns:p="{NS_PRESENTATION}">"#)?;
    write!(
        xml,
        r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>{TREE_PROPS}</p:spTree></p:cSld>"#
    )?;
    xml.push_str(CLR_MAP);
    xml.push_str(r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#);
    xml.push_str(r#"<p:txStyles><p:titleStyle><a:lvl1pPr><a:defRPr sz="3200"/></a:lvl1pPr></p:titleStyle><p:bodyStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:bodyStyle><p:otherStyle><a:lvl1pPr><a:defRPr sz="1400"/></a:lvl1pPr></p:otherStyle></p:txStyles>"#);
    xml.push_str("</p:sldMaster>");
    Ok(xml)
}

pub(crate) fn blank_layout_xml() -> Result<String> {
    let mut xml = String::with_capacity(768);
    xml.push_str(XML_DECL);
    write!(
        xml,
        r#"<p:sldLayout xmlns:a="{NS_DRAWING}" xmlns:r="{NS_REL}" xmlns:p="{NS_PRESENTATION}" type="blank" preserve="1">"#
    )?;
    write!(xml, r#"<p:cSld name="Blank"><p:spTree>{TREE_PROPS}</p:spTree></p:cSld>"#)?;
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>");
    Ok(xml)
}

/// Notes master with the body placeholder that notes slides inherit from.
pub(crate) fn notes_master_xml() -> Result<String> {
    let mut xml = String::with_capacity(1536);
    xml.push_str(XML_DECL);
    write!(xml, r#"<p:notesMaster xmlns:a="{NS_DRAWING}" xmlns:r="{NS_REL}" xmlns:p="{NS_PRESENTATION}">"#)?;
    write!(xml, "<p:cSld><p:spTree>{TREE_PROPS}")?;
    xml.push_str(r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Notes Placeholder 1"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr>"#);
    xml.push_str(r#"<p:spPr><a:xfrm><a:off x="685800" y="4400550"/><a:ext cx="5486400" cy="3600450"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#);
    xml.push_str(r#"<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(CLR_MAP);
    xml.push_str(r#"<p:notesStyle><a:lvl1pPr><a:defRPr sz="1200"/></a:lvl1pPr></p:notesStyle>"#);
    xml.push_str("</p:notesMaster>");
    Ok(xml)
}

/// Notes page for one slide; each line of `text` becomes a paragraph.
pub(crate) fn notes_slide_xml(text: &str) -> Result<String> {
    let mut xml = String::with_capacity(1024 + text.len());
    xml.push_str(XML_DECL);
    write!(xml, r#"<p:notes xmlns:a="{NS_DRAWING}" xmlns:r="{NS_REL}" xmlns:p="{NS_PRESENTATION}">"#)?;
    write!(xml, "<p:cSld><p:spTree>{TREE_PROPS}")?;
    xml.push_str(r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Notes Placeholder 1"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/>"#);
    xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/>");
    let lines: Vec<&str> = if text.trim().is_empty() { vec![""] } else { text.lines().collect() };
    for line in lines {
        if line.trim().is_empty() {
            xml.push_str(r#"<a:p><a:endParaRPr lang="en-US"/></a:p>"#);
        } else {
            write!(xml, r#"<a:p><a:r><a:rPr lang="en-US"/><a:t>{}</a:t></a:r></a:p>"#, escape_xml(line.trim_end()))?;
        }
    }
    xml.push_str("</p:txBody></p:sp></p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:notes>");
    Ok(xml)
}

/// Theme whose color scheme carries the deck palette, so that theme-aware
/// editors offer the same colors.
pub(crate) fn theme_xml(name: &str, palette: &ColorPalette) -> Result<String> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECL);
    write!(xml, r#"<a:theme xmlns:a="{NS_DRAWING}" name="{}">"#, escape_xml(name))?;
    write!(xml, r#"<a:themeElements><a:clrScheme name="{}">"#, escape_xml(name))?;
    let scheme = [
        ("dk1", palette.text_primary()),
        ("lt1", palette.background()),
        ("dk2", palette.primary()),
        ("lt2", palette.secondary()),
        ("accent1", palette.accent()),
        ("accent2", palette.gradient_start()),
        ("accent3", palette.gradient_end()),
        ("accent4", palette.success()),
        ("accent5", palette.warning()),
        ("accent6", palette.text_secondary()),
        ("hlink", palette.accent()),
        ("folHlink", palette.secondary()),
    ];
    for (tag, color) in scheme {
        write!(xml, r#"<a:{tag}><a:srgbClr val="{}"/></a:{tag}>"#, color.to_hex())?;
    }
    xml.push_str("</a:clrScheme>");
    xml.push_str(r#"<a:fontScheme name="Deck"><a:majorFont><a:latin typeface="Segoe UI"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Segoe UI"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme>"#);
    xml.push_str(r#"<a:fmtScheme name="Deck"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst>"#);
    xml.push_str(r#"<a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst>"#);
    xml.push_str(r#"<a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst>"#);
    xml.push_str(r#"<a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme>"#);
    xml.push_str("</a:themeElements></a:theme>");
    Ok(xml)
}

pub(crate) fn core_props_xml(title: &str, created: DateTime<Utc>) -> Result<String> {
    let stamp = created.to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut xml = String::with_capacity(768);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#);
    write!(xml, "<dc:title>{}</dc:title>", escape_xml(title))?;
    write!(xml, "<dc:creator>{}</dc:creator>", env!("CARGO_PKG_NAME"))?;
    write!(xml, r#"<dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created>"#)?;
    write!(xml, r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified>"#)?;
    xml.push_str("</cp:coreProperties>");
    Ok(xml)
}

pub(crate) fn app_props_xml(slide_count: usize) -> Result<String> {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#);
    write!(xml, "<Application>{} {}</Application>", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))?;
    write!(xml, "<Slides>{slide_count}</Slides>")?;
    xml.push_str("</Properties>");
    Ok(xml)
}
