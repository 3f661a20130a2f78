//! Parser for the plain-text slide outline produced by the content writer.
//!
//! ```text
//! SLIDE 1 - PROJECT OVERVIEW:
//! TITLE: Streaming Ingest Platform
//! THEME_SUGGESTION: tech_innovation
//! SLIDE_TYPE: title_slide
//! MAIN_POINTS:
//! - Rust services behind a gRPC gateway
//! SPEAKER_NOTES: Open with the latency numbers
//! ```
//!
//! Markdown emphasis (`**`, `*`) anywhere on a line is ignored. Lines before
//! the first `SLIDE` header are skipped.
use tracing::debug;

use crate::design::DesignTheme;

use super::composer::{SlideKind, SlideSpec};

/// One slide of an outline.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineSlide {
    pub spec: SlideSpec,
    /// Theme the writer suggested, when it named a known one.
    pub theme: Option<DesignTheme>,
}

impl From<OutlineSlide> for SlideSpec {
    fn from(slide: OutlineSlide) -> Self {
        slide.spec
    }
}

pub fn parse_outline(text: &str) -> Vec<OutlineSlide> {
    let mut slides = Vec::new();
    let mut current: Option<OutlineSlide> = None;

    for raw in text.lines() {
        let line = raw.trim().replace('*', "");
        let line = line.trim();

        if is_slide_header(line) {
            slides.extend(current.take());
            current = Some(OutlineSlide {
                spec: SlideSpec::default(),
                theme: None,
            });
            continue;
        }
        let Some(slide) = current.as_mut() else {
            continue;
        };

        if let Some(title) = line.strip_prefix("TITLE:") {
            slide.spec.title = title.trim().to_string();
        } else if let Some(theme) = line.strip_prefix("THEME_SUGGESTION:") {
            slide.theme = theme.trim().parse().ok();
            if slide.theme.is_none() {
                debug!(theme = theme.trim(), "ignoring unknown theme suggestion");
            }
        } else if let Some(kind) = line.strip_prefix("SLIDE_TYPE:") {
            slide.spec.kind = kind.trim().parse().unwrap_or_else(|()| {
                debug!(kind = kind.trim(), "unknown slide type, using content");
                SlideKind::Content
            });
        } else if let Some(notes) = line.strip_prefix("SPEAKER_NOTES:") {
            let notes = notes.trim();
            if !notes.is_empty() {
                slide.spec.notes = Some(notes.to_string());
            }
        } else if let Some(point) = line.strip_prefix("- ") {
            let point = point.trim();
            if !point.is_empty() {
                slide.spec.bullets.push(point.to_string());
            }
        }
    }
    slides.extend(current);
    slides
}

fn is_slide_header(line: &str) -> bool {
    line.strip_prefix("SLIDE ")
        .is_some_and(|rest| rest.contains(" - ") || rest.starts_with(|c: char| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTLINE: &str = "\
Here is the outline you asked for.

**SLIDE 1 - PROJECT OVERVIEW:**
**TITLE:** Streaming Ingest Platform
THEME_SUGGESTION: tech_innovation
SLIDE_TYPE: title_slide
MAIN_POINTS:
- Rust services behind a gRPC gateway
- *Sub-second* ingest latency
SPEAKER_NOTES: Open with the latency numbers

SLIDE 2 - TECHNICAL ARCHITECTURE:
TITLE: Architecture
THEME_SUGGESTION: neon_dreams
SLIDE_TYPE: architecture_slide
- Gateway -> Router
- Router -> Storage
-
SLIDE 3 - NEXT:
TITLE: Wrap-up
SLIDE_TYPE: closing_slide
";

    #[test]
    fn test_parse_outline() {
        let slides = parse_outline(OUTLINE);
        assert_eq!(slides.len(), 3);

        assert_eq!(slides[0].spec.kind, SlideKind::Title);
        assert_eq!(slides[0].spec.title, "Streaming Ingest Platform");
        assert_eq!(slides[0].theme, Some(DesignTheme::TechInnovation));
        assert_eq!(
            slides[0].spec.bullets,
            ["Rust services behind a gRPC gateway", "Sub-second ingest latency"]
        );

        assert_eq!(slides[0].spec.notes.as_deref(), Some("Open with the latency numbers"));

        assert_eq!(slides[1].spec.kind, SlideKind::Architecture);
        assert_eq!(slides[1].spec.notes, None);
        assert_eq!(slides[1].theme, None);
        assert_eq!(slides[1].spec.bullets, ["Gateway -> Router", "Router -> Storage"]);

        assert_eq!(slides[2].spec.kind, SlideKind::Content);
        assert!(slides[2].spec.bullets.is_empty());
    }

    #[test]
    fn test_text_without_headers_yields_nothing() {
        assert!(parse_outline("TITLE: orphan\n- point").is_empty());
        assert!(parse_outline("").is_empty());
    }

    #[test]
    fn test_into_slide_spec() {
        let spec: SlideSpec = parse_outline("SLIDE 1 - X\nTITLE: Hello").remove(0).into();
        assert_eq!(spec.title, "Hello");
        assert_eq!(spec.kind, SlideKind::Content);
    }
}
