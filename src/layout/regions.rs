//! Named slide layouts and text fitting.
//!
//! A layout is a fixed set of regions computed from the [`LayoutGrid`]. Each
//! region carries the font range and text budget that keep its content from
//! overflowing.
use smallvec::SmallVec;

use super::grid::{GUTTER, LayoutGrid, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    TitleSlide,
    TitleContent,
    TwoColumn,
    ImageText,
    DiagramFocus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionName {
    Title,
    Subtitle,
    Content,
    LeftContent,
    RightContent,
    Image,
    TextContent,
    Diagram,
    Caption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub name: RegionName,
    pub bounds: Rect,
    pub alignment: Alignment,
    /// Smallest and largest font size in points.
    pub font_range: (u32, u32),
    pub max_text_len: Option<usize>,
}

impl Region {
    fn new(name: RegionName, bounds: Rect, alignment: Alignment, font_range: (u32, u32)) -> Self {
        Self {
            name,
            bounds,
            alignment,
            font_range,
            max_text_len: None,
        }
    }

    fn with_text_budget(mut self, max: usize) -> Self {
        self.max_text_len = Some(max);
        self
    }

    /// Font size for `text`: the top of the range for short text, stepping
    /// down toward the bottom of the range as the text grows.
    pub fn font_size_for(&self, text: &str) -> u32 {
        let (min, max) = self.font_range;
        let span = max.saturating_sub(min) as f64;
        match text.chars().count() {
            0..50 => max,
            50..150 => min + (span * 0.7) as u32,
            150..300 => min + (span * 0.4) as u32,
            _ => min,
        }
    }

    /// Apply this region's text budget.
    pub fn fit<'a>(&self, text: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_text_len {
            Some(max) => fit_text(text, max),
            None => std::borrow::Cow::Borrowed(text),
        }
    }
}

pub type Regions = SmallVec<[Region; 4]>;

impl LayoutKind {
    /// Pick a layout for the slide's content.
    pub fn for_content(is_title: bool, has_diagram: bool, has_image: bool, two_column: bool) -> Self {
        if is_title {
            LayoutKind::TitleSlide
        } else if has_diagram {
            LayoutKind::DiagramFocus
        } else if has_image {
            LayoutKind::ImageText
        } else if two_column {
            LayoutKind::TwoColumn
        } else {
            LayoutKind::TitleContent
        }
    }

    pub fn regions(&self, grid: &LayoutGrid) -> Regions {
        let title = grid.title_area();
        let content = grid.content_area();
        let mut regions = Regions::new();

        match self {
            LayoutKind::TitleSlide => {
                let h = grid.height();
                regions.push(Region::new(
                    RegionName::Title,
                    Rect::new(title.x, h * 0.30, title.width, 96.0),
                    Alignment::Center,
                    (36, 48),
                ));
                regions.push(Region::new(
                    RegionName::Subtitle,
                    Rect::new(title.x, h * 0.30 + 96.0 + GUTTER, title.width, 64.0),
                    Alignment::Center,
                    (18, 24),
                ));
            },
            LayoutKind::TitleContent => {
                regions.push(Region::new(RegionName::Title, title, Alignment::Left, (24, 32)));
                regions.push(
                    Region::new(RegionName::Content, content, Alignment::Left, (14, 18))
                        .with_text_budget(500),
                );
            },
            LayoutKind::TwoColumn => {
                let col = (content.width - GUTTER) / 2.0;
                regions.push(Region::new(RegionName::Title, title, Alignment::Left, (24, 32)));
                regions.push(
                    Region::new(
                        RegionName::LeftContent,
                        Rect::new(content.x, content.y, col, content.height),
                        Alignment::Left,
                        (12, 16),
                    )
                    .with_text_budget(250),
                );
                regions.push(
                    Region::new(
                        RegionName::RightContent,
                        Rect::new(content.x + col + GUTTER, content.y, col, content.height),
                        Alignment::Left,
                        (12, 16),
                    )
                    .with_text_budget(250),
                );
            },
            LayoutKind::ImageText => {
                let image_w = content.width * 0.6;
                let text_x = content.x + content.width * 0.65;
                regions.push(Region::new(RegionName::Title, title, Alignment::Left, (24, 32)));
                regions.push(Region::new(
                    RegionName::Image,
                    Rect::new(content.x, content.y, image_w, content.height),
                    Alignment::Center,
                    (12, 16),
                ));
                regions.push(
                    Region::new(
                        RegionName::TextContent,
                        Rect::new(text_x, content.y, content.right() - text_x, content.height),
                        Alignment::Left,
                        (12, 16),
                    )
                    .with_text_budget(300),
                );
            },
            LayoutKind::DiagramFocus => {
                let diagram = grid.diagram_area();
                let caption_h = grid.vertical_rhythm(2);
                regions.push(Region::new(RegionName::Title, title, Alignment::Left, (20, 28)));
                regions.push(Region::new(RegionName::Diagram, diagram, Alignment::Center, (12, 18)));
                regions.push(
                    Region::new(
                        RegionName::Caption,
                        Rect::new(content.x, content.bottom() - caption_h, content.width, caption_h),
                        Alignment::Center,
                        (10, 14),
                    )
                    .with_text_budget(100),
                );
            },
        }

        regions
    }

    pub fn region(&self, grid: &LayoutGrid, name: RegionName) -> Option<Region> {
        self.regions(grid).into_iter().find(|r| r.name == name)
    }
}

/// Truncate `text` to at most `max_len` characters.
///
/// Prefers ending at a sentence boundary past 70% of the budget, then at a
/// word boundary past 80%, appending `...` whenever a sentence is cut.
pub fn fit_text(text: &str, max_len: usize) -> std::borrow::Cow<'_, str> {
    use std::borrow::Cow;

    if text.chars().count() <= max_len {
        return Cow::Borrowed(text);
    }
    if max_len <= 3 {
        return Cow::Owned(".".repeat(max_len));
    }

    let keep = max_len - 3;
    let cut = text.char_indices().nth(keep).map(|(i, _)| i).unwrap_or(text.len());
    let truncated = &text[..cut];

    let sentence_floor = max_len as f64 * 0.7;
    if let Some(pos) = truncated.rfind(['.', '!', '?']) {
        if truncated[..pos].chars().count() as f64 > sentence_floor {
            return Cow::Owned(truncated[..=pos].to_string());
        }
    }

    let word_floor = max_len as f64 * 0.8;
    if let Some(pos) = truncated.rfind(char::is_whitespace) {
        if truncated[..pos].chars().count() as f64 > word_floor {
            return Cow::Owned(format!("{}...", truncated[..pos].trim_end()));
        }
    }

    Cow::Owned(format!("{truncated}..."))
}

/// Strip markdown emphasis and collapse whitespace.
pub fn clean_text(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !matches!(c, '*' | '_' | '`')).collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

const EMPHASIS_WORDS: [&str; 5] = ["key", "important", "critical", "main", "primary"];

/// Reduce `points` to at most `max` readable bullets.
///
/// Empty points are dropped. When more than `max` remain, shorter points and
/// points carrying emphasis words are preferred; the kept points stay in their
/// original order.
pub fn optimize_bullets<S: AsRef<str>>(points: &[S], max: usize) -> Vec<String> {
    let cleaned: Vec<String> = points
        .iter()
        .map(|p| clean_text(p.as_ref()))
        .filter(|p| !p.is_empty())
        .collect();
    if cleaned.len() <= max {
        return cleaned;
    }

    let mut scored: Vec<(usize, i64)> = cleaned
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let length_score = 100i64.saturating_sub(p.chars().count() as i64).max(0);
            let lower = p.to_lowercase();
            let emphasis = EMPHASIS_WORDS.iter().filter(|w| lower.contains(*w)).count() as i64 * 10;
            (i, length_score + emphasis)
        })
        .collect();
    // stable: equal scores keep source order
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    let mut keep: Vec<usize> = scored.into_iter().take(max).map(|(i, _)| i).collect();
    keep.sort_unstable();
    keep.into_iter().map(|i| cleaned[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_text_short_is_borrowed() {
        let out = fit_text("short", 10);
        assert!(matches!(out, std::borrow::Cow::Borrowed("short")));
    }

    #[test]
    fn test_fit_text_prefers_sentence_boundary() {
        let text = "The parser is fast. The writer is portable and small enough.";
        let out = fit_text(text, 25);
        assert_eq!(out, "The parser is fast.");
    }

    #[test]
    fn test_fit_text_word_boundary() {
        let text = "aaaaaaaaaa bbbbbbbbbbbbbbb cc dddddddd";
        let out = fit_text(text, 30);
        assert!(out.chars().count() <= 30);
        assert_eq!(out, "aaaaaaaaaa bbbbbbbbbbbbbbb...");
    }

    #[test]
    fn test_fit_text_hard_cut() {
        let out = fit_text("abcdefghijklmnopqrstuvwxyz", 10);
        assert_eq!(out, "abcdefg...");
        assert_eq!(fit_text("abcdef", 2), "..");
    }

    #[test]
    fn test_fit_text_multibyte() {
        let out = fit_text("日本語のテキストはとても長いです", 8);
        assert_eq!(out.chars().count(), 8);
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  **Fast**   _parser_ "), "Fast parser");
    }

    #[test]
    fn test_optimize_bullets_keeps_order() {
        let points = [
            "A very long point that goes on and on about details nobody will read on a slide",
            "Short",
            "",
            "Key insight",
            "Another moderately long point about the roadmap",
        ];
        let out = optimize_bullets(&points, 2);
        assert_eq!(out, vec!["Short".to_string(), "Key insight".to_string()]);
        assert_eq!(optimize_bullets(&points, 10).len(), 4);
    }

    #[test]
    fn test_layout_selection() {
        assert_eq!(LayoutKind::for_content(true, true, false, false), LayoutKind::TitleSlide);
        assert_eq!(LayoutKind::for_content(false, true, true, false), LayoutKind::DiagramFocus);
        assert_eq!(LayoutKind::for_content(false, false, false, false), LayoutKind::TitleContent);
    }

    #[test]
    fn test_regions_fit_on_slide() {
        let grid = LayoutGrid::default();
        let slide = grid.slide_rect();
        for kind in [
            LayoutKind::TitleSlide,
            LayoutKind::TitleContent,
            LayoutKind::TwoColumn,
            LayoutKind::ImageText,
            LayoutKind::DiagramFocus,
        ] {
            for region in kind.regions(&grid) {
                assert!(slide.contains(&region.bounds), "{kind:?} {:?}", region.name);
            }
        }
    }

    #[test]
    fn test_two_column_split() {
        let grid = LayoutGrid::default();
        let left = LayoutKind::TwoColumn.region(&grid, RegionName::LeftContent).unwrap();
        let right = LayoutKind::TwoColumn.region(&grid, RegionName::RightContent).unwrap();
        assert_eq!(left.bounds.width, right.bounds.width);
        assert_eq!(right.bounds.x - left.bounds.right(), GUTTER);
    }

    #[test]
    fn test_font_size_steps_down() {
        let grid = LayoutGrid::default();
        let content = LayoutKind::TitleContent.region(&grid, RegionName::Content).unwrap();
        assert_eq!(content.font_size_for("short"), 18);
        assert_eq!(content.font_size_for(&"x".repeat(100)), 16);
        assert_eq!(content.font_size_for(&"x".repeat(200)), 15);
        assert_eq!(content.font_size_for(&"x".repeat(400)), 14);
    }
}
