//! Theme selection from content keywords and repository file types.
//!
//! Both selectors are pure scoring functions: every theme accumulates hits, the
//! best score wins, and ties fall to [`DesignTheme::PRIORITY`]. With no evidence
//! at all the result is the default corporate theme.
use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;
use phf::phf_map;

use super::theme::DesignTheme;

const TECH_KEYWORDS: &[&str] = &[
    "ai", "ml", "neural", "machine learning", "deep learning", "algorithm", "api", "cloud",
    "software", "platform", "data", "blockchain", "kubernetes", "microservice", "model",
    "inference", "compiler", "automation", "python", "rust", "backend", "database",
];

const CREATIVE_KEYWORDS: &[&str] = &[
    "creative", "art", "design", "visual", "brand", "innovative", "colorful", "illustration",
    "animation", "game", "music", "ui", "ux",
];

const LUXURY_KEYWORDS: &[&str] = &[
    "luxury", "premium", "elegant", "exclusive", "sophisticated", "high-end", "boutique",
    "fashion", "minimal", "minimalist",
];

const CORPORATE_KEYWORDS: &[&str] = &[
    "business", "corporate", "professional", "enterprise", "company", "finance", "strategy",
    "revenue", "quarterly", "stakeholder", "compliance", "sales",
];

const ADOBE_KEYWORDS: &[&str] = &[
    "adobe", "photoshop", "illustrator", "premiere", "after effects", "media", "video",
    "photography", "editing",
];

const BEHANCE_KEYWORDS: &[&str] = &[
    "portfolio", "showcase", "case study", "gallery", "behance", "dribbble", "project showcase",
];

static KEYWORD_SETS: [(DesignTheme, &[&str]); 6] = [
    (DesignTheme::CorporateModern, CORPORATE_KEYWORDS),
    (DesignTheme::TechInnovation, TECH_KEYWORDS),
    (DesignTheme::CreativeGradient, CREATIVE_KEYWORDS),
    (DesignTheme::MinimalistLuxury, LUXURY_KEYWORDS),
    (DesignTheme::AdobeInspired, ADOBE_KEYWORDS),
    (DesignTheme::BehanceStyle, BEHANCE_KEYWORDS),
];

struct KeywordIndex {
    matcher: AhoCorasick,
    // pattern id -> theme
    owners: Vec<DesignTheme>,
}

static KEYWORD_INDEX: Lazy<KeywordIndex> = Lazy::new(|| {
    let mut patterns = Vec::new();
    let mut owners = Vec::new();
    for (theme, words) in KEYWORD_SETS.iter() {
        for word in words.iter() {
            patterns.push(*word);
            owners.push(*theme);
        }
    }
    let matcher = AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(&patterns)
        .expect("Failed to build theme keyword matcher");
    KeywordIndex { matcher, owners }
});

static EXTENSION_THEMES: phf::Map<&'static str, DesignTheme> = phf_map! {
    ".py" => DesignTheme::TechInnovation,
    ".ipynb" => DesignTheme::TechInnovation,
    ".js" => DesignTheme::TechInnovation,
    ".ts" => DesignTheme::TechInnovation,
    ".rs" => DesignTheme::TechInnovation,
    ".go" => DesignTheme::TechInnovation,
    ".java" => DesignTheme::TechInnovation,
    ".cpp" => DesignTheme::TechInnovation,
    ".c" => DesignTheme::TechInnovation,
    ".h" => DesignTheme::TechInnovation,
    ".cs" => DesignTheme::TechInnovation,
    ".sql" => DesignTheme::TechInnovation,
    ".yaml" => DesignTheme::TechInnovation,
    ".yml" => DesignTheme::TechInnovation,
    ".html" => DesignTheme::CreativeGradient,
    ".css" => DesignTheme::CreativeGradient,
    ".scss" => DesignTheme::CreativeGradient,
    ".jsx" => DesignTheme::CreativeGradient,
    ".tsx" => DesignTheme::CreativeGradient,
    ".vue" => DesignTheme::CreativeGradient,
    ".svelte" => DesignTheme::CreativeGradient,
    ".svg" => DesignTheme::CreativeGradient,
    ".psd" => DesignTheme::AdobeInspired,
    ".ai" => DesignTheme::AdobeInspired,
    ".indd" => DesignTheme::AdobeInspired,
    ".aep" => DesignTheme::AdobeInspired,
    ".prproj" => DesignTheme::AdobeInspired,
    ".xd" => DesignTheme::AdobeInspired,
    ".fig" => DesignTheme::BehanceStyle,
    ".sketch" => DesignTheme::BehanceStyle,
    ".png" => DesignTheme::BehanceStyle,
    ".jpg" => DesignTheme::BehanceStyle,
    ".jpeg" => DesignTheme::BehanceStyle,
    ".md" => DesignTheme::MinimalistLuxury,
    ".txt" => DesignTheme::MinimalistLuxury,
    ".pdf" => DesignTheme::MinimalistLuxury,
    ".docx" => DesignTheme::CorporateModern,
    ".xlsx" => DesignTheme::CorporateModern,
    ".pptx" => DesignTheme::CorporateModern,
    ".csv" => DesignTheme::CorporateModern,
};

/// Per-theme hit counts, indexed like [`DesignTheme::ALL`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeScores([usize; 6]);

impl ThemeScores {
    fn bump(&mut self, theme: DesignTheme) {
        self.0[index_of(theme)] += 1;
    }

    pub fn get(&self, theme: DesignTheme) -> usize {
        self.0[index_of(theme)]
    }

    pub fn best_score(&self) -> usize {
        self.0.iter().copied().max().unwrap_or(0)
    }

    /// Highest score, ties broken by priority; `None` when nothing matched.
    pub fn winner(&self) -> Option<DesignTheme> {
        if self.best_score() == 0 {
            return None;
        }
        DesignTheme::ALL
            .into_iter()
            .max_by(|a, b| {
                self.get(*a)
                    .cmp(&self.get(*b))
                    .then_with(|| b.priority().cmp(&a.priority()))
            })
    }
}

fn index_of(theme: DesignTheme) -> usize {
    DesignTheme::ALL.iter().position(|t| *t == theme).unwrap_or(0)
}

/// Count whole-word keyword hits per theme.
pub fn score_keywords(text: &str) -> ThemeScores {
    let lowered = text.to_lowercase();
    let bytes = lowered.as_bytes();
    let index = &*KEYWORD_INDEX;
    let mut scores = ThemeScores::default();

    for m in index.matcher.find_iter(&lowered) {
        let before = m.start().checked_sub(1).map(|i| bytes[i]);
        let after = bytes.get(m.end()).copied();
        if is_word_byte(before) || is_word_byte(after) {
            continue;
        }
        scores.bump(index.owners[m.pattern().as_usize()]);
    }
    scores
}

#[inline]
fn is_word_byte(b: Option<u8>) -> bool {
    // Non-ASCII bytes are treated as word characters
    matches!(b, Some(c) if c.is_ascii_alphanumeric() || c >= 0x80)
}

/// Count extension hits per theme. Extensions may be given with or without
/// the leading dot, in any case.
pub fn score_file_types<S: AsRef<str>>(extensions: &[S]) -> ThemeScores {
    let mut scores = ThemeScores::default();
    for ext in extensions {
        let ext = ext.as_ref().trim().to_ascii_lowercase();
        if ext.is_empty() {
            continue;
        }
        let key = if ext.starts_with('.') { ext } else { format!(".{ext}") };
        if let Some(theme) = EXTENSION_THEMES.get(key.as_str()) {
            scores.bump(*theme);
        }
    }
    scores
}

pub fn select_by_keywords(text: &str) -> DesignTheme {
    score_keywords(text).winner().unwrap_or_default()
}

pub fn select_by_file_types<S: AsRef<str>>(extensions: &[S]) -> DesignTheme {
    score_file_types(extensions).winner().unwrap_or_default()
}

/// Combine both signals: strong file-type evidence first, then keywords,
/// then any file-type evidence at all.
pub fn select_smart<S: AsRef<str>>(text: &str, extensions: &[S]) -> DesignTheme {
    let by_files = score_file_types(extensions);
    if by_files.best_score() >= 2 {
        if let Some(theme) = by_files.winner() {
            return theme;
        }
    }
    if let Some(theme) = score_keywords(text).winner() {
        return theme;
    }
    by_files.winner().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_pick_tech() {
        assert_eq!(
            select_by_keywords("An AI platform for neural ML inference"),
            DesignTheme::TechInnovation
        );
    }

    #[test]
    fn test_keywords_require_word_boundaries() {
        // "maintain" contains "ai", "html" is not a keyword
        let scores = score_keywords("We maintain the chain");
        assert_eq!(scores.get(DesignTheme::TechInnovation), 0);
        assert_eq!(select_by_keywords("We maintain the chain"), DesignTheme::CorporateModern);
    }

    #[test]
    fn test_keywords_count_occurrences() {
        let scores = score_keywords("design, design, design and one api");
        assert_eq!(scores.get(DesignTheme::CreativeGradient), 3);
        assert_eq!(scores.get(DesignTheme::TechInnovation), 1);
        assert_eq!(select_by_keywords("design, design, design and one api"), DesignTheme::CreativeGradient);
    }

    #[test]
    fn test_keyword_tie_uses_priority() {
        // one corporate hit, one tech hit
        assert_eq!(select_by_keywords("enterprise api"), DesignTheme::CorporateModern);
        // one tech hit, one creative hit
        assert_eq!(select_by_keywords("api design"), DesignTheme::TechInnovation);
    }

    #[test]
    fn test_empty_text_falls_back() {
        assert_eq!(select_by_keywords(""), DesignTheme::CorporateModern);
    }

    #[test]
    fn test_file_types_normalise_extensions() {
        assert_eq!(select_by_file_types(&["PY", ".ipynb", "css"]), DesignTheme::TechInnovation);
        assert_eq!(select_by_file_types(&[".psd", ".ai", ".py"]), DesignTheme::AdobeInspired);
        assert_eq!(select_by_file_types::<&str>(&[]), DesignTheme::CorporateModern);
        assert_eq!(select_by_file_types(&[".unknown"]), DesignTheme::CorporateModern);
    }

    #[test]
    fn test_smart_prefers_strong_file_evidence() {
        let exts = [".psd", ".ai"];
        assert_eq!(select_smart("neural api", &exts), DesignTheme::AdobeInspired);
        assert_eq!(select_smart("neural api", &[".psd"]), DesignTheme::TechInnovation);
        assert_eq!(select_smart("nothing here", &[".psd"]), DesignTheme::AdobeInspired);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let text = "A premium portfolio showcase for an ML research lab";
        let first = select_by_keywords(text);
        for _ in 0..10 {
            assert_eq!(select_by_keywords(text), first);
        }
    }
}
