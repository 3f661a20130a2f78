use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Built once, shared across threads
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

static PS_QUOTE_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["'", "\u{2018}", "\u{2019}", "\u{201A}", "\u{201B}"])
        .expect("Failed to build PowerShell quote escaper")
});

/// Escape XML special characters.
///
/// # Examples
///
/// ```
/// use deckwright::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<tag>\"hi\"</tag>"), "&lt;tag&gt;&quot;hi&quot;&lt;/tag&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Escape text for a single-quoted PowerShell string literal.
///
/// PowerShell treats the typographic single quotes as quote characters too,
/// so all of them are doubled.
///
/// ```
/// use deckwright::common::xml::escape_ps_single_quoted;
/// assert_eq!(escape_ps_single_quoted("it's"), "it''s");
/// ```
#[inline]
pub fn escape_ps_single_quoted(s: &str) -> String {
    PS_QUOTE_ESCAPER.replace_all(s, &["''", "\u{2018}\u{2018}", "\u{2019}\u{2019}", "\u{201A}\u{201A}", "\u{201B}\u{201B}"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml_leaves_plain_text() {
        assert_eq!(escape_xml("Ingest"), "Ingest");
        assert_eq!(escape_xml("R&D <core>"), "R&amp;D &lt;core&gt;");
    }

    #[test]
    fn test_escape_ps_typographic_quotes() {
        assert_eq!(escape_ps_single_quoted("a\u{2019}b"), "a\u{2019}\u{2019}b");
        assert_eq!(escape_ps_single_quoted("no quotes"), "no quotes");
    }
}
