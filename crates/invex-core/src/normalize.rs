//! OCR text normalization.
//!
//! Raw OCR output arrives with erratic whitespace and a handful of
//! engine-dependent misreads. Normalization collapses whitespace while
//! keeping paragraph boundaries visible (address extraction needs them)
//! and applies the configured correction table.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::config::{Correction, NormalizerConfig};

lazy_static! {
    /// A whitespace run containing at least two newlines.
    static ref PARAGRAPH_BREAK: Regex = Regex::new(r"\n\s*\n").unwrap();

    /// Any whitespace run.
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    /// The paragraph marker with whatever spacing collapsing left around it.
    static ref MARKER: Regex = Regex::new(r" ?\u{00B6} ?").unwrap();
}

const PARAGRAPH_MARKER: &str = " \u{00B6} ";

/// Cleans raw OCR text: whitespace collapsing with paragraph preservation,
/// plus fixed-dictionary misread correction.
///
/// Pure and deterministic; `normalize(normalize(x)) == normalize(x)`.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    corrections: Vec<Correction>,
}

impl TextNormalizer {
    /// Create a normalizer with the default correction table.
    pub fn new() -> Self {
        Self::from_config(&NormalizerConfig::default())
    }

    /// Create a normalizer from configuration.
    pub fn from_config(config: &NormalizerConfig) -> Self {
        Self {
            corrections: config.corrections.clone(),
        }
    }

    /// Normalize raw OCR text.
    ///
    /// Paragraph breaks (double newlines) survive as `"\n\n"`; every other
    /// whitespace run becomes a single space. Corrections are exact,
    /// case-sensitive substring replacements applied in table order.
    pub fn normalize(&self, raw: &str) -> String {
        // Mark paragraph breaks before collapsing would destroy them.
        let marked = PARAGRAPH_BREAK.replace_all(raw, PARAGRAPH_MARKER);
        let collapsed = WHITESPACE_RUN.replace_all(&marked, " ");
        let mut text = collapsed.trim().to_string();

        for correction in &self.corrections {
            text = text.replace(&correction.wrong, &correction.right);
        }

        MARKER.replace_all(&text, "\n\n").into_owned()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collapses_whitespace() {
        let normalizer = TextNormalizer::new();
        assert_eq!(
            normalizer.normalize("INVOICE   FAC/2019/0139\n Issue date \t 2019-03-12"),
            "INVOICE FAC/2019/0139 Issue date 2019-03-12"
        );
    }

    #[test]
    fn test_preserves_paragraph_breaks() {
        let normalizer = TextNormalizer::new();
        assert_eq!(
            normalizer.normalize("Bill to  Bob Smith\n\nAddress  12 High St\nLondon"),
            "Bill to Bob Smith\n\nAddress 12 High St London"
        );
    }

    #[test]
    fn test_multiple_blank_lines_become_one_break() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("a\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_applies_corrections() {
        let normalizer = TextNormalizer::new();
        assert_eq!(
            normalizer.normalize("TOTAL 45,50 Furo\nErnail bob@gmai1.com"),
            "TOTAL 45,50 Euro Email bob@gmail.com"
        );
    }

    #[test]
    fn test_corrections_are_narrow() {
        // Only table entries are corrected; other typos pass through.
        let normalizer = TextNormalizer::new();
        assert_eq!(
            normalizer.normalize("Ernail: bob@exarnple.com"),
            "Email: bob@exarnple.com"
        );
    }

    #[test]
    fn test_idempotent() {
        let normalizer = TextNormalizer::new();
        let inputs = [
            "INVOICE  FAC/2019/0139\n\nAddress 1 Main St\n\nTOTAL 45,50 Furo",
            "  \n\n leading and trailing \n\n  ",
            "",
            "no whitespace oddities at all",
        ];

        for input in inputs {
            let once = normalizer.normalize(input);
            assert_eq!(normalizer.normalize(&once), once);
        }
    }

    #[test]
    fn test_empty_input() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize("   \n\t "), "");
    }
}
