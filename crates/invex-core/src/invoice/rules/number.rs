//! Invoice number extraction.

use std::path::Path;

use super::patterns::{CANONICAL_NUMBER, FILENAME_HINT, HASH_NUMBER};
use super::{label_alternation, ExtractionContext, FieldExtractor};
use crate::models::config::ExtractionConfig;
use regex::Regex;

/// Invoice number parsed from the originating file name.
///
/// Scan batches name files `FAC_YYYY_NNNN[-XXX].png`; the embedded number is
/// authoritative and takes precedence over anything found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameHint {
    year: String,
    number: String,
}

impl FilenameHint {
    /// Parse the hint from an image path. The page suffix (`-XXX`) is
    /// dropped from the canonical form.
    pub fn parse(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let caps = FILENAME_HINT.captures(name)?;
        Some(Self {
            year: caps[1].to_string(),
            number: caps[2].to_string(),
        })
    }

    /// Canonical invoice number form, `FAC/YYYY/NNNN`.
    pub fn canonical(&self) -> String {
        format!("FAC/{}/{}", self.year, self.number)
    }
}

/// Invoice number extractor.
///
/// Priority order: filename hint, canonical `FAC/YYYY/NNNN` in text,
/// labeled cascade, permissive `#token` fallback. The first source to
/// produce a value wins; later sources are not consulted.
pub struct NumberExtractor {
    labeled: Regex,
}

impl NumberExtractor {
    /// Create an extractor with the default label set.
    pub fn new() -> Self {
        Self::from_labels(&ExtractionConfig::default().number_labels)
    }

    /// Create an extractor from configured labels, tried in list order.
    pub fn from_labels(labels: &[String]) -> Self {
        // The gap swallows label punctuation: "No.", "Nr.", "Number:", "#".
        let pattern = format!(
            r"(?i)(?:{})[\s.:#]*(\w+(?:[-/]\w+)*)",
            label_alternation(labels)
        );
        Self {
            labeled: Regex::new(&pattern).unwrap(),
        }
    }
}

impl Default for NumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for NumberExtractor {
    type Output = String;

    fn extract(&self, text: &str, ctx: &ExtractionContext<'_>) -> Option<String> {
        // The filename hint wins outright, without consulting the text.
        if let Some(hint) = ctx.filename_hint {
            return Some(hint.canonical());
        }

        if let Some(m) = CANONICAL_NUMBER.find(text) {
            return Some(m.as_str().to_string());
        }

        if let Some(caps) = self.labeled.captures(text) {
            return Some(caps[1].trim().to_string());
        }

        HASH_NUMBER
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn extract(text: &str) -> Option<String> {
        NumberExtractor::new().extract(text, &ExtractionContext::default())
    }

    #[test]
    fn test_filename_hint_parses() {
        let hint = FilenameHint::parse(&PathBuf::from("scans/FAC_2019_0004-104.png")).unwrap();
        assert_eq!(hint.canonical(), "FAC/2019/0004");

        let hint = FilenameHint::parse(&PathBuf::from("FAC_2021_0831.jpg")).unwrap();
        assert_eq!(hint.canonical(), "FAC/2021/0831");

        assert!(FilenameHint::parse(&PathBuf::from("scan-042.png")).is_none());
    }

    #[test]
    fn test_filename_hint_wins_over_text() {
        let hint = FilenameHint::parse(&PathBuf::from("FAC_2019_0004-104.png")).unwrap();
        let ctx = ExtractionContext {
            filename_hint: Some(&hint),
            ..ExtractionContext::default()
        };

        let text = "INVOICE FAC/2020/9999";
        let number = NumberExtractor::new().extract(text, &ctx);
        assert_eq!(number.as_deref(), Some("FAC/2019/0004"));
    }

    #[test]
    fn test_canonical_form_in_text() {
        assert_eq!(
            extract("INVOICE FAC/2019/0139 Issue date 2019-03-12").as_deref(),
            Some("FAC/2019/0139")
        );
    }

    #[test]
    fn test_labeled_cascade() {
        assert_eq!(extract("Invoice Number: INV-221").as_deref(), Some("INV-221"));
        assert_eq!(extract("Invoice No. 4521").as_deref(), Some("4521"));
        assert_eq!(extract("Facture N° 2021/17").as_deref(), Some("2021/17"));
        assert_eq!(extract("Rechnung Nr. 88-1").as_deref(), Some("88-1"));
    }

    #[test]
    fn test_hash_fallback() {
        assert_eq!(extract("Receipt # A-113 thank you").as_deref(), Some("A-113"));
    }

    #[test]
    fn test_absent_number() {
        assert_eq!(extract("no identifier anywhere"), None);
    }
}
