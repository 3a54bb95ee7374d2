//! Client name, email, and address extraction.

use regex::Regex;

use super::patterns::{ADDRESS_LABEL, EMAIL, SPACE_RUN};
use super::{label_alternation, truncate_chars, ExtractionContext, FieldExtractor};
use crate::models::config::ExtractionConfig;

/// Client name extractor.
///
/// Label-anchored capture running to the next Email/Address label or line
/// break, truncated to the configured length.
pub struct ClientExtractor {
    labeled: Regex,
    max_len: usize,
}

impl ClientExtractor {
    /// Create an extractor with the default label set.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        let pattern = format!(
            r"(?i)(?:{})\s*:?\s*(.+?)(?:\s*Email|\s*Address|\n|$)",
            label_alternation(&config.client_labels)
        );
        Self {
            labeled: Regex::new(&pattern).unwrap(),
            max_len: config.max_field_len,
        }
    }
}

impl Default for ClientExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ClientExtractor {
    type Output = String;

    fn extract(&self, text: &str, _ctx: &ExtractionContext<'_>) -> Option<String> {
        let caps = self.labeled.captures(text)?;
        let name = caps[1].trim();
        if name.is_empty() {
            return None;
        }
        Some(truncate_chars(name, self.max_len))
    }
}

/// Email extractor: first standard-shape match, lower-cased.
pub struct EmailExtractor;

impl EmailExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EmailExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for EmailExtractor {
    type Output = String;

    fn extract(&self, text: &str, _ctx: &ExtractionContext<'_>) -> Option<String> {
        EMAIL.find(text).map(|m| m.as_str().to_lowercase())
    }
}

/// Address extractor.
///
/// Address text has no closing label, so the captured span runs from just
/// after the `Address` label to the nearest subsequent boundary offset
/// (item and total match starts, supplied by the assembler), or to end of
/// text when there is none.
pub struct AddressExtractor {
    max_len: usize,
}

impl AddressExtractor {
    /// Create an extractor with the default length cap.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            max_len: config.max_field_len,
        }
    }
}

impl Default for AddressExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AddressExtractor {
    type Output = String;

    fn extract(&self, text: &str, ctx: &ExtractionContext<'_>) -> Option<String> {
        let label = ADDRESS_LABEL.find(text)?;
        let start = label.end();

        let end = ctx
            .boundaries
            .iter()
            .copied()
            .filter(|&offset| offset >= start)
            .min()
            .unwrap_or(text.len());

        if start >= end {
            return None;
        }

        let span = SPACE_RUN.replace_all(&text[start..end], " ");
        let span = span.trim();
        if span.is_empty() {
            return None;
        }

        Some(truncate_chars(span, self.max_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>() -> ExtractionContext<'a> {
        ExtractionContext::default()
    }

    #[test]
    fn test_client_name_labeled() {
        let extractor = ClientExtractor::new();
        assert_eq!(
            extractor.extract("Bill to Bob Smith Email bob@example.com", &ctx()),
            Some("Bob Smith".to_string())
        );
        assert_eq!(
            extractor.extract("Customer: ACME Corp\nmore text", &ctx()),
            Some("ACME Corp".to_string())
        );
    }

    #[test]
    fn test_client_name_truncated() {
        let config = ExtractionConfig {
            max_field_len: 10,
            ..ExtractionConfig::default()
        };
        let extractor = ClientExtractor::from_config(&config);
        assert_eq!(
            extractor.extract("Bill to Bartholomew Montgomery", &ctx()),
            Some("Bartholome".to_string())
        );
    }

    #[test]
    fn test_client_name_absent() {
        assert_eq!(ClientExtractor::new().extract("no labels", &ctx()), None);
    }

    #[test]
    fn test_email_lowercased_first_match() {
        let extractor = EmailExtractor::new();
        assert_eq!(
            extractor.extract("Email Bob.Smith@Example.COM or sales@acme.io", &ctx()),
            Some("bob.smith@example.com".to_string())
        );
    }

    #[test]
    fn test_email_typos_outside_dictionary_kept() {
        // The correction table is narrow; unknown typos pass through.
        let extractor = EmailExtractor::new();
        assert_eq!(
            extractor.extract("Email: bob@exarnple.com", &ctx()),
            Some("bob@exarnple.com".to_string())
        );
    }

    #[test]
    fn test_address_runs_to_boundary() {
        let text = "Address 12 High Street London Widget 3 x 10,00 Euro";
        let boundary = text.find("Widget").unwrap();
        let ctx = ExtractionContext {
            boundaries: &[boundary],
            ..ExtractionContext::default()
        };

        assert_eq!(
            AddressExtractor::new().extract(text, &ctx),
            Some("12 High Street London".to_string())
        );
    }

    #[test]
    fn test_address_runs_to_end_without_boundary() {
        let text = "Address: 12 High Street\n\nLondon";
        assert_eq!(
            AddressExtractor::new().extract(text, &ctx()),
            Some("12 High Street London".to_string())
        );
    }

    #[test]
    fn test_boundary_before_label_ignored() {
        let text = "Widget 3 x 10,00 Euro Address 12 High Street";
        let ctx = ExtractionContext {
            boundaries: &[0],
            ..ExtractionContext::default()
        };
        assert_eq!(
            AddressExtractor::new().extract(text, &ctx),
            Some("12 High Street".to_string())
        );
    }

    #[test]
    fn test_no_address_label() {
        assert_eq!(
            AddressExtractor::new().extract("just a street name", &ctx()),
            None
        );
    }
}
