//! Total amount extraction.
//!
//! Currency-agnostic: the Euro-specific `TOTAL <amount> Euro` dialect is
//! tried first when configured, then a label-anchored generic pattern
//! requiring exactly two decimal digits.

use regex::Regex;

use super::patterns::EURO_TOTAL;
use super::{label_alternation, ExtractionContext, FieldExtractor};
use crate::models::config::ExtractionConfig;

/// Total amount extractor.
pub struct TotalExtractor {
    labeled: Regex,
    euro_dialect: bool,
}

impl TotalExtractor {
    /// Create an extractor with the default label set.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        let pattern = format!(
            r"(?i)(?:{})\s*:?\s*[$€£]?\s*([\d,]+\.\d{{2}})",
            label_alternation(&config.total_labels)
        );
        Self {
            labeled: Regex::new(&pattern).unwrap(),
            euro_dialect: config.euro_dialect,
        }
    }

    /// Byte span of the match the extractor would use, for boundary scans.
    pub fn match_span(&self, text: &str) -> Option<std::ops::Range<usize>> {
        if self.euro_dialect {
            if let Some(m) = EURO_TOTAL.find(text) {
                return Some(m.range());
            }
        }
        self.labeled.find(text).map(|m| m.range())
    }
}

impl Default for TotalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TotalExtractor {
    type Output = f64;

    fn extract(&self, text: &str, _ctx: &ExtractionContext<'_>) -> Option<f64> {
        if self.euro_dialect {
            if let Some(caps) = EURO_TOTAL.captures(text) {
                if let Some(amount) = parse_comma_decimal(&caps[1]) {
                    return Some(amount);
                }
            }
        }

        let caps = self.labeled.captures(text)?;
        parse_grouped_amount(&caps[1])
    }
}

/// Parse an amount whose decimal separator is a comma ("45,50").
pub fn parse_comma_decimal(s: &str) -> Option<f64> {
    s.trim().replace(',', ".").parse().ok()
}

/// Parse an amount with comma thousands separators ("1,234.56").
pub fn parse_grouped_amount(s: &str) -> Option<f64> {
    s.trim().replace(',', "").parse().ok()
}
