//! Line item extraction.

use std::collections::HashSet;
use std::ops::Range;

use regex::Regex;
use tracing::debug;

use super::amounts::{parse_comma_decimal, parse_grouped_amount};
use super::patterns::{EURO_ITEM, GENERIC_ITEM};
use super::{ExtractionContext, FieldExtractor};
use crate::models::config::ExtractionConfig;
use crate::models::record::LineItem;

/// Line item extractor.
///
/// The Euro dialect row (`<Name> <qty> x <price> Euro`) is the primary
/// pattern; the permissive generic row (`<name> <qty> x $<price.xx>`) is
/// consulted only when the primary pattern matches nothing at all.
pub struct ItemExtractor {
    euro_dialect: bool,
}

impl ItemExtractor {
    /// Create an extractor with the default (Euro-first) dialect.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            euro_dialect: config.euro_dialect,
        }
    }

    /// Extract all line items in order of appearance, deduplicated on the
    /// (name, quantity, raw price) triple. `total_price` is computed.
    pub fn extract_all(&self, text: &str) -> Vec<LineItem> {
        if self.euro_dialect && EURO_ITEM.is_match(text) {
            return collect_items(&EURO_ITEM, text, parse_comma_decimal);
        }
        collect_items(&GENERIC_ITEM, text, parse_grouped_amount)
    }

    /// Byte spans of the rows `extract_all` would consume, for boundary
    /// scans.
    pub fn match_spans(&self, text: &str) -> Vec<Range<usize>> {
        if self.euro_dialect {
            let spans: Vec<Range<usize>> =
                EURO_ITEM.find_iter(text).map(|m| m.range()).collect();
            if !spans.is_empty() {
                return spans;
            }
        }
        GENERIC_ITEM.find_iter(text).map(|m| m.range()).collect()
    }
}

fn collect_items(pattern: &Regex, text: &str, parse: fn(&str) -> Option<f64>) -> Vec<LineItem> {
    let mut items = Vec::new();
    let mut seen: HashSet<(String, u32, String)> = HashSet::new();

    for caps in pattern.captures_iter(text) {
        // In collapsed text the name can absorb a preceding currency word
        // ("TOTAL 45,50 Euro Widget 3 x ..."); strip it back off.
        let name = trim_currency_prefix(caps[1].trim()).to_string();
        if name.is_empty() {
            continue;
        }

        let quantity: u32 = match caps[2].parse() {
            Ok(q) if q > 0 => q,
            _ => {
                debug!("skipping item row with bad quantity: {}", &caps[0]);
                continue;
            }
        };

        let raw_price = caps[3].to_string();
        if !seen.insert((name.clone(), quantity, raw_price.clone())) {
            continue;
        }

        let Some(unit_price) = parse(&raw_price) else {
            debug!("skipping item row with unparseable price: {}", &caps[0]);
            continue;
        };
        if unit_price < 0.0 {
            continue;
        }

        items.push(LineItem::new(name, quantity, unit_price));
    }

    items
}

fn trim_currency_prefix(mut name: &str) -> &str {
    loop {
        let mut stripped = false;
        for token in ["Euro", "EUR"] {
            if let Some(rest) = name.strip_prefix(token) {
                if rest.is_empty() {
                    return "";
                }
                if rest.starts_with(' ') {
                    name = rest.trim_start();
                    stripped = true;
                }
            }
        }
        if !stripped {
            return name;
        }
    }
}

impl Default for ItemExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ItemExtractor {
    type Output = Vec<LineItem>;

    fn extract(&self, text: &str, _ctx: &ExtractionContext<'_>) -> Option<Vec<LineItem>> {
        let items = self.extract_all(text);
        if items.is_empty() { None } else { Some(items) }
    }
}
