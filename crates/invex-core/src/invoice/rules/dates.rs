//! Issue date extraction and canonicalization.
//!
//! Whatever the source format (ISO, US slash, European slash, European dot,
//! written month), the output is a [`NaiveDate`], which serializes to the
//! canonical zero-padded `YYYY-MM-DD` form.

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use super::patterns::COMPACT_DATE;
use super::{label_alternation, ExtractionContext, FieldExtractor};
use crate::models::config::ExtractionConfig;

/// Issue date extractor.
pub struct DateExtractor {
    iso: Regex,
    slash: Regex,
    dot: Regex,
    written: Regex,
    clamp: bool,
}

impl DateExtractor {
    /// Create an extractor with the default label set and clamping on.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        let labels = label_alternation(&config.date_labels);
        let anchored = |tail: &str| {
            Regex::new(&format!(r"(?i)(?:{labels})\s*:?\s*{tail}")).unwrap()
        };

        Self {
            iso: anchored(r"(\d{4})-(\d{1,2})-(\d{1,2})"),
            slash: anchored(r"(\d{1,2})/(\d{1,2})/(\d{4})"),
            dot: anchored(r"(\d{1,2})\.(\d{1,2})\.(\d{4})"),
            written: anchored(r"([A-Za-z]+)\s+(\d{1,2}),?\s+(\d{4})"),
            clamp: config.clamp_dates,
        }
    }

    /// Validate a (year, month, day) triple, clamping out-of-range
    /// components into a valid date when configured.
    ///
    /// Clamping is a best-effort correction: month into 1-12, a day outside
    /// 1-31 (or one the month cannot hold) to the safe value 28. Years
    /// outside 1900-2100 are rejected outright.
    fn build_date(&self, year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        if !(1900..=2100).contains(&year) {
            return None;
        }

        if !self.clamp {
            return NaiveDate::from_ymd_opt(year, month, day);
        }

        let month = month.clamp(1, 12);
        let day = if (1..=31).contains(&day) {
            day
        } else {
            day.clamp(1, 28)
        };

        NaiveDate::from_ymd_opt(year, month, day)
            .or_else(|| NaiveDate::from_ymd_opt(year, month, 28))
    }

    fn parse_num(s: &str) -> u32 {
        s.parse().unwrap_or(0)
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = NaiveDate;

    fn extract(&self, text: &str, _ctx: &ExtractionContext<'_>) -> Option<NaiveDate> {
        // Compact "Issue|Date: YYYY-M-D" first.
        if let Some(caps) = COMPACT_DATE.captures(text) {
            let year: i32 = caps[1].parse().unwrap_or(0);
            if let Some(date) =
                self.build_date(year, Self::parse_num(&caps[2]), Self::parse_num(&caps[3]))
            {
                return Some(date);
            }
        }

        if let Some(caps) = self.iso.captures(text) {
            let year: i32 = caps[1].parse().unwrap_or(0);
            if let Some(date) =
                self.build_date(year, Self::parse_num(&caps[2]), Self::parse_num(&caps[3]))
            {
                return Some(date);
            }
        }

        // Slash dates are ambiguous between US and European layouts:
        // month-first unless the first component cannot be a month.
        if let Some(caps) = self.slash.captures(text) {
            let first = Self::parse_num(&caps[1]);
            let second = Self::parse_num(&caps[2]);
            let year: i32 = caps[3].parse().unwrap_or(0);

            let (month, day) = if first > 12 { (second, first) } else { (first, second) };
            if let Some(date) = self.build_date(year, month, day) {
                return Some(date);
            }
        }

        if let Some(caps) = self.dot.captures(text) {
            let day = Self::parse_num(&caps[1]);
            let month = Self::parse_num(&caps[2]);
            let year: i32 = caps[3].parse().unwrap_or(0);
            if let Some(date) = self.build_date(year, month, day) {
                return Some(date);
            }
        }

        if let Some(caps) = self.written.captures(text) {
            let month = month_to_number(&caps[1]);
            let day = Self::parse_num(&caps[2]);
            let year: i32 = caps[3].parse().unwrap_or(0);

            if month == 0 {
                debug!("unrecognized month name: {}", &caps[1]);
            } else if let Some(date) = self.build_date(year, month, day) {
                return Some(date);
            }
        }

        None
    }
}

fn month_to_number(month: &str) -> u32 {
    match month.to_lowercase().as_str() {
        "january" => 1,
        "february" => 2,
        "march" => 3,
        "april" => 4,
        "may" => 5,
        "june" => 6,
        "july" => 7,
        "august" => 8,
        "september" => 9,
        "october" => 10,
        "november" => 11,
        "december" => 12,
        _ => 0,
    }
}
