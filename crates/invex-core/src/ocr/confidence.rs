//! Heuristic confidence scoring for OCR output quality.
//!
//! Used to pick the best text when several engines process the same image.

use lazy_static::lazy_static;
use regex::Regex;

/// Invoice vocabulary expected somewhere in a usable recognition.
const KEYWORDS: [&str; 11] = [
    "invoice", "bill", "date", "total", "customer", "payment", "amount", "tax", "item",
    "quantity", "price",
];

lazy_static! {
    /// Structural shapes a well-recognized invoice tends to contain.
    /// Matched against lower-cased text.
    static ref STRUCTURAL: [Regex; 4] = [
        Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap(),
        Regex::new(r"[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}").unwrap(),
        Regex::new(r"\d+\s*x\s*\d+").unwrap(),
        Regex::new(r"total\s*:?\s*\d+").unwrap(),
    ];
}

/// Characters a fully recognized invoice is assumed to contain.
const EXPECTED_LENGTH: f32 = 500.0;

/// Score OCR text quality in [0, 1].
///
/// Weighted blend: 0.4 keyword coverage, 0.4 structural coverage,
/// 0.2 length saturation.
pub fn score(text: &str) -> f32 {
    if text.is_empty() {
        return 0.0;
    }

    let lower = text.to_lowercase();

    let keyword_hits = KEYWORDS.iter().filter(|k| lower.contains(*k)).count();
    let keyword_score = (keyword_hits as f32 / KEYWORDS.len() as f32).min(1.0);

    let structural_hits = STRUCTURAL.iter().filter(|p| p.is_match(&lower)).count();
    let structural_score = (structural_hits as f32 / STRUCTURAL.len() as f32).min(1.0);

    let length_score = (lower.chars().count() as f32 / EXPECTED_LENGTH).min(1.0);

    keyword_score * 0.4 + structural_score * 0.4 + length_score * 0.2
}
