//! Rule-based field extractors for invoice text.
//!
//! Every extractor follows the same contract: normalized text in, optional
//! value out. Absence of a match is `None`, never an error; extractors are
//! pure and independent of each other.

pub mod amounts;
pub mod client;
pub mod dates;
pub mod items;
pub mod number;
pub mod patterns;

pub use amounts::TotalExtractor;
pub use client::{AddressExtractor, ClientExtractor, EmailExtractor};
pub use dates::DateExtractor;
pub use items::ItemExtractor;
pub use number::{FilenameHint, NumberExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from normalized text. `None` means absent.
    fn extract(&self, text: &str, ctx: &ExtractionContext<'_>) -> Option<Self::Output>;
}

/// Shared extraction hints.
///
/// The filename hint seeds invoice-number extraction only; boundary offsets
/// (starts of item/total matches) bound address capture only. Extractors
/// ignore what they do not use.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionContext<'a> {
    /// Invoice number derived from the originating file name, if any.
    pub filename_hint: Option<&'a FilenameHint>,

    /// Byte offsets where trailing free-text capture must stop.
    pub boundaries: &'a [usize],
}

/// Build a case-insensitive alternation from configured labels, with
/// flexible whitespace between label words.
pub(crate) fn label_alternation(labels: &[String]) -> String {
    labels
        .iter()
        .map(|label| {
            label
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s*")
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Truncate to a character count without splitting a code point.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
