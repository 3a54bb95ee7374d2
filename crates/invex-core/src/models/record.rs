//! Invoice record models produced by the extraction pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A structured invoice record assembled from OCR text.
///
/// Every field is independently optional: a field absent from the source
/// text is `None`, never a placeholder. Records are built in one pipeline
/// pass and not mutated afterwards; corrections construct a new record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Business identifier, e.g. "FAC/2019/0139" or "INV-221".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Issue date, always canonical ISO form (YYYY-MM-DD) when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,

    /// Client name, truncated to the configured maximum length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,

    /// Client email, lower-cased.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Client address, whitespace-collapsed and truncated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Line items in order of appearance in the text, deduplicated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<LineItem>,

    /// Stated total amount, currency-agnostic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,

    /// Metadata about the extraction itself.
    #[serde(default)]
    pub metadata: ExtractionMetadata,
}

impl InvoiceRecord {
    /// Create an empty record with no extracted fields.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no field was extracted at all. Callers decide whether a
    /// mostly-empty record is usable.
    pub fn is_empty(&self) -> bool {
        self.invoice_number.is_none()
            && self.issue_date.is_none()
            && self.client_name.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.items.is_empty()
            && self.total.is_none()
    }
}

/// A single product/service entry on the invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product/service name.
    pub name: String,

    /// Quantity, always positive.
    pub quantity: u32,

    /// Unit price, non-negative.
    pub unit_price: f64,

    /// Line total. Always `quantity * unit_price`, never parsed from text.
    pub total_price: f64,
}

impl LineItem {
    /// Build a line item; `total_price` is derived from the other fields.
    pub fn new(name: impl Into<String>, quantity: u32, unit_price: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price,
            total_price: quantity as f64 * unit_price,
        }
    }
}

/// Metadata about the extraction process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// Name of the OCR engine that produced the selected text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,

    /// OCR processing latency in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,

    /// Confidence score of the selected text (0.0 - 1.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,

    /// Diagnostic notes from assembly (degraded inputs, caught failures).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_total_is_derived() {
        let item = LineItem::new("Widget", 3, 10.0);
        assert!((item.total_price - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_record() {
        let record = InvoiceRecord::empty();
        assert!(record.is_empty());

        let record = InvoiceRecord {
            total: Some(45.5),
            ..InvoiceRecord::empty()
        };
        assert!(!record.is_empty());
    }

    #[test]
    fn test_record_serializes_canonical_date() {
        let record = InvoiceRecord {
            issue_date: NaiveDate::from_ymd_opt(2019, 3, 12),
            ..InvoiceRecord::empty()
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"2019-03-12\""));
    }
}
