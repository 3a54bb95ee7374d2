//! Cross-field validation of assembled records.
//!
//! Validation is advisory: it never mutates the record and never blocks
//! persistence. The caller decides what to do with the report.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::record::InvoiceRecord;

/// Allowed drift between the stated total and the line item sum.
const TOTAL_TOLERANCE: f64 = 0.01;

/// Result of cross-field validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// False iff a required field (invoice number, issue date, total) is
    /// missing.
    pub is_valid: bool,

    /// Names of the missing required fields.
    pub missing_fields: BTreeSet<String>,

    /// Advisory warnings, in detection order.
    pub warnings: Vec<String>,
}

/// Validate an assembled record.
pub fn validate(record: &InvoiceRecord) -> ValidationReport {
    let mut missing_fields = BTreeSet::new();

    if record.invoice_number.is_none() {
        missing_fields.insert("invoice_number".to_string());
    }
    if record.issue_date.is_none() {
        missing_fields.insert("issue_date".to_string());
    }
    if record.total.is_none() {
        missing_fields.insert("total".to_string());
    }

    let mut warnings = Vec::new();

    if record.items.is_empty() {
        warnings.push("no line items found".to_string());
    }

    if let Some(total) = record.total {
        if !record.items.is_empty() {
            let items_total: f64 = record.items.iter().map(|i| i.total_price).sum();
            if (items_total - total).abs() > TOTAL_TOLERANCE {
                warnings.push("total mismatch".to_string());
            }
        }
    }

    ValidationReport {
        is_valid: missing_fields.is_empty(),
        missing_fields,
        warnings,
    }
}
