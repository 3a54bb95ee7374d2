//! Supplementary fields from a decoded QR payload.
//!
//! QR decoding itself is an external collaborator; this module parses the
//! decoded `KEY: value` payload and merges the fields it carries into an
//! assembled record. QR-derived data takes precedence for the fields it
//! supplies.

use chrono::NaiveDate;

use crate::models::record::InvoiceRecord;

/// Invoice fields carried by a QR payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QrFields {
    /// INVOICE key.
    pub invoice_number: Option<String>,

    /// DATE key, date part only.
    pub issue_date: Option<NaiveDate>,

    /// CUST key.
    pub client_name: Option<String>,
}

impl QrFields {
    /// Parse a decoded QR payload of `KEY: value` lines. Unknown keys and
    /// malformed lines are ignored.
    pub fn parse(payload: &str) -> Self {
        let mut fields = Self::default();

        for line in payload.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            match key.trim() {
                "INVOICE" => fields.invoice_number = Some(value.to_string()),
                "DATE" => {
                    // The payload carries "YYYY-MM-DD HH:MM"; keep the date.
                    let token = value.split_whitespace().next().unwrap_or("");
                    fields.issue_date = NaiveDate::parse_from_str(token, "%Y-%m-%d").ok();
                }
                "CUST" => fields.client_name = Some(value.to_string()),
                _ => {}
            }
        }

        fields
    }

    /// True when the payload carried no usable field.
    pub fn is_empty(&self) -> bool {
        self.invoice_number.is_none() && self.issue_date.is_none() && self.client_name.is_none()
    }

    /// Merge into an assembled record. Fields the QR supplies override the
    /// text-derived values; everything else is untouched.
    pub fn merge_into(&self, mut record: InvoiceRecord) -> InvoiceRecord {
        if let Some(number) = &self.invoice_number {
            record.invoice_number = Some(number.clone());
        }
        if let Some(date) = self.issue_date {
            record.issue_date = Some(date);
        }
        if let Some(name) = &self.client_name {
            record.client_name = Some(name.clone());
        }
        record
    }
}
