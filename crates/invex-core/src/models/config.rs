//! Configuration structures for the extraction pipeline.
//!
//! Everything that varies by OCR engine, locale, or deployment lives here
//! as data: the misread correction table, the label sets for each field,
//! the currency dialect, and the OCR service list.

use serde::{Deserialize, Serialize};

use crate::error::{InvexError, Result};

/// Main configuration for the invex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Text normalizer configuration.
    pub normalizer: NormalizerConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// OCR service configuration.
    pub ocr: OcrConfig,
}

/// Text normalizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Known OCR misreads, replaced verbatim (case-sensitive) in table order.
    /// Engine- and font-dependent, so configurable rather than hard-coded.
    pub corrections: Vec<Correction>,
}

/// One misread -> replacement pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Correction {
    /// Substring as the OCR engine produces it.
    pub wrong: String,
    /// Corrected substring.
    pub right: String,
}

impl Correction {
    pub fn new(wrong: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            wrong: wrong.into(),
            right: right.into(),
        }
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        let corrections = [
            ("Furo", "Euro"),
            ("Buro", "Euro"),
            ("Bure", "Euro"),
            ("Eure", "Euro"),
            ("Ernail", "Email"),
            ("Ernall", "Email"),
            ("Emai1", "Email"),
            ("Mali", "Email"),
            ("0rder", "Order"),
            ("lnvoice", "Invoice"),
            ("INV0ICE", "INVOICE"),
            ("B1ll", "Bill"),
            ("Bi11", "Bill"),
            ("@gmai1.com", "@gmail.com"),
            ("@hotmai1.com", "@hotmail.com"),
            ("Ackiress", "Address"),
            ("Acdress", "Address"),
            ("Addre55", "Address"),
        ]
        .into_iter()
        .map(|(wrong, right)| Correction::new(wrong, right))
        .collect();

        Self { corrections }
    }
}

/// Field extraction configuration.
///
/// Locale-specific label sets are data: the same extractor code serves
/// English, French, German, Spanish and Italian invoices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Labels preceding the invoice number. Specific labels come before
    /// generic ones so "Invoice" cannot shadow "Invoice Number".
    pub number_labels: Vec<String>,

    /// Labels preceding the issue date.
    pub date_labels: Vec<String>,

    /// Labels preceding the total amount.
    pub total_labels: Vec<String>,

    /// Labels preceding the client name.
    pub client_labels: Vec<String>,

    /// Try the Euro-specific total and item patterns before the generic
    /// currency patterns.
    pub euro_dialect: bool,

    /// Clamp out-of-range date components instead of discarding the date.
    pub clamp_dates: bool,

    /// Maximum length for free-text fields (downstream storage constraint).
    pub max_field_len: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            number_labels: vec![
                "Invoice Number".to_string(),
                "Invoice No".to_string(),
                "Invoice ID".to_string(),
                "Facture N°".to_string(),
                "Rechnung Nr".to_string(),
                "Factura N°".to_string(),
                "Fattura N°".to_string(),
                "Invoice".to_string(),
            ],
            date_labels: vec![
                "Issue Date".to_string(),
                "Invoice Date".to_string(),
                "Issued".to_string(),
                "Dated".to_string(),
                "Date".to_string(),
            ],
            total_labels: vec![
                "Total Amount".to_string(),
                "Amount Due".to_string(),
                "Balance Due".to_string(),
                "Grand Total".to_string(),
                "Total à payer".to_string(),
                "Gesamtbetrag".to_string(),
                "Importe Total".to_string(),
                "Importo Totale".to_string(),
                "Total".to_string(),
            ],
            client_labels: vec![
                "Bill to".to_string(),
                "Sold To".to_string(),
                "Customer".to_string(),
                "Client".to_string(),
                "Billed To".to_string(),
            ],
            euro_dialect: true,
            clamp_dates: true,
            max_field_len: 255,
        }
    }
}

/// OCR service configuration.
///
/// An explicit list passed in at construction time; engine adapters are
/// selected from it, never from runtime environment inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Configured OCR services, in declaration order. Declaration order
    /// breaks ties during best-output selection.
    pub services: Vec<ServiceConfig>,

    /// Language hint passed to recognition.
    pub language: String,
}

/// A single OCR service entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name, e.g. "tesseract", "azure", "google".
    pub name: String,

    /// Whether the service may be used.
    pub enabled: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            services: vec![
                ServiceConfig {
                    name: "tesseract".to_string(),
                    enabled: true,
                },
                ServiceConfig {
                    name: "azure".to_string(),
                    enabled: false,
                },
                ServiceConfig {
                    name: "google".to_string(),
                    enabled: false,
                },
            ],
            language: "eng".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| InvexError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| InvexError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips() {
        let config = PipelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: PipelineConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.extraction.max_field_len, 255);
        assert!(parsed.extraction.euro_dialect);
        assert_eq!(parsed.ocr.services.len(), 3);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: PipelineConfig =
            serde_json::from_str(r#"{"extraction": {"euro_dialect": false}}"#).unwrap();

        assert!(!parsed.extraction.euro_dialect);
        assert_eq!(parsed.extraction.max_field_len, 255);
        assert!(!parsed.normalizer.corrections.is_empty());
    }
}
