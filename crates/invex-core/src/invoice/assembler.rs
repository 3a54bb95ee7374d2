//! Record assembly: one pass from raw OCR text to a structured record.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, error};

use super::rules::{
    AddressExtractor, ClientExtractor, DateExtractor, EmailExtractor, ExtractionContext,
    FieldExtractor, FilenameHint, ItemExtractor, NumberExtractor, TotalExtractor,
};
use crate::models::config::PipelineConfig;
use crate::models::record::InvoiceRecord;
use crate::normalize::TextNormalizer;

/// Orchestrates the normalizer and every field extractor into one
/// [`InvoiceRecord`].
///
/// Assembly never fails outright: extractors report absence as `None`, and
/// an unexpected panic is caught at this boundary and degraded to an empty
/// record with a diagnostic note, so a batch run continues past one bad
/// input.
pub struct RecordAssembler {
    normalizer: TextNormalizer,
    number: NumberExtractor,
    date: DateExtractor,
    total: TotalExtractor,
    items: ItemExtractor,
    client: ClientExtractor,
    email: EmailExtractor,
    address: AddressExtractor,
}

impl RecordAssembler {
    /// Create an assembler with the default configuration.
    pub fn new() -> Self {
        Self::from_config(&PipelineConfig::default())
    }

    /// Create an assembler from configuration.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            normalizer: TextNormalizer::from_config(&config.normalizer),
            number: NumberExtractor::from_labels(&config.extraction.number_labels),
            date: DateExtractor::from_config(&config.extraction),
            total: TotalExtractor::from_config(&config.extraction),
            items: ItemExtractor::from_config(&config.extraction),
            client: ClientExtractor::from_config(&config.extraction),
            email: EmailExtractor::new(),
            address: AddressExtractor::from_config(&config.extraction),
        }
    }

    /// Assemble a record from raw OCR text, with an optional
    /// filename-derived invoice number hint.
    pub fn assemble(&self, raw_text: &str, hint: Option<&FilenameHint>) -> InvoiceRecord {
        match catch_unwind(AssertUnwindSafe(|| self.assemble_inner(raw_text, hint))) {
            Ok(record) => record,
            Err(_) => {
                error!("field extraction aborted unexpectedly; returning empty record");
                let mut record = InvoiceRecord::empty();
                record
                    .metadata
                    .notes
                    .push("field extraction aborted unexpectedly".to_string());
                record
            }
        }
    }

    fn assemble_inner(&self, raw_text: &str, hint: Option<&FilenameHint>) -> InvoiceRecord {
        let text = self.normalizer.normalize(raw_text);
        let ctx = ExtractionContext {
            filename_hint: hint,
            boundaries: &[],
        };

        let invoice_number = self.number.extract(&text, &ctx);
        let issue_date = self.date.extract(&text, &ctx);
        let total = self.total.extract(&text, &ctx);
        let items = self.items.extract_all(&text);
        let client_name = self.client.extract(&text, &ctx);
        let email = self.email.extract(&text, &ctx);

        // Address capture has no closing label; it stops at the first
        // item row or the total line, whichever comes first.
        let mut boundaries: Vec<usize> = self
            .items
            .match_spans(&text)
            .iter()
            .map(|span| span.start)
            .collect();
        if let Some(span) = self.total.match_span(&text) {
            boundaries.push(span.start);
        }
        let address_ctx = ExtractionContext {
            filename_hint: hint,
            boundaries: &boundaries,
        };
        let address = self.address.extract(&text, &address_ctx);

        debug!(
            "assembled record: number={:?} date={:?} total={:?} items={}",
            invoice_number,
            issue_date,
            total,
            items.len()
        );

        InvoiceRecord {
            invoice_number,
            issue_date,
            client_name,
            email,
            address,
            items,
            total,
            metadata: Default::default(),
        }
    }
}

impl Default for RecordAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::LineItem;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_assembles_euro_invoice() {
        let text = "INVOICE FAC/2019/0139\nIssue date 2019-03-12\n\
                    Bill to Bob Smith\nEmail bob@example.com\n\
                    Address 12 High Street London\n\n\
                    Widget 3 x 10,00 Euro\nTOTAL 45,50 Euro";

        let record = RecordAssembler::new().assemble(text, None);

        assert_eq!(record.invoice_number.as_deref(), Some("FAC/2019/0139"));
        assert_eq!(
            record.issue_date.map(|d| d.to_string()).as_deref(),
            Some("2019-03-12")
        );
        assert_eq!(record.client_name.as_deref(), Some("Bob Smith"));
        assert_eq!(record.email.as_deref(), Some("bob@example.com"));
        assert_eq!(record.address.as_deref(), Some("12 High Street London"));
        assert_eq!(record.items, vec![LineItem::new("Widget", 3, 10.0)]);
        assert_eq!(record.total, Some(45.5));
    }

    #[test]
    fn test_filename_hint_seeds_number() {
        let hint = FilenameHint::parse(&PathBuf::from("FAC_2019_0004-104.png")).unwrap();
        let record = RecordAssembler::new()
            .assemble("no invoice label anywhere, TOTAL 10,00 Euro", Some(&hint));

        assert_eq!(record.invoice_number.as_deref(), Some("FAC/2019/0004"));
    }

    #[test]
    fn test_missing_fields_stay_none() {
        let record = RecordAssembler::new().assemble("nothing recognizable", None);

        assert_eq!(record.invoice_number, None);
        assert_eq!(record.issue_date, None);
        assert_eq!(record.client_name, None);
        assert_eq!(record.email, None);
        assert_eq!(record.address, None);
        assert_eq!(record.total, None);
        assert!(record.items.is_empty());
    }

    #[test]
    fn test_address_stops_before_items_and_total() {
        let text = "Address 1 Main St Springfield TOTAL 30,00 Euro";
        let record = RecordAssembler::new().assemble(text, None);
        assert_eq!(record.address.as_deref(), Some("1 Main St Springfield"));

        let text = "Address 1 Main St\n\nWidget 2 x 5,00 Euro TOTAL 10,00 Euro";
        let record = RecordAssembler::new().assemble(text, None);
        assert_eq!(record.address.as_deref(), Some("1 Main St"));
        assert_eq!(record.items, vec![LineItem::new("Widget", 2, 5.0)]);
    }

    #[test]
    fn test_deterministic() {
        let text = "INVOICE FAC/2019/0139 Issue date 2019-03-12 \
                    Widget 3 x 10,00 Euro TOTAL 45,50 Euro";
        let assembler = RecordAssembler::new();

        assert_eq!(assembler.assemble(text, None), assembler.assemble(text, None));
    }

    #[test]
    fn test_normalizer_feeds_extractors() {
        // Corrections run before extraction: "lnvoice" and "Ernail" are
        // fixed, the unknown "exarnple" typo is kept verbatim.
        let text = "lnvoice Number: INV-7\nErnail: bob@exarnple.com";
        let record = RecordAssembler::new().assemble(text, None);

        assert_eq!(record.invoice_number.as_deref(), Some("INV-7"));
        assert_eq!(record.email.as_deref(), Some("bob@exarnple.com"));
    }
}
