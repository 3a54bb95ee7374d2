//! The end-to-end extraction pipeline facade.

use std::path::Path;

use image::DynamicImage;
use tracing::{info, warn};

use crate::error::OcrError;
use crate::invoice::rules::FilenameHint;
use crate::invoice::{validate, RecordAssembler, ValidationReport};
use crate::models::config::PipelineConfig;
use crate::models::record::InvoiceRecord;
use crate::ocr::{select_best, ImagePreprocessor, OcrEngine};
use crate::qr::QrFields;

/// Record plus advisory validation, the hand-off value to persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// The assembled record.
    pub record: InvoiceRecord,

    /// Advisory validation of the record.
    pub validation: ValidationReport,
}

/// One pass per input: normalize, extract, assemble, validate.
///
/// Stateless across invocations; a single instance can serve a whole batch.
pub struct InvoicePipeline {
    assembler: RecordAssembler,
}

impl InvoicePipeline {
    /// Create a pipeline with the default configuration.
    pub fn new() -> Self {
        Self::from_config(&PipelineConfig::default())
    }

    /// Create a pipeline from configuration.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            assembler: RecordAssembler::from_config(config),
        }
    }

    /// Run the pipeline over raw OCR text.
    pub fn process_text(
        &self,
        raw_text: &str,
        hint: Option<&FilenameHint>,
        qr: Option<&QrFields>,
    ) -> PipelineOutput {
        let mut record = self.assembler.assemble(raw_text, hint);
        if let Some(qr) = qr {
            record = qr.merge_into(record);
        }

        let validation = validate(&record);
        PipelineOutput { record, validation }
    }

    /// Run every engine over a preprocessed image, keep the best-scoring
    /// text, and run the pipeline over it.
    ///
    /// Fails only when every engine fails.
    pub fn process_image(
        &self,
        engines: &[Box<dyn OcrEngine>],
        image: &DynamicImage,
        hint: Option<&FilenameHint>,
        qr: Option<&QrFields>,
    ) -> Result<PipelineOutput, OcrError> {
        let selected = select_best(engines, image)?;
        info!(
            "selected {} output ({} chars, confidence {:.2})",
            selected.engine,
            selected.text.len(),
            selected.confidence
        );

        let mut record = self.assembler.assemble(&selected.text, hint);
        record.metadata.engine = Some(selected.engine);
        record.metadata.processing_time_ms = Some(selected.processing_time_ms);
        record.metadata.confidence = Some(selected.confidence);

        if let Some(qr) = qr {
            record = qr.merge_into(record);
        }

        let validation = validate(&record);
        Ok(PipelineOutput { record, validation })
    }

    /// Run the pipeline over an image file: preprocess, recognize, extract.
    ///
    /// Never fails: a preprocessing or OCR failure degrades to an empty
    /// record with a diagnostic note, so batch callers can log the report
    /// and continue. The filename hint is derived from `path`.
    pub fn process_path<P: ImagePreprocessor>(
        &self,
        preprocessor: &P,
        engines: &[Box<dyn OcrEngine>],
        path: &Path,
        qr: Option<&QrFields>,
    ) -> PipelineOutput {
        let hint = FilenameHint::parse(path);

        let image = match preprocessor.preprocess(path) {
            Ok(image) => image,
            Err(e) => {
                warn!("preprocessing failed for {}: {}", path.display(), e);
                return degraded(format!("no text extracted: {e}"));
            }
        };

        match self.process_image(engines, &image, hint.as_ref(), qr) {
            Ok(output) => output,
            Err(e) => {
                warn!("OCR failed for {}: {}", path.display(), e);
                degraded(format!("no text extracted: {e}"))
            }
        }
    }
}

fn degraded(note: String) -> PipelineOutput {
    let mut record = InvoiceRecord::empty();
    record.metadata.notes.push(note);
    let validation = validate(&record);
    PipelineOutput { record, validation }
}

impl Default for InvoicePipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::LineItem;
    use crate::ocr::EngineOutput;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_euro_invoice_end_to_end() {
        let text = "INVOICE FAC/2019/0139\nIssue date 2019-03-12\n\
                    TOTAL 45,50 Euro\nWidget 3 x 10,00 Euro";

        let output = InvoicePipeline::new().process_text(text, None, None);

        assert_eq!(
            output.record.invoice_number.as_deref(),
            Some("FAC/2019/0139")
        );
        assert_eq!(
            output.record.issue_date.map(|d| d.to_string()).as_deref(),
            Some("2019-03-12")
        );
        assert_eq!(output.record.total, Some(45.5));
        assert_eq!(output.record.items, vec![LineItem::new("Widget", 3, 10.0)]);
        assert!((output.record.items[0].total_price - 30.0).abs() < 1e-9);

        assert!(output.validation.is_valid);
        assert_eq!(output.validation.warnings, vec!["total mismatch"]);
    }

    #[test]
    fn test_filename_hint_wins_without_text_label() {
        let hint = FilenameHint::parse(&PathBuf::from("FAC_2019_0004-104.png")).unwrap();
        let output = InvoicePipeline::new().process_text(
            "Bill to Bob Smith TOTAL 12,00 Euro",
            Some(&hint),
            None,
        );

        assert_eq!(
            output.record.invoice_number.as_deref(),
            Some("FAC/2019/0004")
        );
    }

    #[test]
    fn test_correction_table_is_narrow() {
        // "Ernail" is corrected; "exarnple" is not in the table and the
        // email extractor matches it verbatim.
        let output =
            InvoicePipeline::new().process_text("Ernail: bob@exarnple.com", None, None);
        assert_eq!(output.record.email.as_deref(), Some("bob@exarnple.com"));
    }

    #[test]
    fn test_no_address_label_means_none() {
        let output = InvoicePipeline::new().process_text(
            "INVOICE FAC/2019/0139 Issue date 2019-03-12 TOTAL 45,50 Euro",
            None,
            None,
        );
        assert_eq!(output.record.address, None);
    }

    #[test]
    fn test_qr_fields_take_precedence() {
        let qr = QrFields::parse("INVOICE: FAC/2021/0007\nDATE: 2021-06-01 09:15");
        let output = InvoicePipeline::new().process_text(
            "INVOICE FAC/2019/0139 Issue date 2019-03-12 TOTAL 45,50 Euro",
            None,
            Some(&qr),
        );

        assert_eq!(
            output.record.invoice_number.as_deref(),
            Some("FAC/2021/0007")
        );
        assert_eq!(
            output.record.issue_date.map(|d| d.to_string()).as_deref(),
            Some("2021-06-01")
        );
        // Total stays text-derived.
        assert_eq!(output.record.total, Some(45.5));
    }

    struct FixedEngine {
        name: &'static str,
        text: Option<&'static str>,
    }

    impl crate::ocr::OcrEngine for FixedEngine {
        fn name(&self) -> &str {
            self.name
        }

        fn recognize(&self, _image: &DynamicImage) -> Result<EngineOutput, OcrError> {
            match self.text {
                Some(text) => Ok(EngineOutput {
                    text: text.to_string(),
                    processing_time_ms: 3,
                }),
                None => Err(OcrError::Engine {
                    name: self.name.to_string(),
                    reason: "offline".to_string(),
                }),
            }
        }
    }

    struct FailingPreprocessor;

    impl ImagePreprocessor for FailingPreprocessor {
        fn preprocess(&self, _path: &Path) -> Result<DynamicImage, OcrError> {
            Err(OcrError::Preprocess("unreadable image".to_string()))
        }
    }

    struct BlankPreprocessor;

    impl ImagePreprocessor for BlankPreprocessor {
        fn preprocess(&self, _path: &Path) -> Result<DynamicImage, OcrError> {
            Ok(DynamicImage::new_rgb8(1, 1))
        }
    }

    #[test]
    fn test_process_image_stamps_metadata() {
        let engines: Vec<Box<dyn OcrEngine>> = vec![
            Box::new(FixedEngine {
                name: "tesseract",
                text: Some("qzx"),
            }),
            Box::new(FixedEngine {
                name: "azure",
                text: Some("INVOICE FAC/2019/0139 Issue date 2019-03-12 TOTAL 45,50 Euro"),
            }),
        ];

        let output = InvoicePipeline::new()
            .process_image(&engines, &DynamicImage::new_rgb8(1, 1), None, None)
            .unwrap();

        assert_eq!(output.record.metadata.engine.as_deref(), Some("azure"));
        assert_eq!(output.record.metadata.processing_time_ms, Some(3));
        assert!(output.record.metadata.confidence.unwrap() > 0.0);
    }

    #[test]
    fn test_process_path_degrades_on_preprocess_failure() {
        let engines: Vec<Box<dyn OcrEngine>> = Vec::new();
        let output = InvoicePipeline::new().process_path(
            &FailingPreprocessor,
            &engines,
            &PathBuf::from("FAC_2019_0004.png"),
            None,
        );

        assert!(output.record.is_empty());
        assert!(!output.validation.is_valid);
        assert!(output.record.metadata.notes[0].contains("no text extracted"));
    }

    #[test]
    fn test_process_path_degrades_when_all_engines_fail() {
        let engines: Vec<Box<dyn OcrEngine>> = vec![Box::new(FixedEngine {
            name: "down",
            text: None,
        })];

        let output = InvoicePipeline::new().process_path(
            &BlankPreprocessor,
            &engines,
            &PathBuf::from("scan.png"),
            None,
        );

        assert!(output.record.is_empty());
        assert!(output.record.metadata.notes[0].contains("no OCR service available"));
    }

    #[test]
    fn test_identical_text_yields_identical_output() {
        let text = "Invoice Number: INV-221 Date: 10/01/2023 Total: 99.00 Bill to ACME";
        let pipeline = InvoicePipeline::new();

        assert_eq!(
            pipeline.process_text(text, None, None),
            pipeline.process_text(text, None, None)
        );
    }
}
