//! Core library for invoice OCR processing.
//!
//! This crate provides:
//! - OCR text normalization (whitespace, paragraph markers, misread table)
//! - Rule-based invoice field extraction (number, date, email, total,
//!   line items, client, address)
//! - Record assembly with per-input failure isolation
//! - Advisory cross-field validation
//! - Multi-engine OCR output selection by heuristic confidence

pub mod error;
pub mod invoice;
pub mod models;
pub mod normalize;
pub mod ocr;
pub mod pipeline;
pub mod qr;

pub use error::{InvexError, OcrError, Result};
pub use invoice::rules::{ExtractionContext, FieldExtractor, FilenameHint};
pub use invoice::{validate, RecordAssembler, ValidationReport};
pub use models::config::PipelineConfig;
pub use models::record::{ExtractionMetadata, InvoiceRecord, LineItem};
pub use normalize::TextNormalizer;
pub use ocr::{select_best, EngineOutput, ImagePreprocessor, OcrEngine, SelectedText};
pub use pipeline::{InvoicePipeline, PipelineOutput};
pub use qr::QrFields;
