//! Error types for the invex-core library.

use thiserror::Error;

/// Main error type for the invex library.
#[derive(Error, Debug)]
pub enum InvexError {
    /// OCR boundary error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors at the OCR boundary (preprocessing and engine invocation).
#[derive(Error, Debug)]
pub enum OcrError {
    /// Image preprocessing failed before any engine ran.
    #[error("preprocessing failed: {0}")]
    Preprocess(String),

    /// A single engine failed; selection tolerates this per engine.
    #[error("engine {name} failed: {reason}")]
    Engine { name: String, reason: String },

    /// Every configured engine failed (or none was configured).
    #[error("no OCR service available")]
    NoServiceAvailable,
}

/// Result type for the invex library.
pub type Result<T> = std::result::Result<T, InvexError>;
