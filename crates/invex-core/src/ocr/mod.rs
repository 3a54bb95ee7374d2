//! The OCR boundary: engine adapters and best-output selection.
//!
//! Image acquisition, preprocessing, and the recognition engines themselves
//! are external collaborators. The core sees them only through the
//! [`ImagePreprocessor`] and [`OcrEngine`] traits; adapters are plain values
//! built by the caller from an explicit [`crate::models::OcrConfig`] list.

pub mod confidence;

use std::path::Path;

use image::DynamicImage;
use tracing::{debug, warn};

use crate::error::OcrError;

/// Image preprocessing boundary: load and prepare a scan for recognition.
pub trait ImagePreprocessor {
    /// Preprocess the image at `path` into a recognition-ready bitmap.
    fn preprocess(&self, path: &Path) -> Result<DynamicImage, OcrError>;
}

/// A single OCR engine adapter (local engine or cloud vision API).
pub trait OcrEngine {
    /// Engine name for logs and extraction metadata.
    fn name(&self) -> &str;

    /// Recognize text in a preprocessed image. Errors mean "no result from
    /// this engine"; selection tolerates them per engine.
    fn recognize(&self, image: &DynamicImage) -> Result<EngineOutput, OcrError>;
}

/// Raw output of one engine run.
#[derive(Debug, Clone)]
pub struct EngineOutput {
    /// Recognized text.
    pub text: String,

    /// Recognition latency in milliseconds.
    pub processing_time_ms: u64,
}

/// The winning output of multi-engine selection.
#[derive(Debug, Clone)]
pub struct SelectedText {
    /// Recognized text of the best-scoring engine.
    pub text: String,

    /// Name of the engine that produced it.
    pub engine: String,

    /// Recognition latency of that engine in milliseconds.
    pub processing_time_ms: u64,

    /// Heuristic quality score of the text (0.0 - 1.0).
    pub confidence: f32,
}

/// Run every engine over the image and keep the highest-scoring output.
///
/// A failing engine is logged and skipped; selection fails with
/// [`OcrError::NoServiceAvailable`] only when every engine failed. Ties go
/// to the engine declared first.
pub fn select_best(
    engines: &[Box<dyn OcrEngine>],
    image: &DynamicImage,
) -> Result<SelectedText, OcrError> {
    let mut best: Option<SelectedText> = None;

    for engine in engines {
        let output = match engine.recognize(image) {
            Ok(output) => output,
            Err(e) => {
                warn!("OCR engine {} failed: {}", engine.name(), e);
                continue;
            }
        };

        let confidence = confidence::score(&output.text);
        debug!(
            "engine {} produced {} chars, confidence {:.2}",
            engine.name(),
            output.text.len(),
            confidence
        );

        let candidate = SelectedText {
            text: output.text,
            engine: engine.name().to_string(),
            processing_time_ms: output.processing_time_ms,
            confidence,
        };

        // Strict comparison keeps the first-declared engine on ties.
        match &best {
            Some(current) if candidate.confidence <= current.confidence => {}
            _ => best = Some(candidate),
        }
    }

    best.ok_or(OcrError::NoServiceAvailable)
}
