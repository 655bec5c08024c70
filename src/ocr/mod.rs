//! OCR engine abstraction.
//!
//! Text extraction from raster images goes through the [`OcrBackend`]
//! trait so the pipeline and its tests are independent of the engine.
//! Tesseract (via its command-line binary) is the default and only
//! built-in backend.

mod backend;
mod tesseract;

pub use backend::{OcrBackend, OcrConfig, OcrError, OcrResult};
pub use tesseract::TesseractBackend;

/// Check if a binary is available in PATH.
pub fn check_binary(name: &str) -> bool {
    which::which(name).is_ok()
}
