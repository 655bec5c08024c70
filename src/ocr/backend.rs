//! OCR backend trait and shared types.

use std::path::Path;

use thiserror::Error;

/// Errors from OCR backends.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of OCR processing for one image.
#[derive(Debug, Clone)]
pub struct OcrResult {
    /// Extracted text content.
    pub text: String,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Configuration for OCR backends.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Language for OCR (e.g., "eng", "deu").
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
        }
    }
}

/// Trait for OCR backends.
pub trait OcrBackend: Send + Sync {
    /// Short backend name for logs and status output.
    fn name(&self) -> &'static str;

    /// Check if this backend is available (dependencies installed).
    fn is_available(&self) -> bool;

    /// Get a description of what's needed to make this backend available.
    fn availability_hint(&self) -> String;

    /// Run OCR on an image file.
    fn ocr_image(&self, image_path: &Path) -> Result<OcrResult, OcrError>;
}
