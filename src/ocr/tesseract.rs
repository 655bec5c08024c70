//! Tesseract OCR backend implementation.
//!
//! Uses Tesseract OCR via command-line for text extraction.

use std::path::Path;
use std::process::Command;
use std::time::Instant;

use super::backend::{OcrBackend, OcrConfig, OcrError, OcrResult};
use super::check_binary;

/// Tesseract OCR backend.
pub struct TesseractBackend {
    config: OcrConfig,
}

impl TesseractBackend {
    /// Create a new Tesseract backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: OcrConfig::default(),
        }
    }

    /// Create a new Tesseract backend with custom configuration.
    pub fn with_config(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Run Tesseract on an image file.
    fn run_tesseract(&self, image_path: &Path) -> Result<String, OcrError> {
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.config.language])
            .output();

        match output {
            Ok(output) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    Err(OcrError::OcrFailed(format!("tesseract failed: {}", stderr)))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OcrError::BackendNotAvailable(
                    "tesseract not found (install tesseract-ocr)".to_string(),
                ))
            }
            Err(e) => Err(OcrError::Io(e)),
        }
    }

    /// Decode the image header so corrupt files fail with a precise error
    /// instead of an opaque engine failure.
    fn check_image(&self, image_path: &Path) -> Result<(), OcrError> {
        image::ImageReader::open(image_path)
            .map_err(OcrError::Io)?
            .decode()
            .map_err(|e| OcrError::Image(e.to_string()))?;
        Ok(())
    }
}

impl Default for TesseractBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrBackend for TesseractBackend {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        check_binary("tesseract")
    }

    fn availability_hint(&self) -> String {
        if check_binary("tesseract") {
            "Tesseract is available".to_string()
        } else {
            "Tesseract not installed. Install with: apt install tesseract-ocr".to_string()
        }
    }

    fn ocr_image(&self, image_path: &Path) -> Result<OcrResult, OcrError> {
        let start = Instant::now();
        self.check_image(image_path)?;
        let text = self.run_tesseract(image_path)?;
        let elapsed = start.elapsed();

        Ok(OcrResult {
            text,
            processing_time_ms: elapsed.as_millis() as u64,
        })
    }
}
