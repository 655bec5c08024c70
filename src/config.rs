//! Configuration management for ScanOCR.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// Default number of concurrent archive workers.
pub const DEFAULT_WORKERS: usize = 6;

/// Runtime settings, loaded from an optional `scanocr.toml`.
///
/// Every field has a default, so an absent config file is not an error;
/// a present-but-malformed file is.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Image extensions the OCR runner picks up (matched case-insensitively).
    pub image_extensions: Vec<String>,
    /// OCR language passed to the engine (e.g. "eng", "deu").
    pub language: String,
    /// Concurrent archive workers for batch processing.
    pub workers: usize,
    /// Log file name, created in the working directory unless absolute.
    pub log_file: String,
    /// Suffix appended to an extraction directory's name to derive its
    /// text output directory (e.g. `batch1` -> `batch1-text`).
    pub text_dir_suffix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            image_extensions: vec!["tif".to_string(), "tiff".to_string()],
            language: "eng".to_string(),
            workers: DEFAULT_WORKERS,
            log_file: "scanocr.log".to_string(),
            text_dir_suffix: "-text".to_string(),
        }
    }
}

/// Load settings from `path` if given, otherwise from `scanocr.toml` in the
/// working directory if it exists, otherwise defaults.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let default = Path::new("scanocr.toml");
            if !default.exists() {
                return Ok(Settings::default());
            }
            default.to_path_buf()
        }
    };

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    let settings: Settings = toml::from_str(&raw)
        .with_context(|| format!("invalid config file '{}'", path.display()))?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.image_extensions, vec!["tif", "tiff"]);
        assert_eq!(settings.language, "eng");
        assert_eq!(settings.workers, DEFAULT_WORKERS);
        assert_eq!(settings.log_file, "scanocr.log");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let settings: Settings = toml::from_str(r#"language = "deu""#).unwrap();
        assert_eq!(settings.language, "deu");
        assert_eq!(settings.workers, DEFAULT_WORKERS);
    }
}
