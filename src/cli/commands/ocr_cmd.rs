//! Standalone directory OCR command.

use std::path::{Path, PathBuf};

use console::style;

use crate::config::Settings;
use crate::ocr::{OcrBackend, OcrConfig, TesseractBackend};
use crate::services::ocr_directory;

/// OCR every configured image in `source`, writing text files to `target`.
pub fn cmd_ocr(settings: &Settings, source: PathBuf, target: Option<PathBuf>) -> anyhow::Result<()> {
    let target = match target {
        Some(target) => target,
        None => derive_target(&source, &settings.text_dir_suffix),
    };

    let backend = TesseractBackend::with_config(OcrConfig {
        language: settings.language.clone(),
    });
    if !backend.is_available() {
        anyhow::bail!(backend.availability_hint());
    }

    let summary = ocr_directory(&source, &target, &backend, &settings.image_extensions)?;

    println!(
        "{} {} images processed, {} failed, text in {}",
        style("✓").green(),
        summary.processed,
        summary.failed,
        target.display()
    );
    Ok(())
}

/// Sibling directory derived from the source name, e.g. `batch1` -> `batch1-text`.
fn derive_target(source: &Path, suffix: &str) -> PathBuf {
    let name = format!(
        "{}{}",
        source.file_name().unwrap_or_default().to_string_lossy(),
        suffix
    );
    match source.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}
