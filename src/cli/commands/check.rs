//! OCR tool availability check.

use console::style;

use crate::config::Settings;
use crate::ocr::{OcrBackend, TesseractBackend};

/// Report OCR engine availability and the active configuration.
pub fn cmd_check(settings: &Settings) -> anyhow::Result<()> {
    println!("\n{}", style("OCR Tool Status").bold());
    println!("{}", "-".repeat(50));

    let tesseract = TesseractBackend::new();
    let status = if tesseract.is_available() {
        style("✓ available").green()
    } else {
        style("✗ not available").red()
    };
    println!("  {:<15} {}", "Tesseract", status);
    if !tesseract.is_available() {
        println!(
            "                  {}",
            style(tesseract.availability_hint()).dim()
        );
    }

    println!("\n{}", style("Configuration").bold());
    println!("  {:<15} {}", "language", settings.language);
    println!(
        "  {:<15} {}",
        "extensions",
        settings.image_extensions.join(", ")
    );
    println!("  {:<15} {}", "workers", settings.workers);
    println!("  {:<15} {}", "log file", settings.log_file);

    Ok(())
}
