//! Batch processing command.

use std::path::PathBuf;
use std::sync::Arc;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use crate::config::Settings;
use crate::ocr::{OcrBackend, OcrConfig, TesseractBackend};
use crate::services::{BatchEvent, BatchService};

/// Run the full pipeline over every archive under `root`.
pub async fn cmd_process(settings: &Settings, root: PathBuf, workers: usize) -> anyhow::Result<()> {
    let backend = TesseractBackend::with_config(OcrConfig {
        language: settings.language.clone(),
    });
    if !backend.is_available() {
        anyhow::bail!(backend.availability_hint());
    }

    let service = BatchService::new(
        Arc::new(backend),
        settings.image_extensions.clone(),
        settings.text_dir_suffix.clone(),
    );

    let (event_tx, mut event_rx) = mpsc::channel::<BatchEvent>(100);

    let display = tokio::spawn(async move {
        let mut bar: Option<ProgressBar> = None;
        while let Some(event) = event_rx.recv().await {
            match event {
                BatchEvent::Started { total_archives } => {
                    let b = ProgressBar::new(total_archives as u64);
                    b.set_style(
                        ProgressStyle::default_bar()
                            .template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
                            .unwrap()
                            .progress_chars("█▓░"),
                    );
                    b.set_message("Processing archives");
                    bar = Some(b);
                }
                BatchEvent::ArchiveStarted { archive } => {
                    if let Some(b) = &bar {
                        b.set_message(archive);
                    }
                }
                BatchEvent::ArchiveCompleted {
                    archive,
                    images_processed,
                    images_failed,
                } => {
                    if let Some(b) = &bar {
                        b.println(format!(
                            "  {} {} ({} images, {} failed)",
                            style("✓").green(),
                            archive,
                            images_processed,
                            images_failed
                        ));
                        b.inc(1);
                    }
                }
                BatchEvent::ArchiveFailed { archive, error } => {
                    if let Some(b) = &bar {
                        b.println(format!("  {} {}: {}", style("✗").red(), archive, error));
                        b.inc(1);
                    }
                }
            }
        }
        if let Some(b) = bar {
            b.finish_and_clear();
        }
    });

    let summary = service.process(&root, workers, event_tx).await?;
    let _ = display.await;

    println!("\n{}", style("Batch complete").bold());
    println!(
        "  archives: {} ok, {} failed (of {})",
        style(summary.succeeded).green(),
        if summary.failed > 0 {
            style(summary.failed).red()
        } else {
            style(summary.failed).dim()
        },
        summary.archives
    );
    println!(
        "  images:   {} processed, {} failed",
        summary.images_processed, summary.images_failed
    );

    Ok(())
}
