//! Batch orchestration: extract + OCR for every archive under a root
//! directory.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;

use crate::archive::extract_archive;
use crate::ocr::OcrBackend;

use super::ocr::{ocr_directory, OcrRunSummary};

/// Events emitted during batch processing.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// Archive scan finished, processing begins.
    Started { total_archives: usize },
    /// One archive's extract + OCR unit started.
    ArchiveStarted { archive: String },
    /// One archive's unit completed.
    ArchiveCompleted {
        archive: String,
        images_processed: usize,
        images_failed: usize,
    },
    /// One archive's unit failed (extraction or source listing error).
    ArchiveFailed { archive: String, error: String },
}

/// Result of a batch run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchSummary {
    pub archives: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub images_processed: usize,
    pub images_failed: usize,
}

/// Service processing every archive under a root directory.
///
/// Archives are independent units of work; each unit extracts its archive
/// and OCRs the extracted images. Units run concurrently on a bounded
/// number of blocking workers, and a failed unit never aborts the others.
pub struct BatchService {
    backend: Arc<dyn OcrBackend>,
    image_extensions: Vec<String>,
    text_dir_suffix: String,
}

impl BatchService {
    /// Create a new batch service.
    pub fn new(
        backend: Arc<dyn OcrBackend>,
        image_extensions: Vec<String>,
        text_dir_suffix: String,
    ) -> Self {
        Self {
            backend,
            image_extensions,
            text_dir_suffix,
        }
    }

    /// Process every `.zip` archive directly under `root_dir`.
    ///
    /// Each archive is extracted to `root_dir/<stem>/` and its images are
    /// OCR'd into `root_dir/<stem><text_dir_suffix>/`. Failures are logged
    /// per unit and counted; only a failure to list `root_dir` is fatal.
    pub async fn process(
        &self,
        root_dir: &Path,
        workers: usize,
        event_tx: mpsc::Sender<BatchEvent>,
    ) -> anyhow::Result<BatchSummary> {
        let archives = find_archives(root_dir)?;

        let _ = event_tx
            .send(BatchEvent::Started {
                total_archives: archives.len(),
            })
            .await;

        let succeeded = Arc::new(AtomicUsize::new(0));
        let failed = Arc::new(AtomicUsize::new(0));
        let images_processed = Arc::new(AtomicUsize::new(0));
        let images_failed = Arc::new(AtomicUsize::new(0));

        let workers = workers.max(1);
        let mut handles = Vec::with_capacity(workers);

        for archive_path in &archives {
            let archive_path = archive_path.clone();
            let root_dir = root_dir.to_path_buf();
            let backend = self.backend.clone();
            let image_extensions = self.image_extensions.clone();
            let text_dir_suffix = self.text_dir_suffix.clone();
            let succeeded = succeeded.clone();
            let failed = failed.clone();
            let images_processed = images_processed.clone();
            let images_failed = images_failed.clone();
            let event_tx = event_tx.clone();

            let handle = tokio::task::spawn_blocking(move || {
                let archive_name = archive_path
                    .file_name()
                    .unwrap_or(archive_path.as_os_str())
                    .to_string_lossy()
                    .to_string();

                let _ = futures::executor::block_on(event_tx.send(BatchEvent::ArchiveStarted {
                    archive: archive_name.clone(),
                }));

                match process_one(
                    &archive_path,
                    &root_dir,
                    backend.as_ref(),
                    &image_extensions,
                    &text_dir_suffix,
                ) {
                    Ok(summary) => {
                        succeeded.fetch_add(1, Ordering::Relaxed);
                        images_processed.fetch_add(summary.processed, Ordering::Relaxed);
                        images_failed.fetch_add(summary.failed, Ordering::Relaxed);
                        let _ = futures::executor::block_on(event_tx.send(
                            BatchEvent::ArchiveCompleted {
                                archive: archive_name,
                                images_processed: summary.processed,
                                images_failed: summary.failed,
                            },
                        ));
                    }
                    Err(e) => {
                        tracing::error!("Failed to process '{}': {:#}", archive_name, e);
                        failed.fetch_add(1, Ordering::Relaxed);
                        let _ = futures::executor::block_on(event_tx.send(
                            BatchEvent::ArchiveFailed {
                                archive: archive_name,
                                error: format!("{:#}", e),
                            },
                        ));
                    }
                }
            });

            handles.push(handle);

            if handles.len() >= workers {
                for h in handles.drain(..) {
                    let _ = h.await;
                }
            }
        }

        for h in handles {
            let _ = h.await;
        }

        Ok(BatchSummary {
            archives: archives.len(),
            succeeded: succeeded.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
            images_processed: images_processed.load(Ordering::Relaxed),
            images_failed: images_failed.load(Ordering::Relaxed),
        })
    }
}

/// List `.zip` files directly under `root_dir`, sorted by name.
fn find_archives(root_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(root_dir)
        .with_context(|| format!("failed to list root directory '{}'", root_dir.display()))?;

    let mut archives = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_zip = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
        if path.is_file() && is_zip {
            archives.push(path);
        }
    }
    archives.sort();
    Ok(archives)
}

/// One archive's unit of work: extract, then OCR the extracted images.
fn process_one(
    archive_path: &Path,
    root_dir: &Path,
    backend: &dyn OcrBackend,
    image_extensions: &[String],
    text_dir_suffix: &str,
) -> anyhow::Result<OcrRunSummary> {
    let source_dir = extract_archive(archive_path, root_dir)?;

    let target_name = format!(
        "{}{}",
        source_dir
            .file_name()
            .unwrap_or_default()
            .to_string_lossy(),
        text_dir_suffix
    );
    let target_dir = root_dir.join(target_name);

    ocr_directory(&source_dir, &target_dir, backend, image_extensions)
}
