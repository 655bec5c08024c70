//! Directory-level OCR: one text file per image.

use std::path::Path;

use anyhow::Context;

use crate::ocr::OcrBackend;

/// Outcome of an OCR pass over one source directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct OcrRunSummary {
    /// Text files successfully written.
    pub processed: usize,
    /// Images that failed OCR and were skipped.
    pub failed: usize,
}

/// Run OCR on every image in `source_dir` whose extension is in
/// `image_extensions` (case-insensitive, non-recursive), writing
/// `<basename>.txt` into `target_dir` (created if missing, outputs
/// overwritten).
///
/// Files are processed in sorted name order. A file that fails to OCR or
/// write is logged and skipped; the run continues. Only a failure to list
/// `source_dir` aborts the whole call.
pub fn ocr_directory(
    source_dir: &Path,
    target_dir: &Path,
    backend: &dyn OcrBackend,
    image_extensions: &[String],
) -> anyhow::Result<OcrRunSummary> {
    std::fs::create_dir_all(target_dir)
        .with_context(|| format!("failed to create target directory '{}'", target_dir.display()))?;

    let mut images = Vec::new();
    let entries = std::fs::read_dir(source_dir)
        .with_context(|| format!("failed to list source directory '{}'", source_dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let is_image = path.extension().and_then(|e| e.to_str()).is_some_and(|ext| {
            image_extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
        });
        if path.is_file() && is_image {
            images.push(path);
        }
    }
    images.sort();

    let mut summary = OcrRunSummary::default();
    for image_path in &images {
        match ocr_one(image_path, target_dir, backend) {
            Ok(target_path) => {
                summary.processed += 1;
                tracing::info!(
                    "OCR completed for '{}', text saved to '{}'",
                    image_path.display(),
                    target_path.display()
                );
            }
            Err(e) => {
                summary.failed += 1;
                tracing::error!("Error processing '{}': {}", image_path.display(), e);
            }
        }
    }

    Ok(summary)
}

fn ocr_one(
    image_path: &Path,
    target_dir: &Path,
    backend: &dyn OcrBackend,
) -> anyhow::Result<std::path::PathBuf> {
    let stem = image_path
        .file_stem()
        .with_context(|| format!("image has no usable file name: {}", image_path.display()))?;
    // join + format rather than with_extension: a dotted stem like
    // "scan.v2" must map to "scan.v2.txt"
    let target_path = target_dir.join(format!("{}.txt", stem.to_string_lossy()));

    let result = backend.ocr_image(image_path)?;
    std::fs::write(&target_path, result.text)
        .with_context(|| format!("failed to write '{}'", target_path.display()))?;

    Ok(target_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{OcrError, OcrResult};
    use tempfile::TempDir;

    /// Backend that "reads" the file content as its OCR text and fails on
    /// files whose name contains "corrupt".
    struct StubBackend;

    impl OcrBackend for StubBackend {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn availability_hint(&self) -> String {
            "always available".to_string()
        }

        fn ocr_image(&self, image_path: &Path) -> Result<OcrResult, OcrError> {
            let name = image_path.file_name().unwrap_or_default().to_string_lossy();
            if name.contains("corrupt") {
                return Err(OcrError::Image("truncated image".to_string()));
            }
            let text = std::fs::read_to_string(image_path)?;
            Ok(OcrResult {
                text,
                processing_time_ms: 0,
            })
        }
    }

    fn extensions() -> Vec<String> {
        vec!["tif".to_string(), "tiff".to_string()]
    }

    #[test]
    fn test_writes_one_text_file_per_image() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        std::fs::write(source.path().join("page1.tif"), "first page").unwrap();
        std::fs::write(source.path().join("page2.TIFF"), "second page").unwrap();
        std::fs::write(source.path().join("skip.png"), "not configured").unwrap();

        let summary =
            ocr_directory(source.path(), target.path(), &StubBackend, &extensions()).unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.failed, 0);
        assert_eq!(
            std::fs::read_to_string(target.path().join("page1.txt")).unwrap(),
            "first page"
        );
        assert_eq!(
            std::fs::read_to_string(target.path().join("page2.txt")).unwrap(),
            "second page"
        );
        assert!(!target.path().join("skip.txt").exists());
    }

    #[test]
    fn test_rerun_overwrites_without_duplicates() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        std::fs::write(source.path().join("page1.tif"), "content").unwrap();

        ocr_directory(source.path(), target.path(), &StubBackend, &extensions()).unwrap();
        let summary =
            ocr_directory(source.path(), target.path(), &StubBackend, &extensions()).unwrap();

        assert_eq!(summary.processed, 1);
        let outputs: Vec<_> = std::fs::read_dir(target.path()).unwrap().collect();
        assert_eq!(outputs.len(), 1);
        assert_eq!(
            std::fs::read_to_string(target.path().join("page1.txt")).unwrap(),
            "content"
        );
    }

    #[test]
    fn test_corrupt_image_is_skipped_not_fatal() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        std::fs::write(source.path().join("page1.tif"), "ok").unwrap();
        std::fs::write(source.path().join("page2-corrupt.tif"), "bad").unwrap();
        std::fs::write(source.path().join("page3.tif"), "ok too").unwrap();

        let summary =
            ocr_directory(source.path(), target.path(), &StubBackend, &extensions()).unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.failed, 1);
        assert!(target.path().join("page1.txt").exists());
        assert!(!target.path().join("page2-corrupt.txt").exists());
        assert!(target.path().join("page3.txt").exists());
    }

    #[test]
    fn test_missing_source_directory_is_fatal() {
        let target = TempDir::new().unwrap();
        let result = ocr_directory(
            Path::new("/nonexistent/source"),
            target.path(),
            &StubBackend,
            &extensions(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_creates_target_directory() {
        let source = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        let target = root.path().join("deep").join("target");
        std::fs::write(source.path().join("page1.tif"), "content").unwrap();

        let summary = ocr_directory(source.path(), &target, &StubBackend, &extensions()).unwrap();

        assert_eq!(summary.processed, 1);
        assert!(target.join("page1.txt").exists());
    }
}
