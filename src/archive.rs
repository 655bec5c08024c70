//! Zip archive extraction into per-archive directories.

use std::fs::File;
use std::path::{Path, PathBuf};

use thiserror::Error;
use zip::ZipArchive;

/// Errors that can occur during archive extraction.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive has no usable file name: {0}")]
    InvalidArchivePath(PathBuf),

    #[error("entry '{0}' would extract outside the destination directory")]
    UnsafeEntryPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Extract every entry of `archive_path` into
/// `destination_root/<archive basename without extension>/`.
///
/// The target directory is created if missing and reused if present;
/// extraction is additive and never removes pre-existing files. Entries
/// whose names would escape the target directory (absolute paths or `..`
/// components) abort the extraction with [`ArchiveError::UnsafeEntryPath`].
///
/// Returns the extraction directory path. Failures are logged and
/// propagated; deciding whether to continue with other archives is the
/// caller's concern.
pub fn extract_archive(
    archive_path: &Path,
    destination_root: &Path,
) -> Result<PathBuf, ArchiveError> {
    let stem = archive_path
        .file_stem()
        .ok_or_else(|| ArchiveError::InvalidArchivePath(archive_path.to_path_buf()))?;
    let target_dir = destination_root.join(stem);

    match extract_into(archive_path, &target_dir) {
        Ok(entry_count) => {
            tracing::info!(
                "Extracted '{}' to '{}' ({} entries)",
                archive_path.display(),
                target_dir.display(),
                entry_count
            );
            Ok(target_dir)
        }
        Err(e) => {
            tracing::error!("Failed to extract '{}': {}", archive_path.display(), e);
            Err(e)
        }
    }
}

fn extract_into(archive_path: &Path, target_dir: &Path) -> Result<usize, ArchiveError> {
    std::fs::create_dir_all(target_dir)?;

    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut entry_count = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        // enclosed_name() is None for absolute paths and ".." escapes
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| ArchiveError::UnsafeEntryPath(entry.name().to_string()))?;
        let out_path = target_dir.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path)?;
        } else {
            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut out_file = File::create(&out_path)?;
            std::io::copy(&mut entry, &mut out_file)?;
            entry_count += 1;
        }
    }

    Ok(entry_count)
}
