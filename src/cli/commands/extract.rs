//! Standalone archive extraction command.

use std::path::PathBuf;

use console::style;

use crate::archive::extract_archive;

/// Extract one archive into a subdirectory named after it.
pub fn cmd_extract(archive: PathBuf, dest: Option<PathBuf>) -> anyhow::Result<()> {
    let dest = match dest {
        Some(dest) => dest,
        None => archive
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let extracted = extract_archive(&archive, &dest)?;
    println!(
        "{} Extracted to {}",
        style("✓").green(),
        extracted.display()
    );
    Ok(())
}
