//! Text corpus search command.

use std::path::PathBuf;

use console::style;

use crate::search::search_text_files;

/// Search `.txt` files in `dir` with a boolean keyword expression.
pub fn cmd_search(dir: PathBuf, query: &str, output: PathBuf) -> anyhow::Result<()> {
    let count = search_text_files(&dir, query, &output)?;

    if count == 0 {
        println!("{} No matches", style("○").dim());
    } else {
        println!(
            "{} {} matching file{}, written to {}",
            style("✓").green(),
            count,
            if count == 1 { "" } else { "s" },
            output.display()
        );
    }
    Ok(())
}
