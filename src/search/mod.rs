//! Boolean keyword search over a directory of text files.

mod query;

use std::io::Write;
use std::path::Path;

use thiserror::Error;

pub use query::{parse, Query, QueryError};

/// Errors from searching a text corpus.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid query: {0}")]
    Query(#[from] QueryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Evaluate `query_expression` against every `.txt` file directly under
/// `search_dir` and write the matching file names, one per line, to
/// `output_path` (overwriting it).
///
/// The expression is validated before any file is read. Files are visited
/// in sorted name order; a file that cannot be read is logged and skipped.
/// Returns the number of matches.
pub fn search_text_files(
    search_dir: &Path,
    query_expression: &str,
    output_path: &Path,
) -> Result<usize, SearchError> {
    let query = query::parse(query_expression)?;

    let mut text_files = Vec::new();
    for entry in std::fs::read_dir(search_dir)? {
        let path = entry?.path();
        let is_txt = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
        if path.is_file() && is_txt {
            text_files.push(path);
        }
    }
    text_files.sort();

    let mut matches = Vec::new();
    for path in &text_files {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("Failed to read '{}': {}", path.display(), e);
                continue;
            }
        };
        if query.matches(&content) {
            tracing::debug!("Match found in '{}'", path.display());
            matches.push(path.file_name().unwrap_or_default().to_string_lossy().to_string());
        }
    }

    let mut output = std::fs::File::create(output_path)?;
    for name in &matches {
        writeln!(output, "{}", name)?;
    }

    tracing::info!(
        "Search '{}' matched {} of {} files in '{}'",
        query_expression,
        matches.len(),
        text_files.len(),
        search_dir.display()
    );

    Ok(matches.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn corpus() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "alpha beta").unwrap();
        std::fs::write(dir.path().join("b.txt"), "gamma").unwrap();
        std::fs::write(dir.path().join("ignored.dat"), "alpha").unwrap();
        dir
    }

    fn read_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_and_not_query() {
        let dir = corpus();
        let out = dir.path().join("results.out");

        let count = search_text_files(dir.path(), "alpha AND NOT gamma", &out).unwrap();

        assert_eq!(count, 1);
        assert_eq!(read_lines(&out), vec!["a.txt"]);
    }

    #[test]
    fn test_or_query() {
        let dir = corpus();
        let out = dir.path().join("results.out");

        let count = search_text_files(dir.path(), "alpha OR gamma", &out).unwrap();

        assert_eq!(count, 2);
        assert_eq!(read_lines(&out), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_malformed_query_scans_nothing() {
        let dir = corpus();
        let out = dir.path().join("results.out");

        let result = search_text_files(dir.path(), "(alpha AND beta", &out);

        assert!(matches!(result, Err(SearchError::Query(_))));
        assert!(!out.exists());
    }

    #[test]
    fn test_output_overwritten_each_run() {
        let dir = corpus();
        let out = dir.path().join("results.out");

        search_text_files(dir.path(), "alpha OR gamma", &out).unwrap();
        search_text_files(dir.path(), "gamma", &out).unwrap();

        assert_eq!(read_lines(&out), vec!["b.txt"]);
    }

    #[test]
    fn test_non_txt_files_not_scanned() {
        let dir = corpus();
        let out = dir.path().join("results.out");

        let count = search_text_files(dir.path(), "alpha", &out).unwrap();

        assert_eq!(count, 1);
    }
}
