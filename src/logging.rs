//! Logging initialization: console plus a non-blocking file sink.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber with a console layer and a file
/// layer appending to `log_path`. Records are `<timestamp> <level> <message>`
/// lines at info-and-above (debug with `verbose`), overridable via `RUST_LOG`.
///
/// Returns the file writer's guard, which must be held for the process
/// lifetime so buffered records are flushed. Calling this again after a
/// subscriber is installed attaches nothing and returns `Ok(None)`.
pub fn init(log_path: &Path, verbose: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open log file '{}'", log_path.display()))?;
    let (file_writer, guard) = tracing_appender::non_blocking(log_file);

    let default_filter = if verbose {
        "scanocr=debug"
    } else {
        "scanocr=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .try_init();

    match result {
        Ok(()) => Ok(Some(guard)),
        // A subscriber is already installed; do not attach duplicate sinks.
        Err(_) => Ok(None),
    }
}
