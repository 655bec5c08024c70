//! CLI parser and command dispatch.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::load_settings;
use crate::logging;

#[derive(Parser)]
#[command(name = "scanocr")]
#[command(about = "Batch OCR pipeline for scanned document archives")]
#[command(version)]
pub struct Cli {
    /// Config file path (default: scanocr.toml if present)
    #[arg(short, long, global = true, env = "SCANOCR_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and OCR every archive under a root directory
    Process {
        /// Directory containing .zip archives
        root: PathBuf,
        /// Number of concurrent archive workers (default from config)
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// Extract a single archive
    Extract {
        /// Archive to extract
        archive: PathBuf,
        /// Destination root (default: the archive's directory)
        #[arg(short, long)]
        dest: Option<PathBuf>,
    },

    /// OCR every image in a directory
    Ocr {
        /// Directory containing images
        source: PathBuf,
        /// Text output directory (default: sibling derived from source)
        #[arg(short, long)]
        target: Option<PathBuf>,
    },

    /// Search text files with a boolean keyword expression
    Search {
        /// Directory containing .txt files
        dir: PathBuf,
        /// Query, e.g. 'alpha AND NOT (beta OR "gamma delta")'
        query: String,
        /// Output file for matching file names
        #[arg(short, long, default_value = "search_results.txt")]
        output: PathBuf,
    },

    /// Check OCR tool availability
    Check,
}

/// Parse arguments, initialize logging, and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;

    // Keep the guard alive so buffered file log records are flushed on exit
    let _log_guard = logging::init(settings.log_file.as_ref(), cli.verbose)?;

    match cli.command {
        Commands::Process { root, workers } => {
            let workers = workers.unwrap_or(settings.workers);
            commands::cmd_process(&settings, root, workers).await
        }
        Commands::Extract { archive, dest } => commands::cmd_extract(archive, dest),
        Commands::Ocr { source, target } => commands::cmd_ocr(&settings, source, target),
        Commands::Search { dir, query, output } => commands::cmd_search(dir, &query, output),
        Commands::Check => commands::cmd_check(&settings),
    }
}
