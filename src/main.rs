//! ScanOCR - batch OCR pipeline for scanned document archives.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Logging is initialized in cli::run once the log file name is known
    scanocr::cli::run().await
}
