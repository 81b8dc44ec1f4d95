use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use veriscan_ocr::ScanPipeline;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "veriscan")]
#[command(version, about = "Identity and business document classification and field extraction", long_about = None)]
struct Cli {
    /// Pipeline configuration (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify and extract fields from OCR JSON output
    Extract {
        /// OCR output for the front side
        front: PathBuf,

        /// OCR output for the back side
        #[arg(short, long)]
        back: Option<PathBuf>,

        /// Also print redaction rectangles
        #[arg(short, long)]
        masks: bool,
    },

    /// Print the document type of OCR JSON output
    Classify {
        front: PathBuf,

        #[arg(short, long)]
        back: Option<PathBuf>,
    },

    /// Preprocess, OCR and extract from card images
    Scan {
        /// Front side image
        front: PathBuf,

        /// Back side image
        #[arg(short, long)]
        back: Option<PathBuf>,

        /// Tesseract language code(s)
        #[arg(long, default_value = "eng")]
        lang: String,

        /// Directory holding the tessdata files
        #[arg(long)]
        tessdata: Option<PathBuf>,
    },
}

#[cfg(feature = "tesseract")]
fn recognizer(lang: &str, tessdata: Option<PathBuf>) -> Result<veriscan_ocr::TesseractRecognizer> {
    Ok(veriscan_ocr::TesseractRecognizer::new(
        tessdata.map(|dir| dir.display().to_string()),
        lang,
    ))
}

#[cfg(not(feature = "tesseract"))]
fn recognizer(_lang: &str, _tessdata: Option<PathBuf>) -> Result<veriscan_ocr::MockRecognizer> {
    Err(veriscan_ocr::OcrError::NotAvailable.into())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to serialise output")?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let pipeline = commands::load_pipeline(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract { front, back, masks } => {
            let doc = commands::read_submission(&front, back.as_deref())?;
            print_json(&commands::extract(&pipeline, &doc, masks))?;
        }
        Commands::Classify { front, back } => {
            let doc = commands::read_submission(&front, back.as_deref())?;
            println!("{}", pipeline.classify(&doc));
        }
        Commands::Scan { front, back, lang, tessdata } => {
            let scanner = ScanPipeline::new(recognizer(&lang, tessdata)?, pipeline);
            print_json(&commands::scan(&scanner, &front, back.as_deref()).await?)?;
        }
    }

    Ok(())
}
