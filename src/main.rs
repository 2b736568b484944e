//! # poker-catalog - Poker Video Catalog CLI
//!
//! Parses tournament video filenames into structured metadata, builds the
//! Project → Season → Event → Episode → VideoFile catalog from a directory
//! inventory, and links spreadsheet folder references to inventory files.
//!
//! ## Usage
//!
//! ```bash
//! # Parse filenames and print metadata with generated titles
//! poker-catalog parse WCLA24-15.mp4 E01_GOG_final_edit_231106.mp4
//!
//! # Build the catalog from a mounted share
//! poker-catalog scan /mnt/nas/archive
//!
//! # Match spreadsheet folder links (column 3) against the share
//! poker-catalog link /mnt/nas/archive rows.json --column 3 --skip-header
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use poker_catalog::commands::{link::LinkCommand, parse::ParseCommand, scan::ScanCommand};
use poker_catalog::config::Config;

/// poker-catalog - Filename parsing and folder-link matching for poker video archives
#[derive(Parser)]
#[command(
    name = "poker-catalog",
    about = "Filename parsing and folder-link matching for poker video archives",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Parse filenames and print the extracted metadata and titles
    Parse {
        /// Filenames to parse
        #[arg(required = true)]
        filenames: Vec<String>,
        /// Folder path used as parsing context for every filename
        #[arg(long, short = 'p')]
        path: Option<String>,
        /// Print JSON instead of a readable report
        #[arg(long)]
        json: bool,
    },
    /// Inventory a directory and build the catalog graph
    Scan {
        /// Path to the media directory to scan
        path: PathBuf,
        /// Print JSON instead of a readable report
        #[arg(long)]
        json: bool,
    },
    /// Match spreadsheet folder links against a directory inventory
    Link {
        /// Path to the media directory to index
        path: PathBuf,
        /// JSON file holding spreadsheet rows as arrays of strings
        rows: PathBuf,
        /// Zero-based column holding the folder link
        #[arg(long, short = 'c', default_value_t = 0)]
        column: usize,
        /// Treat the first row as a header
        #[arg(long)]
        skip_header: bool,
        /// Minimum confidence for applying a match (overrides CATALOG_MIN_CONFIDENCE)
        #[arg(long, short = 'm')]
        min_confidence: Option<f64>,
        /// Print JSON instead of a readable report
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so reports on stdout stay machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "poker_catalog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let result = match cli.command {
        Commands::Parse {
            filenames,
            path,
            json,
        } => {
            info!("Starting parse command for {} filenames", filenames.len());
            let parse_cmd = ParseCommand::new(filenames, path, json);
            parse_cmd
                .execute()
                .and_then(|records| parse_cmd.print_report(&records))
        }
        Commands::Scan { path, json } => {
            info!("Starting scan command for path: {:?}", path);
            let scan_cmd = ScanCommand::new(path, config, json);
            match scan_cmd.execute().await {
                Ok(report) => scan_cmd.print_report(&report),
                Err(e) => Err(e),
            }
        }
        Commands::Link {
            path,
            rows,
            column,
            skip_header,
            min_confidence,
            json,
        } => {
            info!(
                "Starting link command for path: {:?}, rows: {:?}, column: {}",
                path, rows, column
            );
            let config = Config {
                min_confidence: min_confidence.unwrap_or(config.min_confidence),
                ..config
            };
            let link_cmd = LinkCommand::new(path, rows, column, skip_header, config, json);
            match link_cmd.execute().await {
                Ok(report) => link_cmd.print_report(&report),
                Err(e) => Err(e),
            }
        }
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
