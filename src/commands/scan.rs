use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

use crate::catalog::{BuildStats, CatalogBuilder};
use crate::config::Config;
use crate::inventory::scan_directory;
use crate::parser::{ParseStats, ParserRegistry};

/// Summary of a scan run
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub scan_path: PathBuf,
    pub files_inventoried: usize,
    pub build: BuildStats,
    pub parse: ParseStats,
    pub scan_time: Duration,
}

/// Command to inventory a directory and build the catalog graph from it
pub struct ScanCommand {
    media_root: PathBuf,
    config: Config,
    json: bool,
}

impl ScanCommand {
    pub fn new(media_root: PathBuf, config: Config, json: bool) -> Self {
        Self {
            media_root,
            config,
            json,
        }
    }

    pub async fn execute(&self) -> Result<ScanReport> {
        let start_time = Instant::now();

        if !self.media_root.exists() {
            return Err(anyhow!(
                "Media directory does not exist: {:?}",
                self.media_root
            ));
        }
        self.config.validate()?;

        info!("🔎 Scanning directory: {:?}", self.media_root);

        let progress = ProgressBar::new_spinner();
        progress.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
        progress.enable_steady_tick(Duration::from_millis(120));

        progress.set_message("Inventorying files...");
        let records = scan_directory(&self.media_root)?;

        progress.set_message(format!("Parsing {} files...", records.len()));
        let registry = ParserRegistry::new()?;
        let builder = CatalogBuilder::from_config(&registry, &self.config)?;
        let build = builder.build(&records);

        progress.finish_and_clear();

        Ok(ScanReport {
            scan_path: self.media_root.clone(),
            files_inventoried: records.len(),
            build: build.stats,
            parse: build.parse_stats,
            scan_time: start_time.elapsed(),
        })
    }

    /// Print the scan report to stdout
    pub fn print_report(&self, report: &ScanReport) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(report)?);
            return Ok(());
        }

        let build = &report.build;
        println!("\n📊 Catalog Build Report");
        println!("═══════════════════════════════════════");
        println!("📂 Scanned directory: {}", report.scan_path.display());
        println!("📁 Files inventoried: {}", report.files_inventoried);
        println!("🎞️  Video files processed: {}", build.files_processed);
        println!("⏱️  Scan time: {:.2}s", report.scan_time.as_secs_f64());

        println!("\n🏗️  Created:");
        println!("───────────");
        println!("• Projects: {}", build.projects_created);
        println!("• Seasons: {}", build.seasons_created);
        println!("• Events: {}", build.events_created);
        println!("• Episodes: {}", build.episodes_created);
        println!("• Video files: {}", build.video_files_created);
        println!("• Links: {}", build.links_created);
        println!("• Skipped: {}", build.skipped);

        if build.errors > 0 {
            println!("\n❌ Errors: {}", build.errors);
            for message in &build.error_messages {
                println!("   {}", message);
            }
        }

        println!(
            "\n📈 Parse rate: {}/{} ({:.1}%)",
            report.parse.succeeded,
            report.parse.total,
            report.parse.success_rate()
        );
        for (parser, tally) in &report.parse.by_parser {
            println!("• {}: {}/{}", parser, tally.succeeded, tally.total);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_scan_builds_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("WSOP/2024")).unwrap();
        fs::create_dir_all(root.join("PAD/Season 12")).unwrap();
        fs::write(root.join("WSOP/2024/WCLA24-15.mp4"), "").unwrap();
        fs::write(root.join("PAD/Season 12/pad-s12-ep01-002.mp4"), "").unwrap();
        fs::write(root.join("PAD/notes.txt"), "").unwrap();

        let command = ScanCommand::new(root.to_path_buf(), Config::default(), false);
        let report = command.execute().await.unwrap();

        assert_eq!(report.files_inventoried, 3);
        assert_eq!(report.build.files_processed, 2);
        assert_eq!(report.build.projects_created, 2);
        assert_eq!(report.parse.succeeded, 2);
    }

    #[tokio::test]
    async fn test_scan_missing_directory() {
        let command = ScanCommand::new(PathBuf::from("/nonexistent/path"), Config::default(), false);
        assert!(command.execute().await.is_err());
    }
}
