use anyhow::Result;
use tracing::info;

use crate::metadata::ExtractedMetadata;
use crate::parser::ParserRegistry;
use crate::title::TitleGenerator;

/// Command to parse filenames and show the extracted metadata and titles
pub struct ParseCommand {
    filenames: Vec<String>,
    path: Option<String>,
    json: bool,
}

impl ParseCommand {
    pub fn new(filenames: Vec<String>, path: Option<String>, json: bool) -> Self {
        Self {
            filenames,
            path,
            json,
        }
    }

    /// Parse every filename against the same folder context
    pub fn execute(&self) -> Result<Vec<ExtractedMetadata>> {
        let registry = ParserRegistry::new()?;
        let titles = TitleGenerator::new();
        let path = self.path.as_deref().unwrap_or_default();

        let inputs: Vec<(&str, &str)> = self
            .filenames
            .iter()
            .map(|filename| (filename.as_str(), path))
            .collect();

        let records: Vec<ExtractedMetadata> = registry
            .parse_batch(&inputs)
            .into_iter()
            .map(|metadata| {
                let (display, short) = titles.generate(&metadata);
                metadata.with_titles(display, short)
            })
            .collect();

        info!("Parsed {} filenames", records.len());
        Ok(records)
    }

    pub fn print_report(&self, records: &[ExtractedMetadata]) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(records)?);
            return Ok(());
        }

        for record in records {
            let status = if record.success { "✅" } else { "⚠️ " };
            println!("\n{} {}", status, record.raw_filename);
            println!("   Parser: {} (confidence {:.2})", record.parser, record.confidence);
            println!(
                "   Franchise: {}",
                record.franchise_code().unwrap_or("-")
            );
            if let Some(year) = record.year {
                println!("   Year: {}", year);
            }
            if let Some(event) = record.event_number {
                println!("   Event: #{}", event);
            }
            if let Some(episode) = record.episode_number {
                println!("   Episode: {}", episode);
            }
            if let Some(table) = &record.table_type {
                println!("   Table: {}", table.code());
            }
            println!("   Version: {}", record.version);
            if let Some(title) = &record.display_title {
                println!("   Title: {}", title);
            }
            if let Some(short) = &record.short_title {
                println!("   Short: {}", short);
            }
        }
        Ok(())
    }
}
