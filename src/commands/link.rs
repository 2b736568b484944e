use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::catalog::CatalogBuilder;
use crate::config::Config;
use crate::inventory::scan_directory;
use crate::matching::{
    apply_matches, ApplyStats, ExternalRow, InMemoryLinkStore, MatchResult, MatchStats,
    PathMatcher,
};
use crate::parser::ParserRegistry;

/// Outcome of a link run
#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    pub rows_read: usize,
    pub indexed_records: usize,
    pub min_confidence: f64,
    pub matches: MatchStats,
    pub applied: ApplyStats,
    pub results: Vec<MatchResult>,
}

/// Command to match spreadsheet folder links against a directory inventory
pub struct LinkCommand {
    media_root: PathBuf,
    rows_path: PathBuf,
    column: usize,
    skip_header: bool,
    config: Config,
    json: bool,
}

impl LinkCommand {
    pub fn new(
        media_root: PathBuf,
        rows_path: PathBuf,
        column: usize,
        skip_header: bool,
        config: Config,
        json: bool,
    ) -> Self {
        Self {
            media_root,
            rows_path,
            column,
            skip_header,
            config,
            json,
        }
    }

    pub async fn execute(&self) -> Result<LinkReport> {
        self.config.validate()?;

        let rows = self.read_rows().await?;
        info!(
            "Read {} spreadsheet rows from {:?}",
            rows.len(),
            self.rows_path
        );

        let records = scan_directory(&self.media_root)?;

        let mut matcher = PathMatcher::new().with_limit(self.config.index_limit);
        let indexed_records = matcher.build_index(&records);
        let (results, matches) = matcher.resolve_all(&rows)?;

        // Inventory records only become linkable once the catalog holds them
        let registry = ParserRegistry::new()?;
        let build = CatalogBuilder::from_config(&registry, &self.config)?.build(&records);
        let mut store = InMemoryLinkStore::new();
        for link in &build.graph.links {
            store.link_inventory(link.inventory_id.clone(), format!("video-{}", link.video_file));
        }

        let applied = apply_matches(&results, self.config.min_confidence, &mut store);

        Ok(LinkReport {
            rows_read: rows.len(),
            indexed_records,
            min_confidence: self.config.min_confidence,
            matches,
            applied,
            results,
        })
    }

    /// Rows are a JSON array of string arrays; the folder link sits in `column`.
    async fn read_rows(&self) -> Result<Vec<ExternalRow>> {
        let content = tokio::fs::read_to_string(&self.rows_path)
            .await
            .with_context(|| format!("Failed to read rows file {:?}", self.rows_path))?;
        let cells: Vec<Vec<String>> = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Rows file is not a JSON array of string arrays: {}", e))?;

        let skip = usize::from(self.skip_header);
        let rows: Vec<ExternalRow> = cells
            .into_iter()
            .enumerate()
            .skip(skip)
            .map(|(i, row)| ExternalRow {
                id: format!("row-{}", i + 1),
                folder_link: row.get(self.column).cloned(),
            })
            .collect();

        let missing = rows.iter().filter(|r| r.folder_link.is_none()).count();
        if missing > 0 {
            warn!("{} rows have no column {}", missing, self.column);
        }
        Ok(rows)
    }

    /// Print the link report to stdout
    pub fn print_report(&self, report: &LinkReport) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(report)?);
            return Ok(());
        }

        let m = &report.matches;
        println!("\n🔗 Folder Link Report");
        println!("═══════════════════════════════════════");
        println!("📄 Rows read: {}", report.rows_read);
        println!("📁 Inventory records indexed: {}", report.indexed_records);
        println!(
            "🎯 Matched: {}/{} ({:.1}%)",
            m.matched, m.total, m.match_rate
        );
        println!("• Exact: {}", m.exact);
        println!("• Partial: {}", m.partial);
        println!("• Fuzzy: {}", m.fuzzy);
        println!("• None: {}", m.unmatched);

        let a = &report.applied;
        println!(
            "\n✅ Applied at confidence >= {:.2}: {}",
            report.min_confidence, a.applied
        );
        println!("• Below threshold: {}", a.below_threshold);
        println!("• Unresolved: {}", a.unresolved);
        println!("• Not in catalog: {}", a.dangling);
        println!("• Already linked: {}", a.already_linked);

        let unmatched: Vec<_> = report.results.iter().filter(|r| !r.is_match()).collect();
        if !unmatched.is_empty() {
            println!("\n❌ Unmatched rows:");
            for result in unmatched {
                println!("   {}: {}", result.external_id, result.raw_input);
            }
        }
        Ok(())
    }
}
