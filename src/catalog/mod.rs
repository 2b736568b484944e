//! Assemble the Project → Season → Event → Episode → VideoFile hierarchy
//! from parsed inventory records.
//!
//! The builder only produces drafts linked by position; identity assignment
//! and persistence belong to the caller.

use glob::Pattern;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::config::{exclude_match_options, Config, DEFAULT_SEASON_YEAR};
use crate::error::Result;
use crate::inventory::InventoryRecord;
use crate::matching::normalize_path;
use crate::metadata::{ExtractedMetadata, Franchise, TableType};
use crate::parser::{file_category, parse_amount, should_hide_file, FileCategory, ParseStats, ParserRegistry};
use crate::title::TitleGenerator;

/// Display name of the project grouping a franchise
pub fn project_name(franchise: &Franchise) -> String {
    match franchise {
        Franchise::Wsop => "World Series of Poker".to_string(),
        Franchise::GgMillions => "GG Millions".to_string(),
        Franchise::Gog => "Game of Gold".to_string(),
        Franchise::Pad => "Poker After Dark".to_string(),
        Franchise::Mpp => "MPP Tournament".to_string(),
        Franchise::Hcl => "Hustler Casino Live".to_string(),
        Franchise::Other(code) => code.clone(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ProjectKey {
    code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SeasonKey {
    project: usize,
    year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EventKey {
    season: usize,
    event_number: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EpisodeKey {
    event: usize,
    episode_number: u32,
    day_number: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDraft {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonDraft {
    /// Index into [`CatalogGraph::projects`]
    pub project: usize,
    pub year: i32,
    pub name: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDraft {
    pub season: usize,
    pub event_number: u32,
    pub name: String,
    pub name_short: Option<String>,
    pub game_type: Option<String>,
    /// Buy-in expanded to whole currency units
    pub buy_in_amount: Option<u64>,
    pub gtd_amount: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeDraft {
    pub event: usize,
    pub episode_number: u32,
    pub day_number: Option<u32>,
    pub part_number: Option<u32>,
    pub title: String,
    pub table_type: Option<TableType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoFileDraft {
    pub episode: usize,
    pub inventory_id: String,
    pub file_path: String,
    pub file_name: String,
    pub size_bytes: u64,
    pub extension: String,
    pub display_title: String,
    pub short_title: String,
    pub content_type: Option<String>,
    pub version: String,
    pub parser: String,
    pub confidence: f64,
}

/// Inventory record attached to a video file draft
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryLink {
    pub inventory_id: String,
    /// Index into [`CatalogGraph::video_files`]
    pub video_file: usize,
}

/// Entity drafts produced by one build, linked by vector position
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogGraph {
    pub projects: Vec<ProjectDraft>,
    pub seasons: Vec<SeasonDraft>,
    pub events: Vec<EventDraft>,
    pub episodes: Vec<EpisodeDraft>,
    pub video_files: Vec<VideoFileDraft>,
    pub links: Vec<InventoryLink>,
}

impl CatalogGraph {
    /// Video file draft an inventory record was linked to
    pub fn video_for_inventory(&self, inventory_id: &str) -> Option<&VideoFileDraft> {
        self.links
            .iter()
            .find(|link| link.inventory_id == inventory_id)
            .and_then(|link| self.video_files.get(link.video_file))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildStats {
    pub files_processed: usize,
    pub projects_created: usize,
    pub seasons_created: usize,
    pub events_created: usize,
    pub episodes_created: usize,
    pub video_files_created: usize,
    pub links_created: usize,
    pub skipped: usize,
    pub errors: usize,
    pub error_messages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogBuild {
    pub graph: CatalogGraph,
    pub stats: BuildStats,
    pub parse_stats: ParseStats,
}

/// Turns inventory records into a [`CatalogGraph`]
pub struct CatalogBuilder<'a> {
    registry: &'a ParserRegistry,
    titles: TitleGenerator,
    exclude: Vec<Pattern>,
    default_year: i32,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(registry: &'a ParserRegistry) -> Self {
        Self {
            registry,
            titles: TitleGenerator::new(),
            exclude: Vec::new(),
            default_year: DEFAULT_SEASON_YEAR,
        }
    }

    pub fn from_config(registry: &'a ParserRegistry, config: &Config) -> Result<Self> {
        Ok(Self {
            exclude: config.exclude_patterns()?,
            default_year: config.default_year,
            ..Self::new(registry)
        })
    }

    pub fn with_exclude(mut self, patterns: Vec<Pattern>) -> Self {
        self.exclude = patterns;
        self
    }

    pub fn is_excluded(&self, file_path: &str) -> bool {
        let normalized = normalize_path(file_path);
        let options = exclude_match_options();
        self.exclude
            .iter()
            .any(|pattern| pattern.matches_with(&normalized, options))
    }

    /// Build drafts for every catalogable record. Parsing runs in parallel;
    /// assembly is sequential so drafts keep inventory order.
    pub fn build(&self, records: &[InventoryRecord]) -> CatalogBuild {
        let candidates: Vec<&InventoryRecord> = records
            .iter()
            .filter(|r| should_hide_file(&r.file_name).is_none())
            .filter(|r| file_category(&r.extension()) == FileCategory::Video)
            .collect();

        let parsed: Vec<Option<ExtractedMetadata>> = candidates
            .par_iter()
            .map(|record| {
                if self.is_excluded(&record.file_path) {
                    return None;
                }
                let metadata = self.registry.parse(&record.file_name, &record.file_path);
                let (display, short) = self.titles.generate(&metadata);
                Some(metadata.with_titles(display, short))
            })
            .collect();

        let parse_stats = ParseStats::from_records(parsed.iter().flatten());
        let mut assembly = Assembly::new(self.default_year);

        for (record, metadata) in candidates.iter().zip(parsed) {
            assembly.stats.files_processed += 1;

            let Some(metadata) = metadata else {
                debug!("Excluded by pattern: {}", record.file_path);
                assembly.stats.skipped += 1;
                continue;
            };

            if record.file_path.trim().is_empty() {
                warn!("Inventory record {} has no file path", record.id);
                assembly.stats.errors += 1;
                assembly
                    .stats
                    .error_messages
                    .push(format!("{} ({}): empty file path", record.file_name, record.id));
                continue;
            }

            let Some(franchise) = metadata.franchise.clone() else {
                debug!("No franchise for {}, skipping", record.file_name);
                assembly.stats.skipped += 1;
                continue;
            };

            assembly.add(record, &franchise, &metadata);
        }

        let Assembly { graph, stats, .. } = assembly;
        info!(
            "Catalog build: {} files, {} projects, {} seasons, {} events, {} episodes, {} videos ({} skipped, {} errors)",
            stats.files_processed,
            stats.projects_created,
            stats.seasons_created,
            stats.events_created,
            stats.episodes_created,
            stats.video_files_created,
            stats.skipped,
            stats.errors
        );

        CatalogBuild {
            graph,
            stats,
            parse_stats,
        }
    }
}

/// Per-build state; the caches never outlive one `build` call
struct Assembly {
    default_year: i32,
    graph: CatalogGraph,
    stats: BuildStats,
    projects: HashMap<ProjectKey, usize>,
    seasons: HashMap<SeasonKey, usize>,
    events: HashMap<EventKey, usize>,
    episodes: HashMap<EpisodeKey, usize>,
    videos_by_path: HashMap<String, usize>,
}

impl Assembly {
    fn new(default_year: i32) -> Self {
        Self {
            default_year,
            graph: CatalogGraph::default(),
            stats: BuildStats::default(),
            projects: HashMap::new(),
            seasons: HashMap::new(),
            events: HashMap::new(),
            episodes: HashMap::new(),
            videos_by_path: HashMap::new(),
        }
    }

    fn add(&mut self, record: &InventoryRecord, franchise: &Franchise, metadata: &ExtractedMetadata) {
        let project = self.project(franchise);
        let season = self.season(project, metadata);
        let event = self.event(season, metadata);
        let episode = self.episode(event, metadata);
        let video_file = self.video_file(episode, record, metadata);

        self.graph.links.push(InventoryLink {
            inventory_id: record.id.clone(),
            video_file,
        });
        self.stats.links_created += 1;
    }

    fn project(&mut self, franchise: &Franchise) -> usize {
        let key = ProjectKey {
            code: franchise.code().to_string(),
        };
        if let Some(&idx) = self.projects.get(&key) {
            return idx;
        }

        self.graph.projects.push(ProjectDraft {
            code: key.code.clone(),
            name: project_name(franchise),
        });
        self.stats.projects_created += 1;
        let idx = self.graph.projects.len() - 1;
        self.projects.insert(key, idx);
        idx
    }

    fn season(&mut self, project: usize, metadata: &ExtractedMetadata) -> usize {
        let year = metadata.year.unwrap_or(self.default_year);
        let key = SeasonKey { project, year };
        if let Some(&idx) = self.seasons.get(&key) {
            return idx;
        }

        self.graph.seasons.push(SeasonDraft {
            project,
            year,
            name: format!("{year} Season"),
            location: metadata.location.clone(),
        });
        self.stats.seasons_created += 1;
        let idx = self.graph.seasons.len() - 1;
        self.seasons.insert(key, idx);
        idx
    }

    fn event(&mut self, season: usize, metadata: &ExtractedMetadata) -> usize {
        let event_number = metadata.event_number.unwrap_or(1);
        let key = EventKey {
            season,
            event_number,
        };
        if let Some(&idx) = self.events.get(&key) {
            return idx;
        }

        self.graph.events.push(EventDraft {
            season,
            event_number,
            name: metadata
                .event_name
                .clone()
                .unwrap_or_else(|| format!("Event #{event_number}")),
            name_short: metadata.event_name_short.clone(),
            game_type: metadata.game_type.clone(),
            buy_in_amount: metadata.buy_in.as_deref().and_then(parse_amount),
            gtd_amount: metadata.gtd_amount,
        });
        self.stats.events_created += 1;
        let idx = self.graph.events.len() - 1;
        self.events.insert(key, idx);
        idx
    }

    fn episode(&mut self, event: usize, metadata: &ExtractedMetadata) -> usize {
        let episode_number = metadata.episode_number.unwrap_or(1);
        let key = EpisodeKey {
            event,
            episode_number,
            day_number: metadata.day_number,
        };
        if let Some(&idx) = self.episodes.get(&key) {
            return idx;
        }

        let base_title = metadata
            .display_title
            .clone()
            .unwrap_or_else(|| format!("Episode {episode_number}"));
        let title = match metadata.day_number {
            Some(day) => format!("Day {day} - {base_title}"),
            None => base_title,
        };

        self.graph.episodes.push(EpisodeDraft {
            event,
            episode_number,
            day_number: metadata.day_number,
            part_number: metadata.part_number,
            title,
            table_type: metadata.table_type.clone(),
        });
        self.stats.episodes_created += 1;
        let idx = self.graph.episodes.len() - 1;
        self.episodes.insert(key, idx);
        idx
    }

    fn video_file(
        &mut self,
        episode: usize,
        record: &InventoryRecord,
        metadata: &ExtractedMetadata,
    ) -> usize {
        if let Some(&idx) = self.videos_by_path.get(&record.file_path) {
            debug!("Reusing video file draft for {}", record.file_path);
            return idx;
        }

        self.graph.video_files.push(VideoFileDraft {
            episode,
            inventory_id: record.id.clone(),
            file_path: record.file_path.clone(),
            file_name: record.file_name.clone(),
            size_bytes: record.size_bytes,
            extension: record.extension(),
            display_title: metadata.display_title.clone().unwrap_or_default(),
            short_title: metadata.short_title.clone().unwrap_or_default(),
            content_type: metadata.content_type.clone(),
            version: metadata.version.clone(),
            parser: metadata.parser.clone(),
            confidence: metadata.confidence,
        });
        self.stats.video_files_created += 1;
        let idx = self.graph.video_files.len() - 1;
        self.videos_by_path.insert(record.file_path.clone(), idx);
        idx
    }
}
