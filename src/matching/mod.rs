//! Reconciles free-text spreadsheet folder links with inventory paths.
//!
//! The two sources share no key, so both are normalized and compared in
//! three tiers of decreasing confidence: exact, path-prefix, and trailing
//! segment substring.

pub mod path;
pub mod title;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

use crate::error::{CatalogError, Result};
use crate::inventory::InventoryRecord;

pub use path::{extract_filename, extract_folder, is_path_prefix, normalize_path};
pub use title::TitleMatcher;

/// Maximum inventory records indexed per build
pub const DEFAULT_INDEX_LIMIT: usize = 50_000;
/// Minimum confidence a match needs before it is written back
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.8;
/// Trailing segments compared by the fuzzy tier
const FUZZY_SEGMENTS: usize = 3;

/// How a spreadsheet path was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Exact,
    Partial,
    Fuzzy,
    None,
}

/// Confidence per tier. Must stay strictly ordered exact > partial > fuzzy > none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchConfidence {
    pub exact: f64,
    pub partial: f64,
    pub fuzzy: f64,
    pub none: f64,
}

impl Default for MatchConfidence {
    fn default() -> Self {
        Self {
            exact: 1.0,
            partial: 0.8,
            fuzzy: 0.5,
            none: 0.0,
        }
    }
}

impl MatchConfidence {
    pub fn validate(&self) -> Result<()> {
        let ordered = self.exact <= 1.0
            && self.exact > self.partial
            && self.partial > self.fuzzy
            && self.fuzzy > self.none
            && self.none >= 0.0;
        if ordered {
            Ok(())
        } else {
            Err(CatalogError::InvalidConfig(format!(
                "match confidences must satisfy 1 >= exact > partial > fuzzy > none >= 0, got {:?}",
                self
            )))
        }
    }

    pub fn for_tier(&self, tier: MatchTier) -> f64 {
        match tier {
            MatchTier::Exact => self.exact,
            MatchTier::Partial => self.partial,
            MatchTier::Fuzzy => self.fuzzy,
            MatchTier::None => self.none,
        }
    }
}

/// A spreadsheet row reduced to what matching needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalRow {
    pub id: String,
    pub folder_link: Option<String>,
}

impl ExternalRow {
    pub fn new(id: impl Into<String>, folder_link: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            folder_link: Some(folder_link.into()),
        }
    }

    fn link(&self) -> Option<&str> {
        self.folder_link
            .as_deref()
            .filter(|link| !link.trim().is_empty())
    }
}

/// Outcome of one resolution attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Row identifier; empty for ad hoc lookups
    pub external_id: String,
    pub raw_input: String,
    pub normalized_input: String,
    pub inventory_id: Option<String>,
    pub matched_path: Option<String>,
    pub tier: MatchTier,
    pub confidence: f64,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        self.tier != MatchTier::None
    }
}

/// Aggregate counters for one matching run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub exact: usize,
    pub partial: usize,
    pub fuzzy: usize,
    /// Percentage of rows matched at any tier
    pub match_rate: f64,
}

impl MatchStats {
    pub fn from_results(results: &[MatchResult]) -> Self {
        let mut stats = Self {
            total: results.len(),
            ..Self::default()
        };
        for result in results {
            match result.tier {
                MatchTier::Exact => stats.exact += 1,
                MatchTier::Partial => stats.partial += 1,
                MatchTier::Fuzzy => stats.fuzzy += 1,
                MatchTier::None => stats.unmatched += 1,
            }
        }
        stats.matched = stats.exact + stats.partial + stats.fuzzy;
        if stats.total > 0 {
            stats.match_rate = stats.matched as f64 / stats.total as f64 * 100.0;
        }
        stats
    }
}

/// Inventory entry behind an index key
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedFile {
    pub inventory_id: String,
    pub file_path: String,
}

/// Normalized-path index over inventory records.
///
/// Built explicitly before a batch and read-only while resolving; concurrent
/// batches should each own a matcher.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    index: BTreeMap<String, IndexedFile>,
    built: bool,
    limit: usize,
    confidence: MatchConfidence,
}

impl Default for PathMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PathMatcher {
    pub fn new() -> Self {
        Self {
            index: BTreeMap::new(),
            built: false,
            limit: DEFAULT_INDEX_LIMIT,
            confidence: MatchConfidence::default(),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_confidence(mut self, confidence: MatchConfidence) -> Result<Self> {
        confidence.validate()?;
        self.confidence = confidence;
        Ok(self)
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Number of index keys (file and folder entries)
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Rebuild the index from at most `limit` records, returning how many
    /// records were indexed. Each record is keyed by its normalized path and,
    /// unless already taken, by its normalized parent folder.
    pub fn build_index(&mut self, records: &[InventoryRecord]) -> usize {
        self.index.clear();
        let mut indexed = 0;

        for record in records.iter().take(self.limit) {
            let normalized = normalize_path(&record.file_path);
            if normalized.is_empty() {
                debug!("Skipping inventory record {} with blank path", record.id);
                continue;
            }

            let entry = IndexedFile {
                inventory_id: record.id.clone(),
                file_path: record.file_path.clone(),
            };
            let folder = extract_folder(&record.file_path);

            // File keys always win over folder keys
            self.index.insert(normalized, entry.clone());
            self.index.entry(folder).or_insert(entry);
            indexed += 1;
        }

        if records.len() > self.limit {
            warn!(
                "Inventory has {} records; only the first {} were indexed",
                records.len(),
                self.limit
            );
        }

        self.built = true;
        info!(
            "Built path index: {} records, {} keys",
            indexed,
            self.index.len()
        );
        indexed
    }

    /// Resolve one raw path string against the index.
    pub fn resolve(&self, raw: &str) -> Result<MatchResult> {
        if !self.built {
            return Err(CatalogError::IndexNotBuilt);
        }
        Ok(self.resolve_built(String::new(), raw))
    }

    /// Resolve every row with a non-blank folder link, in row order.
    pub fn resolve_all(&self, rows: &[ExternalRow]) -> Result<(Vec<MatchResult>, MatchStats)> {
        if !self.built {
            return Err(CatalogError::IndexNotBuilt);
        }

        let results: Vec<MatchResult> = rows
            .par_iter()
            .filter_map(|row| {
                row.link()
                    .map(|link| self.resolve_built(row.id.clone(), link))
            })
            .collect();

        let stats = MatchStats::from_results(&results);
        info!(
            "Matched {}/{} rows ({:.1}%): {} exact, {} partial, {} fuzzy",
            stats.matched, stats.total, stats.match_rate, stats.exact, stats.partial, stats.fuzzy
        );
        Ok((results, stats))
    }

    fn resolve_built(&self, external_id: String, raw: &str) -> MatchResult {
        let normalized = normalize_path(raw);
        let found = if normalized.is_empty() {
            None
        } else {
            self.lookup(&normalized)
        };

        let (tier, entry) = match found {
            Some((tier, entry)) => (tier, Some(entry)),
            None => (MatchTier::None, None),
        };
        debug!("Resolved {:?} as {:?}", raw, tier);

        MatchResult {
            external_id,
            raw_input: raw.to_string(),
            normalized_input: normalized,
            inventory_id: entry.map(|e| e.inventory_id.clone()),
            matched_path: entry.map(|e| e.file_path.clone()),
            tier,
            confidence: self.confidence.for_tier(tier),
        }
    }

    /// Tiers in order, first hit wins. Partial and fuzzy scan the whole
    /// index, so a lookup is linear in the index size.
    fn lookup(&self, normalized: &str) -> Option<(MatchTier, &IndexedFile)> {
        if let Some(entry) = self.index.get(normalized) {
            return Some((MatchTier::Exact, entry));
        }

        if let Some(entry) = self.index.iter().find_map(|(key, entry)| {
            (is_path_prefix(normalized, key) || is_path_prefix(key, normalized)).then_some(entry)
        }) {
            return Some((MatchTier::Partial, entry));
        }

        let segments: Vec<&str> = normalized.split('/').collect();
        if segments.len() < 2 {
            return None;
        }
        let tail = segments[segments.len().saturating_sub(FUZZY_SEGMENTS)..].join("/");
        self.index
            .iter()
            .find_map(|(key, entry)| key.contains(&tail).then_some(entry))
            .map(|entry| (MatchTier::Fuzzy, entry))
    }
}

/// Persistence-side view of catalog links, supplied by the caller.
pub trait LinkStore {
    /// Catalog entity the inventory record is already linked to
    fn inventory_link(&self, inventory_id: &str) -> Option<String>;

    /// Catalog entity the spreadsheet row already points at
    fn row_link(&self, external_id: &str) -> Option<String>;

    fn set_row_link(&mut self, external_id: &str, catalog_id: String);
}

/// Hash-map backed [`LinkStore`] for batch runs and tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryLinkStore {
    inventory: HashMap<String, String>,
    rows: HashMap<String, String>,
}

impl InMemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link_inventory(&mut self, inventory_id: impl Into<String>, catalog_id: impl Into<String>) {
        self.inventory.insert(inventory_id.into(), catalog_id.into());
    }

    pub fn row_links(&self) -> &HashMap<String, String> {
        &self.rows
    }
}

impl LinkStore for InMemoryLinkStore {
    fn inventory_link(&self, inventory_id: &str) -> Option<String> {
        self.inventory.get(inventory_id).cloned()
    }

    fn row_link(&self, external_id: &str) -> Option<String> {
        self.rows.get(external_id).cloned()
    }

    fn set_row_link(&mut self, external_id: &str, catalog_id: String) {
        self.rows.insert(external_id.to_string(), catalog_id);
    }
}

/// What `apply_matches` did with each result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplyStats {
    pub applied: usize,
    pub below_threshold: usize,
    pub unresolved: usize,
    pub dangling: usize,
    pub already_linked: usize,
}

impl ApplyStats {
    pub fn skipped(&self) -> usize {
        self.below_threshold + self.unresolved + self.dangling + self.already_linked
    }
}

/// Write confident matches back as row links.
///
/// A match is applied only when it meets `min_confidence`, its inventory
/// record is itself linked to a catalog entity, and the row has no link yet.
pub fn apply_matches<S: LinkStore + ?Sized>(
    results: &[MatchResult],
    min_confidence: f64,
    store: &mut S,
) -> ApplyStats {
    let mut stats = ApplyStats::default();

    for result in results {
        if result.confidence < min_confidence {
            stats.below_threshold += 1;
            continue;
        }

        let Some(inventory_id) = result.inventory_id.as_deref() else {
            stats.unresolved += 1;
            continue;
        };

        let Some(catalog_id) = store.inventory_link(inventory_id) else {
            debug!(
                "Inventory record {} has no catalog link; skipping row {}",
                inventory_id, result.external_id
            );
            stats.dangling += 1;
            continue;
        };

        if store.row_link(&result.external_id).is_some() {
            stats.already_linked += 1;
            continue;
        }

        store.set_row_link(&result.external_id, catalog_id);
        stats.applied += 1;
    }

    info!(
        "Applied {} matches at confidence >= {:.2} ({} skipped)",
        stats.applied,
        min_confidence,
        stats.skipped()
    );
    stats
}
