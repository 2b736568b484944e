//! Filename metadata extraction.
//!
//! Each franchise names its files differently, so extraction is a chain of
//! [`FilenameParser`] strategies held by a [`ParserRegistry`] in fixed
//! priority order. The first parser that claims a filename produces the
//! record; the generic fallback claims everything, so dispatch is total.

pub mod generic;
pub mod shows;
pub mod wsop;

use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::metadata::ExtractedMetadata;

pub use generic::GenericParser;
pub use shows::{GgMillionsParser, GogParser, MppParser, PadParser};
pub use wsop::{ArchiveParser, BraceletParser, CircuitParser};

/// Confidence assigned by each parser outcome.
///
/// Specialized matches rank above path-only inference, which ranks above the
/// generic fallback. Failed parses stay below 0.3.
pub mod confidence {
    pub const BRACELET: f64 = 0.95;
    pub const CIRCUIT: f64 = 0.9;
    pub const ARCHIVE_PATTERN: f64 = 0.85;
    pub const ARCHIVE_PATH_YEAR: f64 = 0.4;
    pub const ARCHIVE_PATH_ONLY: f64 = 0.2;
    pub const GG_DATED: f64 = 0.9;
    pub const GG_UNDATED: f64 = 0.85;
    pub const GOG_LONG_DATE: f64 = 0.95;
    pub const GOG_SHORT_DATE: f64 = 0.88;
    pub const PAD_LEGACY: f64 = 0.92;
    pub const PAD_MODERN: f64 = 0.87;
    pub const MPP: f64 = 0.85;
    pub const GENERIC_FRANCHISE_AND_YEAR: f64 = 0.45;
    pub const GENERIC_PARTIAL: f64 = 0.3;
    pub const GENERIC_BARE: f64 = 0.2;
    /// Specialized parser claimed the file but its pattern did not match
    pub const PATTERN_MISS: f64 = 0.25;
}

/// A franchise naming convention.
///
/// `can_handle` is a cheap claim check; `parse` always returns a record and
/// reports pattern misses through `success == false` instead of failing.
pub trait FilenameParser: Send + Sync {
    /// Stable identifier recorded in [`ExtractedMetadata::parser`]
    fn name(&self) -> &'static str;

    fn can_handle(&self, filename: &str, path: &str) -> bool;

    fn parse(&self, filename: &str, path: &str) -> ExtractedMetadata;
}

/// Ordered parser chain, built once and shared read-only.
pub struct ParserRegistry {
    parsers: Vec<Box<dyn FilenameParser>>,
    fallback: GenericParser,
}

impl ParserRegistry {
    /// Registry with the standard priority order: bracelet, circuit,
    /// archive, GG Millions, Game of Gold, Poker After Dark, MPP, generic.
    pub fn new() -> Result<Self, regex::Error> {
        let parsers: Vec<Box<dyn FilenameParser>> = vec![
            Box::new(BraceletParser::new()?),
            Box::new(CircuitParser::new()?),
            Box::new(ArchiveParser::new()?),
            Box::new(GgMillionsParser::new()?),
            Box::new(GogParser::new()?),
            Box::new(PadParser::new()?),
            Box::new(MppParser::new()?),
            Box::new(GenericParser::new()?),
        ];
        Self::with_parsers(parsers)
    }

    /// Registry over a caller-chosen order. A generic fallback is always
    /// consulted after the list, so selection stays total.
    pub fn with_parsers(parsers: Vec<Box<dyn FilenameParser>>) -> Result<Self, regex::Error> {
        Ok(Self {
            parsers,
            fallback: GenericParser::new()?,
        })
    }

    /// First parser in priority order that claims the input.
    pub fn select_parser(&self, filename: &str, path: &str) -> &dyn FilenameParser {
        self.parsers
            .iter()
            .map(|parser| parser.as_ref())
            .find(|parser| parser.can_handle(filename, path))
            .unwrap_or(&self.fallback)
    }

    pub fn parse(&self, filename: &str, path: &str) -> ExtractedMetadata {
        let parser = self.select_parser(filename, path);
        let record = parser.parse(filename, path);
        debug!(
            "Parsed {:?} with {} (success: {}, confidence: {:.2})",
            filename,
            parser.name(),
            record.success,
            record.confidence
        );
        record
    }

    /// Parse many `(filename, path)` pairs in parallel, keeping input order.
    pub fn parse_batch<S: AsRef<str> + Sync>(&self, inputs: &[(S, S)]) -> Vec<ExtractedMetadata> {
        inputs
            .par_iter()
            .map(|(filename, path)| self.parse(filename.as_ref(), path.as_ref()))
            .collect()
    }

    pub fn parsers(&self) -> impl Iterator<Item = &dyn FilenameParser> {
        self.parsers.iter().map(|parser| parser.as_ref())
    }

    pub fn parser_by_name(&self, name: &str) -> Option<&dyn FilenameParser> {
        self.parsers().find(|parser| parser.name() == name)
    }
}

/// Per-parser tallies over a batch of parse results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseStats {
    pub total: usize,
    pub succeeded: usize,
    pub by_parser: BTreeMap<String, ParserTally>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParserTally {
    pub total: usize,
    pub succeeded: usize,
}

impl ParseStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ExtractedMetadata>) -> Self {
        let mut stats = Self::default();
        for record in records {
            stats.total += 1;
            let tally = stats.by_parser.entry(record.parser.clone()).or_default();
            tally.total += 1;
            if record.success {
                stats.succeeded += 1;
                tally.succeeded += 1;
            }
        }
        stats
    }

    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.succeeded as f64 / self.total as f64 * 100.0
    }
}

/// Canonical game-type code; unknown games pass through upper-cased.
pub fn normalize_game_type(raw: &str) -> String {
    match raw.trim().to_lowercase().as_str() {
        "nlh" | "nlhe" => "NLHE".to_string(),
        "plo" => "PLO".to_string(),
        "plo8" => "PLO8".to_string(),
        "horse" => "HORSE".to_string(),
        "stud" => "Stud".to_string(),
        "razz" => "Razz".to_string(),
        _ => raw.trim().to_uppercase(),
    }
}

/// Expand a `K`/`M` suffixed amount (`25K`, `1M`, `2.5K`, `$1,500`).
/// Anything else, including a `B` suffix, yields `None`.
pub fn parse_amount(raw: &str) -> Option<u64> {
    let cleaned = raw.trim().trim_start_matches('$').replace(',', "").to_uppercase();
    let (digits, multiplier) = if let Some(rest) = cleaned.strip_suffix('K') {
        (rest, 1_000.0)
    } else if let Some(rest) = cleaned.strip_suffix('M') {
        (rest, 1_000_000.0)
    } else {
        (cleaned.as_str(), 1.0)
    };

    let value: f64 = digits.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * multiplier).round() as u64)
}

/// Version tag derived from filename markers and enclosing folders
pub fn detect_version_type(path: &str, filename: &str) -> &'static str {
    let name_lower = filename.to_lowercase();
    let path_lower = path.replace('\\', "/").to_lowercase();

    if name_lower.contains("-clean") || filename.contains("클린본") {
        "clean"
    } else if path_lower.contains("/mastered/") {
        "mastered"
    } else if path_lower.contains("/stream/") {
        "stream"
    } else if path_lower.contains("/subclip/") {
        "subclip"
    } else if name_lower.contains("final_edit") {
        "final_edit"
    } else if name_lower.contains("-nobug") {
        "nobug"
    } else if name_lower.contains("pgm") {
        "pgm"
    } else if name_lower.contains("hires") {
        "hires"
    } else {
        crate::metadata::GENERIC_VERSION
    }
}

/// Why a file should be hidden from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HiddenReason {
    MacosMetadata,
    WindowsThumbnail,
    MacosSystem,
}

pub fn should_hide_file(filename: &str) -> Option<HiddenReason> {
    if filename.starts_with("._") {
        Some(HiddenReason::MacosMetadata)
    } else if filename.eq_ignore_ascii_case("thumbs.db") {
        Some(HiddenReason::WindowsThumbnail)
    } else if filename == ".DS_Store" {
        Some(HiddenReason::MacosSystem)
    } else {
        None
    }
}

/// Coarse file category by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileCategory {
    Video,
    Archive,
    Metadata,
    Other,
}

/// Categorize an extension, with or without the leading dot.
pub fn file_category(extension: &str) -> FileCategory {
    let ext = extension.trim_start_matches('.').to_lowercase();
    match ext.as_str() {
        "mp4" | "mov" | "mxf" | "avi" | "mkv" | "wmv" => FileCategory::Video,
        "zip" | "rar" | "7z" | "tar" | "gz" => FileCategory::Archive,
        "xml" | "json" | "txt" | "srt" => FileCategory::Metadata,
        _ => FileCategory::Other,
    }
}

/// Best-effort year finder shared by the archive and generic parsers.
#[derive(Debug, Clone)]
pub(crate) struct YearExtractor {
    four_digit: Regex,
}

impl YearExtractor {
    pub(crate) fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            four_digit: Regex::new(r"(19|20)[0-9]{2}")?,
        })
    }

    /// A 19xx/20xx year anywhere in the text, else the first standalone
    /// two-digit number read as 20xx below 50 and 19xx otherwise.
    pub(crate) fn extract(&self, text: &str) -> Option<i32> {
        if let Some(found) = self.four_digit.find(text) {
            return found.as_str().parse().ok();
        }

        let bytes = text.as_bytes();
        let mut start = None;
        for (i, b) in bytes.iter().enumerate().chain(std::iter::once((bytes.len(), &b' '))) {
            match (b.is_ascii_digit(), start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    if i - s == 2 {
                        let year: i32 = text[s..i].parse().ok()?;
                        return Some(if year < 50 { 2000 + year } else { 1900 + year });
                    }
                    start = None;
                }
                _ => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Franchise;

    #[test]
    fn test_registry_order() {
        let registry = ParserRegistry::new().unwrap();
        let names: Vec<_> = registry.parsers().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec![
                "wsop_bracelet",
                "wsop_circuit",
                "wsop_archive",
                "ggmillions",
                "gog",
                "pad",
                "mpp",
                "generic"
            ]
        );
        assert!(registry.parser_by_name("gog").is_some());
        assert!(registry.parser_by_name("nope").is_none());
    }

    #[test]
    fn test_select_parser_is_total() {
        let registry = ParserRegistry::new().unwrap();
        for (name, path) in [("", ""), ("???", "\\\\"), ("random_video.mp4", "")] {
            let parser = registry.select_parser(name, path);
            assert_eq!(parser.name(), "generic");
        }
    }

    #[test]
    fn test_custom_registry_falls_back() {
        let registry = ParserRegistry::with_parsers(vec![Box::new(GogParser::new().unwrap())])
            .unwrap();
        let record = registry.parse("random_video.mp4", "");
        assert_eq!(record.parser, "generic");
        assert!(record.success);
    }

    #[test]
    fn test_tie_break_prefers_earlier_parser() {
        // Bracelet pattern and the archive folder hint both claim this file
        let registry = ParserRegistry::new().unwrap();
        let filename = "10-wsop-2024-be-ev-21-25k-nlh-hr-ft-schutten-reclaims-chip-lead.mp4";
        let path = "/nas/WSOP/ARCHIVE/2024/";
        assert!(registry
            .parser_by_name("wsop_archive")
            .unwrap()
            .can_handle(filename, path));
        assert_eq!(registry.select_parser(filename, path).name(), "wsop_bracelet");
        assert_eq!(registry.parse(filename, path).event_number, Some(21));
    }

    #[test]
    fn test_parse_batch_keeps_order() {
        let registry = ParserRegistry::new().unwrap();
        let inputs = vec![
            ("WCLA24-15.mp4".to_string(), String::new()),
            ("E01_GOG_final_edit_231106.mp4".to_string(), String::new()),
            ("random_video.mp4".to_string(), String::new()),
        ];
        let records = registry.parse_batch(&inputs);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].parser, "wsop_circuit");
        assert_eq!(records[1].franchise, Some(Franchise::Gog));
        assert_eq!(records[2].parser, "generic");

        let stats = ParseStats::from_records(&records);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.succeeded, 3);
        assert_eq!(stats.by_parser["gog"].total, 1);
        assert!((stats.success_rate() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_game_type() {
        assert_eq!(normalize_game_type("nlh"), "NLHE");
        assert_eq!(normalize_game_type("NLHE"), "NLHE");
        assert_eq!(normalize_game_type("plo8"), "PLO8");
        assert_eq!(normalize_game_type("mixed"), "MIXED");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("25K"), Some(25_000));
        assert_eq!(parse_amount("1m"), Some(1_000_000));
        assert_eq!(parse_amount("1500"), Some(1_500));
        assert_eq!(parse_amount("$1,500"), Some(1_500));
        assert_eq!(parse_amount("2.5K"), Some(2_500));
        assert_eq!(parse_amount("1B"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_detect_version_type() {
        assert_eq!(detect_version_type("", "wsop-2024-clean.mp4"), "clean");
        assert_eq!(detect_version_type("", "E05_GOG_클린본.mp4"), "clean");
        assert_eq!(
            detect_version_type("\\\\nas\\WSOP\\Mastered\\2024", "a.mp4"),
            "mastered"
        );
        assert_eq!(detect_version_type("/x/stream/y", "a.mp4"), "stream");
        assert_eq!(detect_version_type("", "ep1-nobug.mp4"), "nobug");
        assert_eq!(detect_version_type("", "plain.mp4"), "generic");
    }

    #[test]
    fn test_should_hide_file() {
        assert_eq!(
            should_hide_file("._video.mp4"),
            Some(HiddenReason::MacosMetadata)
        );
        assert_eq!(
            should_hide_file("Thumbs.db"),
            Some(HiddenReason::WindowsThumbnail)
        );
        assert_eq!(should_hide_file(".DS_Store"), Some(HiddenReason::MacosSystem));
        assert_eq!(should_hide_file("video.mp4"), None);
    }

    #[test]
    fn test_file_category() {
        assert_eq!(file_category(".MP4"), FileCategory::Video);
        assert_eq!(file_category("mxf"), FileCategory::Video);
        assert_eq!(file_category(".zip"), FileCategory::Archive);
        assert_eq!(file_category("srt"), FileCategory::Metadata);
        assert_eq!(file_category(""), FileCategory::Other);
    }

    #[test]
    fn test_year_extractor() {
        let years = YearExtractor::new().unwrap();
        assert_eq!(years.extract("/nas/WSOP/1998/final"), Some(1998));
        assert_eq!(years.extract("clip_24_final"), Some(2024));
        assert_eq!(years.extract("season 87"), Some(1987));
        assert_eq!(years.extract("random_video.mp4"), None);
        assert_eq!(years.extract("h264 encode"), None);
        assert_eq!(years.extract("ends with 07"), Some(2007));
    }
}
