//! Human-readable titles for parsed recordings.
//!
//! Titles are a pure function of the metadata record: no clock, no I/O, so
//! regenerating a catalog yields byte-identical strings.

use crate::metadata::{ExtractedMetadata, Franchise, TableType, GENERIC_VERSION};

/// Franchise code, display name, short-title abbreviation
const FRANCHISES: &[(&str, &str, &str)] = &[
    ("WSOP", "WSOP", "WSOP"),
    ("GGMILLIONS", "GG Millions", "GGM"),
    ("GOG", "Game of Gold", "GOG"),
    ("PAD", "Poker After Dark", "PAD"),
    ("MPP", "MPP", "MPP"),
    ("HCL", "Hustler Casino Live", "HCL"),
];

/// Game-type code to display label
const GAME_TYPES: &[(&str, &str)] = &[
    ("NLHE", "NLH"),
    ("NLH", "NLH"),
    ("PLO", "PLO"),
    ("PLO8", "PLO Hi-Lo"),
    ("HORSE", "HORSE"),
    ("STUD", "Stud"),
    ("RAZZ", "Razz"),
];

const LOCATIONS: &[(&str, &str)] = &[
    ("LOS ANGELES", "LA"),
    ("LAS VEGAS", "LV"),
    ("PARADISE", "PAR"),
    ("EUROPE", "EU"),
    ("CYPRUS", "CYP"),
];

const DISPLAY_TITLE_MAX: usize = 100;
const SHORT_TITLE_MAX: usize = 30;
const LOCATION_MAX: usize = 10;
const DAY_INFO_MAX: usize = 10;

/// Builds `(display_title, short_title)` pairs per franchise convention
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleGenerator;

impl TitleGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, metadata: &ExtractedMetadata) -> (String, String) {
        (self.display_title(metadata), self.short_title(metadata))
    }

    /// Full title, e.g. `WSOP 2024 Event #21 $25K NLH Final Table`
    pub fn display_title(&self, m: &ExtractedMetadata) -> String {
        let parts = match (&m.franchise, m.sub_category()) {
            (Some(Franchise::Pad), _) if m.season_number.is_some() => Self::pad_display(m),
            (Some(Franchise::Gog), _) => Self::gog_display(m),
            (Some(Franchise::GgMillions), _) => Self::ggmillions_display(m),
            (Some(Franchise::Mpp), _) => Self::mpp_display(m),
            (Some(Franchise::Wsop), Some("CIRCUIT")) => Self::circuit_display(m),
            (Some(Franchise::Wsop), Some("ARCHIVE")) => Self::archive_display(m),
            (franchise, _) => Self::standard_display(franchise.as_ref(), m),
        };

        if parts.is_empty() {
            fallback_title(&m.raw_filename, DISPLAY_TITLE_MAX)
        } else {
            parts.join(" ")
        }
    }

    /// Card-sized title, e.g. `WSOP '24 #21 FT`
    pub fn short_title(&self, m: &ExtractedMetadata) -> String {
        let mut parts: Vec<String> = m
            .franchise
            .as_ref()
            .map(|f| franchise_abbreviation(f).to_string())
            .into_iter()
            .collect();

        match (&m.franchise, m.sub_category()) {
            (Some(Franchise::Pad), _) => {
                if let Some(season) = m.season_number {
                    parts.push(format!("S{season}"));
                }
                if let Some(episode) = m.episode_number {
                    parts.push(format!("E{episode:02}"));
                }
            }
            (Some(Franchise::Gog), _) => {
                parts.extend(m.year.map(short_year));
                if let Some(episode) = m.episode_number {
                    parts.push(format!("E{episode:02}"));
                }
                if m.extra_flag("is_final") {
                    parts.push("Final".to_string());
                } else if m.version == "clean" {
                    parts.push("Clean".to_string());
                }
            }
            (Some(Franchise::GgMillions), _) => {
                parts.push("FT".to_string());
                if let Some(first) = m
                    .featured_player
                    .as_deref()
                    .and_then(|p| p.split_whitespace().next())
                {
                    parts.push(format!("({first})"));
                }
            }
            (Some(Franchise::Mpp), _) => {
                parts.extend(m.buy_in.as_deref().map(dollars));
                if m.table_type == Some(TableType::FinalTable) {
                    parts.push("FT".to_string());
                } else if let Some(day) = &m.day_info {
                    parts.push(truncate_chars(day, DAY_INFO_MAX));
                }
            }
            (Some(Franchise::Wsop), Some("CIRCUIT")) => {
                if let Some(location) = &m.location {
                    parts[0] = format!("WSOP-C {}", shorten_location(location));
                }
                if let Some(clip) = m.clip_number {
                    parts.push(format!("#{clip}"));
                }
            }
            _ => {
                parts.extend(m.year.map(short_year));
                if let Some(event) = m.event_number {
                    parts.push(format!("#{event}"));
                }
                parts.extend(m.table_type.as_ref().and_then(table_abbreviation));
            }
        }

        if parts.is_empty() {
            fallback_title(&m.raw_filename, SHORT_TITLE_MAX)
        } else {
            parts.join(" ")
        }
    }

    fn pad_display(m: &ExtractedMetadata) -> Vec<String> {
        let mut parts = Vec::new();
        if let Some(season) = m.season_number {
            parts.push(format!("{} S{season}", franchise_name(&Franchise::Pad)));
        }
        if let Some(episode) = m.episode_number {
            parts.push(format!("Episode {episode}"));
        }
        parts
    }

    fn gog_display(m: &ExtractedMetadata) -> Vec<String> {
        let mut parts = vec![franchise_name(&Franchise::Gog).to_string()];
        parts.extend(m.year.map(|y| y.to_string()));
        if let Some(episode) = m.episode_number {
            parts.push(format!("Episode {episode}"));
        }
        if m.extra_flag("is_final") {
            parts.push("(Final)".to_string());
        } else if m.version == "clean" {
            parts.push("(Clean)".to_string());
        }
        parts
    }

    fn ggmillions_display(m: &ExtractedMetadata) -> Vec<String> {
        let mut parts = vec![format!(
            "{} Super High Roller Final Table",
            franchise_name(&Franchise::GgMillions)
        )];
        if let Some(player) = &m.featured_player {
            parts.push(format!("ft. {player}"));
        }
        if let Some(date) = &m.edit_date {
            parts.push(format!("({date})"));
        }
        parts
    }

    fn mpp_display(m: &ExtractedMetadata) -> Vec<String> {
        let mut parts = vec![franchise_name(&Franchise::Mpp).to_string()];
        parts.extend(m.year.map(|y| y.to_string()));
        parts.extend(m.buy_in.as_deref().map(dollars));
        parts.extend(m.event_name.clone());
        if let Some(day) = &m.day_info {
            parts.push(format!("- {day}"));
        } else if let Some(table) = &m.table_type {
            parts.push(format!("- {}", table_display(table)));
        }
        parts
    }

    fn circuit_display(m: &ExtractedMetadata) -> Vec<String> {
        let mut parts: Vec<String> = m.year.map(|y| y.to_string()).into_iter().collect();
        parts.push("WSOP Circuit".to_string());
        parts.extend(m.location.as_deref().map(shorten_location));
        if let Some(clip) = m.clip_number {
            parts.push(format!("- Clip #{clip}"));
        }
        parts
    }

    fn archive_display(m: &ExtractedMetadata) -> Vec<String> {
        let mut parts = vec![franchise_name(&Franchise::Wsop).to_string()];
        parts.extend(m.year.map(|y| y.to_string()));
        parts.extend(m.event_name.clone());
        if m.version != GENERIC_VERSION {
            parts.push(format!("({})", m.version));
        }
        parts
    }

    /// Franchise name followed by the common tokens: year, event, episode,
    /// buy-in, game and stage
    fn standard_display(franchise: Option<&Franchise>, m: &ExtractedMetadata) -> Vec<String> {
        let mut parts: Vec<String> = franchise
            .map(|f| franchise_name(f).to_string())
            .into_iter()
            .collect();
        parts.extend(m.year.map(|y| y.to_string()));
        if let Some(event) = m.event_number {
            parts.push(format!("Event #{event}"));
        }
        if let Some(episode) = m.episode_number {
            parts.push(format!("Episode {episode}"));
        }
        parts.extend(m.buy_in.as_deref().map(dollars));
        parts.extend(m.game_type.as_deref().map(game_display));
        parts.extend(m.table_type.as_ref().map(table_display));
        parts
    }
}

pub fn franchise_name(franchise: &Franchise) -> &str {
    let code = franchise.code();
    FRANCHISES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, name, _)| *name)
        .unwrap_or(code)
}

pub fn franchise_abbreviation(franchise: &Franchise) -> &str {
    let code = franchise.code();
    FRANCHISES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, _, abbrev)| *abbrev)
        .unwrap_or(code)
}

pub fn game_display(game: &str) -> String {
    let upper = game.to_uppercase();
    GAME_TYPES
        .iter()
        .find(|(code, _)| *code == upper)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| game.to_string())
}

pub fn table_display(table: &TableType) -> String {
    match table {
        TableType::FinalTable => "Final Table".to_string(),
        TableType::HeadsUp => "Heads Up".to_string(),
        TableType::Day(n) => format!("Day {n}"),
        TableType::Preliminary => "Preliminary".to_string(),
        TableType::Other(raw) => raw.clone(),
    }
}

fn table_abbreviation(table: &TableType) -> Option<String> {
    match table {
        TableType::FinalTable => Some("FT".to_string()),
        TableType::HeadsUp => Some("HU".to_string()),
        TableType::Day(n) => Some(format!("D{n}")),
        TableType::Preliminary => Some("PRE".to_string()),
        TableType::Other(_) => None,
    }
}

/// Known venues get their abbreviation; others are cut to ten characters.
pub fn shorten_location(location: &str) -> String {
    let upper = location.trim().to_uppercase();
    LOCATIONS
        .iter()
        .find(|(name, _)| *name == upper)
        .map(|(_, short)| short.to_string())
        .unwrap_or_else(|| truncate_chars(location, LOCATION_MAX))
}

fn dollars(buy_in: &str) -> String {
    let upper = buy_in.to_uppercase();
    if upper.starts_with('$') {
        upper
    } else {
        format!("${upper}")
    }
}

fn short_year(year: i32) -> String {
    format!("'{:02}", year.rem_euclid(100))
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Title derived from the filename alone: extension stripped, separators
/// turned into spaces, words title-cased, capped at `max` characters.
/// A bare extension such as `.mp4` has an empty stem and yields `""`.
pub fn fallback_title(filename: &str, max: usize) -> String {
    let stem = filename.rsplit_once('.').map_or(filename, |(stem, _)| stem);

    let title = stem
        .replace(['_', '-'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    truncate_chars(&title, max).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParserRegistry;

    fn titles_for(filename: &str) -> (String, String) {
        let registry = ParserRegistry::new().unwrap();
        TitleGenerator::new().generate(&registry.parse(filename, ""))
    }

    #[test]
    fn test_wsop_bracelet_titles() {
        let (display, short) =
            titles_for("10-wsop-2024-be-ev-21-25k-nlh-hr-ft-schutten-reclaims-chip-lead.mp4");
        assert_eq!(display, "WSOP 2024 Event #21 $25K NLH Final Table");
        assert_eq!(short, "WSOP '24 #21 FT");
    }

    #[test]
    fn test_wsop_circuit_titles() {
        let (display, short) = titles_for("WCLA24-15.mp4");
        assert_eq!(display, "2024 WSOP Circuit LA - Clip #15");
        assert_eq!(short, "WSOP-C LA #15");
    }

    #[test]
    fn test_wsop_archive_titles() {
        let (display, short) = titles_for("wsop-1973-me-nobug.mp4");
        assert_eq!(display, "WSOP 1973 Main Event (nobug)");
        assert_eq!(short, "WSOP '73");
    }

    #[test]
    fn test_show_titles() {
        assert_eq!(
            titles_for("E01_GOG_final_edit_231106.mp4"),
            (
                "Game of Gold 2023 Episode 1".to_string(),
                "GOG '23 E01".to_string()
            )
        );
        assert_eq!(
            titles_for("E05_GOG_final_edit_클린본_240315.mp4").1,
            "GOG '24 E05 Clean"
        );
        assert_eq!(
            titles_for("pad-s12-ep01-12345.mp4"),
            (
                "Poker After Dark S12 Episode 1".to_string(),
                "PAD S12 E01".to_string()
            )
        );
        assert_eq!(
            titles_for("250507_Super High Roller Poker FINAL TABLE with Joey Ingram.mp4"),
            (
                "GG Millions Super High Roller Final Table ft. Joey Ingram (2025-05-07)"
                    .to_string(),
                "GGM FT (Joey)".to_string()
            )
        );
        assert_eq!(
            titles_for("$1M GTD   $1K PokerOK Mystery Bounty ? Day 1A.mp4"),
            (
                "MPP 2025 $1K PokerOK Mystery Bounty - Day 1A".to_string(),
                "MPP $1K Day 1A".to_string()
            )
        );
    }

    #[test]
    fn test_fallback_titles() {
        let (display, short) = titles_for("random_video.mp4");
        assert_eq!(display, "Random Video");
        assert_eq!(short, "Random Video");

        let long_name = format!("{}.mp4", "very_long-name_".repeat(12));
        let (display, short) = titles_for(&long_name);
        assert!(display.chars().count() <= 100);
        assert!(short.chars().count() <= 30);
        assert!(short.starts_with("Very Long Name"));
    }

    #[test]
    fn test_fallback_title_strips_bare_extension() {
        assert_eq!(fallback_title(".mp4", DISPLAY_TITLE_MAX), "");
        assert_eq!(fallback_title("__-.mov", SHORT_TITLE_MAX), "");
        assert_eq!(fallback_title("no_extension", DISPLAY_TITLE_MAX), "No Extension");
        assert_eq!(fallback_title("final.table.mp4", DISPLAY_TITLE_MAX), "Final.table");

        let (display, short) = titles_for(".mp4");
        assert_eq!(display, "");
        assert_eq!(short, "");
    }

    #[test]
    fn test_unknown_franchise_echoes_code() {
        let metadata = ExtractedMetadata {
            franchise: Some(Franchise::from_code("EPT")),
            year: Some(2022),
            table_type: Some(TableType::Day(2)),
            ..ExtractedMetadata::base("generic", "ept.mp4", "/ept/ept.mp4")
        };
        let (display, short) = TitleGenerator::new().generate(&metadata);
        assert_eq!(display, "EPT 2022 Day 2");
        assert_eq!(short, "EPT '22 D2");
    }

    #[test]
    fn test_titles_are_deterministic() {
        let registry = ParserRegistry::new().unwrap();
        let generator = TitleGenerator::new();
        for name in [
            "10-wsop-2024-be-ev-21-25k-nlh-hr-ft-schutten-reclaims-chip-lead.mp4",
            "E07_GOG_final_edit_20231121_최종.mp4",
            "random_video.mp4",
        ] {
            let record = registry.parse(name, "");
            assert_eq!(generator.generate(&record), generator.generate(&record.clone()));
        }
    }

    #[test]
    fn test_shorten_location() {
        assert_eq!(shorten_location("Los Angeles"), "LA");
        assert_eq!(shorten_location("LAS VEGAS"), "LV");
        assert_eq!(shorten_location("Monte Carlo Bay"), "Monte Carl");
    }

    #[test]
    fn test_display_not_shorter_than_short() {
        let (display, short) = titles_for("WCLA24-15.mp4");
        assert!(display.len() >= short.len());
    }
}
