use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tournament or show brand a file belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Franchise {
    Wsop,
    Pad,
    Gog,
    Mpp,
    GgMillions,
    Hcl,
    /// Any code without a dedicated naming convention
    Other(String),
}

impl Franchise {
    /// Resolve a franchise from its short code. Bracelet/circuit sub-brands
    /// collapse onto WSOP; sub-categories are carried in the extension map.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "WSOP" | "WSOP_BRACELET" | "WSOP_CIRCUIT" | "WSOP_ARCHIVE" => Franchise::Wsop,
            "PAD" => Franchise::Pad,
            "GOG" => Franchise::Gog,
            "MPP" => Franchise::Mpp,
            "GGMILLIONS" | "GGM" => Franchise::GgMillions,
            "HCL" => Franchise::Hcl,
            other => Franchise::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Franchise::Wsop => "WSOP",
            Franchise::Pad => "PAD",
            Franchise::Gog => "GOG",
            Franchise::Mpp => "MPP",
            Franchise::GgMillions => "GGMILLIONS",
            Franchise::Hcl => "HCL",
            Franchise::Other(code) => code,
        }
    }
}

impl fmt::Display for Franchise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<String> for Franchise {
    fn from(code: String) -> Self {
        Franchise::from_code(&code)
    }
}

impl From<Franchise> for String {
    fn from(franchise: Franchise) -> Self {
        franchise.code().to_string()
    }
}

/// Table or stage of a tournament a recording covers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TableType {
    FinalTable,
    HeadsUp,
    /// Day 1 through day 3
    Day(u8),
    Preliminary,
    /// Unrecognized token, kept lower-cased
    Other(String),
}

impl TableType {
    /// Normalize a filename token. Unknown tokens pass through lower-cased.
    pub fn from_token(raw: &str) -> Self {
        let token = raw.trim().to_lowercase();
        match token.as_str() {
            "ft" | "final" | "final_table" => TableType::FinalTable,
            "hu" | "headsup" | "heads_up" => TableType::HeadsUp,
            "d1" | "day1" => TableType::Day(1),
            "d2" | "day2" => TableType::Day(2),
            "d3" | "day3" => TableType::Day(3),
            "prelim" | "preliminary" => TableType::Preliminary,
            _ => TableType::Other(token),
        }
    }

    /// Recognize a stage marker token, returning `None` for plain words.
    pub fn from_marker(raw: &str) -> Option<Self> {
        match Self::from_token(raw) {
            TableType::Other(_) => None,
            known => Some(known),
        }
    }

    pub fn code(&self) -> String {
        match self {
            TableType::FinalTable => "final_table".to_string(),
            TableType::HeadsUp => "heads_up".to_string(),
            TableType::Day(n) => format!("day{n}"),
            TableType::Preliminary => "preliminary".to_string(),
            TableType::Other(raw) => raw.clone(),
        }
    }
}

impl From<String> for TableType {
    fn from(raw: String) -> Self {
        TableType::from_token(&raw)
    }
}

impl From<TableType> for String {
    fn from(table: TableType) -> Self {
        table.code()
    }
}

/// Default version tag for records without a recognizable edit marker
pub const GENERIC_VERSION: &str = "generic";

/// Structured record produced by a filename parser.
///
/// Records are built once by a parser and only read afterwards; later stages
/// derive new values (titles, catalog drafts) instead of mutating them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMetadata {
    pub franchise: Option<Franchise>,
    pub year: Option<i32>,
    pub version: String,

    pub event_number: Option<u32>,
    pub buy_in: Option<String>,
    pub game_type: Option<String>,
    pub table_type: Option<TableType>,
    pub clip_number: Option<u32>,
    pub location: Option<String>,

    pub episode_number: Option<u32>,
    pub season_number: Option<u32>,
    pub day_number: Option<u32>,
    pub day_info: Option<String>,
    pub part_number: Option<u32>,

    pub featured_player: Option<String>,
    pub edit_date: Option<String>,
    pub event_name: Option<String>,
    pub event_name_short: Option<String>,
    pub gtd_amount: Option<u64>,
    pub description: Option<String>,

    pub display_title: Option<String>,
    pub short_title: Option<String>,
    pub content_type: Option<String>,

    pub raw_filename: String,
    /// Never empty: falls back to the filename when no path was supplied
    pub raw_path: String,
    pub success: bool,
    pub parser: String,
    pub confidence: f64,

    /// Franchise-specific extras (sub_category, version_code, is_final, ...)
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ExtractedMetadata {
    /// Empty record attributed to `parser`, ready for struct-update syntax.
    pub fn base(parser: &str, filename: &str, path: &str) -> Self {
        let raw_path = if path.trim().is_empty() {
            filename.to_string()
        } else {
            path.to_string()
        };

        Self {
            franchise: None,
            year: None,
            version: GENERIC_VERSION.to_string(),
            event_number: None,
            buy_in: None,
            game_type: None,
            table_type: None,
            clip_number: None,
            location: None,
            episode_number: None,
            season_number: None,
            day_number: None,
            day_info: None,
            part_number: None,
            featured_player: None,
            edit_date: None,
            event_name: None,
            event_name_short: None,
            gtd_amount: None,
            description: None,
            display_title: None,
            short_title: None,
            content_type: None,
            raw_filename: filename.to_string(),
            raw_path,
            success: false,
            parser: parser.to_string(),
            confidence: 0.0,
            extra: BTreeMap::new(),
        }
    }

    /// Record for input the parser claimed but could not fully match.
    /// Confidence is clamped below 0.3 so failed parses never rank as usable.
    pub fn unmatched(
        parser: &str,
        filename: &str,
        path: &str,
        franchise: Option<Franchise>,
        confidence: f64,
    ) -> Self {
        Self {
            franchise,
            success: false,
            confidence: confidence.clamp(0.0, MAX_FAILED_CONFIDENCE),
            ..Self::base(parser, filename, path)
        }
    }

    /// Copy of this record carrying generated titles.
    pub fn with_titles(self, display_title: String, short_title: String) -> Self {
        Self {
            display_title: Some(display_title),
            short_title: Some(short_title),
            ..self
        }
    }

    pub fn franchise_code(&self) -> Option<&str> {
        self.franchise.as_ref().map(Franchise::code)
    }

    /// Sub-category recorded in the extension map, e.g. CIRCUIT or ARCHIVE
    pub fn sub_category(&self) -> Option<&str> {
        self.extra.get("sub_category").and_then(|v| v.as_str())
    }

    pub fn extra_flag(&self, key: &str) -> bool {
        self.extra
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

/// Ceiling for the confidence of a record with `success == false`
pub const MAX_FAILED_CONFIDENCE: f64 = 0.29;
