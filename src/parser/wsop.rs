//! World Series of Poker naming conventions

use regex::Regex;
use serde_json::Value;

use super::{confidence, normalize_game_type, FilenameParser, YearExtractor};
use crate::metadata::{ExtractedMetadata, Franchise, TableType, GENERIC_VERSION};

/// Bracelet event clips.
///
/// `{clip}-wsop-{year}-be-ev-{event}-{buyin}-{game}-{free text}.mp4`, e.g.
/// `10-wsop-2024-be-ev-21-25k-nlh-hr-ft-schutten-reclaims-chip-lead.mp4`
#[derive(Debug, Clone)]
pub struct BraceletParser {
    pattern: Regex,
}

impl BraceletParser {
    pub const NAME: &'static str = "wsop_bracelet";

    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(
                r"(?i)^([0-9]+)-wsop-([0-9]{4})-be-ev-([0-9]+)-([0-9]+k?)-([a-z0-9]+)-(.+)\.(mp4|mov|mxf)$",
            )?,
        })
    }
}

impl FilenameParser for BraceletParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn can_handle(&self, filename: &str, _path: &str) -> bool {
        self.pattern.is_match(filename)
    }

    fn parse(&self, filename: &str, path: &str) -> ExtractedMetadata {
        let Some(caps) = self.pattern.captures(filename) else {
            return ExtractedMetadata::unmatched(
                Self::NAME,
                filename,
                path,
                Some(Franchise::Wsop),
                confidence::PATTERN_MISS,
            );
        };

        // Free text mixes stage markers with a slugged headline
        let mut table_type = None;
        let mut high_roller = false;
        let mut description = Vec::new();
        for token in caps[6].to_lowercase().split('-') {
            if token == "hr" {
                high_roller = true;
            } else if let Some(stage) = TableType::from_marker(token) {
                table_type = Some(stage);
            } else if !token.is_empty() {
                description.push(token.to_string());
            }
        }

        let mut record = ExtractedMetadata {
            franchise: Some(Franchise::Wsop),
            year: caps[2].parse().ok(),
            event_number: caps[3].parse().ok(),
            buy_in: Some(caps[4].to_uppercase()),
            game_type: Some(normalize_game_type(&caps[5])),
            table_type,
            clip_number: caps[1].parse().ok(),
            location: Some("LAS VEGAS".to_string()),
            description: (!description.is_empty()).then(|| description.join("-")),
            success: true,
            confidence: confidence::BRACELET,
            ..ExtractedMetadata::base(Self::NAME, filename, path)
        };
        if high_roller {
            record
                .extra
                .insert("high_roller".to_string(), Value::Bool(true));
        }
        record
    }
}

/// Circuit stop clips: `WCLA{yy}-{clip}.mp4`
#[derive(Debug, Clone)]
pub struct CircuitParser {
    pattern: Regex,
}

impl CircuitParser {
    pub const NAME: &'static str = "wsop_circuit";

    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(r"(?i)^WCLA([0-9]{2})-([0-9]+)\.(mp4|mov)$")?,
        })
    }
}

impl FilenameParser for CircuitParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn can_handle(&self, filename: &str, _path: &str) -> bool {
        self.pattern.is_match(filename)
    }

    fn parse(&self, filename: &str, path: &str) -> ExtractedMetadata {
        let Some(caps) = self.pattern.captures(filename) else {
            return ExtractedMetadata::unmatched(
                Self::NAME,
                filename,
                path,
                Some(Franchise::Wsop),
                confidence::PATTERN_MISS,
            );
        };

        let mut record = ExtractedMetadata {
            franchise: Some(Franchise::Wsop),
            year: caps[1].parse::<i32>().ok().map(|yy| 2000 + yy),
            clip_number: caps[2].parse().ok(),
            location: Some("LOS ANGELES".to_string()),
            success: true,
            confidence: confidence::CIRCUIT,
            ..ExtractedMetadata::base(Self::NAME, filename, path)
        };
        record
            .extra
            .insert("sub_category".to_string(), Value::from("CIRCUIT"));
        record
    }
}

/// Pre-2016 archive footage: `wsop-{year}-{me|epN}[-{version}].mp4`.
///
/// Also claims anything stored under an ARCHIVE folder, inferring the year
/// from the path when the filename itself is unstructured.
#[derive(Debug, Clone)]
pub struct ArchiveParser {
    pattern: Regex,
    years: YearExtractor,
}

impl ArchiveParser {
    pub const NAME: &'static str = "wsop_archive";

    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(r"(?i)^wsop-([0-9]{4})-(me|ep[0-9]+)(?:-([a-z]+))?\.(mp4|mov|avi)$")?,
            years: YearExtractor::new()?,
        })
    }
}

impl FilenameParser for ArchiveParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn can_handle(&self, filename: &str, path: &str) -> bool {
        self.pattern.is_match(filename) || path.to_uppercase().contains("ARCHIVE")
    }

    fn parse(&self, filename: &str, path: &str) -> ExtractedMetadata {
        let mut record = match self.pattern.captures(filename) {
            Some(caps) => {
                let event_type = &caps[2];
                ExtractedMetadata {
                    franchise: Some(Franchise::Wsop),
                    year: caps[1].parse().ok(),
                    event_name: Some(if event_type.eq_ignore_ascii_case("me") {
                        "Main Event".to_string()
                    } else {
                        event_type.to_string()
                    }),
                    version: caps
                        .get(3)
                        .map(|m| m.as_str().to_lowercase())
                        .unwrap_or_else(|| GENERIC_VERSION.to_string()),
                    success: true,
                    confidence: confidence::ARCHIVE_PATTERN,
                    ..ExtractedMetadata::base(Self::NAME, filename, path)
                }
            }
            None => match self.years.extract(path) {
                Some(year) => ExtractedMetadata {
                    franchise: Some(Franchise::Wsop),
                    year: Some(year),
                    success: true,
                    confidence: confidence::ARCHIVE_PATH_YEAR,
                    ..ExtractedMetadata::base(Self::NAME, filename, path)
                },
                None => ExtractedMetadata::unmatched(
                    Self::NAME,
                    filename,
                    path,
                    Some(Franchise::Wsop),
                    confidence::ARCHIVE_PATH_ONLY,
                ),
            },
        };
        record
            .extra
            .insert("sub_category".to_string(), Value::from("ARCHIVE"));
        record
    }
}
