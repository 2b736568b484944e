//! Naming conventions of the non-WSOP shows and series

use regex::{Captures, Regex};
use serde_json::Value;

use super::{confidence, parse_amount, FilenameParser};
use crate::metadata::{ExtractedMetadata, Franchise, TableType, GENERIC_VERSION};

/// GG Millions Super High Roller final tables.
///
/// `[{yymmdd}_]Super High Roller Poker FINAL TABLE with {player}.mp4`
#[derive(Debug, Clone)]
pub struct GgMillionsParser {
    pattern: Regex,
}

impl GgMillionsParser {
    pub const NAME: &'static str = "ggmillions";

    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(
                r"(?i)^([0-9]{6})?_?Super High Roller Poker FINAL TABLE with (.+)\.(mp4|mov)$",
            )?,
        })
    }
}

impl FilenameParser for GgMillionsParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn can_handle(&self, filename: &str, path: &str) -> bool {
        path.contains("GGMillions") || filename.contains("Super High Roller")
    }

    fn parse(&self, filename: &str, path: &str) -> ExtractedMetadata {
        let Some(caps) = self.pattern.captures(filename) else {
            return ExtractedMetadata::unmatched(
                Self::NAME,
                filename,
                path,
                Some(Franchise::GgMillions),
                confidence::PATTERN_MISS,
            );
        };

        let date = caps.get(1).map(|m| m.as_str());
        ExtractedMetadata {
            franchise: Some(Franchise::GgMillions),
            year: date.and_then(|d| d[..2].parse::<i32>().ok()).map(|yy| 2000 + yy),
            edit_date: date.map(|d| format!("20{}-{}-{}", &d[..2], &d[2..4], &d[4..6])),
            featured_player: Some(caps[2].trim().to_string()),
            table_type: Some(TableType::FinalTable),
            success: true,
            confidence: if date.is_some() {
                confidence::GG_DATED
            } else {
                confidence::GG_UNDATED
            },
            ..ExtractedMetadata::base(Self::NAME, filename, path)
        }
    }
}

/// Game of Gold episodes.
///
/// `E{ep}_GOG_final_edit_[클린본_]{yymmdd|yyyymmdd}[_수정|_최종].mp4`
#[derive(Debug, Clone)]
pub struct GogParser {
    long_date: Regex,
    short_date: Regex,
}

impl GogParser {
    pub const NAME: &'static str = "gog";

    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            long_date: Regex::new(
                r"(?i)^E([0-9]{1,3})_GOG_final_edit_(클린본_)?([0-9]{8})(_수정|_최종)?\.(mp4|mov)$",
            )?,
            short_date: Regex::new(
                r"(?i)^E([0-9]{1,3})_GOG_final_edit_(클린본_)?([0-9]{6})(_수정|_최종)?\.(mp4|mov)$",
            )?,
        })
    }

    fn build(
        caps: &Captures<'_>,
        year: Option<i32>,
        edit_date: String,
        confidence: f64,
        filename: &str,
        path: &str,
    ) -> ExtractedMetadata {
        let is_final = caps.get(4).is_some_and(|m| m.as_str() == "_최종");
        let version = if is_final {
            "final"
        } else if caps.get(2).is_some() {
            "clean"
        } else {
            "final_edit"
        };

        let mut record = ExtractedMetadata {
            franchise: Some(Franchise::Gog),
            year,
            episode_number: caps[1].parse().ok(),
            version: version.to_string(),
            edit_date: Some(edit_date),
            success: true,
            confidence,
            ..ExtractedMetadata::base(Self::NAME, filename, path)
        };
        record
            .extra
            .insert("is_final".to_string(), Value::Bool(is_final));
        record
    }
}

impl FilenameParser for GogParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn can_handle(&self, filename: &str, path: &str) -> bool {
        path.contains("GOG") || filename.contains("_GOG_")
    }

    fn parse(&self, filename: &str, path: &str) -> ExtractedMetadata {
        if let Some(caps) = self.long_date.captures(filename) {
            let date = &caps[3];
            return Self::build(
                &caps,
                date[..4].parse().ok(),
                format!("{}-{}-{}", &date[..4], &date[4..6], &date[6..8]),
                confidence::GOG_LONG_DATE,
                filename,
                path,
            );
        }

        if let Some(caps) = self.short_date.captures(filename) {
            let date = &caps[3];
            return Self::build(
                &caps,
                date[..2].parse::<i32>().ok().map(|yy| 2000 + yy),
                format!("20{}-{}-{}", &date[..2], &date[2..4], &date[4..6]),
                confidence::GOG_SHORT_DATE,
                filename,
                path,
            );
        }

        ExtractedMetadata::unmatched(
            Self::NAME,
            filename,
            path,
            Some(Franchise::Gog),
            confidence::PATTERN_MISS,
        )
    }
}

/// Poker After Dark episodes.
///
/// Seasons up to 12 use `pad-s{season}-ep{ep}-{code}.mp4`; later seasons
/// use `PAD_S{season}_EP{ep}[_{version}][-{code}].mp4`.
#[derive(Debug, Clone)]
pub struct PadParser {
    legacy: Regex,
    modern: Regex,
}

impl PadParser {
    pub const NAME: &'static str = "pad";

    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            legacy: Regex::new(r"(?i)^pad-s([0-9]+)-ep([0-9]+)-([0-9]+)\.(mp4|mov)$")?,
            modern: Regex::new(r"(?i)^PAD_S([0-9]+)_EP([0-9]+)(?:_([^-.]*))?(?:-([0-9]+))?\.(mp4|mov)$")?,
        })
    }
}

impl FilenameParser for PadParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn can_handle(&self, filename: &str, path: &str) -> bool {
        path.contains("PAD") || filename.to_uppercase().starts_with("PAD")
    }

    fn parse(&self, filename: &str, path: &str) -> ExtractedMetadata {
        if let Some(caps) = self.legacy.captures(filename) {
            let mut record = ExtractedMetadata {
                franchise: Some(Franchise::Pad),
                season_number: caps[1].parse().ok(),
                episode_number: caps[2].parse().ok(),
                success: true,
                confidence: confidence::PAD_LEGACY,
                ..ExtractedMetadata::base(Self::NAME, filename, path)
            };
            record
                .extra
                .insert("version_code".to_string(), Value::from(&caps[3]));
            return record;
        }

        if let Some(caps) = self.modern.captures(filename) {
            let version = caps
                .get(3)
                .map(|m| m.as_str().to_lowercase())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| GENERIC_VERSION.to_string());
            let mut record = ExtractedMetadata {
                franchise: Some(Franchise::Pad),
                season_number: caps[1].parse().ok(),
                episode_number: caps[2].parse().ok(),
                version,
                success: true,
                confidence: confidence::PAD_MODERN,
                ..ExtractedMetadata::base(Self::NAME, filename, path)
            };
            if let Some(code) = caps.get(4) {
                record
                    .extra
                    .insert("version_code".to_string(), Value::from(code.as_str()));
            }
            return record;
        }

        ExtractedMetadata::unmatched(
            Self::NAME,
            filename,
            path,
            Some(Franchise::Pad),
            confidence::PATTERN_MISS,
        )
    }
}

/// Mediterranean Poker Party broadcasts.
///
/// `${gtd} GTD   ${buyin} {event name} ? {day or final}.mp4`, where the
/// separator is an ASCII or full-width question mark.
#[derive(Debug, Clone)]
pub struct MppParser {
    pattern: Regex,
}

impl MppParser {
    pub const NAME: &'static str = "mpp";
    /// Every MPP recording in the library comes from the 2025 Cyprus series
    const SERIES_YEAR: i32 = 2025;

    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(
                r"(?i)^\$([0-9]+[MK]?) GTD\s+\$([0-9]+[MK]?) (.+) [?？] (.+)\.(mp4|mov)$",
            )?,
        })
    }
}

impl FilenameParser for MppParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn can_handle(&self, filename: &str, path: &str) -> bool {
        path.contains("MPP") || filename.contains("GTD")
    }

    fn parse(&self, filename: &str, path: &str) -> ExtractedMetadata {
        let Some(caps) = self.pattern.captures(filename) else {
            return ExtractedMetadata::unmatched(
                Self::NAME,
                filename,
                path,
                Some(Franchise::Mpp),
                confidence::PATTERN_MISS,
            );
        };

        let day_info = caps[4].trim().to_string();
        ExtractedMetadata {
            franchise: Some(Franchise::Mpp),
            year: Some(Self::SERIES_YEAR),
            gtd_amount: parse_amount(&caps[1]),
            buy_in: Some(caps[2].to_uppercase()),
            event_name: Some(caps[3].trim().to_string()),
            table_type: day_info
                .contains("Final")
                .then_some(TableType::FinalTable),
            day_info: Some(day_info),
            success: true,
            confidence: confidence::MPP,
            ..ExtractedMetadata::base(Self::NAME, filename, path)
        }
    }
}
