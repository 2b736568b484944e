//! Catch-all parser for files no franchise convention claims.

use super::{confidence, detect_version_type, FilenameParser, YearExtractor};
use crate::metadata::{ExtractedMetadata, Franchise};

/// Fallback parser: claims every file and records what it can guess.
#[derive(Debug, Clone)]
pub struct GenericParser {
    years: YearExtractor,
}

impl GenericParser {
    pub const NAME: &'static str = "generic";

    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            years: YearExtractor::new()?,
        })
    }

    /// Franchise hinted at by the folder structure
    fn infer_franchise(path: &str) -> Option<Franchise> {
        let upper = path.to_uppercase();
        if upper.contains("WSOP") {
            Some(Franchise::Wsop)
        } else if upper.contains("HCL") {
            Some(Franchise::Hcl)
        } else if path.contains("GGMillions") {
            Some(Franchise::GgMillions)
        } else if path.contains("MPP") {
            Some(Franchise::Mpp)
        } else if path.contains("PAD") {
            Some(Franchise::Pad)
        } else if path.contains("GOG") {
            Some(Franchise::Gog)
        } else {
            None
        }
    }
}

impl FilenameParser for GenericParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn can_handle(&self, _filename: &str, _path: &str) -> bool {
        true
    }

    fn parse(&self, filename: &str, path: &str) -> ExtractedMetadata {
        let year = self
            .years
            .extract(filename)
            .or_else(|| self.years.extract(path));
        let franchise = Self::infer_franchise(path);

        let confidence = match (&franchise, year) {
            (Some(_), Some(_)) => confidence::GENERIC_FRANCHISE_AND_YEAR,
            (Some(_), None) | (None, Some(_)) => confidence::GENERIC_PARTIAL,
            (None, None) => confidence::GENERIC_BARE,
        };

        ExtractedMetadata {
            franchise,
            year,
            version: detect_version_type(path, filename).to_string(),
            success: true,
            confidence,
            ..ExtractedMetadata::base(Self::NAME, filename, path)
        }
    }
}
