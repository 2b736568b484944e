use glob::{MatchOptions, Pattern};
use std::env;

use crate::error::{CatalogError, Result};
use crate::matching::{DEFAULT_INDEX_LIMIT, DEFAULT_MIN_CONFIDENCE};

/// Inventory paths left out of the catalog unless overridden
pub const DEFAULT_EXCLUDE: &str = "**/clips/**,**/player emotion*/**";
/// Season year for records without one
pub const DEFAULT_SEASON_YEAR: i32 = 2024;

/// Configuration for catalog building and path matching
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub index_limit: usize,
    pub min_confidence: f64,
    pub exclude: Vec<String>,
    pub default_year: i32,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            index_limit: env::var("CATALOG_INDEX_LIMIT")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.index_limit),
            min_confidence: env::var("CATALOG_MIN_CONFIDENCE")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.min_confidence),
            exclude: env::var("CATALOG_EXCLUDE")
                .map(|v| split_patterns(&v))
                .unwrap_or(defaults.exclude),
            default_year: env::var("CATALOG_DEFAULT_YEAR")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.default_year),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.index_limit == 0 {
            return Err(CatalogError::InvalidConfig(
                "CATALOG_INDEX_LIMIT must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(CatalogError::InvalidConfig(format!(
                "CATALOG_MIN_CONFIDENCE must be within [0, 1], got {}",
                self.min_confidence
            )));
        }
        self.exclude_patterns().map(|_| ())
    }

    /// Compile the exclusion globs
    pub fn exclude_patterns(&self) -> Result<Vec<Pattern>> {
        self.exclude
            .iter()
            .map(|raw| {
                Pattern::new(raw).map_err(|e| CatalogError::InvalidPattern {
                    pattern: raw.clone(),
                    reason: e.msg.to_string(),
                })
            })
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_limit: DEFAULT_INDEX_LIMIT,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            exclude: split_patterns(DEFAULT_EXCLUDE),
            default_year: DEFAULT_SEASON_YEAR,
        }
    }
}

/// Options for matching exclusion globs against normalized paths
pub fn exclude_match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: false,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

fn split_patterns(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
