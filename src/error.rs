use thiserror::Error;

/// Precondition and configuration failures raised by the catalog core.
///
/// Parsing, title generation and path normalization are infallible; only
/// caller mistakes surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// A path resolution was attempted before `build_index` ran.
    #[error("path index has not been built; call build_index before resolving")]
    IndexNotBuilt,

    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An exclusion glob could not be compiled.
    #[error("invalid exclusion pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

pub type Result<T> = std::result::Result<T, CatalogError>;
