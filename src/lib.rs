//! Catalog core for a poker video archive: filename parsing, title
//! generation and reconciliation of spreadsheet folder links with the
//! file inventory.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod inventory;
pub mod matching;
pub mod metadata;
pub mod parser;
pub mod title;

pub use error::{CatalogError, Result};
pub use metadata::{ExtractedMetadata, Franchise, TableType};
pub use parser::{FilenameParser, ParserRegistry};
pub use title::TitleGenerator;
