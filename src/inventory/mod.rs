use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, info};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::parser::should_hide_file;

/// A file discovered on the share, as supplied by the inventory scanner.
///
/// Only `file_path` and `file_name` feed parsing and matching; size and
/// mtime ride along for the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// Scanner-assigned identifier, opaque to the catalog core
    pub id: String,
    pub file_path: String,
    pub file_name: String,
    pub size_bytes: u64,
    pub modified_time: Option<SystemTime>,
}

impl InventoryRecord {
    pub fn new(id: impl Into<String>, file_path: impl Into<String>) -> Self {
        let file_path = file_path.into();
        let file_name = file_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            id: id.into(),
            file_path,
            file_name,
            size_bytes: 0,
            modified_time: None,
        }
    }

    /// Extension including the leading dot, lower-cased
    pub fn extension(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default()
    }
}

/// Inventory a local directory tree (or mounted share).
///
/// Hidden OS artifacts are skipped. Identifiers are random per scan, as a
/// real scanner would assign them on insert.
pub fn scan_directory(root: &Path) -> Result<Vec<InventoryRecord>> {
    if !root.exists() {
        return Err(anyhow!("Inventory root does not exist: {:?}", root));
    }

    if !root.is_dir() {
        return Err(anyhow!("Path is not a directory: {:?}", root));
    }

    let mut records = Vec::new();
    let mut hidden = 0usize;

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        if let Some(reason) = should_hide_file(&file_name) {
            debug!("Skipping hidden file {:?} ({:?})", path, reason);
            hidden += 1;
            continue;
        }

        let metadata = entry.metadata().ok();
        records.push(InventoryRecord {
            id: Uuid::new_v4().to_string(),
            file_path: path.to_string_lossy().to_string(),
            file_name,
            size_bytes: metadata.as_ref().map(|m| m.len()).unwrap_or(0),
            modified_time: metadata.and_then(|m| m.modified().ok()),
        });
    }

    info!(
        "Inventoried {} files under {:?} ({} hidden files skipped)",
        records.len(),
        root,
        hidden
    );

    Ok(records)
}
