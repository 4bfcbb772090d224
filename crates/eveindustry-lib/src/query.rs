//! Query state persistence.
//!
//! A saved query records which region catalog it ran against and the ordered
//! target-material list, so a session can be replayed without re-running the
//! interactive selection.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// A persisted match query: catalog reference plus target materials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    /// Path of the region catalog the query was run against.
    pub catalog: String,
    /// Target materials in selection order.
    pub materials: Vec<String>,
}

impl QueryState {
    pub fn new(catalog: impl Into<String>, materials: Vec<String>) -> Self {
        Self {
            catalog: catalog.into(),
            materials,
        }
    }

    /// Write the query as pretty-printed JSON.
    ///
    /// A `.json` extension is appended when the target lacks one. Returns the
    /// path actually written.
    pub fn save(&self, path: &Path) -> Result<PathBuf> {
        let path = normalize_extension(path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        debug!(path = %path.display(), materials = self.materials.len(), "saved query state");
        Ok(path)
    }

    /// Load a previously saved query.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let state = serde_json::from_str(&json)?;
        debug!(path = %path.display(), "loaded query state");
        Ok(state)
    }
}

/// List saved query files in a directory, sorted by file name.
///
/// A missing directory is treated as "no saved queries", not an error.
pub fn list_saved_queries(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

fn normalize_extension(path: &Path) -> PathBuf {
    let has_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if has_json {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".json");
        PathBuf::from(name)
    }
}
