//! Filesystem helpers shared by the pipeline stages.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::{CatalogueError, Result};
use crate::types::RECORD_EXTENSION;

/// Read and parse a YAML file into `T`, mapping failures onto [`CatalogueError`].
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogueError::io(path, e))?;
    serde_yaml::from_str(&content).map_err(|e| CatalogueError::parse(path, e.to_string()))
}

/// List the object record files (`*.yml`) of a directory, sorted by file name.
pub fn record_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| CatalogueError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| CatalogueError::io(dir, e))?.path();
        let is_record = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == RECORD_EXTENSION);
        if is_record {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
