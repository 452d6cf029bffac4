//! Discovery and selection of local `.deb` archives

use crate::error::{HostprepError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// `.deb` files directly inside `dir`, sorted by file name.
///
/// A missing directory is created and yields an empty list.
pub fn discover_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| HostprepError::IoError {
            path: dir.to_path_buf(),
            source,
        })?;
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|source| HostprepError::IoError {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut archives: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "deb"))
        .collect();
    archives.sort();

    Ok(archives)
}

/// Pick archives by 1-based, comma-separated indices ("1,3").
///
/// Duplicates keep their first position. An index that is not a number or
/// falls outside the list is an error.
pub fn select_archives(available: &[PathBuf], selection: &str) -> Result<Vec<PathBuf>> {
    let mut selected: Vec<PathBuf> = Vec::new();

    for token in selection.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let index: usize = token
            .parse()
            .map_err(|_| HostprepError::InvalidInput(format!("'{}' is not a number", token)))?;

        let path = index
            .checked_sub(1)
            .and_then(|i| available.get(i))
            .ok_or_else(|| {
                HostprepError::InvalidInput(format!(
                    "Selection {} is out of range (1-{})",
                    index,
                    available.len()
                ))
            })?;

        if !selected.contains(path) {
            selected.push(path.clone());
        }
    }

    if selected.is_empty() {
        return Err(HostprepError::InvalidInput(
            "No archives selected".to_string(),
        ));
    }

    Ok(selected)
}
