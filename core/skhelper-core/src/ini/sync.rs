use fs_err as fs;
use std::path::Path;

use super::{IniDocument, IniPatch};
use crate::error::{HelperError, Result};

/// Sets `[section] key` to `desired` unless it already holds exactly that
/// value. Returns whether the document changed.
pub fn ensure_value(doc: &mut IniDocument, section: &str, key: &str, desired: &str) -> bool {
    if doc.get(section, key) == Some(desired) {
        return false;
    }

    doc.set(section, key, desired);
    tracing::info!(section, key, value = desired, "Updated ini value");
    true
}

/// Applies every patch entry and returns how many changed the document.
pub fn ensure_all(doc: &mut IniDocument, patch: &[IniPatch]) -> usize {
    patch
        .iter()
        .filter(|entry| ensure_value(doc, &entry.section, &entry.key, &entry.value))
        .count()
}

/// Writes the document back only when something changed. Returns whether a
/// write happened.
pub fn commit_if_changed(doc: &IniDocument, path: &Path, change_count: usize) -> Result<bool> {
    if change_count == 0 {
        return Ok(false);
    }

    doc.save(path)?;
    tracing::info!(path = %path.display(), change_count, "Ini file validated and updated");
    Ok(true)
}

/// Load, patch, and write once if needed. A missing file is created empty
/// first when `create_if_missing`; otherwise it is reported as
/// [`HelperError::NotFound`]. Returns the number of changed entries.
pub fn sync_file(path: &Path, patch: &[IniPatch], create_if_missing: bool) -> Result<usize> {
    if !path.exists() {
        if !create_if_missing {
            return Err(HelperError::NotFound(path.to_path_buf()));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| HelperError::persistence(parent, e))?;
        }
        fs::write(path, "").map_err(|e| HelperError::persistence(path, e))?;
        tracing::info!(path = %path.display(), "Created blank ini file since it was missing");
    }

    let mut doc = IniDocument::load(path)?;
    let changes = ensure_all(&mut doc, patch);
    commit_if_changed(&doc, path, changes)?;
    Ok(changes)
}
