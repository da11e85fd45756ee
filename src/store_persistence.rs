//! Shared load/save plumbing for the JSON-backed stores.
//!
//! Both stores are rewritten wholesale on every mutation: serialize the full
//! document, write it to a sibling temp file, then rename over the target so
//! a crash mid-write never truncates the store.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde_json::Value;
use thiserror::Error;

/// Failure while writing a persisted store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("store"));
    name.push(suffix);
    path.with_file_name(name)
}

/// Keeps a copy of an unreadable store next to the original so the data can
/// still be inspected after the next save overwrites it.
fn preserve_corrupt_store(path: &Path) {
    let backup = sibling_path(path, ".corrupt");
    match fs::copy(path, &backup) {
        Ok(_) => warn!(
            "Preserved unreadable store {} as {}",
            path.display(),
            backup.display()
        ),
        Err(err) => warn!(
            "Could not preserve unreadable store {}: {}",
            path.display(),
            err
        ),
    }
}

/// Loads a store document. A missing file is an empty store; an unreadable or
/// malformed file is treated as empty after logging and preserving it.
pub(crate) fn load_store_document(path: &Path) -> Option<Value> {
    if !path.exists() {
        return None;
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            warn!("Failed to read store {}: {}", path.display(), err);
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(document) => Some(document),
        Err(err) => {
            warn!("Malformed store {}: {}", path.display(), err);
            preserve_corrupt_store(path);
            None
        }
    }
}

/// Writes the full store document, pretty-printed, through a temp file plus
/// rename.
pub(crate) fn save_store_document(path: &Path, document: &Value) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut content = serde_json::to_string_pretty(document)?;
    content.push('\n');

    let staging = sibling_path(path, ".tmp");
    fs::write(&staging, content)?;
    fs::rename(&staging, path)?;
    Ok(())
}
