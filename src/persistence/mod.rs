//! Save/load persistence
//!
//! Features:
//! - Plain JSON documents
//! - Atomic writes (tmp → save)
//! - Backup rotation (old save → `.bak`)
//! - Corruption fallback to the backup on load
//!
//! Only configuration and the leaderboard go through here. In-progress runs are
//! never persisted.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

/// Path of the backup kept next to `path`
pub fn backup_path(path: &Path) -> PathBuf {
    with_suffix(path, "bak")
}

fn tmp_path(path: &Path) -> PathBuf {
    with_suffix(path, "tmp")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError {
    let path = path.to_path_buf();
    move |source| StorageError::Io { path, source }
}

/// Read and parse a JSON document
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let text = fs::read_to_string(path).map_err(io_err(path))?;
    serde_json::from_str(&text).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a document, trying the backup if the primary is corrupt and falling
/// back to `T::default()` when neither is readable
pub fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match load_json(path) {
        Ok(value) => value,
        Err(StorageError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            log::info!("No file at {}, starting fresh", path.display());
            T::default()
        }
        Err(err) => {
            log::warn!("{err}; trying backup");
            match load_json(&backup_path(path)) {
                Ok(value) => value,
                Err(err) => {
                    log::warn!("{err}; using defaults");
                    T::default()
                }
            }
        }
    }
}

/// Write a document atomically, rotating the previous version to `.bak`
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }

    let tmp = tmp_path(path);
    fs::write(&tmp, json).map_err(io_err(&tmp))?;

    if path.exists() {
        let bak = backup_path(path);
        fs::rename(path, &bak).map_err(io_err(&bak))?;
    }
    fs::rename(&tmp, path).map_err(io_err(path))?;
    Ok(())
}
