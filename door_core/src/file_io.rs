//! # File I/O Module
//!
//! Loads and saves the engine's reference data:
//! - [`EngineConfig`] shop constants
//! - [`FrameCatalog`] stock profiles
//! - [`DoorBomPlan`] exports for the presentation layer
//!
//! ## File Format
//!
//! The format follows the extension: `.toml` files are TOML, anything else
//! is JSON. Loaded configs and catalogues are validated before they are
//! returned.
//!
//! Saves are atomic: the document is written to a `.tmp` sibling, synced,
//! read back and compared, then renamed over the target. An interrupted
//! save never leaves a half-written file behind.
//!
//! While a save runs it holds an exclusive OS lock on a `.lock` sibling, so
//! two processes sharing a config on a network drive cannot interleave
//! their writes. A second writer gets [`DoorError::FileLocked`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use door_core::config::EngineConfig;
//! use door_core::file_io::{load_config, save_config};
//! use std::path::Path;
//!
//! let path = Path::new("door_engine.toml");
//! save_config(&EngineConfig::default(), path)?;
//! let config = load_config(path)?;
//! assert_eq!(config.saw_kerf_mm, 5.0);
//! # Ok::<(), door_core::errors::DoorError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::EngineConfig;
use crate::errors::{DoorError, DoorResult};
use crate::materials::FrameCatalog;
use crate::plan::DoorBomPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

impl Format {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
            _ => Format::Json,
        }
    }

    fn render<T: Serialize>(self, value: &T) -> DoorResult<String> {
        Ok(match self {
            Format::Toml => toml::to_string_pretty(value)?,
            Format::Json => serde_json::to_string_pretty(value)?,
        })
    }

    fn parse<T: DeserializeOwned>(self, contents: &str, path: &Path) -> DoorResult<T> {
        let parsed = match self {
            Format::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
            Format::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
        };
        parsed.map_err(|reason| {
            DoorError::serialization(format!("Invalid document in {}: {}", path.display(), reason))
        })
    }
}

/// Load and validate an engine config.
pub fn load_config(path: &Path) -> DoorResult<EngineConfig> {
    let config: EngineConfig = load_document(path)?;
    config.validate()?;
    debug!(path = %path.display(), "engine config loaded");
    Ok(config)
}

/// Validate and save an engine config.
pub fn save_config(config: &EngineConfig, path: &Path) -> DoorResult<()> {
    config.validate()?;
    save_document(config, path)
}

/// Load and validate a frame catalogue.
pub fn load_catalog(path: &Path) -> DoorResult<FrameCatalog> {
    let catalog: FrameCatalog = load_document(path)?;
    catalog.validate()?;
    debug!(
        path = %path.display(),
        species = catalog.species().count(),
        "frame catalogue loaded"
    );
    Ok(catalog)
}

/// Validate and save a frame catalogue.
pub fn save_catalog(catalog: &FrameCatalog, path: &Path) -> DoorResult<()> {
    catalog.validate()?;
    save_document(catalog, path)
}

/// Export a computed plan (JSON unless the path ends in `.toml`).
pub fn save_plan(plan: &DoorBomPlan, path: &Path) -> DoorResult<()> {
    save_document(plan, path)
}

fn load_document<T: DeserializeOwned>(path: &Path) -> DoorResult<T> {
    let contents = fs::read_to_string(path)
        .map_err(|e| DoorError::file_error("read", path.display().to_string(), e.to_string()))?;
    Format::for_path(path).parse(&contents, path)
}

fn save_document<T: Serialize>(value: &T, path: &Path) -> DoorResult<()> {
    let contents = Format::for_path(path).render(value)?;
    atomic_write(path, &contents)
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut sibling = path.as_os_str().to_owned();
    sibling.push(suffix);
    PathBuf::from(sibling)
}

fn tmp_path_for(path: &Path) -> PathBuf {
    sibling_path(path, ".tmp")
}

fn lock_path_for(path: &Path) -> PathBuf {
    sibling_path(path, ".lock")
}

/// Exclusive lock on `<path>.lock`, released and removed on drop.
struct SaveLock {
    lock_path: PathBuf,
    _lock_file: File,
}

impl SaveLock {
    fn acquire(path: &Path) -> DoorResult<Self> {
        let lock_path = lock_path_for(path);
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| {
                DoorError::file_error("create lock", lock_path.display().to_string(), e.to_string())
            })?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| DoorError::file_locked(path.display().to_string()))?;

        Ok(SaveLock {
            lock_path,
            _lock_file: lock_file,
        })
    }
}

impl Drop for SaveLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// Write to `<path>.tmp`, sync, verify, rename; all under the save lock.
fn atomic_write(path: &Path, contents: &str) -> DoorResult<()> {
    let _lock = SaveLock::acquire(path)?;
    let tmp_path = tmp_path_for(path);
    let tmp_display = tmp_path.display().to_string();

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| DoorError::file_error("create temp file", &tmp_display, e.to_string()))?;
    tmp_file
        .write_all(contents.as_bytes())
        .map_err(|e| DoorError::file_error("write temp file", &tmp_display, e.to_string()))?;
    tmp_file
        .sync_all()
        .map_err(|e| DoorError::file_error("sync temp file", &tmp_display, e.to_string()))?;
    drop(tmp_file);

    let written = fs::read_to_string(&tmp_path)
        .map_err(|e| DoorError::file_error("verify temp file", &tmp_display, e.to_string()))?;
    if written != contents {
        let _ = fs::remove_file(&tmp_path);
        return Err(DoorError::file_error(
            "verify temp file",
            tmp_display,
            "contents differ from what was written",
        ));
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        DoorError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), bytes = contents.len(), "file saved");
    Ok(())
}
