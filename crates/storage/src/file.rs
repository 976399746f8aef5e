//! JsonFileBackend: persistent storage in a single JSON file
//!
//! The whole key space is one JSON object (`{"raw key": "raw value", ...}`),
//! loaded into memory on open. Every `set_item`/`remove_item` rewrites the
//! file atomically (temp + fsync + rename), so a crash leaves either the old
//! or the new contents on disk, never a torn file. The in-memory map only
//! changes once the rewrite has succeeded, so a failed write stays invisible
//! to later reads.
//!
//! This plays the role a browser's local storage plays for web clients:
//! small, synchronous, survives restarts.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::debug;

use docstore_core::{Error, Result};

use crate::backend::RawBackend;

/// File-backed raw backend
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    data: RwLock<BTreeMap<String, String>>,
}

impl JsonFileBackend {
    /// Open (or create on first write) the backing file at `path`
    ///
    /// # Errors
    ///
    /// - `IoError` if the file exists but cannot be read
    /// - `Corruption` if the file is not a JSON object of strings
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    Error::corruption(format!(
                        "storage file '{}' is not a JSON string map: {}",
                        path.display(),
                        e
                    ))
                })?
            }
        } else {
            BTreeMap::new()
        };

        debug!(target: "docstore::storage", path = %path.display(), keys = data.len(), "Opened file backend");

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of raw keys stored
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// True if no keys are stored
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    fn persist(&self, data: &BTreeMap<String, String>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let payload = serde_json::to_vec(data)?;

        let tmp_path = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&payload)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl RawBackend for JsonFileBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: String) -> Result<()> {
        let mut data = self.data.write();
        let mut next = data.clone();
        next.insert(key.to_string(), value);
        self.persist(&next)?;
        *data = next;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut data = self.data.write();
        if !data.contains_key(key) {
            return Ok(());
        }
        let mut next = data.clone();
        next.remove(key);
        self.persist(&next)?;
        *data = next;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json-file"
    }
}
