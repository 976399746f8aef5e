//! MemoryBackend: process-local fallback storage
//!
//! A `HashMap<String, String>` behind `parking_lot::RwLock`. Nothing survives
//! the process.
//!
//! # Sharing
//!
//! The map lives behind an `Arc`: clones of one `MemoryBackend` see the same
//! data (so a second store opened over a clone reconstructs the first one's
//! state), while two backends built with `new()` never share anything. There
//! is no global fallback map.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use docstore_core::Result;

use crate::backend::RawBackend;

/// In-memory raw backend
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    data: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryBackend {
    /// Create a new, empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of raw keys stored (across all collections)
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// True if no keys are stored
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Snapshot of all raw keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.data.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl RawBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: String) -> Result<()> {
        self.data.write().insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.data.write().remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
