//! Builder for opening a RecordStore
//!
//! ```ignore
//! use docstore_engine::RecordStore;
//! use docstore_storage::JsonFileBackend;
//!
//! // In-memory, defaults everywhere
//! let store = RecordStore::builder().open()?;
//!
//! // Persistent, indexed on two fields
//! let store = RecordStore::builder()
//!     .name("people")
//!     .indexed_fields(["job", "city"])
//!     .backend(JsonFileBackend::open("/data/people.json")?)
//!     .open()?;
//! ```

use std::sync::Arc;

use docstore_core::Result;
use docstore_storage::{MemoryBackend, RawBackend};

use super::{RecordStore, StoreConfig};

/// Fluent configuration for [`RecordStore`]
///
/// Without an explicit backend, `open()` uses a fresh [`MemoryBackend`].
#[derive(Clone, Default)]
pub struct RecordStoreBuilder {
    config: StoreConfig,
    backend: Option<Arc<dyn RawBackend>>,
}

impl RecordStoreBuilder {
    /// New builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration (e.g. one loaded from TOML)
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Collection namespace
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Add one indexed field
    pub fn indexed_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.config.is_indexed(&field) {
            self.config.indexed_fields.push(field);
        }
        self
    }

    /// Add several indexed fields
    pub fn indexed_fields<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        fields
            .into_iter()
            .fold(self, |builder, field| builder.indexed_field(field))
    }

    /// Field stamped with each record's id
    pub fn unique_key(mut self, field: impl Into<String>) -> Self {
        self.config.unique_key = field.into();
        self
    }

    /// Storage backend, taking ownership
    pub fn backend<B: RawBackend + 'static>(mut self, backend: B) -> Self {
        self.backend = Some(Arc::new(backend));
        self
    }

    /// Storage backend shared with other owners
    pub fn shared_backend(mut self, backend: Arc<dyn RawBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Open the store
    pub fn open(self) -> Result<RecordStore> {
        let backend = self
            .backend
            .unwrap_or_else(|| Arc::new(MemoryBackend::new()));
        RecordStore::open(self.config, backend)
    }
}

impl std::fmt::Debug for RecordStoreBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStoreBuilder")
            .field("config", &self.config)
            .field("backend", &self.backend.as_ref().map(|b| b.name()))
            .finish()
    }
}
