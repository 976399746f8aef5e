//! StorageAdapter: collection-scoped, JSON-encoded view of a raw backend
//!
//! ## Key Namespacing
//!
//! Every logical key is stored as `"<collection>:<key>"`, so several
//! collections can share one backend without colliding.
//!
//! ## Encoding
//!
//! Values are serialized to JSON text before they reach the backend and
//! parsed on the way back. A stored value that does not parse as the
//! requested type is a `SerializationError`.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::trace;

use docstore_core::{Error, Result};

use crate::backend::RawBackend;

/// Namespaced JSON get/set/remove over a [`RawBackend`]
#[derive(Clone)]
pub struct StorageAdapter {
    name: String,
    backend: Arc<dyn RawBackend>,
}

impl StorageAdapter {
    /// Create an adapter for collection `name` over `backend`
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `name` is empty.
    pub fn new(name: impl Into<String>, backend: Arc<dyn RawBackend>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::invalid_argument(
                "collection name must not be empty",
            ));
        }
        Ok(Self { name, backend })
    }

    /// Collection name used as key prefix
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shared raw backend
    pub fn backend(&self) -> &Arc<dyn RawBackend> {
        &self.backend
    }

    /// Raw backend key for a logical key
    pub fn raw_key(&self, key: &str) -> String {
        format!("{}:{}", self.name, key)
    }

    /// Read and decode the value under `key`
    ///
    /// Returns `None` if the key is absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw_key = self.raw_key(key);
        match self.backend.get_item(&raw_key)? {
            None => Ok(None),
            Some(text) => {
                let value = serde_json::from_str(&text).map_err(|e| {
                    Error::SerializationError(format!("value at '{}': {}", raw_key, e))
                })?;
                Ok(Some(value))
            }
        }
    }

    /// Encode and store `value` under `key`
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw_key = self.raw_key(key);
        let text = serde_json::to_string(value)?;
        trace!(target: "docstore::storage", key = %raw_key, bytes = text.len(), "set");
        self.backend.set_item(&raw_key, text)
    }

    /// Remove `key`
    pub fn remove(&self, key: &str) -> Result<()> {
        let raw_key = self.raw_key(key);
        trace!(target: "docstore::storage", key = %raw_key, "remove");
        self.backend.remove_item(&raw_key)
    }
}

impl fmt::Debug for StorageAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageAdapter")
            .field("name", &self.name)
            .field("backend", &self.backend.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use serde_json::json;

    fn adapter(name: &str, backend: &MemoryBackend) -> StorageAdapter {
        StorageAdapter::new(name, Arc::new(backend.clone())).unwrap()
    }

    #[test]
    fn test_keys_are_namespaced() {
        let backend = MemoryBackend::new();
        let users = adapter("users", &backend);

        users.set("1", &json!({"name": "Ada"})).unwrap();

        assert_eq!(backend.keys(), vec!["users:1".to_string()]);
        assert_eq!(
            backend.get_item("users:1").unwrap(),
            Some("{\"name\":\"Ada\"}".to_string())
        );
    }

    #[test]
    fn test_values_are_json_encoded() {
        let backend = MemoryBackend::new();
        let db = adapter("db", &backend);

        db.set("__data", "1,2,5").unwrap();
        assert_eq!(
            backend.get_item("db:__data").unwrap(),
            Some("\"1,2,5\"".to_string())
        );

        let list: Option<String> = db.get("__data").unwrap();
        assert_eq!(list.as_deref(), Some("1,2,5"));
    }

    #[test]
    fn test_absent_key_is_none() {
        let backend = MemoryBackend::new();
        let db = adapter("db", &backend);
        let value: Option<serde_json::Value> = db.get("missing").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_collections_do_not_collide() {
        let backend = MemoryBackend::new();
        let a = adapter("a", &backend);
        let b = adapter("b", &backend);

        a.set("1", &json!({"x": 1})).unwrap();
        let from_b: Option<serde_json::Value> = b.get("1").unwrap();
        assert!(from_b.is_none());

        a.remove("1").unwrap();
        assert!(backend.is_empty());
    }

    #[test]
    fn test_undecodable_value_is_serialization_error() {
        let backend = MemoryBackend::new();
        backend.set_item("db:k", "not json".to_string()).unwrap();
        let db = adapter("db", &backend);

        let result: Result<Option<serde_json::Value>> = db.get("k");
        assert!(matches!(result, Err(Error::SerializationError(_))));
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = StorageAdapter::new("", Arc::new(MemoryBackend::new())).unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
