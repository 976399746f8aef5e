//! Persisted secondary indexes
//!
//! For every configured field, each distinct value seen on a live record has
//! one index entry: the ids of the records holding that value, stored under
//! `<field>:<value>` (see [`crate::layout`]).
//!
//! ## Invariants
//!
//! - An entry lists exactly the live ids whose record has that field value.
//! - An id appears at most once in an entry.
//! - Empty entries are removed, never stored as `[]`.
//!
//! The index does not decide *when* to run; the record store calls `add`
//! after persisting a record and `remove` before replacing or deleting one.

use std::sync::Arc;

use serde_json::Value;
use tracing::{trace, warn};

use docstore_core::{Record, RecordId, Result};
use docstore_storage::StorageAdapter;

use crate::layout::index_key;
use crate::StoreConfig;

/// Secondary indexes of one collection
#[derive(Debug, Clone)]
pub struct SecondaryIndex {
    adapter: StorageAdapter,
    config: Arc<StoreConfig>,
}

impl SecondaryIndex {
    /// Indexes over `config.indexed_fields`, persisted through `adapter`
    pub fn new(adapter: StorageAdapter, config: Arc<StoreConfig>) -> Self {
        Self { adapter, config }
    }

    /// True if `field` is indexed
    pub fn is_indexed(&self, field: &str) -> bool {
        self.config.is_indexed(field)
    }

    /// Ids of records whose `field` equals `value`
    ///
    /// An absent entry is an empty list, not an error.
    pub fn entry(&self, field: &str, value: &Value) -> Result<Vec<RecordId>> {
        Ok(self
            .adapter
            .get::<Vec<RecordId>>(&index_key(field, value))?
            .unwrap_or_default())
    }

    /// Add `id` to the entry of every indexed field present on `record`
    pub fn add(&self, record: &Record, id: RecordId) -> Result<()> {
        for (field, value) in self.indexed_pairs(record) {
            let key = index_key(field, value);
            let mut ids: Vec<RecordId> = self.adapter.get(&key)?.unwrap_or_default();
            if !ids.contains(&id) {
                ids.push(id);
            }
            trace!(target: "docstore::index", key = %key, id = %id, len = ids.len(), "index add");
            self.adapter.set(&key, &ids)?;
        }
        Ok(())
    }

    /// Remove `id` from the entries `record` contributed to
    ///
    /// `record` must be the persisted version, i.e. the one whose values the
    /// entries were built from.
    pub fn remove(&self, record: &Record, id: RecordId) -> Result<()> {
        for (field, value) in self.indexed_pairs(record) {
            let key = index_key(field, value);
            let Some(mut ids) = self.adapter.get::<Vec<RecordId>>(&key)? else {
                warn!(target: "docstore::index", key = %key, id = %id, "Index entry missing during teardown");
                continue;
            };
            ids.retain(|existing| *existing != id);
            if ids.is_empty() {
                trace!(target: "docstore::index", key = %key, "index entry emptied");
                self.adapter.remove(&key)?;
            } else {
                self.adapter.set(&key, &ids)?;
            }
        }
        Ok(())
    }

    fn indexed_pairs<'r>(&'r self, record: &'r Record) -> impl Iterator<Item = (&'r str, &'r Value)> {
        record
            .iter()
            .filter(move |(field, _)| self.is_indexed(field))
            .map(|(field, value)| (field.as_str(), value))
    }
}
