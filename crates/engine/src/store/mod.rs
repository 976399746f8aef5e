//! RecordStore: a collection of JSON records over a key-value backend
//!
//! ## Design
//!
//! The store owns three pieces of state for its collection:
//! - the live-id list (authoritative membership, insertion order)
//! - the id counter (last id handed out; advanced before every insert)
//! - the secondary indexes of the configured fields (persisted, see
//!   [`crate::index`])
//!
//! The live-id list and counter are loaded once in [`RecordStore::open`];
//! everything else is read through the adapter on demand. Every mutation
//! re-persists the live-id list and the index entries it touched before
//! returning, so a new store over the same backend and name sees the same
//! collection.
//!
//! ## Not Found
//!
//! Updating or deleting an id that is not live is not an error. Those calls
//! return `Ok(None)`; callers check the result.
//!
//! ## Failure
//!
//! Backend errors propagate with `?`. There is no rollback: a failure part
//! way through a mutation can leave index entries out of step with the
//! live-id list.
//!
//! ## Concurrency
//!
//! One logical writer. Mutations take `&mut self`; two stores over the same
//! backend and name are not coordinated and may race on ids and on index
//! read-modify-write.

mod builder;
mod config;

pub use builder::RecordStoreBuilder;
pub use config::{StoreConfig, DEFAULT_NAME, DEFAULT_UNIQUE_KEY};

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use docstore_core::{as_record, matches, Criteria, Error, Record, RecordId, Result};
use docstore_storage::{MemoryBackend, RawBackend, StorageAdapter};

use crate::index::SecondaryIndex;
use crate::intersect::intersect;
use crate::layout::{decode_live_ids, encode_live_ids, record_key, LIVE_IDS_KEY};

/// A collection of schema-free records with optional secondary indexes
///
/// # Example
///
/// ```ignore
/// use docstore_engine::RecordStore;
/// use docstore_core::{as_record, json};
///
/// let mut people = RecordStore::builder()
///     .name("people")
///     .indexed_field("job")
///     .open()?;
///
/// let id = people.insert(as_record(json!({"name": "Ada", "job": "Developer"}))?)?;
/// let devs = people.find(&as_record(json!({"job": "Developer"}))?)?;
/// assert_eq!(devs.len(), 1);
/// ```
#[derive(Debug)]
pub struct RecordStore {
    config: Arc<StoreConfig>,
    adapter: StorageAdapter,
    index: SecondaryIndex,
    live_ids: Vec<RecordId>,
    last_id: u64,
}

impl RecordStore {
    /// Start configuring a store
    pub fn builder() -> RecordStoreBuilder {
        RecordStoreBuilder::new()
    }

    /// Open a store over a fresh in-memory backend
    pub fn new(config: StoreConfig) -> Result<Self> {
        Self::open(config, Arc::new(MemoryBackend::new()))
    }

    /// Open a store over `backend`, taking ownership of it
    pub fn with_backend<B: RawBackend + 'static>(config: StoreConfig, backend: B) -> Result<Self> {
        Self::open(config, Arc::new(backend))
    }

    /// Open the collection `config.name` stored in `backend`
    ///
    /// Loads the live-id list (empty if absent) and sets the id counter to
    /// the largest live id.
    ///
    /// # Errors
    ///
    /// - `ConfigError` if the configuration is invalid
    /// - `Corruption` if the stored live-id list cannot be parsed
    /// - any backend error
    pub fn open(config: StoreConfig, backend: Arc<dyn RawBackend>) -> Result<Self> {
        config.validate()?;
        let adapter = StorageAdapter::new(config.name.clone(), backend)?;
        let config = Arc::new(config);
        let index = SecondaryIndex::new(adapter.clone(), Arc::clone(&config));

        let live_ids = load_live_ids(&adapter)?;
        let last_id = live_ids.iter().map(|id| id.as_u64()).max().unwrap_or(0);

        info!(
            target: "docstore::store",
            collection = %config.name,
            backend = adapter.backend().name(),
            records = live_ids.len(),
            last_id,
            "Opened collection"
        );

        Ok(Self {
            config,
            adapter,
            index,
            live_ids,
            last_id,
        })
    }

    // ========== Accessors ==========

    /// The configuration this store was opened with
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Collection name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Live ids in insertion order
    pub fn live_ids(&self) -> &[RecordId] {
        &self.live_ids
    }

    /// The id the next successful insert will receive
    pub fn next_id(&self) -> RecordId {
        RecordId::new(self.last_id).next()
    }

    /// Number of live records. O(1).
    pub fn count(&self) -> usize {
        self.live_ids.len()
    }

    /// True if the collection holds no records
    pub fn is_empty(&self) -> bool {
        self.live_ids.is_empty()
    }

    /// True if `id` is live
    pub fn contains(&self, id: RecordId) -> bool {
        self.live_ids.contains(&id)
    }

    // ========== Insert ==========

    /// Insert a record and return its new id
    ///
    /// The unique-key field is set to the new id, replacing any value the
    /// caller put there. Returns `Ok(None)` only if the counter produced an
    /// id that is already live, in which case nothing is written.
    pub fn insert(&mut self, record: Record) -> Result<Option<RecordId>> {
        let id = self.next_id();
        self.last_id = id.as_u64();
        if self.contains(id) {
            warn!(target: "docstore::store", collection = %self.config.name, id = %id, "Generated id already live, insert skipped");
            return Ok(None);
        }

        let mut record = record;
        record.insert(self.config.unique_key.clone(), Value::from(id));

        self.adapter.set(&record_key(id), &record)?;
        self.live_ids.push(id);
        self.persist_live_ids()?;
        self.index.add(&record, id)?;

        debug!(target: "docstore::store", collection = %self.config.name, id = %id, "Record inserted");
        Ok(Some(id))
    }

    /// Insert an arbitrary JSON value, which must be an object
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for numbers, booleans, null, strings and arrays.
    /// Use [`insert_many`](Self::insert_many) for several records.
    pub fn insert_value(&mut self, value: Value) -> Result<Option<RecordId>> {
        let record = as_record(value)?;
        self.insert(record)
    }

    /// Insert records one by one, in order
    ///
    /// Not atomic: if an insert fails, the records before it stay committed
    /// and the error is returned. Returns the ids actually assigned.
    pub fn insert_many<I>(&mut self, records: I) -> Result<Vec<RecordId>>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut ids = Vec::new();
        for record in records {
            if let Some(id) = self.insert(record)? {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    // ========== Query ==========

    /// Records matching every criterion
    ///
    /// Indexed criteria narrow the candidates through their index entries
    /// (intersected when there are several); the rest are checked against
    /// each candidate record. Empty criteria return every record.
    pub fn find(&self, criteria: &Criteria) -> Result<Vec<Record>> {
        Ok(self
            .resolve(criteria)?
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }

    /// Every record, in live-id order
    pub fn find_all(&self) -> Result<Vec<Record>> {
        self.find(&Criteria::new())
    }

    /// The record stored under `id`, if live
    pub fn get(&self, id: RecordId) -> Result<Option<Record>> {
        if !self.contains(id) {
            return Ok(None);
        }
        self.adapter.get(&record_key(id))
    }

    // ========== Update ==========

    /// Replace the record stored under `id`
    ///
    /// Returns the stored record (with the unique key set), or `Ok(None)`
    /// if `id` is not live.
    pub fn update(&mut self, id: RecordId, record: Record) -> Result<Option<Record>> {
        if !self.contains(id) {
            debug!(target: "docstore::store", collection = %self.config.name, id = %id, "Update of unknown id ignored");
            return Ok(None);
        }

        self.destroy_index(id)?;

        let mut record = record;
        record.insert(self.config.unique_key.clone(), Value::from(id));
        self.adapter.set(&record_key(id), &record)?;
        self.index.add(&record, id)?;

        debug!(target: "docstore::store", collection = %self.config.name, id = %id, "Record updated");
        Ok(Some(record))
    }

    // ========== Delete ==========

    /// Delete the record stored under `id`
    ///
    /// Returns `Ok(None)` if `id` is not live, otherwise `Ok(Some(true))`
    /// once the id has left the live list.
    pub fn delete(&mut self, id: RecordId) -> Result<Option<bool>> {
        let Some(pos) = self.live_ids.iter().position(|live| *live == id) else {
            debug!(target: "docstore::store", collection = %self.config.name, id = %id, "Delete of unknown id ignored");
            return Ok(None);
        };

        self.live_ids.remove(pos);
        self.persist_live_ids()?;
        self.destroy_index(id)?;
        self.adapter.remove(&record_key(id))?;

        debug!(target: "docstore::store", collection = %self.config.name, id = %id, "Record deleted");
        Ok(Some(!self.contains(id)))
    }

    /// Delete every record matching `criteria`
    ///
    /// Empty criteria match, and therefore delete, every record. Returns
    /// true if at least one record was removed.
    pub fn delete_matching(&mut self, criteria: &Criteria) -> Result<bool> {
        let before = self.count();
        let ids: Vec<RecordId> = self.resolve(criteria)?.into_iter().map(|(id, _)| id).collect();
        for id in ids {
            self.delete(id)?;
        }
        let removed = before - self.count();
        debug!(target: "docstore::store", collection = %self.config.name, removed, "Matching records deleted");
        Ok(removed > 0)
    }

    /// Delete every record and the live-id list itself
    ///
    /// Goes through [`delete`](Self::delete) for each id, so index entries are
    /// torn down one record at a time. Returns true once the collection is
    /// empty.
    pub fn drop_all(&mut self) -> Result<bool> {
        let ids = self.live_ids.clone();
        for id in &ids {
            self.delete(*id)?;
        }
        self.adapter.remove(LIVE_IDS_KEY)?;
        self.live_ids.clear();

        info!(target: "docstore::store", collection = %self.config.name, dropped = ids.len(), "Collection dropped");
        Ok(self.live_ids.is_empty())
    }

    // ========== Internals ==========

    /// Candidate ids for `criteria`, resolved to records and filtered
    ///
    /// Indexed criteria are re-checked on the record as well: index keys
    /// render values as text, so `"1"` and `1` share an entry.
    fn resolve(&self, criteria: &Criteria) -> Result<Vec<(RecordId, Record)>> {
        let mut entries: Vec<Vec<RecordId>> = Vec::new();
        for (field, value) in criteria {
            if self.index.is_indexed(field) {
                entries.push(self.index.entry(field, value)?);
            }
        }

        let candidates: Vec<RecordId> = match entries.len() {
            0 => self.live_ids.clone(),
            _ => {
                let ids = if entries.len() == 1 {
                    entries.pop().unwrap_or_default()
                } else {
                    intersect(&entries)
                };
                let live: HashSet<RecordId> = self.live_ids.iter().copied().collect();
                ids.into_iter().filter(|id| live.contains(id)).collect()
            }
        };

        let mut results = Vec::with_capacity(candidates.len());
        for id in candidates {
            match self.adapter.get::<Record>(&record_key(id))? {
                Some(record) => {
                    if matches(&record, criteria) {
                        results.push((id, record));
                    }
                }
                None => {
                    warn!(target: "docstore::store", collection = %self.config.name, id = %id, "Live id has no stored record");
                }
            }
        }
        Ok(results)
    }

    /// Remove `id` from the index entries of its persisted record
    fn destroy_index(&self, id: RecordId) -> Result<()> {
        match self.adapter.get::<Record>(&record_key(id))? {
            Some(record) => self.index.remove(&record, id),
            None => Ok(()),
        }
    }

    fn persist_live_ids(&self) -> Result<()> {
        self.adapter
            .set(LIVE_IDS_KEY, &encode_live_ids(&self.live_ids))
    }
}

/// Read the stored live-id list
///
/// Normally a JSON string (`"1,2,5"`); a bare number is accepted as a
/// one-element list.
fn load_live_ids(adapter: &StorageAdapter) -> Result<Vec<RecordId>> {
    match adapter.get::<Value>(LIVE_IDS_KEY)? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(text)) => decode_live_ids(&text),
        Some(Value::Number(n)) => decode_live_ids(&n.to_string()),
        Some(other) => Err(Error::corruption(format!(
            "live id list has unexpected type {}",
            docstore_core::type_name(&other)
        ))),
    }
}
