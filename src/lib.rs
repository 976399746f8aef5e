//! docstore - a small document store over any key-value backend
//!
//! docstore keeps a flat collection of JSON records in a key-value store
//! (in memory, a JSON file, or any backend reachable through three
//! callbacks), with optional secondary indexes for equality lookups.
//!
//! # Quick Start
//!
//! ```ignore
//! use docstore::{as_record, json, RecordStore};
//!
//! let mut people = RecordStore::builder()
//!     .name("people")
//!     .indexed_field("job")
//!     .open()?;
//!
//! let id = people.insert(as_record(json!({"name": "Ada", "job": "Developer"}))?)?;
//! let devs = people.find(&as_record(json!({"job": "Developer"}))?)?;
//! people.delete(id.unwrap())?;
//! ```
//!
//! # Architecture
//!
//! - `docstore-core`: ids, record types, value rules, errors
//! - `docstore-storage`: raw backends and the namespacing/JSON adapter
//! - `docstore-engine`: the record store and its index engine
//!
//! Only the types a caller needs are re-exported here.

pub use docstore_core::{
    as_record, index_token, json, matches, Criteria, Error, Record, RecordId, Result, Value,
};
pub use docstore_engine::{intersect, RecordStore, RecordStoreBuilder, StoreConfig};
pub use docstore_storage::{
    CallbackBackend, CallbackBackendBuilder, JsonFileBackend, MemoryBackend, RawBackend,
    StorageAdapter,
};
