//! Record store and secondary index engine for docstore
//!
//! - **RecordStore**: CRUD over a collection of JSON records
//! - **SecondaryIndex**: persisted `<field>:<value>` -> ids entries
//! - **intersect**: linear-time intersection for multi-field indexed queries
//! - **layout**: the persisted key layout (`__data`, `<id>`, `<field>:<value>`)
//!
//! All persistence goes through a [`docstore_storage::StorageAdapter`], so any
//! [`docstore_storage::RawBackend`] can hold a collection.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod index;
pub mod intersect;
pub mod layout;
pub mod store;

pub use index::SecondaryIndex;
pub use intersect::intersect;
pub use store::{RecordStore, RecordStoreBuilder, StoreConfig, DEFAULT_NAME, DEFAULT_UNIQUE_KEY};
