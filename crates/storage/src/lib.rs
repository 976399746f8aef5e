//! Storage layer for docstore
//!
//! This crate implements the persistence surface consumed by the record store:
//! - RawBackend: string get/set/remove trait every backend implements
//! - MemoryBackend: process-local fallback (`parking_lot::RwLock<HashMap>`)
//! - JsonFileBackend: single-file persistent backend with atomic rewrites
//! - CallbackBackend: backend assembled from closures, validated at build
//! - StorageAdapter: collection namespacing + JSON encoding over any backend

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod backend;
pub mod callback;
pub mod file;
pub mod memory;

pub use adapter::StorageAdapter;
pub use backend::RawBackend;
pub use callback::{CallbackBackend, CallbackBackendBuilder};
pub use file::JsonFileBackend;
pub use memory::MemoryBackend;
