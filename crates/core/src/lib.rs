//! Core types for docstore
//!
//! This crate defines the foundational types used throughout the system:
//! - RecordId: store-assigned integer identifier
//! - Record / Criteria: schema-free JSON objects
//! - Value helpers: insert guard, index tokens, equality matching
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;
pub mod value;

pub use error::{Error, Result};
pub use types::{Criteria, Record, RecordId};
pub use value::{as_record, index_token, matches, type_name};

/// Re-exported so callers can build records without a direct dependency.
pub use serde_json::{json, Value};
