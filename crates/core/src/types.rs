//! Core types for docstore
//!
//! This module defines the foundational types:
//! - RecordId: store-assigned integer identifier of a record
//! - Record: a schema-free JSON object
//! - Criteria: field -> value equality constraints for queries

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A stored document: top-level field name -> JSON value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Equality criteria for queries. An empty map matches every record.
pub type Criteria = serde_json::Map<String, serde_json::Value>;

/// Identifier assigned to a record by its collection
///
/// Ids are positive and strictly increasing within an open collection; a
/// deleted record's id is not handed out again by the same store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    /// Wrap a raw id. Zero is reserved for "no records yet".
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw integer value
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// The id that follows this one
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u64 = s
            .trim()
            .parse()
            .map_err(|_| Error::corruption(format!("'{}' is not a record id", s)))?;
        if raw == 0 {
            return Err(Error::corruption("record id 0 is reserved"));
        }
        Ok(Self(raw))
    }
}

impl From<u64> for RecordId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<RecordId> for u64 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl From<RecordId> for serde_json::Value {
    fn from(id: RecordId) -> Self {
        serde_json::Value::from(id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_display_is_bare_integer() {
        assert_eq!(RecordId::new(42).to_string(), "42");
    }

    #[test]
    fn test_record_id_parse() {
        assert_eq!("7".parse::<RecordId>().unwrap(), RecordId::new(7));
        assert_eq!(" 12 ".parse::<RecordId>().unwrap(), RecordId::new(12));
    }

    #[test]
    fn test_record_id_parse_rejects_garbage_and_zero() {
        assert!("abc".parse::<RecordId>().is_err());
        assert!("-3".parse::<RecordId>().is_err());
        assert!("".parse::<RecordId>().is_err());
        assert!("0".parse::<RecordId>().is_err());
    }

    #[test]
    fn test_record_id_ordering_and_next() {
        let a = RecordId::new(1);
        assert!(a < a.next());
        assert_eq!(a.next().as_u64(), 2);
    }

    #[test]
    fn test_record_id_serializes_as_number() {
        let json = serde_json::to_string(&vec![RecordId::new(1), RecordId::new(5)]).unwrap();
        assert_eq!(json, "[1,5]");
        let back: Vec<RecordId> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![RecordId::new(1), RecordId::new(5)]);
    }
}
