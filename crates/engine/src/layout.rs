//! Persisted key layout of a collection
//!
//! Logical keys (before the adapter adds the `"<collection>:"` prefix):
//!
//! | key               | value                                    |
//! |-------------------|------------------------------------------|
//! | `__data`          | comma-joined live ids, e.g. `"1,2,5"`    |
//! | `<id>`            | the record, as a JSON object             |
//! | `<field>:<value>` | JSON array of ids sharing that value     |
//!
//! Ids are parsed once here, at load time. Everything past this module works
//! with [`RecordId`] only.

use serde_json::Value;

use docstore_core::{index_token, Error, RecordId, Result};

/// Key of the live-id list
pub const LIVE_IDS_KEY: &str = "__data";

/// Key of a record
pub fn record_key(id: RecordId) -> String {
    id.to_string()
}

/// Key of the index entry for `field == value`
pub fn index_key(field: &str, value: &Value) -> String {
    format!("{}:{}", field, index_token(value))
}

/// Render the live-id list as stored
pub fn encode_live_ids(ids: &[RecordId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a stored live-id list
///
/// An empty string is an empty collection. Repeated ids keep their first
/// position.
///
/// # Errors
///
/// `Corruption` if any element is not a positive integer.
pub fn decode_live_ids(text: &str) -> Result<Vec<RecordId>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut ids: Vec<RecordId> = Vec::new();
    for part in text.split(',') {
        let id: RecordId = part
            .parse()
            .map_err(|e: Error| Error::corruption(format!("live id list: {}", e)))?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(raw: &[u64]) -> Vec<RecordId> {
        raw.iter().copied().map(RecordId::new).collect()
    }

    #[test]
    fn test_record_key() {
        assert_eq!(record_key(RecordId::new(12)), "12");
    }

    #[test]
    fn test_index_key() {
        assert_eq!(index_key("job", &json!("Developer")), "job:Developer");
        assert_eq!(index_key("age", &json!(30)), "age:30");
        assert_eq!(index_key("active", &json!(true)), "active:true");
    }

    #[test]
    fn test_encode_live_ids() {
        assert_eq!(encode_live_ids(&ids(&[1, 2, 5])), "1,2,5");
        assert_eq!(encode_live_ids(&[]), "");
    }

    #[test]
    fn test_decode_live_ids() {
        assert_eq!(decode_live_ids("1,2,5").unwrap(), ids(&[1, 2, 5]));
        assert_eq!(decode_live_ids("7").unwrap(), ids(&[7]));
        assert!(decode_live_ids("").unwrap().is_empty());
    }

    #[test]
    fn test_decode_collapses_duplicates() {
        assert_eq!(decode_live_ids("3,1,3").unwrap(), ids(&[3, 1]));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_live_ids("1,x,3"),
            Err(Error::Corruption(_))
        ));
        assert!(decode_live_ids("1,,3").is_err());
        assert!(decode_live_ids("0").is_err());
    }
}
