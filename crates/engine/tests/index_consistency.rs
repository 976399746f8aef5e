//! Property tests: index entries always mirror the live records
//!
//! After any sequence of inserts, updates and deletes:
//! - every `<field>:<value>` entry holds exactly the live ids with that value
//! - no entry is stored empty
//! - the persisted live-id list equals the in-memory one
//! - a reopened store sees the same collection

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use docstore_core::{as_record, json, Record, RecordId, Value};
use docstore_engine::RecordStore;
use docstore_storage::{MemoryBackend, RawBackend};

const FIELDS: [&str; 2] = ["job", "city"];

#[derive(Debug, Clone)]
enum Op {
    Insert { job: u8, city: Option<u8> },
    Update { pick: usize, job: u8 },
    Delete { pick: usize },
    DeleteMatching { job: u8 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..3, proptest::option::of(0u8..2)).prop_map(|(job, city)| Op::Insert { job, city }),
        1 => (0usize..16, 0u8..3).prop_map(|(pick, job)| Op::Update { pick, job }),
        1 => (0usize..16).prop_map(|pick| Op::Delete { pick }),
        1 => (0u8..3).prop_map(|job| Op::DeleteMatching { job }),
    ]
}

fn record_for(job: u8, city: Option<u8>) -> Record {
    let mut record = as_record(json!({ "job": format!("job{job}"), "note": "x" })).unwrap();
    if let Some(city) = city {
        record.insert("city".to_string(), json!(city));
    }
    record
}

fn pick_id(store: &RecordStore, pick: usize) -> RecordId {
    let live = store.live_ids();
    if live.is_empty() || pick >= live.len() * 2 {
        // Sometimes target an id that was never live.
        RecordId::new(10_000 + pick as u64)
    } else {
        live[pick % live.len()]
    }
}

/// Rebuild the expected index from the stored records and compare it with
/// the raw index keys in the backend.
fn check_consistency(store: &RecordStore, backend: &MemoryBackend) -> Result<(), TestCaseError> {
    let mut expected: BTreeMap<String, BTreeSet<u64>> = BTreeMap::new();
    for record in store.find_all().map_err(|e| TestCaseError::fail(e.to_string()))? {
        let id = record.get("id").and_then(Value::as_u64).unwrap();
        for field in FIELDS {
            if let Some(value) = record.get(field) {
                let token = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                expected
                    .entry(format!("database:{field}:{token}"))
                    .or_default()
                    .insert(id);
            }
        }
    }

    let mut actual: BTreeMap<String, BTreeSet<u64>> = BTreeMap::new();
    for key in backend.keys() {
        let is_index = FIELDS
            .iter()
            .any(|f| key.starts_with(&format!("database:{f}:")));
        if !is_index {
            continue;
        }
        let text = backend.get_item(&key).unwrap().unwrap();
        let ids: Vec<u64> = serde_json::from_str(&text).unwrap();
        prop_assert!(!ids.is_empty(), "empty index entry stored at {}", key);
        let unique: BTreeSet<u64> = ids.iter().copied().collect();
        prop_assert_eq!(unique.len(), ids.len(), "duplicate ids in {}", key);
        actual.insert(key, unique);
    }

    prop_assert_eq!(actual, expected);

    let persisted = backend
        .get_item("database:__data")
        .unwrap()
        .map(|t| serde_json::from_str::<String>(&t).unwrap())
        .unwrap_or_default();
    let in_memory = store
        .live_ids()
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    prop_assert_eq!(persisted, in_memory);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_indexes_track_live_records(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let backend = MemoryBackend::new();
        let mut store = RecordStore::builder()
            .indexed_fields(FIELDS)
            .backend(backend.clone())
            .open()
            .unwrap();
        let mut last_assigned = 0u64;

        for op in ops {
            match op {
                Op::Insert { job, city } => {
                    let before = store.count();
                    let id = store.insert(record_for(job, city)).unwrap().unwrap();
                    prop_assert!(id.as_u64() > last_assigned);
                    last_assigned = id.as_u64();
                    prop_assert_eq!(store.count(), before + 1);
                }
                Op::Update { pick, job } => {
                    let id = pick_id(&store, pick);
                    let was_live = store.contains(id);
                    let result = store.update(id, record_for(job, None)).unwrap();
                    prop_assert_eq!(result.is_some(), was_live);
                    prop_assert_eq!(store.contains(id), was_live);
                }
                Op::Delete { pick } => {
                    let id = pick_id(&store, pick);
                    let before = store.count();
                    match store.delete(id).unwrap() {
                        Some(removed) => {
                            prop_assert!(removed);
                            prop_assert_eq!(store.count(), before - 1);
                        }
                        None => prop_assert_eq!(store.count(), before),
                    }
                    prop_assert!(!store.contains(id));
                }
                Op::DeleteMatching { job } => {
                    let q = as_record(json!({ "job": format!("job{job}") })).unwrap();
                    let matching = store.find(&q).unwrap().len();
                    let before = store.count();
                    let removed = store.delete_matching(&q).unwrap();
                    prop_assert_eq!(removed, matching > 0);
                    prop_assert_eq!(store.count(), before - matching);
                }
            }
            check_consistency(&store, &backend)?;
        }

        let reopened = RecordStore::builder()
            .indexed_fields(FIELDS)
            .backend(backend.clone())
            .open()
            .unwrap();
        prop_assert_eq!(reopened.live_ids(), store.live_ids());
        prop_assert_eq!(reopened.find_all().unwrap(), store.find_all().unwrap());
    }
}
