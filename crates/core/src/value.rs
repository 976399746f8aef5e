//! Value helpers for docstore
//!
//! Records are plain `serde_json` objects. This module holds the few rules
//! the engine applies to their values:
//! - `as_record`: runtime guard for dynamically-typed insert input
//! - `index_token`: textual form of a value inside an index key
//! - `matches`: exact top-level equality against criteria
//!
//! ## Equality
//!
//! Equality is `serde_json::Value` equality: no coercion between types, so
//! `1 != "1"` and `1 != true`. A record that lacks a criterion field never
//! matches, even when the criterion value is `null`.
//!
//! Integers and floats are distinct numbers as well: `1` and `1.0` compare
//! unequal and render to different index tokens (`"1"` and `"1.0"`), so a
//! record holding `{"n": 1.0}` is not found by `{"n": 1}`.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::{Criteria, Record};

/// Accept a JSON value only if it is an object.
///
/// Numbers, booleans, null, strings and arrays are rejected with
/// `InvalidArgument`.
pub fn as_record(value: Value) -> Result<Record> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::invalid_argument(format!(
            "can't insert {} ({}), please insert an object",
            other,
            type_name(&other)
        ))),
    }
}

/// Name of the JSON type of a value, for messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render a value as it appears in an index key (`<field>:<token>`).
///
/// Strings render raw, so `{"job": "Developer"}` is indexed under
/// `job:Developer`. Everything else renders as compact JSON.
pub fn index_token(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// True when every criterion field is present on the record with an equal value.
pub fn matches(record: &Record, criteria: &Criteria) -> bool {
    criteria
        .iter()
        .all(|(field, expected)| record.get(field) == Some(expected))
}
