//! Field probing over untyped JSON job records.
//!
//! Upstream APIs disagree on field names, so lookups try a fixed list of
//! candidates in priority order. A missing field and a field of the wrong
//! type are both treated as "no match".

use serde_json::Value;

/// Field names that may carry the job identifier, highest priority first.
pub const JOB_ID_FIELDS: [&str; 4] = ["id", "video_id", "job_id", "task_id"];

/// The string value of `key`, if `value` is an object holding a string there.
pub fn string_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// The first of `keys` whose value is a non-empty string.
pub fn first_non_empty<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| string_field(value, key))
        .find(|s| !s.is_empty())
}

/// Extract the job identifier from a creation response body.
pub fn extract_job_id(value: &Value) -> Option<&str> {
    first_non_empty(value, &JOB_ID_FIELDS)
}
