//! Locating a finished video inside an arbitrary job record.
//!
//! Each strategy is a pure function from the job JSON to the candidates it
//! recognizes, in priority order. [`resolution_plan`] concatenates them;
//! the download node tries every candidate in turn and stops at the first
//! one that yields a saved file.

use serde_json::Value;
use sora_core::fields::string_field;

/// Top-level fields that may hold a download URL.
pub const URL_FIELDS: [&str; 4] = ["video_url", "url", "download_url", "video"];

/// Top-level fields that may hold the video inline as Base64.
pub const BASE64_FIELDS: [&str; 3] = ["video_base64", "video_b64", "b64"];

/// URL fields checked on the first entry of `outputs`.
pub const OUTPUT_URL_FIELDS: [&str; 3] = ["url", "download_url", "video_url"];

/// URL fields checked on the `result` object.
pub const RESULT_URL_FIELDS: [&str; 3] = ["url", "video_url", "download_url"];

/// Strings at or below this length are never treated as Base64 video.
pub const MIN_BASE64_LEN: usize = 100;

/// Something that might turn into a video file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate<'a> {
    /// Download this URL.
    Url(&'a str),
    /// Decode this Base64 payload.
    Base64(&'a str),
}

/// Which heuristic produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    ExplicitField,
    TopLevelUrl,
    TopLevelBase64,
    FirstOutput,
    ResultObject,
}

/// A candidate tagged with the strategy that found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt<'a> {
    pub strategy: Strategy,
    pub candidate: Candidate<'a>,
}

type StrategyFn = for<'a> fn(&'a Value) -> Vec<Candidate<'a>>;

/// Field-name strategies in priority order (after any explicit field).
const STRATEGIES: [(Strategy, StrategyFn); 4] = [
    (Strategy::TopLevelUrl, top_level_urls),
    (Strategy::TopLevelBase64, top_level_base64),
    (Strategy::FirstOutput, first_output_urls),
    (Strategy::ResultObject, result_urls),
];

fn is_url(s: &str) -> bool {
    s.starts_with("http")
}

fn is_base64_blob(s: &str) -> bool {
    s.len() > MIN_BASE64_LEN
}

fn url_candidates<'a>(value: &'a Value, keys: &[&str]) -> Vec<Candidate<'a>> {
    keys.iter()
        .filter_map(|key| string_field(value, key))
        .filter(|s| is_url(s))
        .map(Candidate::Url)
        .collect()
}

/// Candidates from a caller-named field: a URL, a Base64 blob, or both
/// for a long URL.
pub fn explicit_field<'a>(json: &'a Value, field: &str) -> Vec<Candidate<'a>> {
    let Some(value) = string_field(json, field) else {
        return Vec::new();
    };
    let mut candidates = Vec::new();
    if is_url(value) {
        candidates.push(Candidate::Url(value));
    }
    if is_base64_blob(value) {
        candidates.push(Candidate::Base64(value));
    }
    candidates
}

pub fn top_level_urls(json: &Value) -> Vec<Candidate<'_>> {
    url_candidates(json, &URL_FIELDS)
}

pub fn top_level_base64(json: &Value) -> Vec<Candidate<'_>> {
    BASE64_FIELDS
        .iter()
        .filter_map(|key| string_field(json, key))
        .filter(|s| is_base64_blob(s))
        .map(Candidate::Base64)
        .collect()
}

/// URLs on `outputs[0]`, when it is an object.
pub fn first_output_urls(json: &Value) -> Vec<Candidate<'_>> {
    match json
        .get("outputs")
        .and_then(Value::as_array)
        .and_then(|outputs| outputs.first())
    {
        Some(first @ Value::Object(_)) => url_candidates(first, &OUTPUT_URL_FIELDS),
        _ => Vec::new(),
    }
}

/// URLs on the `result` object.
pub fn result_urls(json: &Value) -> Vec<Candidate<'_>> {
    match json.get("result") {
        Some(result @ Value::Object(_)) => url_candidates(result, &RESULT_URL_FIELDS),
        _ => Vec::new(),
    }
}

/// Every candidate in the order it should be tried.
pub fn resolution_plan<'a>(json: &'a Value, explicit: Option<&str>) -> Vec<Attempt<'a>> {
    let mut plan: Vec<Attempt<'a>> = explicit
        .map(|field| explicit_field(json, field))
        .unwrap_or_default()
        .into_iter()
        .map(|candidate| Attempt {
            strategy: Strategy::ExplicitField,
            candidate,
        })
        .collect();

    for (strategy, find) in STRATEGIES {
        plan.extend(
            find(json)
                .into_iter()
                .map(|candidate| Attempt { strategy, candidate }),
        );
    }
    plan
}
