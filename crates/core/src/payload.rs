//! Decoding of caller-supplied payloads: Base64 images and videos, data
//! URIs, and the JSON-encoded extra form fields.

use std::collections::BTreeMap;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::error::CoreError;

/// Standard alphabet, padding optional.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Strip a `data:<mime>;base64,` header, if present.
///
/// Everything up to and including the first comma is removed. Input that
/// does not start with `data:` (or has no comma) is returned unchanged.
pub fn strip_data_uri(input: &str) -> &str {
    if !input.starts_with("data:") {
        return input;
    }
    match input.split_once(',') {
        Some((_, payload)) => payload,
        None => input,
    }
}

/// Decode a Base64 payload, tolerating a data-URI header, embedded
/// whitespace and missing padding.
pub fn decode_base64(input: &str) -> Result<Vec<u8>, CoreError> {
    let compact: String = strip_data_uri(input)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    Ok(LENIENT_BASE64.decode(compact)?)
}

/// Parse the JSON-encoded extra form fields.
///
/// The input must be a JSON object. String values are sent verbatim,
/// every other value as its JSON text.
pub fn parse_extra_fields(raw: &str) -> Result<BTreeMap<String, String>, CoreError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| CoreError::ExtraFields(e.to_string()))?;

    let map = match value {
        serde_json::Value::Object(map) => map,
        other => {
            return Err(CoreError::ExtraFields(format!(
                "expected a JSON object, got: {other}"
            )))
        }
    };

    Ok(map
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, text)
        })
        .collect())
}
