//! Normalized HTTP response record.
//!
//! Every transport call returns an [`Envelope`], whether the exchange
//! succeeded, came back with an HTTP error status, or never reached the
//! server at all. Exactly one of two shapes holds:
//!
//! * a completed exchange: `status_code`, `headers`, `text` and `raw` are
//!   populated (plus `json` when the body is JSON-shaped), `error` is `None`;
//! * a transport failure: only `error` is set, `ok` is `false`.

use std::collections::BTreeMap;

use serde::Serialize;

/// Content type marker that forces a JSON parse attempt.
const JSON_CONTENT_TYPE: &str = "application/json";

/// The single response shape returned by the transport client.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Envelope {
    /// HTTP status code, `None` on transport failure.
    pub status_code: Option<u16>,
    /// `true` iff a response was received with a 2xx status.
    pub ok: bool,
    /// Response headers keyed by lowercase name.
    pub headers: BTreeMap<String, String>,
    /// Response body decoded as UTF-8 (lossy).
    pub text: String,
    /// Parsed body, present only when the body is JSON-shaped and parses.
    pub json: Option<serde_json::Value>,
    /// Raw response body bytes.
    #[serde(skip)]
    pub raw: Option<Vec<u8>>,
    /// Transport-level or local validation failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    /// Build an envelope from a completed HTTP exchange.
    ///
    /// Header names are lowercased; repeated headers should already be
    /// joined by the caller.
    pub fn from_exchange(
        status_code: u16,
        headers: BTreeMap<String, String>,
        raw: Vec<u8>,
    ) -> Self {
        let headers: BTreeMap<String, String> = headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        let text = String::from_utf8_lossy(&raw).into_owned();
        let content_type = headers.get("content-type").map(String::as_str).unwrap_or("");
        let json = if is_json_shaped(content_type, &text) {
            serde_json::from_str(&text).ok()
        } else {
            None
        };

        Self {
            status_code: Some(status_code),
            ok: (200..300).contains(&status_code),
            headers,
            text,
            json,
            raw: Some(raw),
            error: None,
        }
    }

    /// Build a failed envelope carrying only an error description.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Parsed JSON body, or `Null` when the body was not JSON.
    ///
    /// Field lookups on `Null` return `None`, so callers can probe fields
    /// without first checking whether a body was parsed.
    pub fn json_or_null(&self) -> &serde_json::Value {
        self.json.as_ref().unwrap_or(&serde_json::Value::Null)
    }

    /// Raw body bytes, empty when absent.
    pub fn body(&self) -> &[u8] {
        self.raw.as_deref().unwrap_or_default()
    }

    /// Whether this envelope records a failure that happened before any
    /// HTTP response was received.
    pub fn is_transport_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// A body is JSON-shaped when the content type says so or the text
/// (ignoring leading whitespace) opens an object.
pub fn is_json_shaped(content_type: &str, text: &str) -> bool {
    content_type.contains(JSON_CONTENT_TYPE) || text.trim_start().starts_with('{')
}
