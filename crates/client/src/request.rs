//! Request descriptions and URL building.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Placeholder substituted with the job id in status endpoints.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Multipart field name carrying the reference image.
pub const IMAGE_FIELD: &str = "input_reference";

/// Filename used for in-memory images when the caller gives none.
pub const DEFAULT_IMAGE_FILENAME: &str = "input.png";

/// Reference image attached to a job creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Image bytes already in memory.
    Bytes {
        data: Vec<u8>,
        filename: Option<String>,
    },
    /// A local file to read at send time.
    Path(PathBuf),
}

impl ImageSource {
    /// Choose the image to upload: in-memory bytes win over a local path.
    pub fn select(
        bytes: Option<Vec<u8>>,
        filename: Option<String>,
        path: Option<PathBuf>,
    ) -> Option<Self> {
        match (bytes, path) {
            (Some(data), _) => Some(Self::Bytes { data, filename }),
            (None, Some(path)) => Some(Self::Path(path)),
            (None, None) => None,
        }
    }
}

/// Inputs for a multipart job creation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateJobRequest {
    pub prompt: Option<String>,
    pub model: Option<String>,
    pub trim: Option<bool>,
    pub image: Option<ImageSource>,
    /// Extra form fields; a key already used above is overridden.
    pub extra_fields: BTreeMap<String, String>,
}

impl CreateJobRequest {
    /// Text form fields in send order.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields: Vec<(String, String)> = Vec::new();
        if let Some(prompt) = &self.prompt {
            fields.push(("prompt".into(), prompt.clone()));
        }
        if let Some(model) = &self.model {
            fields.push(("model".into(), model.clone()));
        }
        if let Some(trim) = self.trim {
            fields.push(("trim".into(), trim.to_string()));
        }
        for (key, value) in &self.extra_fields {
            match fields.iter_mut().find(|(k, _)| k == key) {
                Some(existing) => existing.1 = value.clone(),
                None => fields.push((key.clone(), value.clone())),
            }
        }
        fields
    }
}

/// Best-effort MIME type for an upload filename.
pub fn guess_mime(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Join a base URL and an endpoint path with exactly one `/`.
pub fn join_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// URL of a single job: substitute `{id}` when present, otherwise append
/// the id as a trailing path segment.
pub fn job_url(base_url: &str, endpoint: &str, job_id: &str) -> String {
    if endpoint.contains(ID_PLACEHOLDER) {
        join_url(base_url, &endpoint.replace(ID_PLACEHOLDER, job_id))
    } else {
        format!(
            "{}/{}",
            join_url(base_url, endpoint).trim_end_matches('/'),
            job_id
        )
    }
}
