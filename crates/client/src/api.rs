//! REST client for the Sora video-job HTTP endpoints.
//!
//! Wraps job creation (multipart upload), job lookup and arbitrary
//! downloads using [`reqwest`]. Every method returns an [`Envelope`];
//! failures that happen before a response arrives are folded into
//! [`Envelope::failure`] instead of being returned as errors.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use sora_core::envelope::Envelope;

use crate::error::ClientError;
use crate::request::{
    guess_mime, job_url, join_url, CreateJobRequest, ImageSource, DEFAULT_IMAGE_FILENAME,
    IMAGE_FIELD,
};
use crate::upload::{read_upload, FileOpener, FsOpener};

/// HTTP client for one Sora-compatible API deployment.
pub struct SoraApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    opener: Arc<dyn FileOpener>,
}

impl SoraApiClient {
    /// Create a new API client.
    ///
    /// * `base_url` - API root, e.g. `https://api.dyuapi.com`.
    /// * `api_key`  - bearer token; `None` or empty sends no auth header.
    /// * `timeout`  - per-request timeout.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key, timeout)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
            timeout,
            opener: Arc::new(FsOpener),
        }
    }

    /// Replace the opener used for local upload paths.
    pub fn with_opener(mut self, opener: Arc<dyn FileOpener>) -> Self {
        self.opener = opener;
        self
    }

    /// API root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Submit a job creation request as `multipart/form-data`.
    ///
    /// A local image path is read (and its handle closed) before the
    /// request is sent. A missing file fails locally without touching
    /// the network.
    pub async fn create_job(&self, endpoint: &str, request: &CreateJobRequest) -> Envelope {
        let url = join_url(&self.base_url, endpoint);

        let form = match self.build_form(request) {
            Ok(form) => form,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Job creation request rejected locally");
                return Envelope::failure(e.to_string());
            }
        };

        tracing::debug!(method = "POST", url = %url, "Submitting video job");
        self.execute(self.client.post(&url).multipart(form), &url)
            .await
    }

    /// Fetch a single job record.
    ///
    /// `endpoint` may contain `{id}`; otherwise the id is appended as the
    /// final path segment.
    pub async fn get_job(&self, endpoint: &str, job_id: &str) -> Envelope {
        let url = job_url(&self.base_url, endpoint, job_id);
        tracing::debug!(method = "GET", url = %url, "Fetching video job");
        self.execute(self.client.get(&url), &url).await
    }

    /// Download an absolute URL, keeping the full body in `raw`.
    ///
    /// The base URL is not applied. The auth header is still attached.
    pub async fn download_url(&self, url: &str) -> Envelope {
        tracing::debug!(method = "GET", url = %url, "Downloading result");
        self.execute(self.client.get(url), url).await
    }

    // ---- private helpers ----

    /// Assemble the multipart body: text fields, then the optional image.
    fn build_form(&self, request: &CreateJobRequest) -> Result<Form, ClientError> {
        let mut form = Form::new();
        for (name, value) in request.form_fields() {
            form = form.text(name, value);
        }

        let image = match &request.image {
            Some(ImageSource::Bytes { data, filename }) => {
                let filename = filename
                    .as_deref()
                    .filter(|f| !f.is_empty())
                    .unwrap_or(DEFAULT_IMAGE_FILENAME)
                    .to_string();
                Some((data.clone(), filename))
            }
            Some(ImageSource::Path(path)) => {
                let data = read_upload(self.opener.as_ref(), path)?;
                Some((data, upload_filename(path)))
            }
            None => None,
        };

        if let Some((data, filename)) = image {
            let mime = guess_mime(&filename);
            let part = Part::bytes(data).file_name(filename).mime_str(&mime)?;
            form = form.part(IMAGE_FIELD, part);
        }

        Ok(form)
    }

    /// Send a request and fold any transport error into a failed envelope.
    async fn execute(&self, request: reqwest::RequestBuilder, url: &str) -> Envelope {
        match self.send(request).await {
            Ok(envelope) => {
                tracing::debug!(url = %url, status = ?envelope.status_code, "Received response");
                envelope
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "HTTP exchange failed");
                Envelope::failure(e.to_string())
            }
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Envelope, ClientError> {
        let response = self.authorize(request).timeout(self.timeout).send().await?;
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let raw = response.bytes().await?.to_vec();
        Ok(Envelope::from_exchange(status, headers, raw))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(AUTHORIZATION, format!("Bearer {key}")),
            None => request,
        }
    }
}

/// Flatten a header map, joining repeated values with `", "`.
fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut out: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        out.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    out
}

/// File name sent for a local upload: the path's last component.
fn upload_filename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_IMAGE_FILENAME.to_string())
}
