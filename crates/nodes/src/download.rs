//! `DownloadVideoResult` node: fetch a job record and turn whatever it
//! points at into a local `.mp4` file.
//!
//! An empty saved path is the normal "not ready / not found" outcome; it
//! is never reported as an error.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sora_client::api::SoraApiClient;
use sora_core::envelope::Envelope;
use sora_core::payload::decode_base64;
use sora_core::storage::{save_bytes_to_tempfile, VIDEO_SUFFIX};

use crate::config::DEFAULT_BASE_URL;
use crate::error::NodeError;
use crate::non_empty;
use crate::output::NodeOutput;
use crate::resolve::{resolution_plan, Candidate};
use crate::status::{DEFAULT_JOB_ENDPOINT, DEFAULT_STATUS_TIMEOUT_SECS};

/// Content-type prefix that marks the job response itself as the video.
const VIDEO_CONTENT_TYPE_PREFIX: &str = "video";

/// Inputs of the `DownloadVideoResult` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadVideoResult {
    pub base_url: String,
    pub endpoint: String,
    pub api_key: String,
    pub job_id: String,
    /// Field holding a URL or Base64 video; empty means auto-detect.
    pub download_field: String,
    /// Per-request timeout in seconds.
    pub timeout: u64,
}

impl Default for DownloadVideoResult {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: DEFAULT_JOB_ENDPOINT.to_string(),
            api_key: String::new(),
            job_id: String::new(),
            download_field: String::new(),
            timeout: DEFAULT_STATUS_TIMEOUT_SECS,
        }
    }
}

impl DownloadVideoResult {
    pub async fn run(&self) -> NodeOutput {
        let client = SoraApiClient::new(
            self.base_url.as_str(),
            Some(self.api_key.clone()),
            Duration::from_secs(self.timeout),
        );
        self.run_with(&client).await
    }

    pub async fn run_with(&self, client: &SoraApiClient) -> NodeOutput {
        download_result(
            client,
            &self.endpoint,
            &self.job_id,
            non_empty(&self.download_field),
        )
        .await
    }
}

/// Fetch the job and resolve its result into a saved file.
///
/// Returns the job envelope and the saved path, or an empty path when no
/// strategy produced a file.
pub async fn download_result(
    client: &SoraApiClient,
    endpoint: &str,
    job_id: &str,
    download_field: Option<&str>,
) -> NodeOutput {
    let response = client.get_job(endpoint, job_id).await;
    let saved_path = resolve_result(client, &response, download_field)
        .await
        .map(|path| path.to_string_lossy().into_owned())
        .unwrap_or_default();

    if saved_path.is_empty() {
        tracing::info!(job_id, "No downloadable result found");
    } else {
        tracing::info!(job_id, path = %saved_path, "Saved job result");
    }

    NodeOutput::new(response, saved_path)
}

/// Try every resolution candidate, then the raw response body.
async fn resolve_result(
    client: &SoraApiClient,
    response: &Envelope,
    download_field: Option<&str>,
) -> Option<PathBuf> {
    for attempt in resolution_plan(response.json_or_null(), download_field) {
        match materialize(client, attempt.candidate).await {
            Ok(path) => return Some(path),
            Err(e) => {
                tracing::debug!(strategy = ?attempt.strategy, error = %e, "Resolution attempt failed");
            }
        }
    }

    let is_video = response
        .header("content-type")
        .is_some_and(|ct| ct.starts_with(VIDEO_CONTENT_TYPE_PREFIX));
    if is_video && !response.body().is_empty() {
        match save_bytes_to_tempfile(response.body(), VIDEO_SUFFIX) {
            Ok(path) => return Some(path),
            Err(e) => tracing::debug!(error = %e, "Failed to save raw video response"),
        }
    }

    None
}

/// Download or decode one candidate and save it.
async fn materialize(client: &SoraApiClient, candidate: Candidate<'_>) -> Result<PathBuf, NodeError> {
    let bytes = match candidate {
        Candidate::Url(url) => {
            let download = client.download_url(url).await;
            if !download.ok {
                let reason = download
                    .error
                    .clone()
                    .or_else(|| download.status_code.map(|code| format!("HTTP {code}")))
                    .unwrap_or_else(|| "no response".to_string());
                return Err(NodeError::Download(reason));
            }
            download.raw.unwrap_or_default()
        }
        Candidate::Base64(encoded) => decode_base64(encoded)?,
    };
    Ok(save_bytes_to_tempfile(&bytes, VIDEO_SUFFIX)?)
}
