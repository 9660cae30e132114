//! `CreateVideoJob` node: submit a generation job and extract its id.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sora_client::api::SoraApiClient;
use sora_client::request::{CreateJobRequest, ImageSource, DEFAULT_IMAGE_FILENAME};
use sora_core::fields::extract_job_id;
use sora_core::payload::{decode_base64, parse_extra_fields};

use crate::config::DEFAULT_BASE_URL;
use crate::error::NodeError;
use crate::non_empty;
use crate::output::NodeOutput;

/// Default job creation endpoint.
pub const DEFAULT_CREATE_ENDPOINT: &str = "/v1/videos";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "sora2-portrait-15s";

/// Default request timeout for job creation, in seconds.
pub const DEFAULT_CREATE_TIMEOUT_SECS: u64 = 60;

/// Inputs of the `CreateVideoJob` node. Missing inputs take the defaults
/// the host shows in its widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateVideoJob {
    pub base_url: String,
    pub endpoint: String,
    pub api_key: String,
    pub prompt: String,
    /// Local reference image; ignored when `image_base64` is set.
    pub file_path: String,
    /// Base64 reference image, optionally as a `data:` URI.
    pub image_base64: String,
    pub filename: String,
    pub model: String,
    pub trim: bool,
    /// JSON object of extra form fields.
    pub extra_fields_json: String,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for CreateVideoJob {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: DEFAULT_CREATE_ENDPOINT.to_string(),
            api_key: String::new(),
            prompt: String::new(),
            file_path: String::new(),
            image_base64: String::new(),
            filename: DEFAULT_IMAGE_FILENAME.to_string(),
            model: DEFAULT_MODEL.to_string(),
            trim: true,
            extra_fields_json: String::new(),
            timeout: DEFAULT_CREATE_TIMEOUT_SECS,
        }
    }
}

impl CreateVideoJob {
    /// Build a client from the node inputs and submit the job.
    pub async fn run(&self) -> NodeOutput {
        let client = SoraApiClient::new(
            self.base_url.as_str(),
            Some(self.api_key.clone()),
            Duration::from_secs(self.timeout),
        );
        self.run_with(&client).await
    }

    /// Submit the job through an existing client.
    ///
    /// Invalid extra fields or image data fail locally with an empty job
    /// id; nothing is sent in that case.
    pub async fn run_with(&self, client: &SoraApiClient) -> NodeOutput {
        let request = match self.build_request() {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected video job inputs");
                return NodeOutput::failure(&e);
            }
        };

        let response = client.create_job(&self.endpoint, &request).await;
        let job_id = extract_job_id(response.json_or_null())
            .unwrap_or_default()
            .to_string();

        if job_id.is_empty() {
            tracing::warn!(
                status = ?response.status_code,
                error = ?response.error,
                "No job id in creation response",
            );
        } else {
            tracing::info!(job_id = %job_id, "Video job created");
        }

        NodeOutput::new(response, job_id)
    }

    /// Validate and decode the inputs into a transport request.
    pub fn build_request(&self) -> Result<CreateJobRequest, NodeError> {
        let extra_fields = match non_empty(&self.extra_fields_json) {
            Some(raw) => parse_extra_fields(raw).map_err(NodeError::ExtraFields)?,
            None => BTreeMap::new(),
        };

        let image_bytes = match non_empty(&self.image_base64) {
            Some(encoded) => Some(decode_base64(encoded).map_err(NodeError::ImageDecode)?),
            None => None,
        };

        let image = ImageSource::select(
            image_bytes,
            non_empty(&self.filename).map(str::to_owned),
            non_empty(&self.file_path).map(PathBuf::from),
        );

        Ok(CreateJobRequest {
            prompt: Some(self.prompt.clone()),
            model: non_empty(&self.model).map(str::to_owned),
            trim: Some(self.trim),
            image,
            extra_fields,
        })
    }
}
