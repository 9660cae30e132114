//! `GetVideoJobStatus` node: fetch a job's status once, or poll until it
//! reaches a terminal status or the poll timeout expires.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sora_client::api::SoraApiClient;
use sora_core::status::{extract_status, is_done_status};
use tokio::time::Instant;

use crate::config::DEFAULT_BASE_URL;
use crate::output::NodeOutput;

/// Default job lookup endpoint.
pub const DEFAULT_JOB_ENDPOINT: &str = "/v1/videos/{id}";

/// Floor applied to the poll interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(500);

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_STATUS_TIMEOUT_SECS: u64 = 30;

/// Fixed-interval polling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Pause between attempts; raised to [`MIN_POLL_INTERVAL`] if shorter.
    pub interval: Duration,
    /// Wall-clock budget measured from the first attempt.
    pub timeout: Duration,
}

impl PollOptions {
    /// The interval actually slept between attempts.
    pub fn effective_interval(&self) -> Duration {
        self.interval.max(MIN_POLL_INTERVAL)
    }
}

/// Inputs of the `GetVideoJobStatus` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetVideoJobStatus {
    pub base_url: String,
    /// Lookup endpoint; `{id}` is replaced, otherwise the id is appended.
    pub endpoint: String,
    pub api_key: String,
    pub job_id: String,
    pub poll: bool,
    /// Seconds between polls.
    pub poll_interval: u64,
    /// Total polling budget in seconds.
    pub poll_timeout: u64,
    /// Per-request timeout in seconds.
    pub timeout: u64,
}

impl Default for GetVideoJobStatus {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: DEFAULT_JOB_ENDPOINT.to_string(),
            api_key: String::new(),
            job_id: String::new(),
            poll: false,
            poll_interval: DEFAULT_POLL_INTERVAL_SECS,
            poll_timeout: DEFAULT_POLL_TIMEOUT_SECS,
            timeout: DEFAULT_STATUS_TIMEOUT_SECS,
        }
    }
}

impl GetVideoJobStatus {
    pub async fn run(&self) -> NodeOutput {
        let client = SoraApiClient::new(
            self.base_url.as_str(),
            Some(self.api_key.clone()),
            Duration::from_secs(self.timeout),
        );
        self.run_with(&client).await
    }

    pub async fn run_with(&self, client: &SoraApiClient) -> NodeOutput {
        match self.poll_options() {
            Some(options) => poll_status(client, &self.endpoint, &self.job_id, &options).await,
            None => fetch_status(client, &self.endpoint, &self.job_id).await,
        }
    }

    /// Polling parameters, or `None` for a single lookup.
    pub fn poll_options(&self) -> Option<PollOptions> {
        self.poll.then(|| PollOptions {
            interval: Duration::from_secs(self.poll_interval),
            timeout: Duration::from_secs(self.poll_timeout),
        })
    }
}

/// Look the job up once and report its status.
pub async fn fetch_status(client: &SoraApiClient, endpoint: &str, job_id: &str) -> NodeOutput {
    let response = client.get_job(endpoint, job_id).await;
    let status = extract_status(&response);
    tracing::debug!(job_id, status = %status, "Fetched job status");
    NodeOutput::new(response, status)
}

/// Poll the job until its status is terminal or `options.timeout` has
/// elapsed.
///
/// Reaching the timeout is not an error: the last observed envelope and
/// status are returned. A transport failure ends the loop immediately
/// with that failure as the result.
pub async fn poll_status(
    client: &SoraApiClient,
    endpoint: &str,
    job_id: &str,
    options: &PollOptions,
) -> NodeOutput {
    let started = Instant::now();
    let interval = options.effective_interval();
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        let response = client.get_job(endpoint, job_id).await;
        let status = extract_status(&response);
        tracing::debug!(job_id, attempt, status = %status, "Polled job status");

        if response.is_transport_failure() {
            tracing::warn!(
                job_id,
                attempt,
                error = ?response.error,
                "Polling stopped by transport failure",
            );
            return NodeOutput::new(response, status);
        }

        if is_done_status(&status) {
            tracing::info!(job_id, attempt, status = %status, "Job reached terminal status");
            return NodeOutput::new(response, status);
        }

        if started.elapsed() >= options.timeout {
            tracing::info!(
                job_id,
                attempt,
                status = %status,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Poll timeout reached",
            );
            return NodeOutput::new(response, status);
        }

        tokio::time::sleep(interval).await;
    }
}
