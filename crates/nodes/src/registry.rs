//! Name-based node registry.
//!
//! Hosts address nodes by the names they were registered under and pass
//! inputs as a JSON object. Dispatch never panics: unknown names and
//! malformed inputs come back as failed envelopes.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::create::CreateVideoJob;
use crate::download::DownloadVideoResult;
use crate::error::NodeError;
use crate::output::NodeOutput;
use crate::status::GetVideoJobStatus;

/// Host menu category all nodes are listed under.
pub const CATEGORY: &str = "SORA";

/// Output slot types shared by every node: response record, scalar.
pub const RETURN_TYPES: [&str; 2] = ["JSON", "STRING"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    CreateVideoJob,
    GetVideoJobStatus,
    DownloadVideoResult,
}

impl NodeKind {
    pub const ALL: [NodeKind; 3] = [
        NodeKind::CreateVideoJob,
        NodeKind::GetVideoJobStatus,
        NodeKind::DownloadVideoResult,
    ];

    /// Name the host registers this node under.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::CreateVideoJob => "CreateVideoJob",
            NodeKind::GetVideoJobStatus => "GetVideoJobStatus",
            NodeKind::DownloadVideoResult => "DownloadVideoResult",
        }
    }

    /// Meaning of the scalar output.
    pub fn value_label(self) -> &'static str {
        match self {
            NodeKind::CreateVideoJob => "job_id",
            NodeKind::GetVideoJobStatus => "status",
            NodeKind::DownloadVideoResult => "saved_video_path",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Deserialize `inputs` for this node and run it.
    ///
    /// `null` is accepted as "all defaults".
    pub async fn run(self, inputs: Value) -> NodeOutput {
        let inputs = if inputs.is_null() {
            Value::Object(Default::default())
        } else {
            inputs
        };

        match self {
            NodeKind::CreateVideoJob => match parse::<CreateVideoJob>(self, inputs) {
                Ok(node) => node.run().await,
                Err(e) => NodeOutput::failure(&e),
            },
            NodeKind::GetVideoJobStatus => match parse::<GetVideoJobStatus>(self, inputs) {
                Ok(node) => node.run().await,
                Err(e) => NodeOutput::failure(&e),
            },
            NodeKind::DownloadVideoResult => match parse::<DownloadVideoResult>(self, inputs) {
                Ok(node) => node.run().await,
                Err(e) => NodeOutput::failure(&e),
            },
        }
    }
}

fn parse<T: DeserializeOwned>(kind: NodeKind, inputs: Value) -> Result<T, NodeError> {
    serde_json::from_value(inputs).map_err(|source| NodeError::InvalidInputs {
        node: kind.name(),
        source,
    })
}

/// Run the node registered as `name` with JSON `inputs`.
pub async fn run_node(name: &str, inputs: Value) -> NodeOutput {
    match NodeKind::from_name(name) {
        Some(kind) => {
            tracing::debug!(node = kind.name(), "Running node");
            kind.run(inputs).await
        }
        None => {
            let err = NodeError::UnknownNode(name.to_string());
            tracing::warn!(error = %err, "Node dispatch failed");
            NodeOutput::failure(&err)
        }
    }
}
