use sora_core::error::CoreError;

/// Failures inside a node, reported to the host as a failed envelope.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("extra_fields_json parse error: {0}")]
    ExtraFields(#[source] CoreError),

    #[error("image_base64 decode error: {0}")]
    ImageDecode(#[source] CoreError),

    #[error("download failed: {0}")]
    Download(String),

    #[error("result resolution failed: {0}")]
    Resolve(#[from] CoreError),

    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("invalid inputs for {node}: {source}")]
    InvalidInputs {
        node: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
