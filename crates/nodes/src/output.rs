use serde::Serialize;
use sora_core::envelope::Envelope;

use crate::error::NodeError;

/// What a node hands back to the host: the full response envelope plus
/// one extracted scalar (job id, status, or saved file path).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeOutput {
    pub response: Envelope,
    pub value: String,
}

impl NodeOutput {
    pub fn new(response: Envelope, value: impl Into<String>) -> Self {
        Self {
            response,
            value: value.into(),
        }
    }

    /// A local failure: failed envelope, empty value.
    pub fn failure(error: &NodeError) -> Self {
        Self::new(Envelope::failure(error.to_string()), String::new())
    }
}
