/// Errors raised inside the transport layer before they are folded into
/// a failed envelope.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A local upload path does not exist.
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// A local upload path exists but could not be read.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
