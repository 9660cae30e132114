#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("invalid extra fields: {0}")]
    ExtraFields(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
