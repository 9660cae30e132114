//! Persisting downloaded results to the process temp directory.
//!
//! Files are kept after this process is done with them; the caller owns
//! the returned path and is responsible for removing it.

use std::io::Write;
use std::path::PathBuf;

use crate::error::CoreError;

/// File name prefix for saved results.
pub const TEMP_PREFIX: &str = "sora_video_";

/// Suffix for saved video results.
pub const VIDEO_SUFFIX: &str = ".mp4";

/// Write `bytes` to a fresh, uniquely named file in the temp directory.
///
/// A partially written file is removed before the error is returned.
pub fn save_bytes_to_tempfile(bytes: &[u8], suffix: &str) -> Result<PathBuf, CoreError> {
    let mut file = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(suffix)
        .tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;

    let (_, path) = file.keep().map_err(|e| CoreError::Io(e.error))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Saved result to temp file");
    Ok(path)
}
