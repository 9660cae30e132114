//! Opening local files for multipart upload.
//!
//! Reading goes through the [`FileOpener`] seam so tests can observe the
//! handle lifecycle. The client reads the whole file and drops the handle
//! before any network I/O starts.

use std::io::Read;
use std::path::Path;

use crate::error::ClientError;

/// Source of readable handles for local upload paths.
pub trait FileOpener: Send + Sync {
    /// Open `path` for reading.
    fn open(&self, path: &Path) -> std::io::Result<Box<dyn Read + Send>>;
}

/// Opens files from the local file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsOpener;

impl FileOpener for FsOpener {
    fn open(&self, path: &Path) -> std::io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(std::fs::File::open(path)?))
    }
}

/// Read the full contents of `path` through `opener`.
///
/// The handle is scoped to this function and closed on every return path.
pub fn read_upload(opener: &dyn FileOpener, path: &Path) -> Result<Vec<u8>, ClientError> {
    let mut handle = opener.open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ClientError::FileNotFound(path.display().to_string()),
        _ => ClientError::FileRead {
            path: path.display().to_string(),
            source: e,
        },
    })?;

    let mut data = Vec::new();
    handle
        .read_to_end(&mut data)
        .map_err(|e| ClientError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;
    Ok(data)
}
