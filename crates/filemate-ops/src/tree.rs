//! The blocking tree operations handle.

use std::path::Path;

use filemate_core::{FsError, FsResult};
use tokio_util::sync::CancellationToken;

/// Chunk size used when streaming file contents.
pub const COPY_CHUNK_SIZE: usize = 1024;

/// Blocking copy, move, delete and rename over single files and directory
/// trees.
///
/// Every operation is fail-fast: the first error aborts the remaining
/// traversal and nothing already done is rolled back. The cancellation token
/// is checked before each entry is processed; a cancelled operation fails with
/// [`FsError::Cancelled`] and leaves the same kind of partial state as any
/// other error.
#[derive(Debug, Clone, Default)]
pub struct TreeOps {
    cancel: CancellationToken,
}

impl TreeOps {
    /// Create a handle with its own cancellation token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle that observes an existing token.
    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// The token observed by this handle.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Request cancellation of every operation sharing this token.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) fn checkpoint(&self) -> FsResult<()> {
        if self.cancel.is_cancelled() {
            Err(FsError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Final path component as a string, or an error for paths like `/` or `..`.
pub(crate) fn file_name(path: &Path) -> FsResult<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| FsError::failed(path, "path has no file name"))
}

/// Read metadata without following a final symlink, mapping absence to `NotFound`.
pub(crate) fn existing_metadata(path: &Path) -> FsResult<std::fs::Metadata> {
    match std::fs::symlink_metadata(path) {
        Ok(m) => Ok(m),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(FsError::not_found(path)),
        Err(e) => Err(FsError::io(path, e)),
    }
}
