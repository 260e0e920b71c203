//! Recursive delete.

use std::fs;
use std::path::{Path, PathBuf};

use filemate_core::{FsError, FsResult};
use tracing::{debug, trace};

use crate::tree::{TreeOps, existing_metadata};

impl TreeOps {
    /// Delete a file, or a directory with everything below it.
    ///
    /// Fails with `NotFound` when nothing is at `path`. Directory contents are
    /// removed depth-first before the directory itself; the first failure
    /// aborts the traversal, so ancestors of the failing entry remain.
    /// Symlinks are removed, never followed.
    pub fn delete_file(&self, path: &Path) -> FsResult<()> {
        self.checkpoint()?;
        let metadata = existing_metadata(path)?;

        if metadata.is_dir() {
            for child in fs::read_dir(path).map_err(|e| FsError::io(path, e))? {
                let child = child.map_err(|e| FsError::io(path, e))?;
                self.delete_file(&child.path())?;
            }
            fs::remove_dir(path).map_err(|e| FsError::io(path, e))?;
        } else {
            fs::remove_file(path).map_err(|e| FsError::io(path, e))?;
        }

        trace!(path = %path.display(), "deleted");
        Ok(())
    }

    /// Delete each path in order. The first failure aborts the batch;
    /// paths after it are not attempted.
    pub fn delete_files(&self, paths: &[PathBuf]) -> FsResult<()> {
        debug!(count = paths.len(), "delete batch");
        paths.iter().try_for_each(|path| self.delete_file(path))
    }
}
