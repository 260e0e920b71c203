//! Rename and file name validation.

use std::fs;
use std::path::Path;

use filemate_core::{FsError, FsResult};
use tracing::debug;

use crate::tree::TreeOps;

/// Characters never allowed in a file name.
const INVALID_CHARS: &[char] = &['"', '*', '/', ':', '>', '<', '?', '\\', '|', '\n', '\t', '\u{7f}'];

/// Check a file name: non-empty, no reserved punctuation, no control
/// characters (anything at or below U+001F, and DEL).
pub fn is_valid_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| INVALID_CHARS.contains(&c) || c <= '\u{1f}')
}

/// Validate a file name, returning `InvalidName` when it is rejected.
pub fn validate_file_name(name: &str) -> FsResult<()> {
    if is_valid_file_name(name) {
        Ok(())
    } else {
        Err(FsError::InvalidName {
            name: name.to_string(),
        })
    }
}

impl TreeOps {
    /// Rename `path` within its parent directory.
    ///
    /// Reports failure as `false` instead of an error: invalid names, an
    /// existing entry with the new name, and OS refusals all return `false`.
    pub fn rename(&self, path: &Path, new_name: &str) -> bool {
        if !is_valid_file_name(new_name) || self.is_cancelled() {
            return false;
        }
        let Some(parent) = path.parent() else {
            return false;
        };

        let target = parent.join(new_name);
        if target != path && fs::symlink_metadata(&target).is_ok() {
            debug!(target = %target.display(), "rename target exists");
            return false;
        }

        match fs::rename(path, &target) {
            Ok(()) => true,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "rename failed");
                false
            }
        }
    }
}
