//! Batch operation types.

use std::path::PathBuf;

use filemate_core::FsError;
use serde::{Deserialize, Serialize};

/// A batch operation to be executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FileOperation {
    /// Copy files/directories into a destination folder.
    Copy {
        sources: Vec<PathBuf>,
        destination: PathBuf,
        overwrite: bool,
    },
    /// Move files/directories into a destination folder.
    Move {
        sources: Vec<PathBuf>,
        destination: PathBuf,
    },
    /// Delete files/directories.
    Delete { targets: Vec<PathBuf> },
}

impl FileOperation {
    pub fn copy(sources: Vec<PathBuf>, destination: PathBuf, overwrite: bool) -> Self {
        Self::Copy {
            sources,
            destination,
            overwrite,
        }
    }

    pub fn move_to(sources: Vec<PathBuf>, destination: PathBuf) -> Self {
        Self::Move {
            sources,
            destination,
        }
    }

    pub fn delete(targets: Vec<PathBuf>) -> Self {
        Self::Delete { targets }
    }

    /// The paths the batch works on, one item each.
    pub fn items(&self) -> &[PathBuf] {
        match self {
            Self::Copy { sources, .. } | Self::Move { sources, .. } => sources,
            Self::Delete { targets } => targets,
        }
    }
}

/// An error reported for one item of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationError {
    /// The item that failed.
    pub path: PathBuf,
    /// A human-readable error message.
    pub message: String,
}

impl OperationError {
    pub fn new(path: PathBuf, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Report `error` against `item`.
    pub fn from_fs(item: PathBuf, error: &FsError) -> Self {
        Self::new(item, error.to_string())
    }
}

impl std::fmt::Display for OperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}
