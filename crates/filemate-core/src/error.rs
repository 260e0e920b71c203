//! Error types for filesystem operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by listing, statistics and tree operations.
///
/// Every tree operation is fail-fast: the first error aborts the remaining
/// traversal and is returned as-is, with no rollback of work already done.
#[derive(Debug, Error)]
pub enum FsError {
    /// Source path was absent when the operation started.
    #[error("File {path} doesn't exist")]
    NotFound { path: PathBuf },

    /// Creating, reading, writing, renaming or deleting failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Target path is occupied by an entry of an incompatible kind.
    #[error("Unable to create {path}: an entry with the same name exists")]
    NameCollision { path: PathBuf },

    /// Path exists but is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// File name rejected by validation.
    #[error("Invalid file name: {name:?}")]
    InvalidName { name: String },

    /// Operation was cancelled at a checkpoint.
    #[error("Operation cancelled")]
    Cancelled,

    /// Reading or writing a zip archive failed.
    #[error("Archive error at {path}: {message}")]
    Archive { path: PathBuf, message: String },
}

impl FsError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an I/O error from a message, for failures the OS reports only as `false`.
    pub fn failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::io(path, std::io::Error::other(message.into()))
    }

    /// Create a not-found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create an archive error.
    pub fn archive(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::Archive {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// The path this error refers to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::NotFound { path }
            | Self::Io { path, .. }
            | Self::NameCollision { path }
            | Self::NotADirectory { path }
            | Self::Archive { path, .. } => Some(path),
            Self::InvalidName { .. } | Self::Cancelled => None,
        }
    }
}

/// Result alias used across filemate crates.
pub type FsResult<T> = Result<T, FsError>;
