//! Core types and pure helpers for filemate.
//!
//! This crate provides the data structures shared by the other filemate
//! crates: entry snapshots, sort configuration, persisted preferences,
//! the error type, and the stateless classification and size formatting
//! helpers used for display.

mod category;
mod config;
mod entry;
mod error;
mod request;
mod selection;
mod size;
mod sort;

pub use category::{
    Category, DEFAULT_MIME, Family, classify, is_archive_extension, mime_type,
};
pub use config::{DEFAULT_DEEP_SEARCH_SIZE_LIMIT, Preferences, TextEditorPreferences};
pub use entry::{EntryKind, PathEntry};
pub use error::{FsError, FsResult};
pub use request::{CopyMoveRequest, CopyMoveRequestBuilder};
pub use selection::{is_archive_files, is_only_files, is_single_file, is_single_folder};
pub use size::{DEFAULT_DECIMAL_PLACES, format_size, format_size_with, human_size};
pub use sort::{Grouping, SortKey, SortMethod, SortSpec};
