//! Directory listing, ordering, statistics and search for filemate.
//!
//! # Overview
//!
//! `filemate-scan` reads the filesystem on behalf of a caller and returns
//! plain values. Nothing is cached: every call re-reads what it needs.
//!
//! - **Listing** of one directory level, ordered by a [`SortSpec`]
//! - **Comparator chains** built from a [`SortSpec`], grouping rule last
//! - **Statistics**: recursive folder size, child counts, detail subtitles
//! - **Search** by extension, glob, or file contents via jwalk/rayon
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use filemate_scan::{Preferences, SortSpec, list_directory};
//!
//! let prefs = Preferences::load();
//! let spec = SortSpec::from_preferences(&prefs);
//! for entry in list_directory(Path::new("/sdcard"), &spec).unwrap() {
//!     println!("{}", entry.name);
//! }
//! ```

mod inode;
mod listing;
mod search;
pub mod sort;
pub mod stats;

pub use inode::{InodeKey, InodeTracker};
pub use listing::{ListingOptions, list_directory, list_directory_with};
pub use search::{
    MatchKind, SearchConfig, SearchConfigBuilder, SearchError, SearchHit, files_with_extension,
    find, search,
};
pub use sort::{EntryComparator, compare, comparators, sort_entries};
pub use stats::{EntryCounts, details, entry_counts, folder_size, total_size};

// Re-export core types for convenience
pub use filemate_core::{FsError, FsResult, Grouping, PathEntry, Preferences, SortKey, SortSpec};
