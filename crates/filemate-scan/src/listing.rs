//! One-level directory listing.

use std::fs;
use std::path::Path;

use filemate_core::{FsError, FsResult, PathEntry, Preferences, SortSpec};
use tracing::{debug, warn};

use crate::sort::sort_entries;

/// Options that filter a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOptions {
    /// Include dot-files.
    pub include_hidden: bool,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            include_hidden: true,
        }
    }
}

impl ListingOptions {
    /// Options derived from persisted preferences.
    pub fn from_preferences(prefs: &Preferences) -> Self {
        Self {
            include_hidden: prefs.show_hidden,
        }
    }
}

/// List the direct children of `path`, ordered by `spec`.
///
/// Every call re-reads the filesystem. Children whose metadata cannot be read
/// are listed as empty files.
pub fn list_directory(path: &Path, spec: &SortSpec) -> FsResult<Vec<PathEntry>> {
    list_directory_with(path, spec, &ListingOptions::default())
}

/// List the direct children of `path` with explicit options.
pub fn list_directory_with(
    path: &Path,
    spec: &SortSpec,
    options: &ListingOptions,
) -> FsResult<Vec<PathEntry>> {
    let root = PathEntry::from_path(path)?;
    if !root.is_dir() {
        return Err(FsError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    let read_dir = fs::read_dir(path).map_err(|e| FsError::io(path, e))?;
    let mut entries = Vec::new();
    for child in read_dir {
        let child = match child {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let entry = PathEntry::snapshot(child.path());
        if !options.include_hidden && entry.is_hidden() {
            continue;
        }
        entries.push(entry);
    }

    sort_entries(spec, &mut entries);
    debug!(path = %path.display(), count = entries.len(), "listed directory");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use filemate_core::{Grouping, SortKey};
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory() {
        let temp = TempDir::new().unwrap();
        let err = list_directory(&temp.path().join("nope"), &SortSpec::default()).unwrap_err();
        assert!(matches!(err, FsError::NotFound { .. }));
    }

    #[test]
    fn test_listing_a_file_fails() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        fs::write(&file, "a").unwrap();
        let err = list_directory(&file, &SortSpec::default()).unwrap_err();
        assert!(matches!(err, FsError::NotADirectory { .. }));
    }

    #[test]
    fn test_hidden_filter() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".hidden"), "").unwrap();
        fs::write(temp.path().join("shown"), "").unwrap();

        let spec = SortSpec::by(SortKey::NameAsc, Grouping::FoldersFirst);
        assert_eq!(list_directory(temp.path(), &spec).unwrap().len(), 2);

        let options = ListingOptions {
            include_hidden: false,
        };
        let entries = list_directory_with(temp.path(), &spec, &options).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name.as_str(), "shown");
    }
}
