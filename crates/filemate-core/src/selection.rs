//! Predicates over a multi-selection, used to decide which actions apply.

use crate::category::is_archive_extension;
use crate::entry::PathEntry;

/// Exactly one entry, and it is a directory.
pub fn is_single_folder(selection: &[PathEntry]) -> bool {
    matches!(selection, [only] if only.is_dir())
}

/// Exactly one entry, and it is a file.
pub fn is_single_file(selection: &[PathEntry]) -> bool {
    matches!(selection, [only] if only.is_file())
}

/// Contains no directories. An empty selection qualifies.
pub fn is_only_files(selection: &[PathEntry]) -> bool {
    selection.iter().all(PathEntry::is_file)
}

/// Every entry carries an archive extension. Only the name is checked.
pub fn is_archive_files(selection: &[PathEntry]) -> bool {
    selection
        .iter()
        .all(|e| is_archive_extension(e.extension()))
}
