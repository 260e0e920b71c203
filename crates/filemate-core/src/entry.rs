//! File and directory entry snapshots.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::category::{Category, classify};
use crate::error::{FsError, FsResult};

/// Type of file system node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Regular file (or anything that is not a directory).
    File,
    /// Directory.
    Directory,
}

impl EntryKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File)
    }
}

/// Snapshot of one filesystem node, taken at enumeration time.
///
/// Nothing is cached across calls: every listing builds fresh entries.
/// Symlinks are resolved, so `kind` describes the link target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathEntry {
    /// Absolute (or caller-supplied) path.
    pub path: PathBuf,

    /// File/directory name (not full path).
    pub name: CompactString,

    /// Node type.
    pub kind: EntryKind,

    /// Length reported by the OS. For directories this is the raw inode
    /// length, not the aggregate size of the subtree.
    pub len: u64,

    /// Last modification time.
    pub modified: SystemTime,
}

impl PathEntry {
    /// Create a new file entry.
    pub fn new_file(path: impl Into<PathBuf>, len: u64, modified: SystemTime) -> Self {
        Self::new(path.into(), EntryKind::File, len, modified)
    }

    /// Create a new directory entry.
    pub fn new_directory(path: impl Into<PathBuf>, modified: SystemTime) -> Self {
        Self::new(path.into(), EntryKind::Directory, 0, modified)
    }

    fn new(path: PathBuf, kind: EntryKind, len: u64, modified: SystemTime) -> Self {
        let name = entry_name(&path);
        Self {
            path,
            name,
            kind,
            len,
            modified,
        }
    }

    /// Read metadata for `path`. Fails with `NotFound` if nothing is there.
    pub fn from_path(path: impl Into<PathBuf>) -> FsResult<Self> {
        let path = path.into();
        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FsError::not_found(path));
            }
            Err(e) => return Err(FsError::io(path, e)),
        };
        Ok(Self::from_metadata(path, &metadata))
    }

    /// Read metadata for `path`, falling back to an empty file entry when the
    /// metadata is unreadable (broken symlink, vanished entry).
    pub fn snapshot(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match fs::metadata(&path) {
            Ok(metadata) => Self::from_metadata(path, &metadata),
            Err(_) => Self::new(path, EntryKind::File, 0, SystemTime::UNIX_EPOCH),
        }
    }

    fn from_metadata(path: PathBuf, metadata: &fs::Metadata) -> Self {
        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        Self::new(path, kind, metadata.len(), modified)
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this entry is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Extension without the leading dot, empty when there is none.
    pub fn extension(&self) -> &str {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
    }

    /// Display category for this entry.
    pub fn category(&self) -> Category {
        classify(self.extension(), self.is_dir())
    }

    /// Check whether the name starts with a dot.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    /// Format the modification time in local time with a strftime pattern.
    pub fn modified_date(&self, pattern: &str) -> String {
        let local: DateTime<Local> = self.modified.into();
        local.format(pattern).to_string()
    }
}

fn entry_name(path: &Path) -> CompactString {
    path.file_name()
        .map(|n| CompactString::new(n.to_string_lossy()))
        .unwrap_or_else(|| CompactString::new(path.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_entry_creation() {
        let entry = PathEntry::new_file("/data/notes.TXT", 1024, SystemTime::now());
        assert!(entry.is_file());
        assert!(!entry.is_dir());
        assert_eq!(entry.name.as_str(), "notes.TXT");
        assert_eq!(entry.extension(), "TXT");
        assert_eq!(entry.category(), Category::Text);
    }

    #[test]
    fn test_directory_entry_category() {
        let entry = PathEntry::new_directory("/data/archive.zip", SystemTime::now());
        assert!(entry.is_dir());
        assert_eq!(entry.category(), Category::Directory);
    }

    #[test]
    fn test_from_path_missing() {
        let temp = TempDir::new().unwrap();
        let err = PathEntry::from_path(temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, FsError::NotFound { .. }));
    }

    #[test]
    fn test_from_path_reads_metadata() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.bin");
        fs::write(&file, [0u8; 10]).unwrap();

        let entry = PathEntry::from_path(&file).unwrap();
        assert!(entry.is_file());
        assert_eq!(entry.len, 10);

        let dir = PathEntry::from_path(temp.path()).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_snapshot_of_missing_path_is_empty_file() {
        let entry = PathEntry::snapshot("/definitely/not/here.txt");
        assert!(entry.is_file());
        assert_eq!(entry.len, 0);
        assert_eq!(entry.modified, SystemTime::UNIX_EPOCH);
    }

    #[test]
    fn test_hidden() {
        let entry = PathEntry::new_file("/home/u/.profile", 0, SystemTime::now());
        assert!(entry.is_hidden());
    }
}
