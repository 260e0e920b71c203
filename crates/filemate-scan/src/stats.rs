//! Directory statistics: recursive size, child counts and detail subtitles.

use std::fmt;
use std::fs;
use std::path::Path;

use filemate_core::{PathEntry, human_size};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::inode::InodeTracker;

/// Date pattern used in detail subtitles.
pub const DETAILS_DATE_FORMAT: &str = "%Y-%m-%d";

/// Recursive sum of file lengths below `path`.
///
/// Unreadable directories contribute nothing. A directory reached a second
/// time through a symlink contributes nothing either, so link cycles end.
pub fn folder_size(path: &Path) -> u64 {
    let tracker = InodeTracker::new();
    folder_size_tracked(path, &tracker)
}

fn folder_size_tracked(path: &Path, tracker: &InodeTracker) -> u64 {
    if !tracker.enter(path) {
        trace!(path = %path.display(), "directory already counted");
        return 0;
    }

    let Ok(read_dir) = fs::read_dir(path) else {
        return 0;
    };

    read_dir
        .flatten()
        .map(|child| {
            let child_path = child.path();
            match fs::metadata(&child_path) {
                Ok(m) if m.is_file() => m.len(),
                _ => folder_size_tracked(&child_path, tracker),
            }
        })
        .sum()
}

/// Size of an entry: its length for files, the recursive sum for directories.
pub fn total_size(entry: &PathEntry) -> u64 {
    if entry.is_dir() {
        folder_size(&entry.path)
    } else {
        entry.len
    }
}

/// Number of direct children of a directory, split by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryCounts {
    pub files: usize,
    pub folders: usize,
}

impl EntryCounts {
    /// Sentinel text for a directory with no children.
    pub const EMPTY: &'static str = "Empty folder";

    /// Check if there are no children at all.
    pub fn is_empty(&self) -> bool {
        self.files == 0 && self.folders == 0
    }
}

impl fmt::Display for EntryCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str(Self::EMPTY);
        }
        if self.folders > 0 {
            write!(f, "{} folder", self.folders)?;
            if self.folders > 1 {
                f.write_str("s")?;
            }
            if self.files > 0 {
                f.write_str(", ")?;
            }
        }
        if self.files > 0 {
            write!(f, "{} file", self.files)?;
            if self.files > 1 {
                f.write_str("s")?;
            }
        }
        Ok(())
    }
}

/// Count the direct children of `path`. Not recursive.
///
/// A file or an unreadable directory yields the empty sentinel.
pub fn entry_counts(path: &Path) -> EntryCounts {
    let Ok(read_dir) = fs::read_dir(path) else {
        return EntryCounts::default();
    };

    read_dir
        .flatten()
        .fold(EntryCounts::default(), |mut counts, child| {
            match fs::metadata(child.path()) {
                Ok(m) if m.is_file() => counts.files += 1,
                _ => counts.folders += 1,
            }
            counts
        })
}

/// Subtitle shown under an entry: "2024-05-01  |  1.5 kB" for files,
/// "2024-05-01  |  2 folders, 1 file" for directories.
pub fn details(entry: &PathEntry) -> String {
    let summary = if entry.is_file() {
        human_size(entry.len)
    } else {
        entry_counts(&entry.path).to_string()
    };
    format!("{}  |  {}", entry.modified_date(DETAILS_DATE_FORMAT), summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_counts_display() {
        assert_eq!(EntryCounts::default().to_string(), "Empty folder");
        assert_eq!(EntryCounts { files: 1, folders: 0 }.to_string(), "1 file");
        assert_eq!(EntryCounts { files: 0, folders: 2 }.to_string(), "2 folders");
        assert_eq!(
            EntryCounts { files: 3, folders: 1 }.to_string(),
            "1 folder, 3 files"
        );
    }

    #[test]
    fn test_entry_counts_is_one_level() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("a/b")).unwrap();
        fs::write(temp.path().join("a/b/deep.txt"), "x").unwrap();
        fs::write(temp.path().join("top.txt"), "x").unwrap();

        let counts = entry_counts(temp.path());
        assert_eq!(counts, EntryCounts { files: 1, folders: 1 });
    }

    #[test]
    fn test_entry_counts_of_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f");
        fs::write(&file, "x").unwrap();
        assert!(entry_counts(&file).is_empty());
    }

    #[test]
    fn test_folder_size_sums_descendants() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("a/b")).unwrap();
        fs::write(temp.path().join("one"), [0u8; 10]).unwrap();
        fs::write(temp.path().join("a/two"), [0u8; 20]).unwrap();
        fs::write(temp.path().join("a/b/three"), [0u8; 30]).unwrap();

        assert_eq!(folder_size(temp.path()), 60);
        assert_eq!(folder_size(&temp.path().join("a")), 50);
    }

    #[cfg(unix)]
    #[test]
    fn test_folder_size_survives_symlink_cycle() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("loop");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("data"), [0u8; 7]).unwrap();
        std::os::unix::fs::symlink(&dir, dir.join("back")).unwrap();

        assert_eq!(folder_size(&dir), 7);
    }

    #[test]
    fn test_details_format() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f.txt");
        fs::write(&file, "hello").unwrap();

        let entry = PathEntry::from_path(&file).unwrap();
        let text = details(&entry);
        assert!(text.contains("  |  "));
        assert!(text.ends_with(&human_size(5)));

        let dir = PathEntry::from_path(temp.path()).unwrap();
        assert!(details(&dir).ends_with("1 file"));
    }
}
