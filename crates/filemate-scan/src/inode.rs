//! Directory identity tracking for cycle detection.

use std::fs::Metadata;
use std::path::Path;

use dashmap::DashSet;

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

/// (device, inode) pair identifying a directory independently of the path
/// it was reached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InodeKey {
    pub device: u64,
    pub inode: u64,
}

impl InodeKey {
    /// Create a key from raw device and inode numbers.
    pub fn new(device: u64, inode: u64) -> Self {
        Self { device, inode }
    }

    /// Identity of the node behind `metadata`. None where the platform has
    /// no inode numbers.
    #[cfg(unix)]
    pub fn from_metadata(metadata: &Metadata) -> Option<Self> {
        Some(Self::new(metadata.dev(), metadata.ino()))
    }

    #[cfg(not(unix))]
    pub fn from_metadata(_metadata: &Metadata) -> Option<Self> {
        None
    }

    /// Identity of the node at `path`, following symlinks.
    pub fn of_path(path: &Path) -> Option<Self> {
        std::fs::metadata(path)
            .ok()
            .and_then(|m| Self::from_metadata(&m))
    }
}

/// Tracks directories already entered during a recursive walk.
///
/// A symlink that points back at an ancestor would otherwise make the walk
/// recurse forever; the second visit of the same (device, inode) pair is
/// reported so the caller can skip it.
#[derive(Debug, Default)]
pub struct InodeTracker {
    seen: DashSet<InodeKey>,
}

impl InodeTracker {
    /// Create a new tracker.
    pub fn new() -> Self {
        Self {
            seen: DashSet::new(),
        }
    }

    /// Track a directory. Returns `true` the first time a key is seen.
    pub fn track(&self, key: InodeKey) -> bool {
        self.seen.insert(key)
    }

    /// Check if a key has been seen (without tracking).
    pub fn has_seen(&self, key: &InodeKey) -> bool {
        self.seen.contains(key)
    }

    /// Track the directory at `path`. Paths without an identity are always
    /// reported as new.
    pub fn enter(&self, path: &Path) -> bool {
        match InodeKey::of_path(path) {
            Some(key) => self.track(key),
            None => true,
        }
    }

    /// Number of distinct directories tracked.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Check if nothing has been tracked.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
