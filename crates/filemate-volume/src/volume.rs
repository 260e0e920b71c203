//! Volume descriptors and disk usage.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// A storage volume as reported by a [`VolumeSource`](crate::VolumeSource).
///
/// Size fields are 0 when the source cannot report them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeDescriptor {
    /// Mount point of the volume.
    pub root: PathBuf,
    /// Whether the device can be detached (USB sticks, SD cards).
    pub removable: bool,
    /// Whether the volume is currently mounted.
    pub mounted: bool,
    /// Device or volume name, if known.
    pub label: Option<String>,
    pub total: u64,
    pub available: u64,
}

impl VolumeDescriptor {
    /// A mounted volume with unknown label and sizes.
    pub fn mounted(root: impl Into<PathBuf>, removable: bool) -> Self {
        Self {
            root: root.into(),
            removable,
            mounted: true,
            label: None,
            total: 0,
            available: 0,
        }
    }

    /// Whether this volume can be offered as removable storage.
    pub fn is_available_removable(&self) -> bool {
        self.removable && self.mounted
    }
}

/// Space on the volume that holds a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StorageUsage {
    pub total: u64,
    pub available: u64,
}

impl StorageUsage {
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.available)
    }

    /// Used space as a percentage of the total (0.0 when unknown).
    pub fn used_percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.used() as f64 / self.total as f64 * 100.0
        }
    }
}

/// Usage of the volume whose mount point is the longest prefix of `path`.
pub fn usage_for(path: &Path, volumes: &[VolumeDescriptor]) -> Option<StorageUsage> {
    volumes
        .iter()
        .filter(|v| path.starts_with(&v.root))
        .max_by_key(|v| v.root.components().count())
        .map(|v| StorageUsage {
            total: v.total,
            available: v.available,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(root: &str, total: u64, available: u64) -> VolumeDescriptor {
        VolumeDescriptor {
            total,
            available,
            ..VolumeDescriptor::mounted(root, false)
        }
    }

    #[test]
    fn test_longest_prefix_wins() {
        let volumes = [sized("/", 100, 40), sized("/home", 500, 100), sized("/home2", 9, 9)];

        let usage = usage_for(Path::new("/home/user/file.txt"), &volumes).unwrap();
        assert_eq!(usage.total, 500);
        assert_eq!(usage.used(), 400);
        assert_eq!(usage.used_percentage(), 80.0);

        assert_eq!(usage_for(Path::new("/etc"), &volumes).unwrap().total, 100);
    }

    #[test]
    fn test_no_matching_volume() {
        let volumes = [sized("/data", 1, 1)];
        assert!(usage_for(Path::new("/home"), &volumes).is_none());
    }

    #[test]
    fn test_available_removable() {
        let mut volume = VolumeDescriptor::mounted("/media/usb", true);
        assert!(volume.is_available_removable());
        volume.mounted = false;
        assert!(!volume.is_available_removable());
    }
}
