//! Removable volume lookup over the best available source.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::source::{
    MountTableSource, SecondaryStorageSource, VolumeError, VolumeManagerSource, VolumeSource,
    VolumeTier,
};
use crate::volume::{StorageUsage, VolumeDescriptor, usage_for};

/// Finds removable storage through one [`VolumeSource`].
pub struct VolumeLocator {
    source: Box<dyn VolumeSource>,
}

impl std::fmt::Debug for VolumeLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VolumeLocator")
            .field("tier", &self.source.tier())
            .finish()
    }
}

impl VolumeLocator {
    /// Use `source` for every lookup.
    pub fn new(source: impl VolumeSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Pick the most capable source this platform supports: the OS volume
    /// manager, then the mount table, then the secondary storage variable.
    pub fn detect() -> Self {
        let locator = if VolumeManagerSource::is_supported() {
            Self::new(VolumeManagerSource)
        } else if MountTableSource::default().is_supported() {
            Self::new(MountTableSource::default())
        } else {
            Self::new(SecondaryStorageSource::from_env())
        };
        debug!(tier = %locator.tier(), "volume source selected");
        locator
    }

    pub fn tier(&self) -> VolumeTier {
        self.source.tier()
    }

    /// Every volume the source reports.
    pub fn volumes(&self) -> Result<Vec<VolumeDescriptor>, VolumeError> {
        self.source.volumes()
    }

    /// Root of the first mounted removable volume, if any.
    ///
    /// The path is not checked for existence or readability; see
    /// [`default_root`](Self::default_root) for a checked lookup. Source
    /// errors are logged and reported as no volume.
    pub fn locate_removable_volume(&self) -> Option<PathBuf> {
        match self.source.volumes() {
            Ok(volumes) => volumes
                .into_iter()
                .find(VolumeDescriptor::is_available_removable)
                .map(|v| v.root),
            Err(e) => {
                warn!(tier = %self.tier(), error = %e, "volume lookup failed");
                None
            }
        }
    }

    /// The removable volume when it exists and is readable, else the home
    /// directory (or `/` when there is none).
    pub fn default_root(&self) -> PathBuf {
        let fallback = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
        self.default_root_or(&fallback)
    }

    /// The removable volume when it exists and is readable, else `fallback`.
    pub fn default_root_or(&self, fallback: &Path) -> PathBuf {
        match self.locate_removable_volume() {
            Some(root) if root.is_dir() && fs::read_dir(&root).is_ok() => root,
            Some(root) => {
                debug!(root = %root.display(), "removable volume not readable");
                fallback.to_path_buf()
            }
            None => fallback.to_path_buf(),
        }
    }
}

/// Space on the disk that holds `path`, from the OS disk list.
pub fn storage_usage(path: &Path) -> Option<StorageUsage> {
    let path = path.canonicalize().ok()?;
    let volumes = VolumeManagerSource.volumes().ok()?;
    usage_for(&path, &volumes)
}
