//! Volume sources, one per platform capability tier.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use strum::{Display, IntoStaticStr};
use sysinfo::Disks;
use thiserror::Error;
use tracing::debug;

use crate::mounts::parse_mount_table;
use crate::volume::VolumeDescriptor;

/// Environment variable listing secondary storage roots, colon separated.
pub const SECONDARY_STORAGE_VAR: &str = "SECONDARY_STORAGE";

/// Default mount table read by [`MountTableSource`].
pub const MOUNT_TABLE_PATH: &str = "/proc/self/mounts";

/// Errors raised while enumerating volumes.
#[derive(Debug, Error)]
pub enum VolumeError {
    /// The mount table could not be read.
    #[error("Failed to read mount table {path}: {source}")]
    MountTable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Platform capability tier a source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum VolumeTier {
    /// The OS volume manager, queried through sysinfo.
    VolumeManager,
    /// The Linux mount table.
    MountTable,
    /// The secondary storage environment variable.
    SecondaryStorage,
}

/// Enumerates volumes through one platform mechanism.
pub trait VolumeSource: Send + Sync {
    /// The tier this source implements.
    fn tier(&self) -> VolumeTier;

    /// Every volume this source can see.
    fn volumes(&self) -> Result<Vec<VolumeDescriptor>, VolumeError>;
}

/// Volumes reported by the OS disk list.
#[derive(Debug, Default, Clone, Copy)]
pub struct VolumeManagerSource;

impl VolumeManagerSource {
    /// Whether the OS reports any disk at all.
    pub fn is_supported() -> bool {
        !Disks::new_with_refreshed_list().list().is_empty()
    }
}

impl VolumeSource for VolumeManagerSource {
    fn tier(&self) -> VolumeTier {
        VolumeTier::VolumeManager
    }

    fn volumes(&self) -> Result<Vec<VolumeDescriptor>, VolumeError> {
        let disks = Disks::new_with_refreshed_list();
        Ok(disks
            .list()
            .iter()
            .map(|disk| {
                let name = disk.name().to_string_lossy();
                VolumeDescriptor {
                    root: disk.mount_point().to_path_buf(),
                    removable: disk.is_removable(),
                    mounted: true,
                    label: (!name.is_empty()).then(|| name.into_owned()),
                    total: disk.total_space(),
                    available: disk.available_space(),
                }
            })
            .collect())
    }
}

/// Volumes listed in a Linux mount table.
///
/// Mounts under `/media/`, `/run/media/` and `/mnt/` are removable unless
/// they use a network filesystem. Sizes are not reported.
#[derive(Debug, Clone)]
pub struct MountTableSource {
    path: PathBuf,
}

impl Default for MountTableSource {
    fn default() -> Self {
        Self::new(MOUNT_TABLE_PATH)
    }
}

impl MountTableSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the mount table can be read.
    pub fn is_supported(&self) -> bool {
        fs::metadata(&self.path).is_ok()
    }
}

impl VolumeSource for MountTableSource {
    fn tier(&self) -> VolumeTier {
        VolumeTier::MountTable
    }

    fn volumes(&self) -> Result<Vec<VolumeDescriptor>, VolumeError> {
        let content = fs::read_to_string(&self.path).map_err(|source| VolumeError::MountTable {
            path: self.path.clone(),
            source,
        })?;

        let entries = parse_mount_table(&content);
        debug!(path = %self.path.display(), mounts = entries.len(), "read mount table");
        Ok(entries
            .into_iter()
            .map(|entry| VolumeDescriptor {
                removable: entry.is_removable(),
                label: Some(entry.device),
                ..VolumeDescriptor::mounted(entry.mount_point, false)
            })
            .collect())
    }
}

/// The first entry of the secondary storage variable.
///
/// The entry is reported as a mounted removable volume without checking
/// that it is non-empty or exists.
#[derive(Debug, Clone, Default)]
pub struct SecondaryStorageSource {
    value: Option<String>,
}

impl SecondaryStorageSource {
    /// Read [`SECONDARY_STORAGE_VAR`] from the environment.
    pub fn from_env() -> Self {
        Self::new(env::var(SECONDARY_STORAGE_VAR).ok())
    }

    pub fn new(value: Option<String>) -> Self {
        Self { value }
    }
}

impl VolumeSource for SecondaryStorageSource {
    fn tier(&self) -> VolumeTier {
        VolumeTier::SecondaryStorage
    }

    fn volumes(&self) -> Result<Vec<VolumeDescriptor>, VolumeError> {
        Ok(self
            .value
            .as_deref()
            .and_then(|value| value.split(':').next())
            .map(|first| VolumeDescriptor::mounted(first, true))
            .into_iter()
            .collect())
    }
}
