//! Removable storage discovery for filemate.
//!
//! A [`VolumeLocator`] wraps one [`VolumeSource`], picked at startup by the
//! platform capabilities available:
//!
//! - [`VolumeManagerSource`]: the OS disk list through `sysinfo`
//! - [`MountTableSource`]: the Linux mount table
//! - [`SecondaryStorageSource`]: the `SECONDARY_STORAGE` environment variable
//!
//! # Example
//!
//! ```rust,no_run
//! use filemate_volume::VolumeLocator;
//!
//! let locator = VolumeLocator::detect();
//! match locator.locate_removable_volume() {
//!     Some(root) => println!("removable storage at {}", root.display()),
//!     None => println!("no removable storage"),
//! }
//! ```

mod locator;
mod mounts;
mod source;
mod volume;

pub use locator::{VolumeLocator, storage_usage};
pub use mounts::{MountEntry, parse_mount_table};
pub use source::{
    MOUNT_TABLE_PATH, MountTableSource, SECONDARY_STORAGE_VAR, SecondaryStorageSource,
    VolumeError, VolumeManagerSource, VolumeSource, VolumeTier,
};
pub use volume::{StorageUsage, VolumeDescriptor, usage_for};
