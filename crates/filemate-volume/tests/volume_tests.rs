use std::fs;
use std::path::{Path, PathBuf};

use filemate_volume::{
    MountTableSource, SecondaryStorageSource, VolumeDescriptor, VolumeError, VolumeLocator,
    VolumeSource, VolumeTier,
};
use tempfile::TempDir;

struct NoVolumes;

impl VolumeSource for NoVolumes {
    fn tier(&self) -> VolumeTier {
        VolumeTier::VolumeManager
    }

    fn volumes(&self) -> Result<Vec<VolumeDescriptor>, VolumeError> {
        Ok(Vec::new())
    }
}

#[test]
fn test_no_removable_volume_is_none() {
    let locator = VolumeLocator::new(NoVolumes);
    assert_eq!(locator.locate_removable_volume(), None);
    assert_eq!(
        locator.default_root_or(Path::new("/home/fallback")),
        PathBuf::from("/home/fallback")
    );
}

#[test]
fn test_only_fixed_mounts_is_none() {
    let temp = TempDir::new().unwrap();
    let table = temp.path().join("mounts");
    fs::write(
        &table,
        "/dev/sda1 / ext4 rw 0 0\nproc /proc proc rw 0 0\nsrv:/x /mnt/nas nfs rw 0 0\n",
    )
    .unwrap();

    let locator = VolumeLocator::new(MountTableSource::new(&table));
    assert_eq!(locator.tier(), VolumeTier::MountTable);
    assert_eq!(locator.locate_removable_volume(), None);
}

#[test]
fn test_mount_table_removable_volume() {
    let temp = TempDir::new().unwrap();
    let table = temp.path().join("mounts");
    fs::write(&table, "/dev/sda1 / ext4 rw 0 0\n/dev/sdb1 /media/usb vfat rw 0 0\n").unwrap();

    let locator = VolumeLocator::new(MountTableSource::new(&table));
    assert_eq!(locator.locate_removable_volume(), Some(PathBuf::from("/media/usb")));
}

#[test]
fn test_secondary_storage_tier() {
    let temp = TempDir::new().unwrap();
    let card = temp.path().join("sdcard1");
    fs::create_dir(&card).unwrap();

    let value = format!("{}:/storage/usb0", card.display());
    let locator = VolumeLocator::new(SecondaryStorageSource::new(Some(value)));
    assert_eq!(locator.locate_removable_volume(), Some(card.clone()));
    assert_eq!(locator.default_root_or(Path::new("/fallback")), card);
}

#[test]
fn test_detect_picks_a_tier() {
    let locator = VolumeLocator::detect();
    let tier = locator.tier();
    assert!(matches!(
        tier,
        VolumeTier::VolumeManager | VolumeTier::MountTable | VolumeTier::SecondaryStorage
    ));
}
