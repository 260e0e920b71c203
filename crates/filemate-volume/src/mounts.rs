//! Linux mount table parsing.

use std::path::PathBuf;

/// Mount roots treated as removable media.
const REMOVABLE_PREFIXES: &[&str] = &["/media/", "/run/media/", "/mnt/"];

/// Network filesystems are never removable, even under `/mnt/`.
const NETWORK_FS_TYPES: &[&str] = &["nfs", "nfs4", "cifs", "smbfs", "smb3", "fuse.sshfs"];

/// One line of a mount table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub device: String,
    pub mount_point: PathBuf,
    pub fs_type: String,
}

impl MountEntry {
    pub fn is_removable(&self) -> bool {
        let mount_point = self.mount_point.to_string_lossy();
        !NETWORK_FS_TYPES.contains(&self.fs_type.as_str())
            && REMOVABLE_PREFIXES.iter().any(|p| mount_point.starts_with(p))
    }
}

/// Parse `/proc/mounts` style text. Malformed lines are skipped.
pub fn parse_mount_table(content: &str) -> Vec<MountEntry> {
    content
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let device = fields.next()?;
            let mount_point = fields.next()?;
            let fs_type = fields.next()?;
            Some(MountEntry {
                device: unescape(device),
                mount_point: PathBuf::from(unescape(mount_point)),
                fs_type: fs_type.to_string(),
            })
        })
        .collect()
}

/// Decode the octal escapes (`\040` for space) used in mount tables.
fn unescape(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\'
            && let Some(octal) = bytes.get(i + 1..i + 4)
            && octal.iter().all(|b| (b'0'..=b'7').contains(b))
        {
            let value = octal.iter().fold(0u32, |acc, b| acc * 8 + u32::from(b - b'0'));
            if let Ok(byte) = u8::try_from(value) {
                out.push(byte);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
