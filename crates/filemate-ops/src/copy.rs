//! Copy of files and directory trees.

use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use filemate_core::{CopyMoveRequest, FsError, FsResult};
use tracing::{debug, trace, warn};

use crate::tree::{COPY_CHUNK_SIZE, TreeOps, file_name};

impl TreeOps {
    /// Copy `source` into `destination_dir`, keeping its name.
    ///
    /// Returns the number of bytes written. Fails with `NotFound` when the
    /// source is absent.
    pub fn copy(&self, source: &Path, destination_dir: &Path, overwrite: bool) -> FsResult<u64> {
        let name = file_name(source)?;
        self.copy_as(source, &name, destination_dir, overwrite)
    }

    /// Copy according to a request (target name defaults to the source name).
    pub fn copy_request(&self, request: &CopyMoveRequest) -> FsResult<u64> {
        self.copy_as(
            &request.source,
            &request.target_name(),
            &request.destination,
            request.overwrite,
        )
    }

    fn copy_as(
        &self,
        source: &Path,
        target_name: &str,
        destination_dir: &Path,
        overwrite: bool,
    ) -> FsResult<u64> {
        let metadata = match fs::metadata(source) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(FsError::not_found(source)),
            Err(e) => return Err(FsError::io(source, e)),
        };

        debug!(source = %source.display(), destination = %destination_dir.display(), overwrite, "copy");
        if metadata.is_file() {
            self.copy_file(source, target_name, destination_dir, overwrite)
        } else {
            self.copy_folder(source, target_name, destination_dir, overwrite)
        }
    }

    /// Copy one file to `destination_dir/target_name`.
    ///
    /// The destination directory is created when absent. An existing target
    /// with `overwrite == false` is left untouched and the call succeeds
    /// with 0 bytes written. Otherwise the target is truncated and the
    /// content streamed over in [`COPY_CHUNK_SIZE`] chunks.
    pub fn copy_file(
        &self,
        source: &Path,
        target_name: &str,
        destination_dir: &Path,
        overwrite: bool,
    ) -> FsResult<u64> {
        self.checkpoint()?;

        if !destination_dir.exists() {
            fs::create_dir_all(destination_dir).map_err(|e| FsError::io(destination_dir, e))?;
        }

        let target = destination_dir.join(target_name);
        if target.exists() {
            if !overwrite {
                trace!(target = %target.display(), "target exists, skipping");
                return Ok(0);
            }
            if same_file(source, &target) {
                return Err(FsError::NameCollision { path: target });
            }
        }

        let mut reader = File::open(source).map_err(|e| FsError::io(source, e))?;
        let mut writer = File::create(&target).map_err(|e| FsError::io(&target, e))?;

        let mut buffer = [0u8; COPY_CHUNK_SIZE];
        let mut written = 0u64;
        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(FsError::io(source, e)),
            };
            writer
                .write_all(&buffer[..n])
                .map_err(|e| FsError::io(&target, e))?;
            written += n as u64;
        }
        writer.flush().map_err(|e| FsError::io(&target, e))?;

        trace!(source = %source.display(), target = %target.display(), bytes = written, "copied file");
        Ok(written)
    }

    /// Copy a directory tree to `destination_dir/target_name`, depth-first.
    ///
    /// The target folder is created when absent; a file occupying the target
    /// path is a `NameCollision`. Files inside are copied with
    /// [`copy_file`](Self::copy_file) using the same overwrite policy. A
    /// failure leaves the partially copied tree in place.
    pub fn copy_folder(
        &self,
        source: &Path,
        target_name: &str,
        destination_dir: &Path,
        overwrite: bool,
    ) -> FsResult<u64> {
        self.checkpoint()?;

        let target = destination_dir.join(target_name);
        if is_inside(destination_dir, source) {
            return Err(FsError::failed(&target, "cannot copy a folder into itself"));
        }
        if !target.exists() {
            fs::create_dir_all(&target).map_err(|e| FsError::io(&target, e))?;
        }
        if target.is_file() {
            return Err(FsError::NameCollision { path: target });
        }

        let mut written = 0u64;
        for child in fs::read_dir(source).map_err(|e| FsError::io(source, e))? {
            let child = child.map_err(|e| FsError::io(source, e))?;
            let child_path = child.path();
            let child_name = child.file_name().to_string_lossy().into_owned();

            if child.file_type().is_ok_and(|t| t.is_symlink()) && fs::metadata(&child_path).is_err() {
                warn!(path = %child_path.display(), "skipping broken symlink");
                continue;
            }

            if child_path.is_file() {
                written += self.copy_file(&child_path, &child_name, &target, overwrite)?;
            } else {
                written += self.copy_folder(&child_path, &child_name, &target, overwrite)?;
            }
        }
        Ok(written)
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Check whether `path` is `ancestor` or lies below it.
fn is_inside(path: &Path, ancestor: &Path) -> bool {
    match (path.canonicalize(), ancestor.canonicalize()) {
        (Ok(path), Ok(ancestor)) => path.starts_with(ancestor),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_file_creates_destination() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "hello").unwrap();

        let dest = temp.path().join("new/nested");
        let bytes = TreeOps::new().copy_file(&source, "b.txt", &dest, false).unwrap();
        assert_eq!(bytes, 5);
        assert_eq!(fs::read(dest.join("b.txt")).unwrap(), b"hello");
    }

    #[test]
    fn test_copy_file_larger_than_one_chunk() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("big.bin");
        let content: Vec<u8> = (0..(COPY_CHUNK_SIZE * 3 + 17)).map(|i| i as u8).collect();
        fs::write(&source, &content).unwrap();

        let dest = temp.path().join("out");
        TreeOps::new().copy(&source, &dest, false).unwrap();
        assert_eq!(fs::read(dest.join("big.bin")).unwrap(), content);
    }

    #[test]
    fn test_overwrite_truncates_longer_target() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "short").unwrap();
        let dest = temp.path().join("out");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("a.txt"), "a much longer previous content").unwrap();

        TreeOps::new().copy(&source, &dest, true).unwrap();
        assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "short");
    }

    #[test]
    fn test_copy_onto_itself_is_rejected() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "keep me").unwrap();

        let err = TreeOps::new().copy(&source, temp.path(), true).unwrap_err();
        assert!(matches!(err, FsError::NameCollision { .. }));
        assert_eq!(fs::read_to_string(&source).unwrap(), "keep me");
    }

    #[test]
    fn test_copy_folder_into_itself_is_rejected() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("dir");
        fs::create_dir(&source).unwrap();

        let err = TreeOps::new().copy(&source, &source, false).unwrap_err();
        assert!(matches!(err, FsError::Io { .. }));
    }

    #[test]
    fn test_copy_folder_onto_file_collides() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("dir");
        fs::create_dir(&source).unwrap();
        let dest = temp.path().join("out");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("dir"), "i am a file").unwrap();

        let err = TreeOps::new().copy(&source, &dest, false).unwrap_err();
        assert!(matches!(err, FsError::NameCollision { .. }));
    }

    #[test]
    fn test_copy_missing_source() {
        let temp = TempDir::new().unwrap();
        let err = TreeOps::new()
            .copy(&temp.path().join("nope"), temp.path(), false)
            .unwrap_err();
        assert!(matches!(err, FsError::NotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_folder_skips_broken_symlink() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("a.txt"), "a").unwrap();
        std::os::unix::fs::symlink("../gone", source.join("dangling")).unwrap();

        let dest = temp.path().join("out");
        let written = TreeOps::new().copy(&source, &dest, false).unwrap();

        assert_eq!(written, 1);
        assert_eq!(fs::read_to_string(dest.join("src/a.txt")).unwrap(), "a");
        assert!(fs::symlink_metadata(dest.join("src/dangling")).is_err());
    }

    #[test]
    fn test_copy_request_uses_target_name() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("report.txt");
        fs::write(&source, "q3").unwrap();
        let dest = temp.path().join("archive");

        let request = CopyMoveRequest::builder()
            .source(&source)
            .destination(&dest)
            .target_name("report-copy.txt")
            .build()
            .unwrap();
        let written = TreeOps::new().copy_request(&request).unwrap();

        assert_eq!(written, 2);
        assert_eq!(fs::read_to_string(dest.join("report-copy.txt")).unwrap(), "q3");
        assert!(!dest.join("report.txt").exists());
        assert!(source.exists());
    }
}
