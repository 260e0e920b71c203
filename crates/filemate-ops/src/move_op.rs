//! Move of files and directory trees.

use std::fs;
use std::path::Path;

use filemate_core::{CopyMoveRequest, FsError, FsResult};
use tracing::{debug, trace};

use crate::tree::{TreeOps, existing_metadata, file_name};

impl TreeOps {
    /// Move `source` into `destination_dir`, keeping its name.
    ///
    /// Files (and symlinks) are moved with a single rename, which fails with
    /// `Io` when the OS refuses it, for example across filesystems; there is
    /// no copy fallback. Directories are moved by creating the target folder
    /// (it must not exist yet), moving each child into it, then removing the
    /// emptied source. A failure part way leaves content split between the
    /// two locations.
    pub fn move_to(&self, source: &Path, destination_dir: &Path) -> FsResult<()> {
        let name = file_name(source)?;
        self.move_as(source, &name, destination_dir)
    }

    /// Move according to a request. The overwrite flag does not apply to
    /// moves.
    pub fn move_request(&self, request: &CopyMoveRequest) -> FsResult<()> {
        self.move_as(&request.source, &request.target_name(), &request.destination)
    }

    fn move_as(&self, source: &Path, target_name: &str, destination_dir: &Path) -> FsResult<()> {
        self.checkpoint()?;
        let metadata = existing_metadata(source)?;
        let target = destination_dir.join(target_name);

        if !metadata.is_dir() {
            fs::rename(source, &target).map_err(|e| FsError::io(source, e))?;
            trace!(source = %source.display(), target = %target.display(), "renamed");
            return Ok(());
        }

        debug!(source = %source.display(), target = %target.display(), "moving folder");
        fs::create_dir(&target).map_err(|e| FsError::io(&target, e))?;
        for child in fs::read_dir(source).map_err(|e| FsError::io(source, e))? {
            let child = child.map_err(|e| FsError::io(source, e))?;
            self.move_to(&child.path(), &target)?;
        }
        fs::remove_dir(source).map_err(|e| FsError::io(source, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_move_file() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "data").unwrap();
        let dest = temp.path().join("dest");
        fs::create_dir(&dest).unwrap();

        TreeOps::new().move_to(&source, &dest).unwrap();
        assert!(!source.exists());
        assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "data");
    }

    #[test]
    fn test_move_file_into_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "data").unwrap();

        let err = TreeOps::new()
            .move_to(&source, &temp.path().join("nowhere"))
            .unwrap_err();
        assert!(matches!(err, FsError::Io { .. }));
        assert!(source.exists());
    }

    #[test]
    fn test_move_folder() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src");
        fs::create_dir_all(source.join("sub")).unwrap();
        fs::write(source.join("sub/f"), "x").unwrap();
        let dest = temp.path().join("dest");
        fs::create_dir(&dest).unwrap();

        TreeOps::new().move_to(&source, &dest).unwrap();
        assert!(!source.exists());
        assert_eq!(fs::read_to_string(dest.join("src/sub/f")).unwrap(), "x");
    }

    #[test]
    fn test_move_folder_onto_existing_fails() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src");
        fs::create_dir(&source).unwrap();
        let dest = temp.path().join("dest");
        fs::create_dir_all(dest.join("src")).unwrap();

        let err = TreeOps::new().move_to(&source, &dest).unwrap_err();
        assert!(matches!(err, FsError::Io { .. }));
        assert!(source.exists());
    }

    #[test]
    fn test_move_request_renames() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "data").unwrap();

        let request = CopyMoveRequest::builder()
            .source(&source)
            .destination(temp.path())
            .target_name("b.txt")
            .build()
            .unwrap();
        TreeOps::new().move_request(&request).unwrap();
        assert!(temp.path().join("b.txt").exists());
    }
}
