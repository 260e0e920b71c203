//! File and folder creation.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use filemate_core::{FsError, FsResult};
use tracing::debug;

use crate::rename::validate_file_name;
use crate::tree::TreeOps;

impl TreeOps {
    /// Create an empty folder named `name` inside `parent`.
    pub fn create_folder(&self, parent: &Path, name: &str) -> FsResult<PathBuf> {
        let path = self.new_entry_path(parent, name)?;
        fs::create_dir(&path).map_err(|e| collision_or_io(&path, e))?;
        debug!(path = %path.display(), "created folder");
        Ok(path)
    }

    /// Create an empty file named `name` inside `parent`.
    pub fn create_file(&self, parent: &Path, name: &str) -> FsResult<PathBuf> {
        let path = self.new_entry_path(parent, name)?;
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| collision_or_io(&path, e))?;
        debug!(path = %path.display(), "created file");
        Ok(path)
    }

    fn new_entry_path(&self, parent: &Path, name: &str) -> FsResult<PathBuf> {
        self.checkpoint()?;
        validate_file_name(name)?;

        let path = parent.join(name);
        if fs::symlink_metadata(&path).is_ok() {
            return Err(FsError::NameCollision { path });
        }
        Ok(path)
    }
}

fn collision_or_io(path: &Path, e: std::io::Error) -> FsError {
    if e.kind() == ErrorKind::AlreadyExists {
        FsError::NameCollision {
            path: path.to_path_buf(),
        }
    } else {
        FsError::io(path, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_file_and_folder() {
        let temp = TempDir::new().unwrap();
        let ops = TreeOps::new();

        let folder = ops.create_folder(temp.path(), "docs").unwrap();
        assert!(folder.is_dir());

        let file = ops.create_file(&folder, "notes.txt").unwrap();
        assert!(file.is_file());
        assert_eq!(fs::metadata(&file).unwrap().len(), 0);
    }

    #[test]
    fn test_create_existing_collides() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("taken"), "").unwrap();
        let ops = TreeOps::new();

        assert!(matches!(
            ops.create_folder(temp.path(), "taken"),
            Err(FsError::NameCollision { .. })
        ));
        assert!(matches!(
            ops.create_file(temp.path(), "taken"),
            Err(FsError::NameCollision { .. })
        ));
    }

    #[test]
    fn test_create_invalid_name() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            TreeOps::new().create_file(temp.path(), "what?"),
            Err(FsError::InvalidName { .. })
        ));
    }
}
