//! Zip archive creation and extraction.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use filemate_core::{FsError, FsResult};
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::tree::{TreeOps, existing_metadata, file_name};

impl TreeOps {
    /// Write `entries` into a new zip file at `zip_path`.
    ///
    /// Files are stored under their own name; folders are stored
    /// recursively under their own name. An existing archive is replaced.
    pub fn archive(&self, entries: &[PathBuf], zip_path: &Path) -> FsResult<()> {
        let file = File::create(zip_path).map_err(|e| FsError::io(zip_path, e))?;
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in entries {
            let name = file_name(entry)?;
            self.add_to_archive(&mut writer, entry, &name, options, zip_path)?;
        }

        writer
            .finish()
            .map_err(|e| FsError::archive(zip_path, e))?;
        debug!(archive = %zip_path.display(), entries = entries.len(), "archive written");
        Ok(())
    }

    fn add_to_archive(
        &self,
        writer: &mut ZipWriter<File>,
        path: &Path,
        name: &str,
        options: SimpleFileOptions,
        zip_path: &Path,
    ) -> FsResult<()> {
        self.checkpoint()?;

        existing_metadata(path)?;
        if path.is_dir() {
            writer
                .add_directory(format!("{name}/"), options)
                .map_err(|e| FsError::archive(zip_path, e))?;
            for child in fs::read_dir(path).map_err(|e| FsError::io(path, e))? {
                let child = child.map_err(|e| FsError::io(path, e))?;
                let child_name = format!("{name}/{}", child.file_name().to_string_lossy());
                self.add_to_archive(writer, &child.path(), &child_name, options, zip_path)?;
            }
            return Ok(());
        }

        writer
            .start_file(name, options)
            .map_err(|e| FsError::archive(zip_path, e))?;
        let mut source = File::open(path).map_err(|e| FsError::io(path, e))?;
        io::copy(&mut source, writer).map_err(|e| FsError::io(path, e))?;
        Ok(())
    }

    /// Extract each archive into `directory`.
    ///
    /// Each archive goes into a new folder named after its stem when that
    /// folder can be created, and straight into `directory` otherwise.
    /// Entries that are not files are ignored.
    pub fn extract(&self, archives: &[PathBuf], directory: &Path) -> FsResult<()> {
        for archive in archives {
            self.checkpoint()?;
            if !archive.is_file() {
                continue;
            }

            let stem = archive
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let output = directory.join(&stem);
            let target = if !stem.is_empty() && fs::create_dir(&output).is_ok() {
                output
            } else {
                warn!(folder = %output.display(), "extracting into parent directory");
                directory.to_path_buf()
            };

            let file = File::open(archive).map_err(|e| FsError::io(archive, e))?;
            let mut zip = ZipArchive::new(file).map_err(|e| FsError::archive(archive, e))?;
            zip.extract(&target)
                .map_err(|e| FsError::archive(archive, e))?;
            debug!(archive = %archive.display(), target = %target.display(), "extracted");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_archive_and_extract() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("photos/2024")).unwrap();
        fs::write(root.join("photos/2024/cat.png"), b"meow").unwrap();
        fs::write(root.join("readme.txt"), b"hi").unwrap();

        let zip_path = root.join("bundle.zip");
        let ops = TreeOps::new();
        ops.archive(&[root.join("photos"), root.join("readme.txt")], &zip_path)
            .unwrap();
        assert!(zip_path.is_file());

        let out = root.join("out");
        fs::create_dir(&out).unwrap();
        ops.extract(&[zip_path], &out).unwrap();

        assert_eq!(fs::read(out.join("bundle/photos/2024/cat.png")).unwrap(), b"meow");
        assert_eq!(fs::read(out.join("bundle/readme.txt")).unwrap(), b"hi");
    }

    #[test]
    fn test_extract_falls_back_to_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("a.txt"), b"a").unwrap();

        let zip_path = root.join("pack.zip");
        let ops = TreeOps::new();
        ops.archive(&[root.join("a.txt")], &zip_path).unwrap();

        let out = root.join("out");
        fs::create_dir_all(out.join("pack")).unwrap();
        ops.extract(&[zip_path], &out).unwrap();

        assert!(out.join("a.txt").is_file());
        assert!(!out.join("pack/a.txt").exists());
    }

    #[test]
    fn test_extract_invalid_archive() {
        let temp = TempDir::new().unwrap();
        let bogus = temp.path().join("bogus.zip");
        fs::write(&bogus, b"not a zip").unwrap();

        let err = TreeOps::new().extract(&[bogus], temp.path()).unwrap_err();
        assert!(matches!(err, FsError::Archive { .. }));
    }
}
