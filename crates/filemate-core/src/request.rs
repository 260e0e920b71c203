//! Copy and move request types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// A single copy or move of one entry into a destination directory.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct CopyMoveRequest {
    /// Entry to copy or move.
    pub source: PathBuf,

    /// Directory that receives the entry. Created if absent.
    pub destination: PathBuf,

    /// Name of the entry inside `destination` (None = source name).
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub target_name: Option<String>,

    /// Replace an existing target file instead of skipping it.
    #[builder(default = "false")]
    #[serde(default)]
    pub overwrite: bool,
}

impl CopyMoveRequestBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.source {
            Some(ref source) if source.as_os_str().is_empty() => {
                return Err("Source path cannot be empty".to_string());
            }
            None => return Err("Source path is required".to_string()),
            _ => {}
        }
        match self.destination {
            Some(ref destination) if destination.as_os_str().is_empty() => {
                return Err("Destination path cannot be empty".to_string());
            }
            None => return Err("Destination path is required".to_string()),
            _ => {}
        }
        if let Some(Some(ref name)) = self.target_name
            && name.is_empty()
        {
            return Err("Target name cannot be empty".to_string());
        }
        Ok(())
    }
}

impl CopyMoveRequest {
    /// Create a new request builder.
    pub fn builder() -> CopyMoveRequestBuilder {
        CopyMoveRequestBuilder::default()
    }

    /// Create a request that keeps the source name and skips existing files.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            target_name: None,
            overwrite: false,
        }
    }

    /// Name the entry will have inside the destination directory.
    pub fn target_name(&self) -> String {
        match &self.target_name {
            Some(name) => name.clone(),
            None => self
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    /// Full path of the copied or moved entry.
    pub fn target_path(&self) -> PathBuf {
        self.destination.join(self.target_name())
    }

    /// Source path.
    pub fn source(&self) -> &Path {
        &self.source
    }
}
