//! Persisted user preferences.
//!
//! Preferences are an explicit value: callers load them once and pass them
//! (or values derived from them, like a [`SortSpec`](crate::SortSpec)) into
//! listing and search functions. Nothing in filemate reads global state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sort::SortMethod;

/// Default size limit for deep content search (6 MiB).
pub const DEFAULT_DEEP_SEARCH_SIZE_LIMIT: u64 = 6 * 1024 * 1024;

/// File explorer and application preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Sort method for directory listings.
    pub sort_method: SortMethod,
    /// List folders before files when the sort key ties.
    pub list_folders_first: bool,
    /// Files larger than this are skipped by deep content search.
    pub deep_search_size_limit: u64,
    /// Show labels under the bottom toolbar buttons.
    pub show_bottom_toolbar_labels: bool,
    /// Include dot-files in listings.
    pub show_hidden: bool,
    /// Bookmarked directories.
    pub bookmarks: Vec<PathBuf>,
    /// Text editor toggles.
    pub text_editor: TextEditorPreferences,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            sort_method: SortMethod::default(),
            list_folders_first: true,
            deep_search_size_limit: DEFAULT_DEEP_SEARCH_SIZE_LIMIT,
            show_bottom_toolbar_labels: true,
            show_hidden: true,
            bookmarks: Vec::new(),
            text_editor: TextEditorPreferences::default(),
        }
    }
}

/// Text editor toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextEditorPreferences {
    pub word_wrap: bool,
    pub show_line_number: bool,
    pub pin_line_number: bool,
    pub magnifier: bool,
    pub read_only: bool,
    pub autocomplete: bool,
}

impl Default for TextEditorPreferences {
    fn default() -> Self {
        Self {
            word_wrap: false,
            show_line_number: true,
            pin_line_number: true,
            magnifier: true,
            read_only: false,
            autocomplete: false,
        }
    }
}

impl Preferences {
    /// Get the default preferences file path.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("filemate").join("preferences.toml"))
    }

    /// Load preferences from the default location, or return defaults.
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load preferences from a file, or return defaults when it is missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid preferences file");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save preferences to the default location.
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "No config directory")
        })?;
        self.save_to(&path)
    }

    /// Save preferences to a file, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        std::fs::write(path, content)
    }

    /// Add a bookmark if it is not already present.
    pub fn add_bookmark(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.bookmarks.contains(&path) {
            return false;
        }
        self.bookmarks.push(path);
        true
    }

    /// Remove a bookmark. Returns whether it was present.
    pub fn remove_bookmark(&mut self, path: &Path) -> bool {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|p| p != path);
        before != self.bookmarks.len()
    }
}
