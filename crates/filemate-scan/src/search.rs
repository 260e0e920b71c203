//! Recursive search: by extension, by glob, and deep content search.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_builder::Builder;
use filemate_core::{DEFAULT_DEEP_SEARCH_SIZE_LIMIT, FsError, PathEntry, Preferences};
use globset::{GlobBuilder, GlobMatcher};
use jwalk::{Parallelism, WalkDir};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised by search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error(transparent)]
    Fs(#[from] FsError),
}

/// Configuration for a recursive search.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct SearchConfig {
    /// Directory to search below.
    pub root: PathBuf,

    /// Include hidden files and directories.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Maximum depth below the root (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Also match file contents, not only names.
    #[builder(default = "false")]
    #[serde(default)]
    pub deep: bool,

    /// Files larger than this are never read by deep search.
    #[builder(default = "DEFAULT_DEEP_SEARCH_SIZE_LIMIT")]
    #[serde(default = "default_size_limit")]
    pub deep_search_size_limit: u64,

    /// Number of walker threads (0 = rayon default pool).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,
}

fn default_true() -> bool {
    true
}

fn default_size_limit() -> u64 {
    DEFAULT_DEEP_SEARCH_SIZE_LIMIT
}

impl SearchConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        Ok(())
    }
}

impl SearchConfig {
    /// Create a new search config builder.
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }

    /// Name-only search below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include_hidden: true,
            max_depth: None,
            deep: false,
            deep_search_size_limit: DEFAULT_DEEP_SEARCH_SIZE_LIMIT,
            threads: 0,
        }
    }

    /// Search below `root` honoring the hidden-file toggle and deep search limit.
    pub fn from_preferences(root: impl Into<PathBuf>, prefs: &Preferences) -> Self {
        Self {
            include_hidden: prefs.show_hidden,
            deep_search_size_limit: prefs.deep_search_size_limit,
            ..Self::new(root)
        }
    }

    fn walker(&self) -> WalkDir {
        let parallelism = match self.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: Duration::from_millis(100),
            },
            n => Parallelism::RayonNewPool(n),
        };

        WalkDir::new(&self.root)
            .parallelism(parallelism)
            .skip_hidden(!self.include_hidden)
            .follow_links(false)
            .sort(true)
            .min_depth(1)
            .max_depth(self.max_depth.unwrap_or(usize::MAX))
    }
}

/// How a hit matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    Name,
    Content,
}

/// One search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub path: PathBuf,
    pub is_dir: bool,
    pub matched: MatchKind,
}

/// All files below `dir` whose name ends with `.extension`.
///
/// A missing root or a root that is a file yields an empty list. The suffix
/// match is case-sensitive.
pub fn files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let suffix = format!(".{extension}");
    SearchConfig::new(dir)
        .walker()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && e.file_name().to_string_lossy().ends_with(&suffix))
        .map(|e| e.path())
        .collect()
}

/// Entries whose file name matches a glob pattern (case-insensitive).
pub fn find(config: &SearchConfig, pattern: &str) -> Result<Vec<SearchHit>, SearchError> {
    let matcher = compile_glob(pattern)?;
    ensure_root(&config.root)?;

    let hits: Vec<SearchHit> = walk(config)
        .into_iter()
        .filter(|(path, _)| {
            path.file_name()
                .is_some_and(|name| matcher.is_match(Path::new(name)))
        })
        .map(|(path, is_dir)| SearchHit {
            path,
            is_dir,
            matched: MatchKind::Name,
        })
        .collect();

    debug!(root = %config.root.display(), pattern, hits = hits.len(), "glob search finished");
    Ok(hits)
}

/// Entries whose name contains `query` (case-insensitive). With
/// `config.deep`, files whose contents contain `query` also match, as long
/// as they are no larger than the deep search limit.
pub fn search(config: &SearchConfig, query: &str) -> Result<Vec<SearchHit>, SearchError> {
    ensure_root(&config.root)?;
    let needle = query.to_lowercase();

    let hits: Vec<SearchHit> = walk(config)
        .into_par_iter()
        .filter_map(|(path, is_dir)| {
            let name_matches = path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().to_lowercase().contains(&needle));
            let matched = if name_matches {
                MatchKind::Name
            } else if config.deep
                && !is_dir
                && content_matches(&path, &needle, config.deep_search_size_limit)
            {
                MatchKind::Content
            } else {
                return None;
            };
            Some(SearchHit {
                path,
                is_dir,
                matched,
            })
        })
        .collect();

    debug!(root = %config.root.display(), query, deep = config.deep, hits = hits.len(), "search finished");
    Ok(hits)
}

fn compile_glob(pattern: &str) -> Result<GlobMatcher, SearchError> {
    GlobBuilder::new(pattern)
        .case_insensitive(true)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| SearchError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn ensure_root(root: &Path) -> Result<(), FsError> {
    let entry = PathEntry::from_path(root)?;
    if entry.is_dir() {
        Ok(())
    } else {
        Err(FsError::NotADirectory {
            path: root.to_path_buf(),
        })
    }
}

fn walk(config: &SearchConfig) -> Vec<(PathBuf, bool)> {
    config
        .walker()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some((e.path(), e.file_type().is_dir())),
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .collect()
}

fn content_matches(path: &Path, needle: &str, size_limit: u64) -> bool {
    match fs::metadata(path) {
        Ok(m) if m.is_file() && m.len() <= size_limit => {}
        _ => return false,
    }
    match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).to_lowercase().contains(needle),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping unreadable file");
            false
        }
    }
}
