//! Sort configuration for directory listings.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, FromRepr};

use crate::config::Preferences;

/// Persisted sort method.
///
/// Saved by name (`name-asc` through `date-desc`); [`code`](Self::code) and
/// `from_repr` give the numeric codes 1 through 6.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Display,
    EnumIter,
    EnumString,
    FromRepr,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum SortMethod {
    /// Name ascending (A-Z).
    #[default]
    #[strum(to_string = "name-asc", serialize = "name")]
    #[serde(rename = "name-asc")]
    NameA2Z = 1,
    /// Name descending (Z-A).
    #[strum(to_string = "name-desc")]
    #[serde(rename = "name-desc")]
    NameZ2A = 2,
    /// Size ascending (smallest first).
    #[strum(to_string = "size-asc", serialize = "size")]
    #[serde(rename = "size-asc")]
    SizeSmaller = 3,
    /// Size descending (largest first).
    #[strum(to_string = "size-desc")]
    #[serde(rename = "size-desc")]
    SizeBigger = 4,
    /// Modified date ascending (oldest first).
    #[strum(to_string = "date-asc")]
    #[serde(rename = "date-asc")]
    DateOlder = 5,
    /// Modified date descending (newest first).
    #[strum(to_string = "date-desc", serialize = "date")]
    #[serde(rename = "date-desc")]
    DateNewer = 6,
}

impl SortMethod {
    /// Numeric code used by persisted preferences.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// The comparator key this method selects.
    pub fn key(self) -> SortKey {
        match self {
            Self::NameA2Z => SortKey::NameAsc,
            Self::NameZ2A => SortKey::NameDesc,
            Self::SizeSmaller => SortKey::SizeAsc,
            Self::SizeBigger => SortKey::SizeDesc,
            Self::DateOlder => SortKey::DateAsc,
            Self::DateNewer => SortKey::DateDesc,
        }
    }
}

/// A single comparator key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum SortKey {
    NameAsc,
    NameDesc,
    SizeAsc,
    SizeDesc,
    DateAsc,
    DateDesc,
}

/// File/directory grouping rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
pub enum Grouping {
    #[default]
    FoldersFirst,
    FilesFirst,
}

/// How a listing is ordered.
///
/// The keys are evaluated in order; the grouping rule is appended after the
/// last key and only decides between entries every key considers equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Comparator keys, most significant first.
    pub keys: Vec<SortKey>,
    /// Grouping rule evaluated last.
    pub grouping: Grouping,
}

impl SortSpec {
    /// Create a spec from keys and grouping.
    pub fn new(keys: Vec<SortKey>, grouping: Grouping) -> Self {
        Self { keys, grouping }
    }

    /// Single-key spec.
    pub fn by(key: SortKey, grouping: Grouping) -> Self {
        Self::new(vec![key], grouping)
    }

    /// Build the spec selected by a sort method and folders-first flag.
    pub fn from_method(method: SortMethod, folders_first: bool) -> Self {
        let grouping = if folders_first {
            Grouping::FoldersFirst
        } else {
            Grouping::FilesFirst
        };
        Self::by(method.key(), grouping)
    }

    /// Build the spec from persisted preferences.
    pub fn from_preferences(prefs: &Preferences) -> Self {
        Self::from_method(prefs.sort_method, prefs.list_folders_first)
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::from_method(SortMethod::default(), true)
    }
}
