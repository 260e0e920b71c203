//! Progress reporting types for batch operations.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::OperationError;

/// The kind of batch being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    Copy,
    Move,
    Delete,
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Copy => write!(f, "Copy"),
            Self::Move => write!(f, "Move"),
            Self::Delete => write!(f, "Delete"),
        }
    }
}

/// Snapshot sent before each item of a batch starts.
///
/// Items are the top-level paths handed to the executor.
#[derive(Debug, Clone)]
pub struct OperationProgress {
    pub operation_type: OperationType,
    /// Items finished, successfully or not.
    pub items_completed: usize,
    pub items_total: usize,
    /// Bytes written by finished copy items.
    pub bytes_processed: u64,
    /// Bytes below the items, measured before a copy starts. Always 0 for move and delete.
    pub bytes_total: u64,
    pub current_item: Option<PathBuf>,
    pub errors: Vec<OperationError>,
}

impl OperationProgress {
    pub fn new(operation_type: OperationType, items_total: usize, bytes_total: u64) -> Self {
        Self {
            operation_type,
            items_completed: 0,
            items_total,
            bytes_processed: 0,
            bytes_total,
            current_item: None,
            errors: Vec::new(),
        }
    }

    /// Share of `bytes_total` written, or of items finished when there is no byte total.
    pub fn percentage(&self) -> f64 {
        if self.bytes_total > 0 {
            (self.bytes_processed as f64 / self.bytes_total as f64) * 100.0
        } else if self.items_total > 0 {
            (self.items_completed as f64 / self.items_total as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn set_current_item(&mut self, path: Option<PathBuf>) {
        self.current_item = path;
    }

    pub fn complete_item(&mut self, bytes: u64) {
        self.items_completed += 1;
        self.bytes_processed += bytes;
    }

    /// A failed item still counts towards `items_completed`.
    pub fn fail_item(&mut self, error: OperationError) {
        self.items_completed += 1;
        self.errors.push(error);
    }
}

/// Final report of a batch.
#[derive(Debug, Clone)]
pub struct OperationComplete {
    pub operation_type: OperationType,
    pub succeeded: usize,
    pub failed: usize,
    pub bytes_processed: u64,
    /// Items never started after cancellation are counted in `failed`.
    pub cancelled: bool,
    pub errors: Vec<OperationError>,
}

impl OperationComplete {
    pub(crate) fn from_progress(progress: OperationProgress, succeeded: usize, cancelled: bool) -> Self {
        Self {
            operation_type: progress.operation_type,
            succeeded,
            failed: progress.items_total - succeeded,
            bytes_processed: progress.bytes_processed,
            cancelled,
            errors: progress.errors,
        }
    }

    /// Whether every item succeeded.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && !self.cancelled
    }

    /// Human-readable summary, e.g. "Copied 3 items, 1 failed".
    pub fn summary(&self) -> String {
        let action = match self.operation_type {
            OperationType::Copy => "Copied",
            OperationType::Move => "Moved",
            OperationType::Delete => "Deleted",
        };

        let mut summary = if self.failed == 0 {
            format!("{} {} items", action, self.succeeded)
        } else {
            format!("{} {} items, {} failed", action, self.succeeded, self.failed)
        };
        if self.cancelled {
            summary.push_str(" (cancelled)");
        }
        summary
    }
}

/// Count files and bytes below `sources`, without following symlinks.
pub fn calculate_totals(sources: &[PathBuf]) -> (usize, u64) {
    sources.iter().fold((0, 0), |(files, bytes), source| {
        let (f, b) = path_totals(source);
        (files + f, bytes + b)
    })
}

fn path_totals(path: &Path) -> (usize, u64) {
    let Ok(metadata) = fs::symlink_metadata(path) else {
        return (0, 0);
    };
    if !metadata.is_dir() {
        return (1, metadata.len());
    }

    let Ok(entries) = fs::read_dir(path) else {
        return (0, 0);
    };
    entries.flatten().fold((0, 0), |(files, bytes), entry| {
        let (f, b) = path_totals(&entry.path());
        (files + f, bytes + b)
    })
}
