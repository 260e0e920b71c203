//! Async batch execution with progress reporting over channels.
//!
//! Each item of a batch runs as one blocking tree operation on the tokio
//! blocking pool. Unlike [`TreeOps::delete_files`], a failing item does not
//! stop the batch; it is recorded and the next item starts. Cancellation
//! stops the batch and counts the unprocessed items as failed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use filemate_core::{FsError, FsResult};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::progress::{OperationComplete, OperationProgress, OperationType, calculate_totals};
use crate::tree::TreeOps;
use crate::{FileOperation, OPERATION_CHANNEL_SIZE, OperationError};

/// Message sent through the channel while a batch runs.
#[derive(Debug)]
pub enum OperationResult {
    /// Progress update, sent as each item starts.
    Progress(OperationProgress),
    /// The batch finished. Always the last message.
    Complete(OperationComplete),
}

/// Start an async copy of `sources` into `destination`.
pub fn start_copy(
    ops: TreeOps,
    sources: Vec<PathBuf>,
    destination: PathBuf,
    overwrite: bool,
) -> mpsc::Receiver<OperationResult> {
    spawn_batch(ops, OperationType::Copy, sources, move |ops, source| {
        ops.copy(source, &destination, overwrite)
    })
}

/// Start an async move of `sources` into `destination`.
pub fn start_move(
    ops: TreeOps,
    sources: Vec<PathBuf>,
    destination: PathBuf,
) -> mpsc::Receiver<OperationResult> {
    spawn_batch(ops, OperationType::Move, sources, move |ops, source| {
        ops.move_to(source, &destination).map(|()| 0)
    })
}

/// Start an async delete of `targets`.
pub fn start_delete(ops: TreeOps, targets: Vec<PathBuf>) -> mpsc::Receiver<OperationResult> {
    spawn_batch(ops, OperationType::Delete, targets, |ops, target| {
        ops.delete_file(target).map(|()| 0)
    })
}

fn spawn_batch<F>(
    ops: TreeOps,
    operation_type: OperationType,
    items: Vec<PathBuf>,
    run: F,
) -> mpsc::Receiver<OperationResult>
where
    F: Fn(&TreeOps, &Path) -> FsResult<u64> + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::channel(OPERATION_CHANNEL_SIZE);
    tokio::spawn(run_batch(ops, operation_type, items, Arc::new(run), tx));
    rx
}

async fn run_batch<F>(
    ops: TreeOps,
    operation_type: OperationType,
    items: Vec<PathBuf>,
    run: Arc<F>,
    tx: mpsc::Sender<OperationResult>,
) where
    F: Fn(&TreeOps, &Path) -> FsResult<u64> + Send + Sync + 'static,
{
    let bytes_total = if operation_type == OperationType::Copy {
        let sources = items.clone();
        tokio::task::spawn_blocking(move || calculate_totals(&sources).1)
            .await
            .unwrap_or(0)
    } else {
        0
    };

    let mut progress = OperationProgress::new(operation_type, items.len(), bytes_total);
    let mut succeeded = 0;
    let mut cancelled = false;
    debug!(%operation_type, items = items.len(), "batch started");

    for item in items {
        if ops.is_cancelled() {
            cancelled = true;
            break;
        }

        progress.set_current_item(Some(item.clone()));
        let _ = tx.send(OperationResult::Progress(progress.clone())).await;

        let task_ops = ops.clone();
        let task_run = Arc::clone(&run);
        let task_item = item.clone();
        let result = tokio::task::spawn_blocking(move || task_run(&task_ops, &task_item)).await;

        match result {
            Ok(Ok(bytes)) => {
                succeeded += 1;
                progress.complete_item(bytes);
            }
            Ok(Err(FsError::Cancelled)) => {
                progress.fail_item(OperationError::from_fs(item, &FsError::Cancelled));
                cancelled = true;
                break;
            }
            Ok(Err(e)) => {
                warn!(item = %item.display(), error = %e, "batch item failed");
                progress.fail_item(OperationError::from_fs(item, &e));
            }
            Err(e) => {
                progress.fail_item(OperationError::new(item, format!("Task failed: {e}")));
            }
        }
    }

    progress.set_current_item(None);
    let complete = OperationComplete::from_progress(progress, succeeded, cancelled);
    debug!(summary = %complete.summary(), "batch finished");
    let _ = tx.send(OperationResult::Complete(complete)).await;
}

/// Runs [`FileOperation`]s against one shared [`TreeOps`].
///
/// Cancelling the executor cancels every batch it started, including
/// the one in flight.
#[derive(Debug, Clone, Default)]
pub struct OperationExecutor {
    ops: TreeOps,
}

impl OperationExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an executor driven by an existing cancellation token.
    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self {
            ops: TreeOps::with_cancellation(cancel),
        }
    }

    /// Start `operation` and return its result channel.
    pub fn execute(&self, operation: FileOperation) -> mpsc::Receiver<OperationResult> {
        let ops = self.ops.clone();
        match operation {
            FileOperation::Copy {
                sources,
                destination,
                overwrite,
            } => start_copy(ops, sources, destination, overwrite),
            FileOperation::Move {
                sources,
                destination,
            } => start_move(ops, sources, destination),
            FileOperation::Delete { targets } => start_delete(ops, targets),
        }
    }

    /// Cancel every running and future batch of this executor.
    pub fn cancel(&self) {
        self.ops.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.ops.is_cancelled()
    }
}
