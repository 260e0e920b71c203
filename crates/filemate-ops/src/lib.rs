//! File tree operations for filemate.
//!
//! [`TreeOps`] carries the blocking operations: copy, move, delete, rename,
//! create and zip archive handling. Every operation is fail-fast with no
//! rollback and checks the shared cancellation token before each entry.
//!
//! The [`executor`] module runs copy, move and delete batches on the tokio
//! blocking pool and reports progress through channels.

mod archive;
mod copy;
mod create;
mod delete;
pub mod executor;
mod move_op;
mod operation;
mod progress;
mod rename;
mod tree;

pub use executor::{OperationExecutor, OperationResult, start_copy, start_delete, start_move};
pub use operation::{FileOperation, OperationError};
pub use progress::{OperationComplete, OperationProgress, OperationType, calculate_totals};
pub use rename::{is_valid_file_name, validate_file_name};
pub use tree::{COPY_CHUNK_SIZE, TreeOps};

pub use filemate_core::{CopyMoveRequest, FsError, FsResult};

/// Default channel buffer size for operation progress updates.
pub const OPERATION_CHANNEL_SIZE: usize = 100;
