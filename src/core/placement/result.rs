//! Per-operation outcome types.
//!
//! One result is emitted per physical operation, not per entity: an entity
//! with three albums under the shortcut strategy yields four results (one
//! move plus three symlinks). Results are never mutated after creation.

use super::Placement;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// The kind of physical operation attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Move,
    Copy,
    CreateSymlink,
    Delete,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Move => write!(f, "move"),
            OperationKind::Copy => write!(f, "copy"),
            OperationKind::CreateSymlink => write!(f, "create_symlink"),
            OperationKind::Delete => write!(f, "delete"),
        }
    }
}

/// One physical operation the engine attempted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingOperation {
    /// The file the operation read from (or the link target)
    pub source: PathBuf,
    /// The directory the operation wrote into
    pub target_directory: PathBuf,
    /// What was attempted
    pub kind: OperationKind,
    /// Primary bucket or named album
    pub placement: Placement,
    /// The capture date used for path bucketing, if any
    pub date: Option<NaiveDateTime>,
}

/// Outcome of one physical operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveMediaEntityResult {
    /// The operation that was attempted
    pub operation: MovingOperation,
    /// Whether the operation succeeded
    pub success: bool,
    /// The resulting path on disk, on success
    pub result_path: Option<PathBuf>,
    /// The error message, on failure
    pub error: Option<String>,
    /// Elapsed wall time in milliseconds
    pub duration_ms: u64,
}

impl MoveMediaEntityResult {
    pub fn succeeded(operation: MovingOperation, result_path: PathBuf, elapsed: Duration) -> Self {
        Self {
            operation,
            success: true,
            result_path: Some(result_path),
            error: None,
            duration_ms: elapsed.as_millis() as u64,
        }
    }

    pub fn failed(
        operation: MovingOperation,
        error: impl std::fmt::Display,
        elapsed: Duration,
    ) -> Self {
        Self {
            operation,
            success: false,
            result_path: None,
            error: Some(error.to_string()),
            duration_ms: elapsed.as_millis() as u64,
        }
    }

    /// Whether this result is a successful primary placement. The
    /// no-data-loss property counts exactly one of these per entity.
    pub fn is_primary_placement(&self) -> bool {
        self.success && self.operation.placement == Placement::Primary
    }
}

/// Running per-kind counters for one placement run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveSummary {
    pub entities_processed: usize,
    pub successful_operations: usize,
    pub failed_operations: usize,
    pub moves: usize,
    pub copies: usize,
    pub symlinks: usize,
    pub deletes: usize,
    pub duration_ms: u64,
}

impl MoveSummary {
    /// Fold one result into the counters
    pub fn record(&mut self, result: &MoveMediaEntityResult) {
        if result.success {
            self.successful_operations += 1;
            match result.operation.kind {
                OperationKind::Move => self.moves += 1,
                OperationKind::Copy => self.copies += 1,
                OperationKind::CreateSymlink => self.symlinks += 1,
                OperationKind::Delete => self.deletes += 1,
            }
        } else {
            self.failed_operations += 1;
        }
    }
}
