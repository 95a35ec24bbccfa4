//! Event type definitions for progress reporting.

use crate::core::placement::{MoveMediaEntityResult, MoveSummary};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the consolidation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Duplicate-grouping phase events (size + hash)
    Group(GroupEvent),
    /// Album-merging phase events
    Merge(MergeEvent),
    /// Placement phase events
    Place(PlaceEvent),
    /// Run-level events
    Run(RunEvent),
}

/// Events during the duplicate-grouping phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GroupEvent {
    /// Grouping has started
    Started { total_files: usize },
    /// Progress through the size phase
    SizeProgress { completed: usize, total: usize },
    /// Progress through the hash phase (size-colliding candidates only)
    HashProgress {
        completed: usize,
        total: usize,
        current_path: PathBuf,
    },
    /// A file could not be read; it is excluded from its group and the
    /// run continues
    Error { path: PathBuf, message: String },
    /// Grouping completed
    Completed {
        groups: usize,
        unique: usize,
        failures: usize,
    },
}

/// Events during the album-merging phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MergeEvent {
    /// Merging has started
    Started { entities: usize },
    /// A group of content-identical entities collapsed into one
    EntityMerged { kept: PathBuf, absorbed: usize },
    /// Merging completed
    Completed { before: usize, after: usize },
}

/// Events during the placement phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlaceEvent {
    /// Placement has started
    Started { total_entities: usize },
    /// An entity is about to be processed
    EntityStarted { index: usize, path: PathBuf },
    /// One physical operation finished (success or failure)
    Operation(MoveMediaEntityResult),
    /// All entities processed; strategy finalization is running
    Finalizing,
    /// Placement completed
    Completed { summary: MoveSummary },
}

/// Run-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEvent {
    /// The run has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: RunPhase },
    /// The run completed
    Completed { summary: RunSummary },
    /// The run hit a fatal error (configuration only)
    Error { message: String },
}

/// Phases of a consolidation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Ingesting,
    Grouping,
    Merging,
    Placing,
    Finalizing,
}

/// Summary of a full consolidation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Entities that went through placement
    pub total_entities: usize,
    /// Entities discarded as exact duplicates
    pub duplicates_removed: usize,
    /// Distinct album names discovered
    pub albums_found: usize,
    /// Placement summary (per-kind operation counters)
    pub placement: MoveSummary,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunPhase::Ingesting => write!(f, "Ingesting"),
            RunPhase::Grouping => write!(f, "Grouping"),
            RunPhase::Merging => write!(f, "Merging"),
            RunPhase::Placing => write!(f, "Placing"),
            RunPhase::Finalizing => write!(f, "Finalizing"),
        }
    }
}
