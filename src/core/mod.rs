//! # Core Module
//!
//! The GUI-agnostic consolidation engine.
//!
//! ## Modules
//! - `identity` - content fingerprints (size + BLAKE3 digest)
//! - `grouper` - partitions files into byte-identical groups
//! - `entity` - the logical media item and its mutable collection
//! - `merger` - collapses cross-location duplicates into album-aware entities
//! - `ingest` - walks an extracted export tree into entities
//! - `placement` - path rules, file primitives and the five moving strategies
//! - `mover` - orchestrates placement over a collection

pub mod entity;
pub mod grouper;
pub mod identity;
pub mod ingest;
pub mod merger;
pub mod mover;
pub mod placement;

// Re-export commonly used types
pub use entity::{CollectionStatistics, DateAccuracy, MediaEntity, MediaEntityCollection};
pub use grouper::{DuplicateGrouper, Grouping};
pub use identity::{ContentKey, FileRef};
pub use ingest::{IngestConfig, IngestReport, MediaIngestor};
pub use merger::AlbumMerger;
pub use mover::{MediaMover, MoveReport};
pub use placement::{
    AlbumBehavior, CopyMode, DateDivision, MoveMediaEntityResult, MoveSummary, MovingContext,
    OperationKind, Placement,
};
