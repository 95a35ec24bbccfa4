//! # Placement Module
//!
//! Decides where every logical media item lands on disk and performs the
//! physical operations.
//!
//! ## Layout Produced
//! - `ALL_PHOTOS/<bucket>/<file>` - the date-organized canonical location
//!   for every item's primary copy
//! - `<AlbumName>/<file>` - flat, one level, never subdivided by date
//!
//! ## Modules
//! - `context` - immutable per-run configuration
//! - `paths` - pure target-directory rules and folder-name sanitization
//! - `fileops` - move/copy/symlink/unique-name primitives
//! - `result` - per-operation outcome types
//! - `strategy` - the five album-handling strategies and their factory

mod context;
mod fileops;
mod paths;
mod result;
mod strategy;

pub use context::{AlbumBehavior, CopyMode, DateDivision, MovingContext};
pub use fileops::{copy_file, create_symlink, ensure_directory, find_unique_path, move_file};
pub use paths::{sanitize_folder_name, target_directory, ALL_PHOTOS_DIR, UNKNOWN_DATE_DIR};
pub use result::{MoveMediaEntityResult, MoveSummary, MovingOperation, OperationKind};
pub use strategy::{
    create_strategy, create_strategy_with_linker, DuplicateCopyStrategy, JsonStrategy,
    LinkPrimitive, MovingStrategy, NothingStrategy, OsLinkPrimitive, ReverseShortcutStrategy,
    ShortcutStrategy, MANIFEST_FILE_NAME,
};

use serde::{Deserialize, Serialize};

/// Where one physical operation places its output: the date-organized
/// primary location or a named album folder.
///
/// An explicit sum type instead of an optional album name, so the "no
/// album" case cannot be confused with an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "album", rename_all = "snake_case")]
pub enum Placement {
    /// The ALL_PHOTOS date bucket
    Primary,
    /// A flat, named album folder
    AlbumCopy(String),
    /// A run-level artifact in the output root, such as the album
    /// manifest. Not a copy of any entity, so it never counts toward
    /// per-entity placement accounting.
    Manifest,
}

impl Placement {
    /// The album name, if this is an album placement
    pub fn album_name(&self) -> Option<&str> {
        match self {
            Placement::Primary | Placement::Manifest => None,
            Placement::AlbumCopy(name) => Some(name),
        }
    }
}
