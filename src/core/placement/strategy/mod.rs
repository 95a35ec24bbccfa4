//! # Strategy Module
//!
//! The five album-handling strategies and their factory.
//!
//! ## Contract
//! `process_media_entity` performs every physical operation for one entity
//! (primary first, then albums in map order), pushes one `Place` event per
//! operation before returning, and never aborts on a per-operation
//! failure. `finalize` runs exactly once after all entities.
//!
//! Every entity yields at least one primary placement, even when its only
//! physical copy lives inside an album folder: in move mode a skipped
//! entity would mean a deleted source with no destination write.

mod duplicate_copy;
mod json;
mod nothing;
mod reverse_shortcut;
mod shortcut;

pub use duplicate_copy::DuplicateCopyStrategy;
pub use json::{JsonStrategy, MANIFEST_FILE_NAME};
pub use nothing::NothingStrategy;
pub use reverse_shortcut::ReverseShortcutStrategy;
pub use shortcut::ShortcutStrategy;

use super::context::{AlbumBehavior, CopyMode, MovingContext};
use super::fileops;
use super::paths::target_directory;
use super::result::{MoveMediaEntityResult, MovingOperation, OperationKind};
use super::Placement;
use crate::core::entity::{MediaEntity, MediaEntityCollection};
use crate::error::PlacementError;
use crate::events::EventSender;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// OS-specific link creation, injectable so tests can force failures and
/// future platforms can substitute native shortcuts.
pub trait LinkPrimitive: Send + Sync {
    /// Create a link at `link` pointing to `target`, creating parent
    /// directories as needed.
    fn create_link(&self, target: &Path, link: &Path) -> Result<(), PlacementError>;
}

/// The default link primitive: a filesystem symlink
pub struct OsLinkPrimitive;

impl LinkPrimitive for OsLinkPrimitive {
    fn create_link(&self, target: &Path, link: &Path) -> Result<(), PlacementError> {
        fileops::create_symlink(target, link)
    }
}

/// One of the five album-handling strategies
pub trait MovingStrategy: Send {
    /// Which behavior this strategy implements
    fn behavior(&self) -> AlbumBehavior;

    /// Place one entity on disk, emitting one event per physical
    /// operation.
    fn process_media_entity(
        &mut self,
        entity: &mut MediaEntity,
        context: &MovingContext,
        events: &EventSender,
    ) -> Vec<MoveMediaEntityResult>;

    /// Invoked exactly once after every entity has been processed.
    fn finalize(
        &mut self,
        _context: &MovingContext,
        _entities: &MediaEntityCollection,
        _events: &EventSender,
    ) -> Vec<MoveMediaEntityResult> {
        Vec::new()
    }
}

/// Select a strategy from configuration.
pub fn create_strategy(behavior: AlbumBehavior) -> Box<dyn MovingStrategy> {
    create_strategy_with_linker(behavior, Arc::new(OsLinkPrimitive))
}

/// Select a strategy with an explicit link primitive.
pub fn create_strategy_with_linker(
    behavior: AlbumBehavior,
    linker: Arc<dyn LinkPrimitive>,
) -> Box<dyn MovingStrategy> {
    match behavior {
        AlbumBehavior::Shortcut => Box::new(ShortcutStrategy::with_linker(linker)),
        AlbumBehavior::DuplicateCopy => Box::new(DuplicateCopyStrategy::new()),
        AlbumBehavior::ReverseShortcut => Box::new(ReverseShortcutStrategy::with_linker(linker)),
        AlbumBehavior::Json => Box::new(JsonStrategy::new()),
        AlbumBehavior::Nothing => Box::new(NothingStrategy::new()),
    }
}

pub(super) fn emit(events: &EventSender, result: &MoveMediaEntityResult) {
    events.operation(result);
}

/// Move or copy `source` into `dir` under a collision-free name.
fn transfer(
    source: &Path,
    dir: &Path,
    file_name: &str,
    mode: CopyMode,
) -> Result<PathBuf, PlacementError> {
    fileops::ensure_directory(dir)?;
    let target = fileops::find_unique_path(dir, file_name);
    match mode {
        CopyMode::Move => fileops::move_file(source, &target)?,
        CopyMode::Copy => fileops::copy_file(source, &target)?,
    }
    Ok(target)
}

/// Place the entity's primary file into its ALL_PHOTOS bucket.
///
/// On success the entity's primary reference is replaced with the placed
/// path, so that links created afterwards point at the consolidated copy.
pub(super) fn place_primary(
    entity: &mut MediaEntity,
    context: &MovingContext,
    events: &EventSender,
) -> MoveMediaEntityResult {
    let start = Instant::now();
    let source = entity.primary_file().path().to_path_buf();
    let dir = target_directory(&Placement::Primary, entity.date_taken(), context);
    let operation = MovingOperation {
        source: source.clone(),
        target_directory: dir.clone(),
        kind: context.copy_mode.operation_kind(),
        placement: Placement::Primary,
        date: entity.date_taken(),
    };

    let result = match transfer(
        &source,
        &dir,
        &entity.primary_file().file_name(),
        context.copy_mode,
    ) {
        Ok(target) => {
            entity.relocate_primary(&target);
            MoveMediaEntityResult::succeeded(operation, target, start.elapsed())
        }
        Err(e) => MoveMediaEntityResult::failed(operation, e, start.elapsed()),
    };

    if context.verbose {
        tracing::debug!(success = result.success, ?result.result_path, "primary placement");
    }
    emit(events, &result);
    result
}

/// Move or copy `source` into the directory for `placement`.
pub(super) fn place_file(
    source: &Path,
    placement: Placement,
    kind: OperationKind,
    date: Option<NaiveDateTime>,
    context: &MovingContext,
    events: &EventSender,
) -> MoveMediaEntityResult {
    let start = Instant::now();
    let dir = target_directory(&placement, date, context);
    let operation = MovingOperation {
        source: source.to_path_buf(),
        target_directory: dir.clone(),
        kind,
        placement,
        date,
    };

    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string());
    let mode = match kind {
        OperationKind::Move => CopyMode::Move,
        _ => CopyMode::Copy,
    };

    let result = match transfer(source, &dir, &file_name, mode) {
        Ok(target) => MoveMediaEntityResult::succeeded(operation, target, start.elapsed()),
        Err(e) => MoveMediaEntityResult::failed(operation, e, start.elapsed()),
    };
    emit(events, &result);
    result
}

/// Create a link to `link_target` inside the directory for `placement`,
/// falling back to a physical copy when link creation fails.
///
/// The fallback is reported as a *successful* copy operation; link failure
/// is an implementation detail, not a user-visible error.
pub(super) fn link_with_fallback(
    linker: &dyn LinkPrimitive,
    link_target: &Path,
    placement: Placement,
    date: Option<NaiveDateTime>,
    context: &MovingContext,
    events: &EventSender,
) -> MoveMediaEntityResult {
    let start = Instant::now();
    let dir = target_directory(&placement, date, context);
    let mut operation = MovingOperation {
        source: link_target.to_path_buf(),
        target_directory: dir.clone(),
        kind: OperationKind::CreateSymlink,
        placement,
        date,
    };

    let file_name = link_target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string());

    let prepared = fileops::ensure_directory(&dir).map(|_| fileops::find_unique_path(&dir, &file_name));
    let result = match prepared {
        Err(e) => MoveMediaEntityResult::failed(operation, e, start.elapsed()),
        Ok(link_path) => match linker.create_link(link_target, &link_path) {
            Ok(()) => MoveMediaEntityResult::succeeded(operation, link_path, start.elapsed()),
            Err(link_error) => {
                tracing::warn!(
                    "link creation failed ({}), falling back to a physical copy",
                    link_error
                );
                operation.kind = OperationKind::Copy;
                match fileops::copy_file(link_target, &link_path) {
                    Ok(()) => {
                        MoveMediaEntityResult::succeeded(operation, link_path, start.elapsed())
                    }
                    Err(copy_error) => {
                        MoveMediaEntityResult::failed(operation, copy_error, start.elapsed())
                    }
                }
            }
        },
    };
    emit(events, &result);
    result
}
