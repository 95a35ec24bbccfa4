//! # Mover Module
//!
//! Drives one placement run: validates configuration, selects the
//! strategy, feeds it every entity in collection order, then finalizes.
//!
//! Entities are processed sequentially. Placement is dominated by disk
//! writes into a shared output tree, and sequential processing keeps
//! unique-name resolution free of races.

use crate::core::entity::MediaEntityCollection;
use crate::core::placement::{
    create_strategy_with_linker, LinkPrimitive, MoveMediaEntityResult, MoveSummary, MovingContext,
    OsLinkPrimitive,
};
use crate::error::Result;
use crate::events::{null_sender, Event, EventSender, PlaceEvent};
use std::sync::Arc;
use std::time::Instant;

/// Everything a finished placement run produced
#[derive(Debug, Clone)]
pub struct MoveReport {
    /// One entry per physical operation, in execution order
    pub results: Vec<MoveMediaEntityResult>,
    pub summary: MoveSummary,
}

impl MoveReport {
    /// The operations that failed, for reporting and retry
    pub fn failures(&self) -> impl Iterator<Item = &MoveMediaEntityResult> {
        self.results.iter().filter(|r| !r.success)
    }

    pub fn has_failures(&self) -> bool {
        self.summary.failed_operations > 0
    }
}

/// Executes the physical placement phase for a collection of entities.
pub struct MediaMover {
    context: MovingContext,
    linker: Arc<dyn LinkPrimitive>,
}

impl MediaMover {
    pub fn new(context: MovingContext) -> Self {
        Self::with_linker(context, Arc::new(OsLinkPrimitive))
    }

    /// Use a custom link primitive, for tests and platforms with native
    /// shortcut mechanisms.
    pub fn with_linker(context: MovingContext, linker: Arc<dyn LinkPrimitive>) -> Self {
        Self { context, linker }
    }

    pub fn run(&self, entities: &mut MediaEntityCollection) -> Result<MoveReport> {
        self.run_with_events(entities, &null_sender())
    }

    /// Run the placement phase, emitting one event per operation.
    ///
    /// Configuration errors fail the whole run before any file is
    /// touched; per-operation errors are recorded and the run continues.
    pub fn run_with_events(
        &self,
        entities: &mut MediaEntityCollection,
        events: &EventSender,
    ) -> Result<MoveReport> {
        self.context.validate()?;

        let start = Instant::now();
        let mut strategy =
            create_strategy_with_linker(self.context.album_behavior, self.linker.clone());
        tracing::info!(
            entities = entities.len(),
            behavior = %self.context.album_behavior,
            "starting placement"
        );
        events.send(Event::Place(PlaceEvent::Started {
            total_entities: entities.len(),
        }));

        let mut results = Vec::new();
        let mut summary = MoveSummary::default();
        for (index, entity) in entities.iter_mut().enumerate() {
            events.send(Event::Place(PlaceEvent::EntityStarted {
                index,
                path: entity.primary_file().path().to_path_buf(),
            }));
            let entity_results = strategy.process_media_entity(entity, &self.context, events);
            for result in &entity_results {
                summary.record(result);
            }
            summary.entities_processed += 1;
            results.extend(entity_results);
        }

        events.send(Event::Place(PlaceEvent::Finalizing));
        let final_results = strategy.finalize(&self.context, entities, events);
        for result in &final_results {
            summary.record(result);
        }
        results.extend(final_results);

        summary.duration_ms = start.elapsed().as_millis() as u64;
        if summary.failed_operations > 0 {
            tracing::warn!(
                failed = summary.failed_operations,
                succeeded = summary.successful_operations,
                "placement finished with failures"
            );
        }
        events.send(Event::Place(PlaceEvent::Completed {
            summary: summary.clone(),
        }));
        Ok(MoveReport { results, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::MediaEntity;
    use crate::core::identity::FileRef;
    use crate::core::placement::{AlbumBehavior, CopyMode};
    use crate::events::channel;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write_file(path: &Path, content: &[u8]) -> PathBuf {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
        path.to_path_buf()
    }

    fn collection(dir: &TempDir, names: &[&str]) -> MediaEntityCollection {
        names
            .iter()
            .map(|name| {
                let path = write_file(&dir.path().join("takeout").join(name), name.as_bytes());
                MediaEntity::new(FileRef::new(&path))
            })
            .collect()
    }

    #[test]
    fn invalid_context_fails_before_touching_files() {
        let dir = TempDir::new().unwrap();
        let mut entities = collection(&dir, &["a.jpg"]);

        let mover = MediaMover::new(MovingContext::new(""));
        assert!(mover.run(&mut entities).is_err());
        // Source untouched
        assert!(dir.path().join("takeout/a.jpg").exists());
    }

    #[test]
    fn every_entity_is_processed_despite_failures() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let mut entities = collection(&dir, &["a.jpg", "c.jpg"]);
        // An entity whose source is already gone
        entities.add(MediaEntity::new(FileRef::new(
            dir.path().join("takeout/missing.jpg"),
        )));

        let mover = MediaMover::new(MovingContext::new(&out));
        let report = mover.run(&mut entities).unwrap();

        assert_eq!(report.summary.entities_processed, 3);
        assert_eq!(report.summary.successful_operations, 2);
        assert_eq!(report.summary.failed_operations, 1);
        assert!(report.has_failures());
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn copy_mode_leaves_sources_in_place() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let mut entities = collection(&dir, &["a.jpg"]);

        let mover = MediaMover::new(MovingContext::new(&out).copy_mode(CopyMode::Copy));
        let report = mover.run(&mut entities).unwrap();

        assert_eq!(report.summary.copies, 1);
        assert!(dir.path().join("takeout/a.jpg").exists());
        assert!(out
            .join("ALL_PHOTOS")
            .join("date-unknown")
            .join("a.jpg")
            .exists());
    }

    #[test]
    fn events_bracket_the_run() {
        let dir = TempDir::new().unwrap();
        let mut entities = collection(&dir, &["a.jpg"]);
        let (sender, receiver) = channel();

        let mover = MediaMover::new(
            MovingContext::new(dir.path().join("out")).album_behavior(AlbumBehavior::Nothing),
        );
        mover.run_with_events(&mut entities, &sender).unwrap();
        drop(sender);

        let events: Vec<_> = receiver.iter().collect();
        assert!(matches!(
            events.first(),
            Some(Event::Place(PlaceEvent::Started { total_entities: 1 }))
        ));
        assert!(matches!(
            events.last(),
            Some(Event::Place(PlaceEvent::Completed { .. }))
        ));
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::Place(PlaceEvent::Operation(r)) if r.success)));
    }

    #[test]
    fn json_behavior_finalizes_a_manifest() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let mut entities = collection(&dir, &["a.jpg"]);

        let mover =
            MediaMover::new(MovingContext::new(&out).album_behavior(AlbumBehavior::Json));
        let report = mover.run(&mut entities).unwrap();

        assert!(out.join("albums-info.json").exists());
        // Manifest write shows up as one extra successful operation,
        // but only the entity's own move counts as a primary placement
        assert_eq!(report.summary.successful_operations, 2);
        let primaries = report
            .results
            .iter()
            .filter(|r| r.is_primary_placement())
            .count();
        assert_eq!(primaries, 1);
    }
}
