//! Full physical copy per album. Simple and portable, at the cost of disk
//! space.

use super::{place_file, place_primary, MovingStrategy};
use crate::core::entity::MediaEntity;
use crate::core::placement::context::{AlbumBehavior, MovingContext};
use crate::core::placement::result::{MoveMediaEntityResult, OperationKind};
use crate::core::placement::Placement;
use crate::events::EventSender;

/// Places the primary file in ALL_PHOTOS and writes an independent
/// physical copy into each album folder.
pub struct DuplicateCopyStrategy;

impl DuplicateCopyStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DuplicateCopyStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl MovingStrategy for DuplicateCopyStrategy {
    fn behavior(&self) -> AlbumBehavior {
        AlbumBehavior::DuplicateCopy
    }

    fn process_media_entity(
        &mut self,
        entity: &mut MediaEntity,
        context: &MovingContext,
        events: &EventSender,
    ) -> Vec<MoveMediaEntityResult> {
        let mut results = Vec::with_capacity(1 + entity.album_count());

        let primary = place_primary(entity, context, events);
        let placed = primary.success;
        results.push(primary);

        if !placed {
            return results;
        }

        // Copies are taken from the consolidated file, so they exist even
        // when the original album duplicates were merged away.
        let copy_source = entity.primary_file().path().to_path_buf();
        for album in entity.album_names() {
            let result = place_file(
                &copy_source,
                Placement::AlbumCopy(album.clone()),
                OperationKind::Copy,
                entity.date_taken(),
                context,
                events,
            );
            if let Some(target) = &result.result_path {
                entity.relocate_album_file(&album, target);
            }
            results.push(result);
        }
        results
    }
}
