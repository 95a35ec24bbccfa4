//! Inverted shortcut: album folders own the physical files.
//!
//! The first album (alphabetically) receives the physical file, every
//! further album receives a copy, and ALL_PHOTOS holds a symlink back to
//! the anchor. Entities without albums fall back to an ordinary primary
//! placement.

use super::{link_with_fallback, place_file, place_primary, LinkPrimitive, MovingStrategy};
use crate::core::entity::MediaEntity;
use crate::core::placement::context::{AlbumBehavior, MovingContext};
use crate::core::placement::result::{MoveMediaEntityResult, OperationKind};
use crate::core::placement::Placement;
use crate::events::EventSender;
use std::sync::Arc;

pub struct ReverseShortcutStrategy {
    linker: Arc<dyn LinkPrimitive>,
}

impl ReverseShortcutStrategy {
    pub fn with_linker(linker: Arc<dyn LinkPrimitive>) -> Self {
        Self { linker }
    }
}

impl MovingStrategy for ReverseShortcutStrategy {
    fn behavior(&self) -> AlbumBehavior {
        AlbumBehavior::ReverseShortcut
    }

    fn process_media_entity(
        &mut self,
        entity: &mut MediaEntity,
        context: &MovingContext,
        events: &EventSender,
    ) -> Vec<MoveMediaEntityResult> {
        let albums = entity.album_names();
        let Some(anchor_album) = albums.first().cloned() else {
            return vec![place_primary(entity, context, events)];
        };

        let mut results = Vec::with_capacity(1 + albums.len());

        // The anchor album gets the physical file
        let source = entity.primary_file().path().to_path_buf();
        let anchor = place_file(
            &source,
            Placement::AlbumCopy(anchor_album.clone()),
            context.copy_mode.operation_kind(),
            entity.date_taken(),
            context,
            events,
        );
        let anchor_path = anchor.result_path.clone();
        results.push(anchor);

        let Some(anchor_path) = anchor_path else {
            // Without an anchor there is nothing to link or copy from;
            // place the primary normally so the entity is not lost.
            results.push(place_primary(entity, context, events));
            return results;
        };
        entity.relocate_primary(&anchor_path);
        entity.relocate_album_file(&anchor_album, &anchor_path);

        // Further albums get physical copies of the anchor
        for album in albums.iter().skip(1) {
            let result = place_file(
                &anchor_path,
                Placement::AlbumCopy(album.clone()),
                OperationKind::Copy,
                entity.date_taken(),
                context,
                events,
            );
            if let Some(target) = &result.result_path {
                entity.relocate_album_file(album, target);
            }
            results.push(result);
        }

        // The ALL_PHOTOS entry is a link back to the anchor; it stands in
        // for the primary placement.
        results.push(link_with_fallback(
            self.linker.as_ref(),
            &anchor_path,
            Placement::Primary,
            entity.date_taken(),
            context,
            events,
        ));
        results
    }
}
