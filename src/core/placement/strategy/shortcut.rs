//! Default strategy: one physical file, one symlink per album.

use super::{link_with_fallback, place_primary, LinkPrimitive, MovingStrategy};
use crate::core::entity::MediaEntity;
use crate::core::placement::context::{AlbumBehavior, MovingContext};
use crate::core::placement::result::MoveMediaEntityResult;
use crate::core::placement::Placement;
use crate::events::EventSender;
use std::sync::Arc;

/// Places the primary file in ALL_PHOTOS and creates a symlink to it in
/// each album folder, falling back to a physical copy where links are
/// unavailable.
pub struct ShortcutStrategy {
    linker: Arc<dyn LinkPrimitive>,
}

impl ShortcutStrategy {
    pub fn with_linker(linker: Arc<dyn LinkPrimitive>) -> Self {
        Self { linker }
    }
}

impl MovingStrategy for ShortcutStrategy {
    fn behavior(&self) -> AlbumBehavior {
        AlbumBehavior::Shortcut
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

        // Links must point at the consolidated copy; with no primary
        // placement there is nothing inside the output tree to link to.
        if !placed {
            return results;
        }

        let link_target = entity.primary_file().path().to_path_buf();
        for album in entity.album_names() {
            results.push(link_with_fallback(
                self.linker.as_ref(),
                &link_target,
                Placement::AlbumCopy(album),
                entity.date_taken(),
                context,
                events,
            ));
        }
        results
    }
}
