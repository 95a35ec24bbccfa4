//! Album associations discarded: date-organized primaries only.

use super::{place_primary, MovingStrategy};
use crate::core::entity::MediaEntity;
use crate::core::placement::context::{AlbumBehavior, MovingContext};
use crate::core::placement::result::MoveMediaEntityResult;
use crate::events::EventSender;

pub struct NothingStrategy;

impl NothingStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NothingStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl MovingStrategy for NothingStrategy {
    fn behavior(&self) -> AlbumBehavior {
        AlbumBehavior::Nothing
    }

    fn process_media_entity(
        &mut self,
        entity: &mut MediaEntity,
        context: &MovingContext,
        events: &EventSender,
    ) -> Vec<MoveMediaEntityResult> {
        vec![place_primary(entity, context, events)]
    }
}
