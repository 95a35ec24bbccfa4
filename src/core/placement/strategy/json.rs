//! Membership-manifest strategy: no per-album files at all.
//!
//! Primary files are placed normally; album membership accumulates in
//! memory and is written once, at finalize, to `albums-info.json` in the
//! output root. Paths in the manifest are relative to the output root so
//! the tree stays relocatable.

use super::{emit, place_primary, MovingStrategy};
use crate::core::entity::{MediaEntity, MediaEntityCollection};
use crate::core::placement::context::{AlbumBehavior, MovingContext};
use crate::core::placement::fileops;
use crate::core::placement::result::{MoveMediaEntityResult, MovingOperation, OperationKind};
use crate::core::placement::Placement;
use crate::error::ManifestError;
use crate::events::EventSender;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

/// Name of the manifest file written into the output root
pub const MANIFEST_FILE_NAME: &str = "albums-info.json";

#[derive(Serialize)]
struct ManifestMetadata {
    total_albums: usize,
}

#[derive(Serialize)]
struct Manifest<'a> {
    albums: &'a BTreeMap<String, Vec<String>>,
    metadata: ManifestMetadata,
}

pub struct JsonStrategy {
    /// Album name to placed primary paths, relative to the output root.
    /// BTreeMap keeps the manifest deterministic.
    memberships: BTreeMap<String, Vec<String>>,
}

impl JsonStrategy {
    pub fn new() -> Self {
        Self {
            memberships: BTreeMap::new(),
        }
    }

    fn write_manifest(&self, path: &Path) -> Result<(), ManifestError> {
        let manifest = Manifest {
            albums: &self.memberships,
            metadata: ManifestMetadata {
                total_albums: self.memberships.len(),
            },
        };
        let json = serde_json::to_string_pretty(&manifest)?;
        std::fs::write(path, json).map_err(|source| ManifestError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for JsonStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl MovingStrategy for JsonStrategy {
    fn behavior(&self) -> AlbumBehavior {
        AlbumBehavior::Json
    }

    fn process_media_entity(
        &mut self,
        entity: &mut MediaEntity,
        context: &MovingContext,
        events: &EventSender,
    ) -> Vec<MoveMediaEntityResult> {
        let primary = place_primary(entity, context, events);

        if let Some(placed) = &primary.result_path {
            let recorded = placed
                .strip_prefix(&context.output_root)
                .unwrap_or(placed)
                .to_string_lossy()
                .into_owned();
            for album in entity.album_names() {
                self.memberships.entry(album).or_default().push(recorded.clone());
            }
        }
        vec![primary]
    }

    fn finalize(
        &mut self,
        context: &MovingContext,
        _entities: &MediaEntityCollection,
        events: &EventSender,
    ) -> Vec<MoveMediaEntityResult> {
        let start = Instant::now();
        let manifest_path = context.output_root.join(MANIFEST_FILE_NAME);
        // Placement::Manifest keeps the manifest write out of the
        // per-entity primary-placement count
        let operation = MovingOperation {
            source: manifest_path.clone(),
            target_directory: context.output_root.clone(),
            kind: OperationKind::Copy,
            placement: Placement::Manifest,
            date: None,
        };

        let outcome = fileops::ensure_directory(&context.output_root)
            .map_err(|e| e.to_string())
            .and_then(|_| self.write_manifest(&manifest_path).map_err(|e| e.to_string()));
        let result = match outcome {
            Ok(()) => MoveMediaEntityResult::succeeded(operation, manifest_path, start.elapsed()),
            Err(message) => MoveMediaEntityResult::failed(operation, message, start.elapsed()),
        };
        emit(events, &result);
        vec![result]
    }
}
