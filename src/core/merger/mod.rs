//! # Merger Module
//!
//! Collapses entities that are the same content appearing once under a
//! date-based location and one or more times under named album locations
//! into a single logical entity carrying multiple album associations.
//!
//! ## How It Works
//! 1. Group the entities' primary files by content identity
//! 2. For every group of two or more, pick one winner by the quality
//!    ordering (see [`MediaEntity`])
//! 3. Merge every member's directory-derived album name into the winner's
//!    album map; date-bucket directories contribute no album name
//! 4. Discard the losers
//!
//! Groups of size one pass through unchanged.

use crate::core::entity::MediaEntity;
use crate::core::grouper::DuplicateGrouper;
use crate::core::identity::FileRef;
use crate::events::{Event, EventSender, MergeEvent};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

/// Detects album relationships between content-identical entities and
/// merges them.
pub struct AlbumMerger {
    grouper: DuplicateGrouper,
}

impl AlbumMerger {
    pub fn new() -> Self {
        Self {
            grouper: DuplicateGrouper::new(),
        }
    }

    pub fn with_grouper(grouper: DuplicateGrouper) -> Self {
        Self { grouper }
    }

    /// Merge content-identical entities into album-aware ones.
    ///
    /// The output is never longer than the input; it is equal in length
    /// iff no two inputs share content.
    pub fn detect_and_merge_albums(&self, entities: Vec<MediaEntity>) -> Vec<MediaEntity> {
        self.detect_and_merge_albums_with_events(entities, &crate::events::null_sender())
    }

    /// Like [`detect_and_merge_albums`](Self::detect_and_merge_albums),
    /// reporting progress through `events`.
    pub fn detect_and_merge_albums_with_events(
        &self,
        entities: Vec<MediaEntity>,
        events: &EventSender,
    ) -> Vec<MediaEntity> {
        let before = entities.len();
        if before < 2 {
            return entities;
        }

        events.send(Event::Merge(MergeEvent::Started { entities: before }));

        let groups = group_entity_indices(&entities, &self.grouper, events);

        // Slots preserve input order; merged losers leave holes that are
        // dropped at the end
        let mut slots: Vec<Option<MediaEntity>> = entities.into_iter().map(Some).collect();

        for indices in groups {
            if indices.len() < 2 {
                continue;
            }

            let mut winner_index = indices[0];
            for &i in &indices[1..] {
                let (a, b) = (
                    slots[i].as_ref().expect("slot still populated"),
                    slots[winner_index].as_ref().expect("slot still populated"),
                );
                if a.beats(b) {
                    winner_index = i;
                }
            }

            // Gather album associations in input order so that a name
            // collision keeps the first encountered
            let mut additions: Vec<(String, FileRef)> = Vec::new();
            for &i in &indices {
                let member = slots[i].as_ref().expect("slot still populated");
                if let Some(name) = album_name_for(member.primary_file().path()) {
                    additions.push((name, member.primary_file().clone()));
                }
                for (name, file) in member.album_files() {
                    additions.push((name.clone(), file.clone()));
                }
            }

            let mut winner = slots[winner_index].take().expect("winner slot populated");
            let mut absorbed = 0usize;
            let mut partner_shared = winner.partner_shared();
            for &i in &indices {
                if i == winner_index {
                    continue;
                }
                let loser = slots[i].take().expect("loser slot populated");
                partner_shared |= loser.partner_shared();
                absorbed += 1;
            }
            winner.set_partner_shared(partner_shared);

            for (name, file) in additions {
                winner.add_album_file_if_absent(name, file);
            }

            events.send(Event::Merge(MergeEvent::EntityMerged {
                kept: winner.primary_file().path().to_path_buf(),
                absorbed,
            }));

            slots[winner_index] = Some(winner);
        }

        let merged: Vec<MediaEntity> = slots.into_iter().flatten().collect();

        events.send(Event::Merge(MergeEvent::Completed {
            before,
            after: merged.len(),
        }));
        tracing::debug!(before, after = merged.len(), "album merge complete");

        merged
    }
}

impl Default for AlbumMerger {
    fn default() -> Self {
        Self::new()
    }
}

/// Group entity indices by primary-file content identity.
///
/// Entities whose primary file cannot be read fall out of grouping and
/// therefore pass through merging untouched. Indices within a group are in
/// input order.
pub(crate) fn group_entity_indices(
    entities: &[MediaEntity],
    grouper: &DuplicateGrouper,
    events: &EventSender,
) -> Vec<Vec<usize>> {
    let refs: Vec<FileRef> = entities.iter().map(|e| e.primary_file().clone()).collect();

    let index_by_path: HashMap<&Path, usize> = entities
        .iter()
        .enumerate()
        .map(|(i, e)| (e.primary_file().path(), i))
        .collect();

    let grouping = grouper.group_identical_with_events(&refs, events);

    let mut groups: Vec<Vec<usize>> = grouping
        .groups
        .into_values()
        .map(|members| {
            let mut indices: Vec<usize> = members
                .iter()
                .filter_map(|f| index_by_path.get(f.path()).copied())
                .collect();
            indices.sort_unstable();
            indices
        })
        .collect();

    // Deterministic processing order regardless of hash-map iteration
    groups.sort_unstable_by_key(|g| g.first().copied().unwrap_or(usize::MAX));
    groups
}

/// The album name a path contributes: the name of its containing
/// directory, unless that directory is a canonical date bucket.
pub fn album_name_for(path: &Path) -> Option<String> {
    let parent = path.parent()?.file_name()?.to_str()?;
    if is_date_bucket(parent) {
        None
    } else {
        Some(parent.to_string())
    }
}

fn is_date_bucket(name: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^(?:ALL_PHOTOS|date-unknown|\d{1,4}(?:-\d{2}(?:-\d{2})?)?|Photos from \d{4})$")
            .expect("valid date-bucket pattern")
    });
    re.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, rel: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut file = File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    fn entity(path: &Path) -> MediaEntity {
        MediaEntity::new(FileRef::new(path))
    }

    #[test]
    fn album_name_skips_date_buckets() {
        assert_eq!(album_name_for(Path::new("/t/2023/a.jpg")), None);
        assert_eq!(album_name_for(Path::new("/t/2023/06/a.jpg")), None);
        assert_eq!(album_name_for(Path::new("/t/ALL_PHOTOS/a.jpg")), None);
        assert_eq!(album_name_for(Path::new("/t/date-unknown/a.jpg")), None);
        assert_eq!(
            album_name_for(Path::new("/t/Photos from 2019/a.jpg")),
            None
        );
        assert_eq!(
            album_name_for(Path::new("/t/Vacation/a.jpg")),
            Some("Vacation".to_string())
        );
        assert_eq!(
            album_name_for(Path::new("/t/Summer 2023/a.jpg")),
            Some("Summer 2023".to_string())
        );
    }

    #[test]
    fn year_copy_and_album_copy_merge_into_one_entity() {
        let dir = TempDir::new().unwrap();
        let year_copy = write_file(&dir, "2023/a.jpg", &[1, 2, 3]);
        let album_copy = write_file(&dir, "Vacation/a.jpg", &[1, 2, 3]);

        let merged = AlbumMerger::new()
            .detect_and_merge_albums(vec![entity(&year_copy), entity(&album_copy)]);

        assert_eq!(merged.len(), 1);
        let survivor = &merged[0];
        assert_eq!(survivor.album_names(), vec!["Vacation".to_string()]);
        // The shorter, date-bucketed path wins the quality ordering
        assert_eq!(survivor.primary_file().path(), year_copy.as_path());
    }

    #[test]
    fn merge_preserves_count_when_no_content_is_shared() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "2023/a.jpg", &[1]);
        let b = write_file(&dir, "2023/b.jpg", &[2, 2]);

        let merged = AlbumMerger::new().detect_and_merge_albums(vec![entity(&a), entity(&b)]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn merge_never_increases_count() {
        let dir = TempDir::new().unwrap();
        let mut entities = Vec::new();
        for i in 0..12 {
            let path = write_file(
                &dir,
                &format!("Album{}/f{}.jpg", i % 3, i),
                format!("{}", i % 4).as_bytes(),
            );
            entities.push(entity(&path));
        }

        let before = entities.len();
        let merged = AlbumMerger::new().detect_and_merge_albums(entities);
        assert!(merged.len() <= before);
    }

    #[test]
    fn entity_in_two_albums_collects_both_names() {
        let dir = TempDir::new().unwrap();
        let year_copy = write_file(&dir, "2023/a.jpg", &[7, 7, 7]);
        let vacation = write_file(&dir, "Vacation/a.jpg", &[7, 7, 7]);
        let family = write_file(&dir, "Family/a.jpg", &[7, 7, 7]);

        let merged = AlbumMerger::new().detect_and_merge_albums(vec![
            entity(&year_copy),
            entity(&vacation),
            entity(&family),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(
            merged[0].album_names(),
            vec!["Family".to_string(), "Vacation".to_string()]
        );
    }

    #[test]
    fn album_only_pair_keeps_both_associations() {
        let dir = TempDir::new().unwrap();
        let x = write_file(&dir, "AlbumX/photo.jpg", &[5, 5]);
        let y = write_file(&dir, "AlbumY/photo.jpg", &[5, 5]);

        let merged = AlbumMerger::new().detect_and_merge_albums(vec![entity(&x), entity(&y)]);

        assert_eq!(merged.len(), 1);
        assert_eq!(
            merged[0].album_names(),
            vec!["AlbumX".to_string(), "AlbumY".to_string()]
        );
    }

    #[test]
    fn merged_album_files_match_primary_content() {
        let dir = TempDir::new().unwrap();
        let year_copy = write_file(&dir, "2023/a.jpg", b"identical");
        let album_copy = write_file(&dir, "Vacation/a.jpg", b"identical");

        let merged = AlbumMerger::new()
            .detect_and_merge_albums(vec![entity(&year_copy), entity(&album_copy)]);

        let survivor = &merged[0];
        let primary_digest = survivor.primary_file().digest().unwrap();
        for file in survivor.album_files().values() {
            assert_eq!(file.digest().unwrap(), primary_digest);
        }
    }

    #[test]
    fn singleton_entities_pass_through_unchanged() {
        let dir = TempDir::new().unwrap();
        let only = write_file(&dir, "Vacation/alone.jpg", &[1, 2, 3, 4]);

        let merged = AlbumMerger::new().detect_and_merge_albums(vec![entity(&only)]);

        assert_eq!(merged.len(), 1);
        assert!(!merged[0].has_albums());
    }

    #[test]
    fn partner_shared_survives_merging() {
        let dir = TempDir::new().unwrap();
        let year_copy = write_file(&dir, "2023/a.jpg", &[3, 3]);
        let album_copy = write_file(&dir, "Vacation/a.jpg", &[3, 3]);

        let shared = entity(&album_copy).with_partner_shared(true);
        let merged =
            AlbumMerger::new().detect_and_merge_albums(vec![entity(&year_copy), shared]);

        assert_eq!(merged.len(), 1);
        assert!(merged[0].partner_shared());
    }
}
