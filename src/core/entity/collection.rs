//! The mutable ordered set of logical entities the pipeline operates on.

use super::MediaEntity;
use crate::core::grouper::DuplicateGrouper;
use crate::core::merger::{self, AlbumMerger};
use crate::events::{null_sender, EventSender};
use serde::{Deserialize, Serialize};

/// Counts exposed for progress reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStatistics {
    pub total: usize,
    pub with_dates: usize,
    pub with_albums: usize,
}

/// Ordered collection of media entities.
///
/// Insertion order is irrelevant to the algorithms but kept stable, because
/// the quality ordering breaks final ties by input order. The collection
/// owns no files, only references. Every operation is a no-op returning
/// zero/empty results on an empty collection.
#[derive(Debug, Default)]
pub struct MediaEntityCollection {
    entities: Vec<MediaEntity>,
}

impl MediaEntityCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn add(&mut self, entity: MediaEntity) {
        self.entities.push(entity);
    }

    /// Remove and return the entity at `index`, or None if out of range
    pub fn remove(&mut self, index: usize) -> Option<MediaEntity> {
        if index < self.entities.len() {
            Some(self.entities.remove(index))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MediaEntity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut MediaEntity> {
        self.entities.iter_mut()
    }

    pub fn as_slice(&self) -> &[MediaEntity] {
        &self.entities
    }

    /// Drop entities whose content duplicates a better sibling.
    ///
    /// Groups entities by primary-file content and keeps the
    /// quality-ordering winner of each group. Returns the number of
    /// entities removed. Idempotent: a second call removes nothing.
    pub fn remove_duplicates(&mut self) -> usize {
        if self.entities.len() < 2 {
            return 0;
        }

        let groups = merger::group_entity_indices(
            &self.entities,
            &DuplicateGrouper::new(),
            &null_sender(),
        );

        let mut discard = vec![false; self.entities.len()];
        for indices in groups {
            if indices.len() < 2 {
                continue;
            }
            let mut winner = indices[0];
            for &i in &indices[1..] {
                if self.entities[i].beats(&self.entities[winner]) {
                    winner = i;
                }
            }
            for &i in &indices {
                if i != winner {
                    discard[i] = true;
                }
            }
        }

        let removed = discard.iter().filter(|&&d| d).count();
        if removed > 0 {
            let kept: Vec<MediaEntity> = self
                .entities
                .drain(..)
                .enumerate()
                .filter(|(i, _)| !discard[*i])
                .map(|(_, e)| e)
                .collect();
            self.entities = kept;
        }

        tracing::debug!(removed, remaining = self.entities.len(), "removed duplicates");
        removed
    }

    /// Collapse cross-location duplicates into album-aware entities,
    /// replacing the collection contents in place.
    pub fn find_albums(&mut self) {
        self.find_albums_with_events(&null_sender());
    }

    /// Like [`find_albums`](Self::find_albums), reporting progress
    /// through `events`.
    pub fn find_albums_with_events(&mut self, events: &EventSender) {
        let drained = std::mem::take(&mut self.entities);
        self.entities = AlbumMerger::new().detect_and_merge_albums_with_events(drained, events);
    }

    pub fn statistics(&self) -> CollectionStatistics {
        CollectionStatistics {
            total: self.entities.len(),
            with_dates: self
                .entities
                .iter()
                .filter(|e| e.date_taken().is_some())
                .count(),
            with_albums: self.entities.iter().filter(|e| e.has_albums()).count(),
        }
    }
}

impl FromIterator<MediaEntity> for MediaEntityCollection {
    fn from_iter<T: IntoIterator<Item = MediaEntity>>(iter: T) -> Self {
        Self {
            entities: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for MediaEntityCollection {
    type Item = MediaEntity;
    type IntoIter = std::vec::IntoIter<MediaEntity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::FileRef;
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

    fn collection_of(paths: &[PathBuf]) -> MediaEntityCollection {
        paths
            .iter()
            .map(|p| MediaEntity::new(FileRef::new(p)))
            .collect()
    }

    #[test]
    fn empty_collection_operations_are_noops() {
        let mut collection = MediaEntityCollection::new();

        assert_eq!(collection.remove_duplicates(), 0);
        collection.find_albums();
        assert!(collection.is_empty());

        let stats = collection.statistics();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.with_dates, 0);
        assert_eq!(stats.with_albums, 0);
    }

    #[test]
    fn remove_out_of_range_returns_none() {
        let mut collection = MediaEntityCollection::new();
        assert!(collection.remove(0).is_none());
    }

    #[test]
    fn remove_duplicates_keeps_one_per_content() {
        let dir = TempDir::new().unwrap();
        let paths = vec![
            write_file(&dir, "a.jpg", &[1, 2, 3]),
            write_file(&dir, "b.jpg", &[1, 2, 3]),
            write_file(&dir, "c.jpg", &[4, 5, 6]),
        ];

        let mut collection = collection_of(&paths);
        let removed = collection.remove_duplicates();

        assert_eq!(removed, 1);
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn remove_duplicates_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let paths = vec![
            write_file(&dir, "a.jpg", &[1, 2, 3]),
            write_file(&dir, "b.jpg", &[1, 2, 3]),
            write_file(&dir, "c.jpg", &[1, 2, 3]),
        ];

        let mut collection = collection_of(&paths);
        assert_eq!(collection.remove_duplicates(), 2);
        assert_eq!(collection.remove_duplicates(), 0);
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn remove_duplicates_prefers_shorter_path() {
        let dir = TempDir::new().unwrap();
        let nested = write_file(&dir, "Albums/Vacation/a.jpg", &[9, 9]);
        let flat = write_file(&dir, "a.jpg", &[9, 9]);

        let mut collection = collection_of(&[nested, flat.clone()]);
        collection.remove_duplicates();

        assert_eq!(collection.len(), 1);
        assert_eq!(
            collection.iter().next().unwrap().primary_file().path(),
            flat.as_path()
        );
    }

    #[test]
    fn statistics_counts_dates_and_albums() {
        use crate::core::entity::{DateAccuracy, ExtractionMethod};
        use chrono::NaiveDate;

        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.jpg", &[1]);
        let b = write_file(&dir, "b.jpg", &[2]);

        let mut collection = MediaEntityCollection::new();
        collection.add(MediaEntity::new(FileRef::new(&a)).with_date(
            NaiveDate::from_ymd_opt(2023, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            DateAccuracy(1),
            ExtractionMethod::Json,
        ));
        let mut with_album = MediaEntity::new(FileRef::new(&b));
        with_album.add_album_file_if_absent("Vacation".to_string(), FileRef::new(&b));
        collection.add(with_album);

        let stats = collection.statistics();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.with_dates, 1);
        assert_eq!(stats.with_albums, 1);
    }
}
