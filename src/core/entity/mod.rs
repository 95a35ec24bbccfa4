//! # Entity Module
//!
//! The logical media item the engine moves, and the collection the rest of
//! the pipeline operates on.
//!
//! ## Lifecycle
//! An entity is created once per physical file during ingestion (one file,
//! one entity, no album associations yet). It is mutated only by the album
//! merger (which replaces N single-file entities with one merged entity)
//! and by a moving strategy (which replaces a file reference's path after a
//! successful move). It is destroyed only by de-duplication, when a
//! content-identical sibling is judged better by the quality ordering.

mod collection;

pub use collection::{CollectionStatistics, MediaEntityCollection};

use crate::core::identity::FileRef;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// How trustworthy an extracted capture date is. Lower rank wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DateAccuracy(pub u8);

/// Where an entity's capture date came from. Provenance only; never
/// computed inside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Companion JSON metadata file
    Json,
    /// EXIF tags
    Exif,
    /// Guessed from the file name
    FilenameGuess,
    /// Taken from a year-named folder
    FolderYear,
    /// No date was extracted
    #[default]
    None,
}

/// One logical media item, possibly backed by several byte-identical
/// physical files.
#[derive(Debug, Clone)]
pub struct MediaEntity {
    /// The canonical copy (historically the date-bucket copy, or the first
    /// copy seen)
    primary_file: FileRef,
    /// Named-album copies, one file per album name. Every value is
    /// byte-identical to the primary once the entity has passed through
    /// the album merger.
    album_files: BTreeMap<String, FileRef>,
    date_taken: Option<NaiveDateTime>,
    date_accuracy: Option<DateAccuracy>,
    extraction_method: ExtractionMethod,
    /// Provenance flag from the export archive, passed through untouched
    partner_shared: bool,
}

impl MediaEntity {
    /// Create an entity for one physical file with no album associations.
    pub fn new(primary_file: FileRef) -> Self {
        Self {
            primary_file,
            album_files: BTreeMap::new(),
            date_taken: None,
            date_accuracy: None,
            extraction_method: ExtractionMethod::None,
            partner_shared: false,
        }
    }

    /// Builder-style date assignment, for the external date provider.
    pub fn with_date(
        mut self,
        date_taken: NaiveDateTime,
        accuracy: DateAccuracy,
        method: ExtractionMethod,
    ) -> Self {
        self.date_taken = Some(date_taken);
        self.date_accuracy = Some(accuracy);
        self.extraction_method = method;
        self
    }

    /// Builder-style partner-shared flag.
    pub fn with_partner_shared(mut self, partner_shared: bool) -> Self {
        self.partner_shared = partner_shared;
        self
    }

    pub fn primary_file(&self) -> &FileRef {
        &self.primary_file
    }

    pub fn album_files(&self) -> &BTreeMap<String, FileRef> {
        &self.album_files
    }

    /// Album names in deterministic (sorted) order
    pub fn album_names(&self) -> Vec<String> {
        self.album_files.keys().cloned().collect()
    }

    pub fn has_albums(&self) -> bool {
        !self.album_files.is_empty()
    }

    pub fn album_count(&self) -> usize {
        self.album_files.len()
    }

    pub fn date_taken(&self) -> Option<NaiveDateTime> {
        self.date_taken
    }

    pub fn date_accuracy(&self) -> Option<DateAccuracy> {
        self.date_accuracy
    }

    pub fn extraction_method(&self) -> ExtractionMethod {
        self.extraction_method
    }

    pub fn partner_shared(&self) -> bool {
        self.partner_shared
    }

    /// Set the extracted date. Supplied by the external date provider;
    /// used only for tie-breaking and path bucketing.
    pub fn set_date(
        &mut self,
        date_taken: Option<NaiveDateTime>,
        accuracy: Option<DateAccuracy>,
        method: ExtractionMethod,
    ) {
        self.date_taken = date_taken;
        self.date_accuracy = accuracy;
        self.extraction_method = method;
    }

    pub fn set_partner_shared(&mut self, partner_shared: bool) {
        self.partner_shared = partner_shared;
    }

    /// Add an album association unless the name is already claimed.
    /// Returns true if the association was added.
    pub fn add_album_file_if_absent(&mut self, name: String, file: FileRef) -> bool {
        use std::collections::btree_map::Entry;
        match self.album_files.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(file);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Replace the primary file's path after a successful placement. The
    /// new reference carries the cached fingerprint forward.
    pub fn relocate_primary(&mut self, new_path: impl AsRef<Path>) {
        self.primary_file = self.primary_file.relocated(new_path.as_ref());
    }

    /// Replace one album file's path after a successful placement.
    pub fn relocate_album_file(&mut self, name: &str, new_path: impl AsRef<Path>) {
        if let Some(file) = self.album_files.get(name) {
            let relocated = file.relocated(new_path.as_ref());
            self.album_files.insert(name.to_string(), relocated);
        }
    }

    /// Rank key for the quality ordering's date criterion. An entity counts
    /// as dated only when both the date and its accuracy are known.
    fn date_rank(&self) -> Option<DateAccuracy> {
        match (self.date_taken, self.date_accuracy) {
            (Some(_), Some(accuracy)) => Some(accuracy),
            _ => None,
        }
    }

    /// Quality ordering: returns true when `self` is strictly better than
    /// `other`, so that iterating in input order with a first-wins fold
    /// keeps ties stable.
    ///
    /// Best first: (1) dated beats undated, among dated the lower accuracy
    /// rank wins; (2) more album associations wins; (3) shorter primary
    /// path wins (heuristic: the less-nested copy is more likely the
    /// canonical one).
    pub(crate) fn beats(&self, other: &MediaEntity) -> bool {
        match (self.date_rank(), other.date_rank()) {
            (Some(a), Some(b)) if a != b => return a < b,
            (Some(_), None) => return true,
            (None, Some(_)) => return false,
            _ => {}
        }

        let (a, b) = (self.album_count(), other.album_count());
        if a != b {
            return a > b;
        }

        let (a, b) = (
            self.primary_file.path().as_os_str().len(),
            other.primary_file.path().as_os_str().len(),
        );
        a < b
    }
}
