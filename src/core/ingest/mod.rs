//! # Ingest Module
//!
//! Walks an extracted export tree and produces one [`MediaEntity`] per
//! physical media file. Entities leave here with no album associations and
//! no dates; the merger and any date collaborator fill those in later.

use crate::core::entity::{MediaEntity, MediaEntityCollection};
use crate::core::identity::FileRef;
use crate::error::IngestError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions treated as media. Matching is case-insensitive.
const MEDIA_EXTENSIONS: &[&str] = &[
    // photos
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "heic", "heif", "tiff", "tif", "raw", "cr2",
    "nef", "arw", "dng", // videos
    "mp4", "mov", "avi", "mkv", "webm", "m4v", "3gp", "mts",
];

/// Configuration for the tree walk
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: false,
            max_depth: None,
        }
    }
}

/// Outcome of walking one export tree
#[derive(Debug)]
pub struct IngestReport {
    /// One entity per media file found, in walk order
    pub entities: MediaEntityCollection,
    /// Non-fatal per-entry failures (unreadable subdirectories etc.)
    pub errors: Vec<IngestError>,
    pub directories_scanned: usize,
    pub files_skipped: usize,
}

/// Walks export trees into media entities.
pub struct MediaIngestor {
    config: IngestConfig,
}

impl MediaIngestor {
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    /// Walk `root` and collect every media file.
    ///
    /// A missing or non-directory root is fatal; unreadable entries below
    /// it are collected in the report and the walk continues.
    pub fn ingest(&self, root: impl AsRef<Path>) -> Result<IngestReport, IngestError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(IngestError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut entities = MediaEntityCollection::new();
        let mut errors = Vec::new();
        let mut directories_scanned = 0usize;
        let mut files_skipped = 0usize;

        let mut walker = WalkDir::new(root).follow_links(self.config.follow_symlinks);
        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let include_hidden = self.config.include_hidden;
        let walk = walker.into_iter().filter_entry(move |entry| {
            include_hidden || entry.depth() == 0 || !is_hidden(entry.path())
        });

        for entry_result in walk {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(error) => {
                    let path = error
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| root.to_path_buf());
                    errors.push(match error.into_io_error() {
                        Some(source) if source.kind() == std::io::ErrorKind::PermissionDenied => {
                            IngestError::PermissionDenied { path }
                        }
                        Some(source) => IngestError::ReadDirectory { path, source },
                        None => IngestError::ReadDirectory {
                            path,
                            source: std::io::Error::other("filesystem loop detected"),
                        },
                    });
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                directories_scanned += 1;
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !is_media_file(path) {
                files_skipped += 1;
                continue;
            }

            entities.add(MediaEntity::new(FileRef::new(path)));
        }

        tracing::debug!(
            entities = entities.len(),
            skipped = files_skipped,
            errors = errors.len(),
            root = %root.display(),
            "ingest complete"
        );
        Ok(IngestReport {
            entities,
            errors,
            directories_scanned,
            files_skipped,
        })
    }

    /// Walk several roots into one collection, in the given order.
    pub fn ingest_all(
        &self,
        roots: &[PathBuf],
    ) -> Result<IngestReport, IngestError> {
        let mut combined = IngestReport {
            entities: MediaEntityCollection::new(),
            errors: Vec::new(),
            directories_scanned: 0,
            files_skipped: 0,
        };
        for root in roots {
            let report = self.ingest(root)?;
            for entity in report.entities {
                combined.entities.add(entity);
            }
            combined.errors.extend(report.errors);
            combined.directories_scanned += report.directories_scanned;
            combined.files_skipped += report.files_skipped;
        }
        Ok(combined)
    }
}

impl Default for MediaIngestor {
    fn default() -> Self {
        Self::new(IngestConfig::default())
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

fn is_media_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| MEDIA_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
