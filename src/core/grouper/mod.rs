//! # Grouper Module
//!
//! Partitions files into groups of byte-identical content.
//!
//! ## How It Works
//! 1. Read every file's byte size in bounded-concurrency batches
//! 2. A size held by exactly one file is final - that file is certainly unique
//! 3. Hash only the size-colliding candidates, again in bounded batches
//! 4. Partition the candidates by digest
//!
//! Hashing is the expensive step, so bounding it to true collision
//! candidates keeps large inputs cheap. The returned map is a partition of
//! the readable input: every file appears in exactly one group.

use crate::core::identity::{ContentKey, FileRef};
use crate::events::{Event, EventSender, GroupEvent};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// A file excluded from grouping because it could not be read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Result of grouping: a partition of the readable input plus the files
/// that could not be read
#[derive(Debug, Default)]
pub struct Grouping {
    /// Groups of byte-identical files, keyed by content
    pub groups: HashMap<ContentKey, Vec<FileRef>>,
    /// Files excluded because size or hash could not be read
    pub failures: Vec<ContentFailure>,
}

impl Grouping {
    /// Total number of files across all groups
    pub fn grouped_len(&self) -> usize {
        self.groups.values().map(|g| g.len()).sum()
    }

    /// Number of groups holding more than one file
    pub fn duplicate_group_count(&self) -> usize {
        self.groups.values().filter(|g| g.len() > 1).count()
    }
}

/// Groups files by identical content using a two-phase size-then-hash
/// strategy.
pub struct DuplicateGrouper {
    batch_size: usize,
}

impl DuplicateGrouper {
    /// Create a grouper with the default batch size of 2x the logical
    /// CPU count.
    pub fn new() -> Self {
        Self {
            batch_size: 2 * rayon::current_num_threads(),
        }
    }

    /// Create a grouper with an explicit batch size (tests, tuning).
    pub fn with_batch_size(batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch size must be positive");
        Self { batch_size }
    }

    /// Partition `files` into groups of byte-identical content.
    pub fn group_identical(&self, files: &[FileRef]) -> Grouping {
        self.group_identical_with_events(files, &crate::events::null_sender())
    }

    /// Partition `files` into groups, reporting progress through `events`.
    pub fn group_identical_with_events(
        &self,
        files: &[FileRef],
        events: &EventSender,
    ) -> Grouping {
        events.send(Event::Group(GroupEvent::Started {
            total_files: files.len(),
        }));

        let mut failures = Vec::new();

        // Phase 1: sizes, batched so no more than batch_size reads are in
        // flight at once
        let mut by_size: HashMap<u64, Vec<FileRef>> = HashMap::new();
        let mut completed = 0usize;
        for chunk in files.chunks(self.batch_size) {
            let sized: Vec<_> = chunk
                .par_iter()
                .map(|file| (file.clone(), file.byte_size()))
                .collect();

            for (file, size) in sized {
                match size {
                    Ok(size) => by_size.entry(size).or_default().push(file),
                    Err(e) => {
                        tracing::warn!("excluding unreadable file: {}", e);
                        events.send(Event::Group(GroupEvent::Error {
                            path: file.path().to_path_buf(),
                            message: e.to_string(),
                        }));
                        failures.push(ContentFailure {
                            path: file.path().to_path_buf(),
                            message: e.to_string(),
                        });
                    }
                }
            }

            completed += chunk.len();
            events.send(Event::Group(GroupEvent::SizeProgress {
                completed,
                total: files.len(),
            }));
        }

        // Phase 2: hash only the size-colliding candidates
        let candidates: usize = by_size
            .values()
            .filter(|m| m.len() > 1)
            .map(|m| m.len())
            .sum();

        let mut groups: HashMap<ContentKey, Vec<FileRef>> = HashMap::new();
        let mut unique = 0usize;
        let mut hashed = 0usize;

        for (size, members) in by_size {
            if members.len() == 1 {
                unique += 1;
                groups.insert(ContentKey::Size(size), members);
                continue;
            }

            for chunk in members.chunks(self.batch_size) {
                let digested: Vec<_> = chunk
                    .par_iter()
                    .map(|file| (file.clone(), file.digest()))
                    .collect();

                for (file, digest) in digested {
                    hashed += 1;
                    events.send(Event::Group(GroupEvent::HashProgress {
                        completed: hashed,
                        total: candidates,
                        current_path: file.path().to_path_buf(),
                    }));

                    match digest {
                        Ok(digest) => {
                            groups.entry(ContentKey::Digest(digest)).or_default().push(file)
                        }
                        Err(e) => {
                            // The file vanished or became unreadable between
                            // phases; its group proceeds without it
                            tracing::warn!("excluding unreadable file: {}", e);
                            events.send(Event::Group(GroupEvent::Error {
                                path: file.path().to_path_buf(),
                                message: e.to_string(),
                            }));
                            failures.push(ContentFailure {
                                path: file.path().to_path_buf(),
                                message: e.to_string(),
                            });
                            continue;
                        }
                    };
                }
            }
        }

        events.send(Event::Group(GroupEvent::Completed {
            groups: groups.len(),
            unique,
            failures: failures.len(),
        }));

        Grouping { groups, failures }
    }
}

impl Default for DuplicateGrouper {
    fn default() -> Self {
        Self::new()
    }
}
