//! Immutable per-run placement configuration.

use crate::core::placement::result::OperationKind;
use crate::error::ConsolidatorError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// How the ALL_PHOTOS location is subdivided by capture date
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DateDivision {
    /// Everything in one flat folder
    None,
    /// One folder per year (e.g., 2023/)
    #[default]
    Year,
    /// Year/month folders (e.g., 2023/06/)
    Month,
    /// Year/month/day folders (e.g., 2023/06/15/)
    Day,
}

/// How album associations are materialized on disk.
///
/// A closed set: exactly one strategy runs per consolidation, selected up
/// front by the factory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlbumBehavior {
    /// Primary in ALL_PHOTOS, symlink per album (copy fallback)
    #[default]
    Shortcut,
    /// Primary in ALL_PHOTOS, physical copy per album
    DuplicateCopy,
    /// Album copies are the real files, one symlink back in ALL_PHOTOS
    ReverseShortcut,
    /// Primary in ALL_PHOTOS only; membership written to albums-info.json
    Json,
    /// Primary in ALL_PHOTOS only; album associations ignored
    Nothing,
}

/// Whether the primary placement copies or moves the source file
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CopyMode {
    /// Move files into the output tree (source files disappear)
    #[default]
    Move,
    /// Copy files, leaving the source tree untouched
    Copy,
}

impl CopyMode {
    /// The operation kind a primary placement performs under this mode
    pub fn operation_kind(self) -> OperationKind {
        match self {
            CopyMode::Move => OperationKind::Move,
            CopyMode::Copy => OperationKind::Copy,
        }
    }
}

impl FromStr for DateDivision {
    type Err = ConsolidatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(DateDivision::None),
            "year" => Ok(DateDivision::Year),
            "month" => Ok(DateDivision::Month),
            "day" => Ok(DateDivision::Day),
            other => Err(ConsolidatorError::Config(format!(
                "unknown date division '{}' (expected none, year, month or day)",
                other
            ))),
        }
    }
}

impl FromStr for AlbumBehavior {
    type Err = ConsolidatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shortcut" => Ok(AlbumBehavior::Shortcut),
            "duplicate-copy" => Ok(AlbumBehavior::DuplicateCopy),
            "reverse-shortcut" => Ok(AlbumBehavior::ReverseShortcut),
            "json" => Ok(AlbumBehavior::Json),
            "nothing" => Ok(AlbumBehavior::Nothing),
            other => Err(ConsolidatorError::Config(format!(
                "unknown album behavior '{}' (expected shortcut, duplicate-copy, \
                 reverse-shortcut, json or nothing)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for AlbumBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlbumBehavior::Shortcut => write!(f, "shortcut"),
            AlbumBehavior::DuplicateCopy => write!(f, "duplicate-copy"),
            AlbumBehavior::ReverseShortcut => write!(f, "reverse-shortcut"),
            AlbumBehavior::Json => write!(f, "json"),
            AlbumBehavior::Nothing => write!(f, "nothing"),
        }
    }
}

/// Configuration snapshot for one consolidation run. Immutable for the
/// duration of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingContext {
    /// Root of the output tree
    pub output_root: PathBuf,
    /// Date subdivision of ALL_PHOTOS
    pub date_division: DateDivision,
    /// The album strategy to run
    pub album_behavior: AlbumBehavior,
    /// Copy vs. move for the primary placement
    pub copy_mode: CopyMode,
    /// Per-operation detail logging
    pub verbose: bool,
}

impl MovingContext {
    /// Create a context with defaults (year division, shortcut albums,
    /// move mode).
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            date_division: DateDivision::default(),
            album_behavior: AlbumBehavior::default(),
            copy_mode: CopyMode::default(),
            verbose: false,
        }
    }

    pub fn date_division(mut self, date_division: DateDivision) -> Self {
        self.date_division = date_division;
        self
    }

    pub fn album_behavior(mut self, album_behavior: AlbumBehavior) -> Self {
        self.album_behavior = album_behavior;
        self
    }

    pub fn copy_mode(mut self, copy_mode: CopyMode) -> Self {
        self.copy_mode = copy_mode;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Validate the configuration. Fatal: a run must not start with a bad
    /// context, because move mode deletes source files as it goes.
    pub fn validate(&self) -> Result<(), ConsolidatorError> {
        if self.output_root.as_os_str().is_empty() {
            return Err(ConsolidatorError::Config(
                "output root must not be empty".to_string(),
            ));
        }
        if self.output_root.exists() && !self.output_root.is_dir() {
            return Err(ConsolidatorError::Config(format!(
                "output root {} exists and is not a directory",
                self.output_root.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_all_fields() {
        let ctx = MovingContext::new("/out")
            .date_division(DateDivision::Month)
            .album_behavior(AlbumBehavior::Json)
            .copy_mode(CopyMode::Copy)
            .verbose(true);

        assert_eq!(ctx.output_root, PathBuf::from("/out"));
        assert_eq!(ctx.date_division, DateDivision::Month);
        assert_eq!(ctx.album_behavior, AlbumBehavior::Json);
        assert_eq!(ctx.copy_mode, CopyMode::Copy);
        assert!(ctx.verbose);
    }

    #[test]
    fn empty_output_root_fails_validation() {
        let ctx = MovingContext::new("");
        assert!(ctx.validate().is_err());
    }

    #[test]
    fn file_as_output_root_fails_validation() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();

        let ctx = MovingContext::new(&file);
        assert!(ctx.validate().is_err());
    }

    #[test]
    fn album_behavior_parses_all_variants() {
        assert_eq!(
            "shortcut".parse::<AlbumBehavior>().unwrap(),
            AlbumBehavior::Shortcut
        );
        assert_eq!(
            "duplicate-copy".parse::<AlbumBehavior>().unwrap(),
            AlbumBehavior::DuplicateCopy
        );
        assert_eq!(
            "reverse-shortcut".parse::<AlbumBehavior>().unwrap(),
            AlbumBehavior::ReverseShortcut
        );
        assert_eq!("json".parse::<AlbumBehavior>().unwrap(), AlbumBehavior::Json);
        assert_eq!(
            "nothing".parse::<AlbumBehavior>().unwrap(),
            AlbumBehavior::Nothing
        );
        assert!("hardlink".parse::<AlbumBehavior>().is_err());
    }

    #[test]
    fn date_division_rejects_unknown() {
        assert!("week".parse::<DateDivision>().is_err());
        assert_eq!("day".parse::<DateDivision>().unwrap(), DateDivision::Day);
    }

    #[test]
    fn copy_mode_maps_to_operation_kind() {
        assert_eq!(CopyMode::Move.operation_kind(), OperationKind::Move);
        assert_eq!(CopyMode::Copy.operation_kind(), OperationKind::Copy);
    }
}
