//! # Error Module
//!
//! Error types for the takeout consolidator.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, targets, what went wrong
//! - **Per-item isolation** - read and placement errors are recorded and
//!   the run continues; only configuration errors are fatal

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum ConsolidatorError {
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Placement error: {0}")]
    Placement(#[from] PlacementError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors while reading file content for fingerprinting
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Failed to read size of {path}: {source}")]
    Size {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to hash {path}: {source}")]
    Hash {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    /// The path of the file that could not be read
    pub fn path(&self) -> &PathBuf {
        match self {
            ContentError::Size { path, .. } => path,
            ContentError::Hash { path, .. } => path,
        }
    }
}

/// Errors while walking the extracted export tree
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors during a single physical placement operation
#[derive(Error, Debug)]
pub enum PlacementError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Copy verification failed for {to}: expected {expected} bytes, found {found}")]
    CopyVerification {
        to: PathBuf,
        expected: u64,
        found: u64,
    },

    #[error("Failed to create link {link} -> {target}: {source}")]
    Symlink {
        link: PathBuf,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Symbolic links are not supported on this platform")]
    SymlinkUnsupported,
}

/// Errors while writing the album manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to serialize album manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write album manifest to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, ConsolidatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_error_includes_path() {
        let error = ContentError::Hash {
            path: PathBuf::from("/takeout/vanished.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let message = error.to_string();
        assert!(message.contains("/takeout/vanished.jpg"));
        assert_eq!(error.path(), &PathBuf::from("/takeout/vanished.jpg"));
    }

    #[test]
    fn placement_error_includes_both_endpoints() {
        let error = PlacementError::Move {
            from: PathBuf::from("/takeout/a.jpg"),
            to: PathBuf::from("/out/ALL_PHOTOS/a.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = error.to_string();
        assert!(message.contains("/takeout/a.jpg"));
        assert!(message.contains("/out/ALL_PHOTOS/a.jpg"));
    }

    #[test]
    fn unsupported_symlink_names_the_platform_limit() {
        let message = PlacementError::SymlinkUnsupported.to_string();
        assert!(message.contains("not supported"));
    }

    #[test]
    fn copy_verification_reports_sizes() {
        let error = PlacementError::CopyVerification {
            to: PathBuf::from("/out/a.jpg"),
            expected: 100,
            found: 42,
        };
        let message = error.to_string();
        assert!(message.contains("100"));
        assert!(message.contains("42"));
    }
}
