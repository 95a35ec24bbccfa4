//! # Identity Module
//!
//! Content fingerprints for physical files.
//!
//! A fingerprint is the pair (byte size, BLAKE3 digest). Sizes are cheap
//! and read first; digests are expensive and only computed for files whose
//! sizes collide. Both are computed lazily and cached, so a file is never
//! read twice no matter how many phases touch it.

use crate::error::ContentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// An immutable reference to one physical file.
///
/// Clones share the cached size/digest, so fingerprinting work done in one
/// phase is visible to every later holder of the reference.
#[derive(Clone)]
pub struct FileRef {
    inner: Arc<Inner>,
}

struct Inner {
    path: PathBuf,
    size: OnceLock<u64>,
    digest: OnceLock<String>,
}

impl FileRef {
    /// Create a reference to a file on disk. No I/O happens here.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                path: path.into(),
                size: OnceLock::new(),
                digest: OnceLock::new(),
            }),
        }
    }

    /// The source path of the file
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// The file name component, lossily converted
    pub fn file_name(&self) -> String {
        self.inner
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Byte size of the file, read once and cached
    pub fn byte_size(&self) -> Result<u64, ContentError> {
        if let Some(size) = self.inner.size.get() {
            return Ok(*size);
        }
        let metadata = std::fs::metadata(&self.inner.path).map_err(|source| ContentError::Size {
            path: self.inner.path.clone(),
            source,
        })?;
        Ok(*self.inner.size.get_or_init(|| metadata.len()))
    }

    /// BLAKE3 digest of the file content as lowercase hex, computed once
    /// and cached
    pub fn digest(&self) -> Result<String, ContentError> {
        if let Some(digest) = self.inner.digest.get() {
            return Ok(digest.clone());
        }
        let digest = hash_file(&self.inner.path).map_err(|source| ContentError::Hash {
            path: self.inner.path.clone(),
            source,
        })?;
        Ok(self.inner.digest.get_or_init(|| digest).clone())
    }

    /// A new reference for the same content at a new path, carrying the
    /// cached fingerprint forward. Used after a successful move, when the
    /// original path no longer exists.
    pub fn relocated(&self, new_path: impl Into<PathBuf>) -> FileRef {
        let size = OnceLock::new();
        if let Some(s) = self.inner.size.get() {
            let _ = size.set(*s);
        }
        let digest = OnceLock::new();
        if let Some(d) = self.inner.digest.get() {
            let _ = digest.set(d.clone());
        }
        FileRef {
            inner: Arc::new(Inner {
                path: new_path.into(),
                size,
                digest,
            }),
        }
    }
}

impl fmt::Debug for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileRef")
            .field("path", &self.inner.path)
            .field("size", &self.inner.size.get())
            .finish()
    }
}

impl PartialEq for FileRef {
    fn eq(&self, other: &Self) -> bool {
        self.inner.path == other.inner.path
    }
}

impl Eq for FileRef {}

fn hash_file(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(hasher.finalize().to_hex().to_string())
}

/// Key identifying one group of byte-identical files.
///
/// A size held by exactly one file proves uniqueness without hashing, so
/// singleton groups are keyed by size alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKey {
    /// The file's byte size was unique across the input
    Size(u64),
    /// BLAKE3 digest shared by every file in the group
    Digest(String),
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKey::Size(size) => write!(f, "{}bytes", size),
            ContentKey::Digest(digest) => write!(f, "{}", digest),
        }
    }
}
