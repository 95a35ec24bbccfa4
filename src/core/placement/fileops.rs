//! Physical file-operation primitives with cross-platform fallbacks.

use crate::error::PlacementError;
use std::fs;
use std::path::{Path, PathBuf};

/// Create a directory and all its parents. Idempotent.
pub fn ensure_directory(dir: &Path) -> Result<(), PlacementError> {
    fs::create_dir_all(dir).map_err(|source| PlacementError::CreateDirectory {
        path: dir.to_path_buf(),
        source,
    })
}

/// Find an unused path for `file_name` inside `dir`, appending `(1)`,
/// `(2)`, ... before the extension until the name is free. Never
/// overwrites an existing file.
pub fn find_unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let extension = name.extension().and_then(|e| e.to_str());

    let mut counter = 1usize;
    loop {
        let disambiguated = match extension {
            Some(ext) => format!("{}({}).{}", stem, counter, ext),
            None => format!("{}({})", stem, counter),
        };
        let candidate = dir.join(disambiguated);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Move a file, falling back to copy+delete across filesystems.
///
/// The fallback verifies the destination size before deleting the source;
/// a short copy is removed and reported instead of destroying data.
pub fn move_file(source: &Path, target: &Path) -> Result<(), PlacementError> {
    if fs::rename(source, target).is_ok() {
        return Ok(());
    }

    // rename fails across filesystems
    let source_size = fs::metadata(source)
        .map_err(|e| placement_move(source, target, e))?
        .len();
    fs::copy(source, target).map_err(|e| placement_move(source, target, e))?;

    let target_size = fs::metadata(target)
        .map_err(|e| placement_move(source, target, e))?
        .len();
    if target_size != source_size {
        let _ = fs::remove_file(target);
        return Err(PlacementError::CopyVerification {
            to: target.to_path_buf(),
            expected: source_size,
            found: target_size,
        });
    }

    fs::remove_file(source).map_err(|e| placement_move(source, target, e))
}

/// Copy a file, leaving the source in place.
pub fn copy_file(source: &Path, target: &Path) -> Result<(), PlacementError> {
    fs::copy(source, target)
        .map(|_| ())
        .map_err(|source_err| PlacementError::Copy {
            from: source.to_path_buf(),
            to: target.to_path_buf(),
            source: source_err,
        })
}

/// Create a symbolic link at `link` pointing to `target`, creating parent
/// directories as needed.
///
/// Platforms without symlinks report `SymlinkUnsupported`, which the
/// strategies treat like any other link failure and fall back to a copy.
pub fn create_symlink(target: &Path, link: &Path) -> Result<(), PlacementError> {
    if let Some(parent) = link.parent() {
        ensure_directory(parent)?;
    }
    symlink_impl(target, link)
}

#[cfg(unix)]
fn symlink_impl(target: &Path, link: &Path) -> Result<(), PlacementError> {
    std::os::unix::fs::symlink(target, link).map_err(|source| PlacementError::Symlink {
        link: link.to_path_buf(),
        target: target.to_path_buf(),
        source,
    })
}

#[cfg(windows)]
fn symlink_impl(target: &Path, link: &Path) -> Result<(), PlacementError> {
    std::os::windows::fs::symlink_file(target, link).map_err(|source| PlacementError::Symlink {
        link: link.to_path_buf(),
        target: target.to_path_buf(),
        source,
    })
}

#[cfg(not(any(unix, windows)))]
fn symlink_impl(_target: &Path, _link: &Path) -> Result<(), PlacementError> {
    Err(PlacementError::SymlinkUnsupported)
}

fn placement_move(source: &Path, target: &Path, e: std::io::Error) -> PlacementError {
    PlacementError::Move {
        from: source.to_path_buf(),
        to: target.to_path_buf(),
        source: e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    #[test]
    fn unique_path_returns_original_when_free() {
        let dir = TempDir::new().unwrap();
        let path = find_unique_path(dir.path(), "photo.jpg");
        assert_eq!(path, dir.path().join("photo.jpg"));
    }

    #[test]
    fn unique_path_appends_counter_before_extension() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "photo.jpg", b"a");
        write_file(dir.path(), "photo(1).jpg", b"b");

        let path = find_unique_path(dir.path(), "photo.jpg");
        assert_eq!(path, dir.path().join("photo(2).jpg"));
    }

    #[test]
    fn unique_path_handles_extensionless_names() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "README", b"a");

        let path = find_unique_path(dir.path(), "README");
        assert_eq!(path, dir.path().join("README(1)"));
    }

    #[test]
    fn move_file_relocates_content() {
        let dir = TempDir::new().unwrap();
        let source = write_file(dir.path(), "a.jpg", b"payload");
        let target = dir.path().join("moved.jpg");

        move_file(&source, &target).unwrap();

        assert!(!source.exists());
        assert_eq!(fs::read(&target).unwrap(), b"payload");
    }

    #[test]
    fn copy_file_leaves_source_in_place() {
        let dir = TempDir::new().unwrap();
        let source = write_file(dir.path(), "a.jpg", b"payload");
        let target = dir.path().join("copied.jpg");

        copy_file(&source, &target).unwrap();

        assert!(source.exists());
        assert_eq!(fs::read(&target).unwrap(), b"payload");
    }

    #[test]
    fn move_missing_source_fails() {
        let dir = TempDir::new().unwrap();
        let result = move_file(
            &dir.path().join("missing.jpg"),
            &dir.path().join("target.jpg"),
        );
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_points_at_target() {
        let dir = TempDir::new().unwrap();
        let target = write_file(dir.path(), "real.jpg", b"content");
        let link = dir.path().join("nested/link.jpg");

        create_symlink(&target, &link).unwrap();

        assert_eq!(fs::read(&link).unwrap(), b"content");
        assert!(fs::symlink_metadata(&link).unwrap().is_symlink());
    }

    #[test]
    fn ensure_directory_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b/c");

        ensure_directory(&nested).unwrap();
        ensure_directory(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
