//! Storage helpers shared by the repositories.

use crate::{ClinicError, ClinicResult};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replaces `path` with `contents` so that readers see either the old or the new file.
///
/// The content is written to a temporary file in the same directory, synced, and renamed over
/// the target. Missing parent directories are created first.
///
/// # Errors
///
/// Returns a `ClinicError` if:
/// - the parent directory cannot be created ([`ClinicError::StorageDirCreation`]),
/// - the temporary file cannot be created, written or synced ([`ClinicError::FileWrite`]),
/// - the rename over `path` fails ([`ClinicError::FilePersist`]).
pub(crate) fn write_atomically(path: &Path, contents: &str) -> ClinicResult<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(ClinicError::StorageDirCreation)?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(ClinicError::FileWrite)?;
    tmp.write_all(contents.as_bytes())
        .map_err(ClinicError::FileWrite)?;
    tmp.as_file().sync_all().map_err(ClinicError::FileWrite)?;

    tmp.persist(path).map_err(|e| ClinicError::FilePersist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}

/// Reads a store file, treating a missing file as empty.
pub(crate) fn read_store(path: &Path) -> ClinicResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ClinicError::FileRead(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomically_creates_parent_dirs() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let target = temp_dir.path().join("nested").join("store.csv");

        write_atomically(&target, "header\n").expect("write should succeed");

        assert_eq!(
            fs::read_to_string(&target).expect("should read file"),
            "header\n"
        );
    }

    #[test]
    fn test_write_atomically_replaces_and_leaves_no_temp_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let target = temp_dir.path().join("store.csv");
        fs::write(&target, "old content that is longer\n").expect("Failed to seed file");

        write_atomically(&target, "new\n").expect("write should succeed");

        assert_eq!(fs::read_to_string(&target).expect("should read"), "new\n");
        let entries = fs::read_dir(temp_dir.path())
            .expect("should list dir")
            .count();
        assert_eq!(entries, 1, "only the store file should remain");
    }

    #[test]
    fn test_write_atomically_fails_when_parent_is_a_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").expect("Failed to create blocking file");

        let err = write_atomically(&blocker.join("store.csv"), "x")
            .expect_err("write under a file should fail");
        assert!(matches!(err, ClinicError::StorageDirCreation(_)));
    }

    #[test]
    fn test_read_store_missing_file_is_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let content = read_store(&temp_dir.path().join("absent.csv")).expect("should not fail");
        assert!(content.is_none());
    }
}
