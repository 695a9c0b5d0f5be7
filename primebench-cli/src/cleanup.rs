//! Scratch Cleanup
//!
//! Removes the boss's scratch directory. Idempotent: a directory that is
//! already gone (e.g. the boss never started) is not an error.

use crate::error::CleanupError;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Recursively delete `dir`; returns whether anything was removed
pub fn remove_scratch_dir(dir: &Path) -> Result<bool, CleanupError> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => {
            debug!(dir = %dir.display(), "removed scratch directory");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(CleanupError {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_nested_directory() {
        let root = tempfile::tempdir().unwrap();
        let scratch = root.path().join("data");
        std::fs::create_dir_all(scratch.join("worker-1")).unwrap();
        std::fs::write(scratch.join("worker-1").join("chunk"), "11\n13\n").unwrap();

        assert!(remove_scratch_dir(&scratch).unwrap());
        assert!(!scratch.exists());
    }

    #[test]
    fn test_missing_directory_is_ok() {
        let root = tempfile::tempdir().unwrap();
        assert!(!remove_scratch_dir(&root.path().join("data")).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_in_place_of_directory_fails() {
        let root = tempfile::tempdir().unwrap();
        let scratch = root.path().join("data");
        std::fs::write(&scratch, "not a directory").unwrap();

        let err = remove_scratch_dir(&scratch).unwrap_err();
        assert_eq!(err.path, scratch);
    }
}
