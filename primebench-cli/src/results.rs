//! Result Reading
//!
//! Counts the entries the boss wrote to its results file. Lines are not
//! validated; a trailing line without a newline still counts.

use crate::error::ResultReadError;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use tracing::{debug, warn};

/// Count newline-delimited entries in the results file
pub fn count_results(path: &Path) -> Result<u64, ResultReadError> {
    let unreadable = |source| ResultReadError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ResultReadError::Missing {
            path: path.to_path_buf(),
        },
        _ => unreadable(source),
    })?;

    let mut count = 0u64;
    for line in BufReader::new(file).split(b'\n') {
        line.map_err(unreadable)?;
        count += 1;
    }

    debug!(path = %path.display(), count, "counted results");
    Ok(count)
}

/// Remove a results file left over from an earlier run.
///
/// Without this, a boss that exits cleanly but writes nothing would be
/// credited with the previous run's results.
pub fn discard_stale_results(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed stale results file"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "could not remove stale results file"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("primes.txt");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_counts_lines() {
        let (_dir, path) = write("2\n3\n5\n7\n");
        assert_eq!(count_results(&path).unwrap(), 4);
    }

    #[test]
    fn test_trailing_line_without_newline() {
        let (_dir, path) = write("2\n3\n5");
        assert_eq!(count_results(&path).unwrap(), 3);
    }

    #[test]
    fn test_empty_file() {
        let (_dir, path) = write("");
        assert_eq!(count_results(&path).unwrap(), 0);
    }

    #[test]
    fn test_lines_are_not_validated() {
        let (_dir, path) = write("2\n\nnot a number\n");
        assert_eq!(count_results(&path).unwrap(), 3);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = count_results(&dir.path().join("primes.txt")).unwrap_err();
        assert!(matches!(err, ResultReadError::Missing { .. }));
    }

    #[test]
    fn test_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = count_results(dir.path()).unwrap_err();
        assert!(matches!(err, ResultReadError::Unreadable { .. }));
    }

    #[test]
    fn test_discard_stale_results() {
        let (_dir, path) = write("2\n");
        discard_stale_results(&path);
        assert!(!path.exists());
        // Second call is a no-op
        discard_stale_results(&path);
    }
}
