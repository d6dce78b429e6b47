/// Clean result types.
///
/// A clean partitions the requested paths into `deleted` and `failed`;
/// every requested path lands in exactly one of the two. `bytes_freed` is
/// the sum of the caller-supplied sizes of the successfully deleted paths —
/// it is never re-measured from disk.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A path that was selected for deletion but could not be removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanFailure {
    pub path: PathBuf,
    /// Human-readable description of what went wrong.
    pub error: String,
}

/// Result of one clean invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanResult {
    /// Successfully deleted paths (or, on a dry run, paths that would be).
    pub deleted: Vec<PathBuf>,
    /// Paths that could not be removed, with the reason.
    pub failed: Vec<CleanFailure>,
    /// Sum of the supplied sizes of the deleted paths.
    pub bytes_freed: u64,
    /// Whether this clean was a dry run.
    pub was_dry_run: bool,
}

impl CleanResult {
    pub fn new(dry_run: bool) -> Self {
        Self {
            was_dry_run: dry_run,
            ..Default::default()
        }
    }

    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// True iff nothing failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_track_partitions() {
        let mut result = CleanResult::new(false);
        result.deleted.push(PathBuf::from("/a"));
        result.deleted.push(PathBuf::from("/b"));
        result.failed.push(CleanFailure {
            path: PathBuf::from("/c"),
            error: "permission denied".into(),
        });

        assert_eq!(result.deleted_count(), 2);
        assert_eq!(result.failed_count(), 1);
        assert!(!result.is_success());
    }

    #[test]
    fn empty_failed_set_means_success() {
        let result = CleanResult::new(true);
        assert!(result.is_success());
        assert_eq!(result.deleted_count() + result.failed_count(), 0);
    }
}
