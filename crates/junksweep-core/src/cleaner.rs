/// Bulk deletion of selected junk directories.
///
/// Targets are disjoint subtrees, so each one is processed independently
/// and in parallel; one undeletable path never stops the rest. There is no
/// batch rollback — a partial clean is still useful progress.
///
/// Byte accounting always uses the caller-supplied sizes (from a prior
/// scan), never a post-hoc disk measurement: a dry run has nothing on disk
/// to measure, and a real deletion destroys what it would measure.
use crate::model::{CleanFailure, CleanResult};
use crate::ScanItem;
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// One path selected for deletion, with its last-scanned size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanTarget {
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl CleanTarget {
    pub fn new(path: PathBuf, size_bytes: u64) -> Self {
        Self { path, size_bytes }
    }
}

impl From<&ScanItem> for CleanTarget {
    fn from(item: &ScanItem) -> Self {
        Self {
            path: item.path.clone(),
            size_bytes: item.size_bytes,
        }
    }
}

/// Delete the given targets (or pretend to, on a dry run).
///
/// Every requested target lands in exactly one of `deleted` / `failed`.
/// The cleaner does not re-validate targets against the catalog: callers
/// may also use it for manual cleanup of arbitrary paths.
pub fn clean(targets: &[CleanTarget], dry_run: bool) -> CleanResult {
    clean_with_cancel(targets, dry_run, &AtomicBool::new(false))
}

/// [`clean`], with cooperative cancellation.
///
/// The flag is checked before each deletion. Whatever was already deleted
/// stays deleted; targets not attempted are reported as failures so the
/// deleted/failed partition still covers every requested path.
pub fn clean_with_cancel(
    targets: &[CleanTarget],
    dry_run: bool,
    cancel: &AtomicBool,
) -> CleanResult {
    let mut result = CleanResult::new(dry_run);

    if dry_run {
        // Never touches the filesystem, not even to stat.
        for target in targets {
            result.deleted.push(target.path.clone());
            result.bytes_freed += target.size_bytes;
        }
        info!(
            "dry run: would delete {} directories ({} bytes)",
            result.deleted_count(),
            result.bytes_freed
        );
        return result;
    }

    let outcomes: Vec<std::result::Result<&CleanTarget, CleanFailure>> = targets
        .par_iter()
        .map(|target| {
            if cancel.load(Ordering::Relaxed) {
                return Err(CleanFailure {
                    path: target.path.clone(),
                    error: "cancelled before deletion".to_string(),
                });
            }
            match fs::remove_dir_all(&target.path) {
                Ok(()) => {
                    debug!("deleted {}", target.path.display());
                    Ok(target)
                }
                Err(err) => {
                    warn!("failed to delete {}: {err}", target.path.display());
                    Err(CleanFailure {
                        path: target.path.clone(),
                        error: err.to_string(),
                    })
                }
            }
        })
        .collect();

    for outcome in outcomes {
        match outcome {
            Ok(target) => {
                result.deleted.push(target.path.clone());
                result.bytes_freed += target.size_bytes;
            }
            Err(failure) => result.failed.push(failure),
        }
    }

    info!(
        "clean complete: {} deleted, {} failed, {} bytes freed",
        result.deleted_count(),
        result.failed_count(),
        result.bytes_freed
    );
    result
}
