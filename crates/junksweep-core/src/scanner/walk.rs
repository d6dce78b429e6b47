/// Per-root traversal with rayon fan-out over subtrees.
///
/// Each directory visit classifies child directories against the catalog
/// *before* any other filtering, so hidden-named patterns (`.venv`, `.tox`)
/// match even when hidden directories are otherwise skipped. A classified
/// directory is terminal: its whole subtree is attributed to one
/// [`ScanItem`] and never descended into again (pruning), so nested junk
/// inside junk is never double-reported.
///
/// Workers share no mutable collections: every task returns a local
/// [`WalkOutcome`] and the fan-out reduces them by merging, so there are no
/// locks on the hot path. Only the progress counters are shared, and those
/// are relaxed atomics.
use crate::catalog::JunkCatalog;
use crate::model::{ScanItem, ScanSkip};
use crate::scanner::progress::ProgressSink;
use crate::scanner::ScanOptions;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Shared, read-only state for one scan.
pub(crate) struct WalkContext<'a> {
    pub catalog: &'a JunkCatalog,
    pub options: &'a ScanOptions,
    pub cancel: &'a AtomicBool,
    pub progress: &'a ProgressSink,
}

/// Local results of one traversal task.
#[derive(Debug, Default)]
pub(crate) struct WalkOutcome {
    pub items: Vec<ScanItem>,
    pub skipped: Vec<ScanSkip>,
}

impl WalkOutcome {
    pub fn merge(mut self, mut other: WalkOutcome) -> WalkOutcome {
        self.items.append(&mut other.items);
        self.skipped.append(&mut other.skipped);
        self
    }
}

/// Scan one (already validated) root directory.
///
/// The root itself is never hidden-filtered or classified as junk — the
/// caller named it explicitly, so its children are where matching starts.
pub(crate) fn scan_root(root: &Path, ctx: &WalkContext<'_>) -> WalkOutcome {
    walk_dir(root, 0, ctx)
}

/// Visit one directory: classify its children, then fan out into the ones
/// that remain scannable. `depth` is the number of levels below the root.
fn walk_dir(dir: &Path, depth: usize, ctx: &WalkContext<'_>) -> WalkOutcome {
    let mut outcome = WalkOutcome::default();
    if ctx.cancel.load(Ordering::Relaxed) {
        return outcome;
    }
    ctx.progress.visited(dir);

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("skipping unreadable directory {}: {err}", dir.display());
            ctx.progress.skip(dir, &err.to_string());
            outcome.skipped.push(ScanSkip {
                path: dir.to_path_buf(),
                message: err.to_string(),
            });
            return outcome;
        }
    };

    let mut descend: Vec<PathBuf> = Vec::new();

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                outcome.skipped.push(ScanSkip {
                    path: dir.to_path_buf(),
                    message: err.to_string(),
                });
                continue;
            }
        };

        // `DirEntry::file_type` does not follow symlinks, so a link to a
        // directory is neither descended into nor reported as an item.
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(err) => {
                outcome.skipped.push(ScanSkip {
                    path: entry.path(),
                    message: err.to_string(),
                });
                continue;
            }
        };
        if !file_type.is_dir() || file_type.is_symlink() {
            continue;
        }

        let name = entry.file_name();
        let name = name.to_string_lossy();
        let path = entry.path();

        // Pattern match first: it is the authority, so `.venv` is found
        // even when hidden directories are being skipped.
        if let Some(kind) = ctx.catalog.classify(&name) {
            let (size_bytes, file_count) = measure_subtree(&path);
            debug!(
                "matched {} as {} ({} bytes, {} files)",
                path.display(),
                kind.id,
                size_bytes,
                file_count
            );
            outcome
                .items
                .push(ScanItem::new(path.clone(), &kind.id, size_bytes, file_count));
            ctx.progress.found(&path);
            continue; // terminal: never descend into a matched directory
        }

        if !ctx.options.include_hidden && name.starts_with('.') {
            continue;
        }

        if let Some(max) = ctx.options.max_depth {
            if depth + 1 >= max {
                continue;
            }
        }

        descend.push(path);
    }

    // Fan out across independent subtrees; each task returns its own
    // outcome and the reduce step merges them.
    let children = if descend.len() > 1 {
        descend
            .into_par_iter()
            .map(|sub| walk_dir(&sub, depth + 1, ctx))
            .reduce(WalkOutcome::default, WalkOutcome::merge)
    } else {
        descend
            .into_iter()
            .map(|sub| walk_dir(&sub, depth + 1, ctx))
            .fold(WalkOutcome::default(), WalkOutcome::merge)
    };

    outcome.merge(children)
}

/// Walk a matched junk directory once and total up its regular files.
///
/// Symlinks are not followed; directories and special files contribute
/// 0 bytes of their own. Unreadable entries inside a matched subtree are
/// simply not counted — the item is still reported.
fn measure_subtree(path: &Path) -> (u64, u64) {
    let mut size_bytes: u64 = 0;
    let mut file_count: u64 = 0;

    let walker = jwalk::WalkDir::new(path)
        .skip_hidden(false)
        .follow_links(false)
        // Serial: measurement already runs inside the scan's rayon fan-out,
        // and concurrent matched subtrees are measured in parallel anyway.
        .parallelism(jwalk::Parallelism::Serial);

    for entry in walker.into_iter().flatten() {
        if entry.file_type().is_file() {
            file_count += 1;
            if let Ok(meta) = entry.metadata() {
                size_bytes += meta.len();
            }
        }
    }

    (size_bytes, file_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_bytes(path: &Path, n: usize) {
        let mut f = File::create(path).unwrap();
        f.write_all(&vec![0u8; n]).unwrap();
    }

    #[test]
    fn measure_counts_only_regular_files() {
        let tmp = TempDir::new().unwrap();
        let sub = tmp.path().join("inner");
        fs::create_dir(&sub).unwrap();
        write_bytes(&tmp.path().join("a.bin"), 100);
        write_bytes(&sub.join("b.bin"), 250);

        let (size, count) = measure_subtree(tmp.path());
        assert_eq!(size, 350);
        assert_eq!(count, 2);
    }

    #[test]
    fn measure_empty_directory() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(measure_subtree(tmp.path()), (0, 0));
    }

    #[cfg(unix)]
    #[test]
    fn measure_does_not_follow_symlinks() {
        let tmp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        write_bytes(&outside.path().join("big.bin"), 10_000);
        std::os::unix::fs::symlink(outside.path(), tmp.path().join("link")).unwrap();
        write_bytes(&tmp.path().join("real.bin"), 10);

        let (size, count) = measure_subtree(tmp.path());
        assert_eq!(size, 10);
        assert_eq!(count, 1);
    }
}
