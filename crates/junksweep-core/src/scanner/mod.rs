/// Scanner module — orchestrates junk-directory scanning.
///
/// Traversal fans out over independent subtrees on a bounded rayon pool;
/// every worker returns a local item list and the results are reduced into
/// one [`ScanResult`] at the end. Progress streams through a bounded
/// crossbeam channel as fire-and-forget snapshots, so a slow consumer can
/// never stall the scan.
///
/// Two entry points:
/// - [`scan`] — blocking, no progress channel.
/// - [`start_scan`] — background thread returning a [`ScanHandle`] for
///   progress, cancellation, and the final result.
pub mod progress;
mod walk;

use crate::catalog::JunkCatalog;
use crate::error::{Error, Result};
use crate::model::{ScanResult, ScanSkip};
use progress::{ProgressSink, ScanProgress};
use walk::{WalkContext, WalkOutcome};

use crossbeam_channel::Receiver;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::info;

/// Maximum number of progress snapshots that may queue in the channel.
///
/// Snapshots beyond this are dropped rather than queued: the consumer only
/// renders the latest value, so backlog has no use and the scanner never
/// blocks on `send`.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 1_024;

/// Options controlling a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Maximum directory depth below each root (`None` = unlimited).
    /// Directories *at* the limit are still classified; nothing below the
    /// limit is visited.
    pub max_depth: Option<usize>,
    /// Whether to descend into hidden (dot-named) directories. Patterns
    /// that themselves denote hidden names match regardless.
    pub include_hidden: bool,
}

impl ScanOptions {
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }
}

/// Handle to a running scan. Allows cancellation, receiving progress
/// updates, and joining for the final result.
pub struct ScanHandle {
    /// Receiver for progress snapshots from the scan thread.
    pub progress_rx: Receiver<ScanProgress>,
    cancel_flag: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<Result<ScanResult>>>,
}

impl ScanHandle {
    /// Request the scan to stop as soon as possible. Cancellation discards
    /// partial work; `join` will return [`Error::Cancelled`].
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Wait for the scan thread and return its result.
    pub fn join(mut self) -> Result<ScanResult> {
        let thread = self
            .thread
            .take()
            .ok_or_else(|| std::io::Error::other("scan already joined"))?;
        thread
            .join()
            .map_err(|_| std::io::Error::other("scanner thread panicked"))?
    }
}

/// Scan the given roots, blocking until done. No progress reporting.
pub fn scan(catalog: &JunkCatalog, roots: &[PathBuf], options: &ScanOptions) -> Result<ScanResult> {
    let cancel = AtomicBool::new(false);
    run_scan(catalog, roots, options, &ProgressSink::silent(), &cancel)
}

/// Start a scan on a background thread.
///
/// Returns a [`ScanHandle`] for receiving progress, requesting
/// cancellation, and joining for the result.
pub fn start_scan(
    catalog: Arc<JunkCatalog>,
    roots: Vec<PathBuf>,
    options: ScanOptions,
) -> ScanHandle {
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel_flag.clone();

    let thread = thread::Builder::new()
        .name("junksweep-scanner".into())
        .spawn(move || {
            let sink = ProgressSink::with_sender(progress_tx);
            let start = Instant::now();
            let result = run_scan(&catalog, &roots, &options, &sink, &cancel_clone);
            match &result {
                Ok(_) => sink.complete(start.elapsed()),
                Err(Error::Cancelled) => sink.cancelled(),
                Err(err) => sink.failed(err.to_string()),
            }
            result
        })
        .expect("failed to spawn scanner thread");

    ScanHandle {
        progress_rx,
        cancel_flag,
        thread: Some(thread),
    }
}

/// Validate roots, fan out, reduce, deduplicate.
fn run_scan(
    catalog: &JunkCatalog,
    roots: &[PathBuf],
    options: &ScanOptions,
    sink: &ProgressSink,
    cancel: &AtomicBool,
) -> Result<ScanResult> {
    let start = Instant::now();
    info!("scanning {} root(s)", roots.len());

    // A bad root fails only that root; the scan as a whole fails only when
    // every root is rejected.
    let mut valid: Vec<&PathBuf> = Vec::new();
    let mut root_skips: Vec<ScanSkip> = Vec::new();
    for root in roots {
        let rejection = if !root.exists() {
            Some(Error::InvalidRoot(root.clone()))
        } else if !root.is_dir() {
            Some(Error::NotADirectory(root.clone()))
        } else {
            None
        };
        match rejection {
            Some(err) => {
                sink.skip(root, &err.to_string());
                root_skips.push(ScanSkip {
                    path: root.clone(),
                    message: err.to_string(),
                });
            }
            None => valid.push(root),
        }
    }
    if valid.is_empty() && !roots.is_empty() {
        return Err(Error::NoValidRoots(roots.len()));
    }

    let ctx = WalkContext {
        catalog,
        options,
        cancel,
        progress: sink,
    };

    // Bounded worker pool; subtree tasks within each root fan out on the
    // same pool via nested rayon scopes.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_cpus::get())
        .thread_name(|i| format!("junksweep-scan-{i}"))
        .build()
        .map_err(std::io::Error::other)?;

    let outcome = pool.install(|| {
        valid
            .par_iter()
            .map(|root| walk::scan_root(root.as_path(), &ctx))
            .reduce(WalkOutcome::default, WalkOutcome::merge)
    });

    if cancel.load(Ordering::Relaxed) {
        return Err(Error::Cancelled);
    }

    // Overlapping roots can discover the same junk directory twice; keep
    // the first occurrence so discovery order is preserved.
    let mut seen: HashSet<PathBuf> = HashSet::with_capacity(outcome.items.len());
    let mut items = outcome.items;
    items.retain(|item| seen.insert(item.path.clone()));

    let mut skipped = root_skips;
    skipped.extend(outcome.skipped);

    info!(
        "scan complete: {} item(s), {} skip(s) in {:?}",
        items.len(),
        skipped.len(),
        start.elapsed()
    );

    Ok(ScanResult { items, skipped })
}
