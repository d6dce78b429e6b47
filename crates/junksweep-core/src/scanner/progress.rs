/// Scan progress reporting — lightweight snapshots sent from scan workers
/// to the consumer via a crossbeam channel.
///
/// Each message is a snapshot, not a log entry: consumers keep only the
/// latest value. Sends are fire-and-forget (`try_send`); when the channel
/// is full the snapshot is dropped so a slow or absent consumer can never
/// stall traversal.
use crossbeam_channel::Sender;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Progress updates sent from scan workers to the consumer.
#[derive(Debug, Clone)]
pub enum ScanProgress {
    /// Running totals; emitted once per directory visited and per item found.
    Update {
        current_path: String,
        items_found: u64,
        dirs_scanned: u64,
    },
    /// A non-fatal skip (unreadable subdirectory, rejected root).
    Skip { path: String, message: String },
    /// Scan finished; the result is available from the handle.
    Complete {
        items_found: u64,
        dirs_scanned: u64,
        duration: Duration,
    },
    /// Scan was cancelled; no result will be produced.
    Cancelled,
    /// The whole scan failed (e.g. every root was invalid).
    Failed { message: String },
}

/// Shared sink for progress events and monotonic counters.
///
/// Counters are updated with relaxed atomics from concurrent workers; the
/// consumer only needs them to be non-decreasing, not instantly exact.
#[derive(Debug, Default)]
pub struct ProgressSink {
    tx: Option<Sender<ScanProgress>>,
    items_found: AtomicU64,
    dirs_scanned: AtomicU64,
}

impl ProgressSink {
    /// A sink that counts but reports to nobody (blocking `scan`).
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn with_sender(tx: Sender<ScanProgress>) -> Self {
        Self {
            tx: Some(tx),
            ..Self::default()
        }
    }

    pub fn items_found(&self) -> u64 {
        self.items_found.load(Ordering::Relaxed)
    }

    pub fn dirs_scanned(&self) -> u64 {
        self.dirs_scanned.load(Ordering::Relaxed)
    }

    /// Record a directory visit and emit a snapshot.
    pub fn visited(&self, path: &Path) {
        self.dirs_scanned.fetch_add(1, Ordering::Relaxed);
        self.update(path);
    }

    /// Record a found item and emit a snapshot.
    pub fn found(&self, path: &Path) {
        self.items_found.fetch_add(1, Ordering::Relaxed);
        self.update(path);
    }

    /// Report a non-fatal skip.
    pub fn skip(&self, path: &Path, message: &str) {
        self.send(ScanProgress::Skip {
            path: path.display().to_string(),
            message: message.to_string(),
        });
    }

    pub fn complete(&self, duration: Duration) {
        self.send(ScanProgress::Complete {
            items_found: self.items_found(),
            dirs_scanned: self.dirs_scanned(),
            duration,
        });
    }

    pub fn cancelled(&self) {
        self.send(ScanProgress::Cancelled);
    }

    pub fn failed(&self, message: String) {
        self.send(ScanProgress::Failed { message });
    }

    fn update(&self, path: &Path) {
        if self.tx.is_some() {
            self.send(ScanProgress::Update {
                current_path: path.display().to_string(),
                items_found: self.items_found(),
                dirs_scanned: self.dirs_scanned(),
            });
        }
    }

    fn send(&self, msg: ScanProgress) {
        if let Some(tx) = &self.tx {
            // Dropped snapshots are fine; only the latest value matters.
            let _ = tx.try_send(msg);
        }
    }
}
