/// Scan result types.
///
/// A [`ScanItem`] is one matched junk directory; a [`ScanResult`] is the
/// full outcome of one scan: the items in discovery order, plus the
/// subdirectories that had to be skipped. Results are immutable snapshots —
/// a re-scan produces a fresh `ScanResult`, nothing is patched in place.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One matched junk directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanItem {
    /// Absolute path to the junk directory. Unique within one scan.
    pub path: PathBuf,
    /// Id of the matching [`crate::JunkKind`].
    pub kind: String,
    /// Sum of the sizes of all regular files under the tree. Symlink
    /// targets are not traversed; directories contribute 0 of their own.
    pub size_bytes: u64,
    /// Count of regular files under the tree.
    pub file_count: u64,
}

impl ScanItem {
    pub fn new(path: PathBuf, kind: &str, size_bytes: u64, file_count: u64) -> Self {
        Self {
            path,
            kind: kind.to_string(),
            size_bytes,
            file_count,
        }
    }
}

/// A subdirectory the scanner could not read. Non-fatal: the rest of the
/// tree was still scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSkip {
    pub path: PathBuf,
    pub message: String,
}

/// Result of one scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
    /// Discovered items, in discovery order (not sorted).
    pub items: Vec<ScanItem>,
    /// Subtrees skipped due to read errors, and roots that were rejected.
    pub skipped: Vec<ScanSkip>,
}

impl ScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total size of all items in bytes.
    pub fn total_size_bytes(&self) -> u64 {
        self.items.iter().map(|i| i.size_bytes).sum()
    }

    /// Total file count across all items.
    pub fn total_file_count(&self) -> u64 {
        self.items.iter().map(|i| i.file_count).sum()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sort items by size, largest first.
    pub fn sort_by_size(&mut self) {
        self.items.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
    }

    /// Sort items lexicographically by path.
    pub fn sort_by_path(&mut self) {
        self.items.sort_by(|a, b| a.path.cmp(&b.path));
    }
}
