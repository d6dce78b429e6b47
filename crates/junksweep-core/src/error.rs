/// Error types for the junksweep core.
///
/// Per-item trouble during a scan or clean (an unreadable subdirectory, a
/// path that refused deletion) is *data* — it lands in [`crate::ScanResult`]
/// or [`crate::CleanResult`], never here. This enum covers only failures of
/// the whole operation.
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A scan root does not exist.
    #[error("path does not exist: {0}")]
    InvalidRoot(PathBuf),

    /// A scan root exists but is not a directory.
    #[error("path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Every root passed to a scan was invalid. A scan with at least one
    /// valid root succeeds partially instead.
    #[error("no valid scan roots (all {0} roots were rejected)")]
    NoValidRoots(usize),

    /// Two catalog entries claim the same name pattern. Raised at catalog
    /// construction so a misconfigured catalog can never classify anything.
    #[error("catalog conflict: pattern {pattern:?} claimed by both {first:?} and {second:?}")]
    CatalogConflict {
        pattern: String,
        first: String,
        second: String,
    },

    /// The operation was cancelled before it completed.
    #[error("operation cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
