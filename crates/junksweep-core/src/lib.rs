/// junksweep Core — junk-directory scanning, cleaning, and data model.
///
/// This crate contains all business logic with zero UI dependencies.
/// It is designed to be reusable across different frontends (CLI, GUI, TUI).
///
/// # Modules
///
/// - [`catalog`] — Registry of known junk-directory kinds and their name
///   patterns.
/// - [`scanner`] — Parallel filesystem scanning with progress reporting
///   and cancellation.
/// - [`cleaner`] — Bulk deletion of selected directories with dry-run
///   support and per-path failure isolation.
/// - [`model`] — Scan/clean result types and size formatting.
/// - [`dto`] — Wire representations for JSON/IPC boundaries.
pub mod catalog;
pub mod cleaner;
pub mod dto;
pub mod error;
pub mod model;
pub mod scanner;

pub use catalog::{JunkCatalog, JunkKind};
pub use cleaner::{clean, clean_with_cancel, CleanTarget};
pub use error::{Error, Result};
pub use model::{CleanFailure, CleanResult, ScanItem, ScanResult, ScanSkip};
pub use scanner::{scan, start_scan, ScanHandle, ScanOptions};
