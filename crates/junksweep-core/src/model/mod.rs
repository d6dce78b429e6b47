/// Data model for scan and clean results.
///
/// Re-exports the result types and size-formatting helpers.
pub mod clean;
pub mod item;
pub mod size;

pub use clean::{CleanFailure, CleanResult};
pub use item::{ScanItem, ScanResult, ScanSkip};
