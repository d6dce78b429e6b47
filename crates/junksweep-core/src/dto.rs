/// Wire representations for JSON/IPC boundaries.
///
/// Field names here are a stable external contract (camelCase: `path`,
/// `kind`, `kindDisplay`, `sizeBytes`, `sizeDisplay`, `fileCount`;
/// `deleted`, `deletedCount`, `failed`, `failedCount`, `bytesFreed`,
/// `bytesFreedDisplay`, `wasDryRun`, `isSuccess`). Display strings are pure
/// functions of the byte counts and carry no independent state.
use crate::catalog::{JunkCatalog, JunkKind};
use crate::model::size::format_size;
use crate::model::{CleanResult, ScanItem, ScanResult};
use serde::{Deserialize, Serialize};

/// One scanned junk item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanItemDto {
    pub path: String,
    /// Stable snake_case kind id.
    pub kind: String,
    pub kind_display: String,
    pub size_bytes: u64,
    pub size_display: String,
    pub file_count: u64,
}

impl ScanItemDto {
    pub fn from_item(item: &ScanItem, catalog: &JunkCatalog) -> Self {
        let kind_display = catalog
            .get(&item.kind)
            .map(|k| k.display_name.clone())
            .unwrap_or_else(|| item.kind.clone());
        Self {
            path: item.path.display().to_string(),
            kind: item.kind.clone(),
            kind_display,
            size_bytes: item.size_bytes,
            size_display: format_size(item.size_bytes),
            file_count: item.file_count,
        }
    }
}

/// A full scan result with derived totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResultDto {
    pub items: Vec<ScanItemDto>,
    pub total_size_bytes: u64,
    pub total_size_display: String,
    pub total_file_count: u64,
    pub item_count: usize,
}

impl ScanResultDto {
    pub fn from_result(result: &ScanResult, catalog: &JunkCatalog) -> Self {
        Self {
            items: result
                .items
                .iter()
                .map(|i| ScanItemDto::from_item(i, catalog))
                .collect(),
            total_size_bytes: result.total_size_bytes(),
            total_size_display: format_size(result.total_size_bytes()),
            total_file_count: result.total_file_count(),
            item_count: result.item_count(),
        }
    }
}

/// A failed deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanFailureDto {
    pub path: String,
    pub error: String,
}

/// The outcome of a clean invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanResultDto {
    pub deleted: Vec<String>,
    pub deleted_count: usize,
    pub failed: Vec<CleanFailureDto>,
    pub failed_count: usize,
    pub bytes_freed: u64,
    pub bytes_freed_display: String,
    pub was_dry_run: bool,
    pub is_success: bool,
}

impl From<&CleanResult> for CleanResultDto {
    fn from(result: &CleanResult) -> Self {
        Self {
            deleted: result
                .deleted
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            deleted_count: result.deleted_count(),
            failed: result
                .failed
                .iter()
                .map(|f| CleanFailureDto {
                    path: f.path.display().to_string(),
                    error: f.error.clone(),
                })
                .collect(),
            failed_count: result.failed_count(),
            bytes_freed: result.bytes_freed,
            bytes_freed_display: format_size(result.bytes_freed),
            was_dry_run: result.was_dry_run,
            is_success: result.is_success(),
        }
    }
}

/// One catalog entry, for the types-listing surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JunkKindDto {
    pub id: String,
    pub display_name: String,
    pub patterns: Vec<String>,
}

impl From<&JunkKind> for JunkKindDto {
    fn from(kind: &JunkKind) -> Self {
        Self {
            id: kind.id.clone(),
            display_name: kind.display_name.clone(),
            patterns: kind.patterns.clone(),
        }
    }
}
