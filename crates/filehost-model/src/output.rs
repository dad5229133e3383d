//! Operation output types.
//!
//! JSON outputs use camelCase keys to match the web front-end.

use serde::Serialize;

use crate::types::FileSummary;

/// Output of `UploadFile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileOutput {
    /// Always `true`.
    pub success: bool,
    /// Id of the new document.
    pub file_id: String,
    /// Stored filename.
    pub filename: String,
    /// Stored size in bytes.
    pub size: u64,
    /// Relative download URL.
    pub url: String,
    /// Human-readable confirmation.
    pub message: String,
}

/// Aggregate figures returned with every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStats {
    /// Number of files matching the listing query.
    pub total_files: u64,
    /// Sum of `size` over all stored files.
    pub total_size: u64,
    /// Sum of `downloads` over all stored files.
    pub total_downloads: u64,
}

/// Pagination metadata for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Current 1-based page.
    pub page: u64,
    /// Page size.
    pub limit: u64,
    /// Number of matching files.
    pub total: u64,
    /// Number of pages, `ceil(total / limit)`.
    pub pages: u64,
}

impl Pagination {
    /// Build pagination metadata for `total` matches.
    #[must_use]
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            pages: total.div_ceil(limit.max(1)),
        }
    }
}

/// Output of `ListFiles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListFilesOutput {
    /// Always `true`.
    pub success: bool,
    /// The requested page of files, newest first.
    pub files: Vec<FileSummary>,
    /// Aggregate figures.
    pub stats: FileStats,
    /// Pagination metadata.
    pub pagination: Pagination,
}

/// Output of `DeleteFile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteFileOutput {
    /// Always `true`.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
}

/// Output of `GetStatus`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusOutput {
    /// Always `"online"` while the server answers.
    pub status: String,
    /// `"connected"` or `"disconnected"`.
    pub database: String,
    /// Database name, reported while connected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,
    /// Seconds since the service started, reported while connected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<f64>,
    /// Error text, reported while disconnected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// RFC 3339 timestamp of the check.
    pub timestamp: String,
    /// Human-readable summary.
    pub message: String,
}
