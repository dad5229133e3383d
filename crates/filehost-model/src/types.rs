//! Stored document types.
//!
//! Field names follow the `files` collection layout the web front-end
//! consumes (`_id`, `originalName`, `uploaded_at`, ...), so the serde
//! renames here are part of the wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored file document, including its base64 payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    /// Unique document id (UUID v4).
    #[serde(rename = "_id")]
    pub id: String,
    /// Display filename.
    pub filename: String,
    /// Filename as uploaded.
    #[serde(rename = "originalName")]
    pub original_name: String,
    /// Declared size in bytes.
    pub size: u64,
    /// Declared MIME type, if the client sent one.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
    /// Number of completed downloads.
    pub downloads: u64,
    /// Standard base64 encoding of the payload.
    pub data: String,
    /// Expiry instant; `None` keeps the file forever.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredFile {
    /// Whether the document has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// The listing projection of [`StoredFile`]: everything except `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    /// Unique document id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Display filename.
    pub filename: String,
    /// Filename as uploaded.
    #[serde(rename = "originalName")]
    pub original_name: String,
    /// Declared size in bytes.
    pub size: u64,
    /// Declared MIME type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
    /// Number of completed downloads.
    pub downloads: u64,
    /// Expiry instant.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&StoredFile> for FileSummary {
    fn from(file: &StoredFile) -> Self {
        Self {
            id: file.id.clone(),
            filename: file.filename.clone(),
            original_name: file.original_name.clone(),
            size: file.size,
            content_type: file.content_type.clone(),
            uploaded_at: file.uploaded_at,
            downloads: file.downloads,
            expires_at: file.expires_at,
        }
    }
}

/// Filename categories offered by the listing `filter` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FileCategory {
    /// No category restriction.
    #[default]
    All,
    /// Source code and markup.
    Code,
    /// Compressed archives.
    Archive,
    /// Plain text, logs and configuration.
    Text,
}

impl FileCategory {
    /// Parse a `filter` value. Unknown values mean [`FileCategory::All`].
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        match value {
            "code" => Self::Code,
            "archive" => Self::Archive,
            "text" => Self::Text,
            _ => Self::All,
        }
    }

    /// The filename extensions belonging to this category.
    #[must_use]
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::All => &[],
            Self::Code => &["py", "js", "html", "css", "json", "md"],
            Self::Archive => &["zip", "rar", "tar", "gz"],
            Self::Text => &["txt", "md", "log", "ini", "cfg"],
        }
    }

    /// Whether `filename` belongs to this category (case-insensitive).
    #[must_use]
    pub fn matches(&self, filename: &str) -> bool {
        if *self == Self::All {
            return true;
        }
        let Some((_, ext)) = filename.rsplit_once('.') else {
            return false;
        };
        self.extensions()
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StoredFile {
        StoredFile {
            id: "abc".to_owned(),
            filename: "notes.txt".to_owned(),
            original_name: "notes.txt".to_owned(),
            size: 5,
            content_type: Some("text/plain".to_owned()),
            uploaded_at: DateTime::parse_from_rfc3339("2026-01-02T03:04:05.678Z")
                .map(|t| t.with_timezone(&Utc))
                .expect("valid timestamp"),
            downloads: 2,
            data: "aGVsbG8=".to_owned(),
            expires_at: None,
        }
    }

    #[test]
    fn test_should_serialize_document_field_names() {
        let json = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(json["_id"], "abc");
        assert_eq!(json["originalName"], "notes.txt");
        assert_eq!(json["type"], "text/plain");
        assert_eq!(json["downloads"], 2);
        assert_eq!(json["data"], "aGVsbG8=");
        assert!(json["expires_at"].is_null());
        assert!(json["uploaded_at"].is_string());
    }

    #[test]
    fn test_should_project_summary_without_data() {
        let summary = FileSummary::from(&sample());
        let json = serde_json::to_value(&summary).expect("serialize");
        assert!(json.get("data").is_none());
        assert_eq!(json["filename"], "notes.txt");
    }

    #[test]
    fn test_should_report_expiry() {
        let mut file = sample();
        let now = Utc::now();
        assert!(!file.is_expired(now));
        file.expires_at = Some(now - chrono::Duration::seconds(1));
        assert!(file.is_expired(now));
    }

    #[test]
    fn test_should_match_categories_case_insensitively() {
        assert!(FileCategory::Code.matches("main.PY"));
        assert!(FileCategory::Code.matches("README.md"));
        assert!(FileCategory::Text.matches("README.md"));
        assert!(FileCategory::Archive.matches("backup.tar.gz"));
        assert!(!FileCategory::Archive.matches("gz"));
        assert!(!FileCategory::Text.matches("photo.png"));
        assert!(FileCategory::All.matches("anything"));
    }

    #[test]
    fn test_should_treat_unknown_filter_as_all() {
        assert_eq!(FileCategory::from_param("code"), FileCategory::Code);
        assert_eq!(FileCategory::from_param("images"), FileCategory::All);
        assert_eq!(FileCategory::from_param(""), FileCategory::All);
    }
}
