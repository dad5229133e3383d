//! FileHost provider implementing all operations.
//!
//! [`FileHostProvider`] owns the injected [`DocumentStore`], the optional
//! [`Notifier`], and the configuration. Each public method implements one
//! operation and returns either a typed output or a [`FileHostError`].

use std::sync::Arc;
use std::time::Instant;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use chrono::{SecondsFormat, SubsecRound, Utc};
use filehost_http::multipart::{extract_boundary, parse_multipart_with};
use filehost_model::error::{FileHostError, FileHostErrorCode};
use filehost_model::input::ListFilesInput;
use filehost_model::output::{
    DeleteFileOutput, FileStats, ListFilesOutput, Pagination, StatusOutput, UploadFileOutput,
};
use filehost_model::types::StoredFile;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::FileHostConfig;
use crate::notify::{Notifier, UploadEvent};
use crate::query::FileQuery;
use crate::store::DocumentStore;

/// A decoded file ready to be sent to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPayload {
    /// Stored filename.
    pub filename: String,
    /// Declared content type, if any.
    pub content_type: Option<String>,
    /// Decoded file bytes.
    pub data: Bytes,
}

/// Main FileHost provider.
#[derive(Debug)]
pub struct FileHostProvider {
    store: Arc<dyn DocumentStore>,
    notifier: Option<Arc<dyn Notifier>>,
    config: Arc<FileHostConfig>,
    started_at: Instant,
}

impl FileHostProvider {
    /// Create a provider over an already opened store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, config: FileHostConfig) -> Self {
        Self {
            store,
            notifier: None,
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    /// Attach a notifier invoked after every successful upload.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &FileHostConfig {
        &self.config
    }

    /// Handle `UploadFile`.
    ///
    /// Optional plain fields `filename`, `size` and `type` override the
    /// values taken from the `file` part.
    pub async fn upload(
        &self,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Result<UploadFileOutput, FileHostError> {
        let boundary = extract_boundary(content_type.unwrap_or_default()).map_err(|e| {
            debug!(error = %e, "rejecting upload with unusable content type");
            FileHostError::new(FileHostErrorCode::InvalidContentType).with_source(e)
        })?;

        let mut skipped = 0_usize;
        let form = parse_multipart_with(body, &boundary, |segment| {
            skipped += 1;
            debug!(
                index = segment.index,
                len = segment.len,
                reason = ?segment.reason,
                "skipped multipart segment"
            );
        });

        let file = form.file("file").ok_or_else(|| {
            debug!(parts = form.len(), skipped, "upload carried no file part");
            FileHostError::no_file_uploaded()
        })?;

        let filename = form
            .field("filename")
            .filter(|v| !v.is_empty())
            .unwrap_or(file.filename.as_str())
            .to_owned();
        let size = form
            .field("size")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(file.data.len() as u64);
        // Only types usable as a download header are kept.
        let declared_type = form
            .field("type")
            .filter(|v| is_header_safe(v))
            .or(file.content_type.as_deref().filter(|v| is_header_safe(v)))
            .map(ToOwned::to_owned);

        let id = Uuid::new_v4().to_string();
        let document = StoredFile {
            id: id.clone(),
            filename: filename.clone(),
            original_name: filename.clone(),
            size,
            content_type: declared_type,
            uploaded_at: Utc::now().trunc_subsecs(3),
            downloads: 0,
            data: BASE64.encode(&file.data),
            expires_at: None,
        };
        self.store.insert(document).await?;

        info!(id = %id, filename = %filename, size, skipped, "stored uploaded file");

        self.spawn_notification(UploadEvent {
            id: id.clone(),
            filename: filename.clone(),
            size,
        });

        Ok(UploadFileOutput {
            success: true,
            url: format!("/api/download/{id}"),
            file_id: id,
            filename,
            size,
            message: "File uploaded permanently".to_owned(),
        })
    }

    fn spawn_notification(&self, event: UploadEvent) {
        let Some(notifier) = self.notifier.clone() else {
            return;
        };
        tokio::spawn(async move {
            if let Err(e) = notifier.notify_upload(&event).await {
                warn!(id = %event.id, error = %e, "upload notification failed");
            }
        });
    }

    /// Handle `ListFiles`.
    pub async fn list_files(
        &self,
        input: &ListFilesInput,
    ) -> Result<ListFilesOutput, FileHostError> {
        let query = FileQuery::from_input(input)?;

        let files = self
            .store
            .find_many(&query, input.skip(), input.limit)
            .await?;
        let total = self.store.count(&query).await?;
        let totals = self.store.totals().await?;

        Ok(ListFilesOutput {
            success: true,
            files,
            stats: FileStats {
                total_files: total,
                total_size: totals.size,
                total_downloads: totals.downloads,
            },
            pagination: Pagination::new(input.page, input.limit, total),
        })
    }

    /// Handle `DownloadFile`.
    ///
    /// Increments the download counter before decoding the payload.
    pub async fn download(&self, id: Option<&str>) -> Result<DownloadPayload, FileHostError> {
        let id = id.ok_or_else(FileHostError::missing_file_id)?;

        let file = self
            .store
            .find(id)
            .await?
            .filter(|file| !file.is_expired(Utc::now()))
            .ok_or_else(FileHostError::file_not_found)?;

        // Deleted between the lookup and the increment.
        if self.store.increment_downloads(id).await?.is_none() {
            return Err(FileHostError::file_not_found());
        }

        let data = BASE64.decode(file.data.as_bytes()).map_err(|e| {
            FileHostError::internal_error(format!("Stored data for {id} is not valid base64"))
                .with_source(e)
        })?;

        debug!(id, bytes = data.len(), "serving download");

        Ok(DownloadPayload {
            filename: file.filename,
            content_type: file.content_type,
            data: Bytes::from(data),
        })
    }

    /// Handle `DeleteFile`.
    pub async fn delete(&self, id: Option<&str>) -> Result<DeleteFileOutput, FileHostError> {
        let id = id.ok_or_else(FileHostError::missing_file_id)?;

        if !self.store.delete(id).await? {
            return Err(FileHostError::file_not_found());
        }
        info!(id, "deleted file");

        Ok(DeleteFileOutput {
            success: true,
            message: "File deleted permanently".to_owned(),
        })
    }

    /// Handle `GetStatus`. Never fails; store problems are reported in the body.
    pub async fn status(&self) -> StatusOutput {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        match self.store.ping().await {
            Ok(()) => StatusOutput {
                status: "online".to_owned(),
                database: "connected".to_owned(),
                db_name: Some(self.config.db_name.clone()),
                uptime: Some(self.started_at.elapsed().as_secs_f64()),
                error: None,
                timestamp,
                message: format!("Server is running with {}", self.store.backend()),
            },
            Err(e) => {
                warn!(error = %e, "status check could not reach the store");
                StatusOutput {
                    status: "online".to_owned(),
                    database: "disconnected".to_owned(),
                    db_name: None,
                    uptime: None,
                    error: Some(e.to_string()),
                    timestamp,
                    message: "Server running but database not connected".to_owned(),
                }
            }
        }
    }
}

fn is_header_safe(value: &str) -> bool {
    !value.is_empty() && http::HeaderValue::from_str(value).is_ok()
}
