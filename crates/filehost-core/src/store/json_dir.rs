//! Write-through JSON directory store.
//!
//! Every document lives in `<data_dir>/files/<id>.json`. The directory is read
//! into an [`InMemoryDocumentStore`] index on open; reads are served from the
//! index and every mutation is written to disk before it returns.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use filehost_model::types::{FileSummary, StoredFile};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{DocumentStore, InMemoryDocumentStore, StoreTotals};
use crate::error::StoreError;
use crate::query::FileQuery;

const DOCUMENT_EXTENSION: &str = "json";

/// Document store persisting one JSON file per document.
#[derive(Debug)]
pub struct JsonDirDocumentStore {
    dir: PathBuf,
    index: InMemoryDocumentStore,
    write_lock: Mutex<()>,
}

impl JsonDirDocumentStore {
    /// Create a closed store rooted at `data_dir`.
    #[must_use]
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: data_dir.as_ref().join("files"),
            index: InMemoryDocumentStore::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Directory holding the document files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn document_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        let valid = !id.is_empty()
            && id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !valid {
            return Err(StoreError::Internal(anyhow::anyhow!(
                "invalid document id: {id:?}"
            )));
        }
        Ok(self.dir.join(format!("{id}.{DOCUMENT_EXTENSION}")))
    }

    async fn write_document(&self, file: &StoredFile) -> Result<(), StoreError> {
        let path = self.document_path(&file.id)?;
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_vec(file)?;
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(id = %file.id, path = %path.display(), "wrote document");
        Ok(())
    }

    async fn load_documents(&self) -> Result<usize, StoreError> {
        self.index.clear();
        let mut loaded = 0;
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            let bytes = tokio::fs::read(&path).await?;
            match serde_json::from_slice::<StoredFile>(&bytes) {
                Ok(file) => {
                    self.index.load(file);
                    loaded += 1;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable document");
                }
            }
        }
        Ok(loaded)
    }
}

#[async_trait]
impl DocumentStore for JsonDirDocumentStore {
    fn backend(&self) -> &'static str {
        "JSON file store"
    }

    async fn open(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        if self.index.ensure_connected().is_ok() {
            return Ok(());
        }
        tokio::fs::create_dir_all(&self.dir).await?;
        let loaded = self.load_documents().await?;
        info!(dir = %self.dir.display(), documents = loaded, "opened JSON file store");
        self.index.open().await
    }

    async fn close(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.index.close().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.index.ping().await?;
        tokio::fs::metadata(&self.dir).await?;
        Ok(())
    }

    async fn insert(&self, file: StoredFile) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.document_path(&file.id)?;
        self.index.insert(file.clone()).await?;
        if let Err(e) = self.write_document(&file).await {
            self.index.delete(&file.id).await?;
            return Err(e);
        }
        Ok(())
    }

    async fn find(&self, id: &str) -> Result<Option<StoredFile>, StoreError> {
        self.index.find(id).await
    }

    async fn find_many(
        &self,
        query: &FileQuery,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<FileSummary>, StoreError> {
        self.index.find_many(query, skip, limit).await
    }

    async fn count(&self, query: &FileQuery) -> Result<u64, StoreError> {
        self.index.count(query).await
    }

    async fn totals(&self) -> Result<StoreTotals, StoreError> {
        self.index.totals().await
    }

    async fn increment_downloads(&self, id: &str) -> Result<Option<StoredFile>, StoreError> {
        // The index only changes once the disk write has succeeded.
        let _guard = self.write_lock.lock().await;
        let Some(mut file) = self.index.find(id).await? else {
            return Ok(None);
        };
        file.downloads = file.downloads.saturating_add(1);
        self.write_document(&file).await?;
        self.index.load(file.clone());
        Ok(Some(file))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        if self.index.find(id).await?.is_none() {
            return Ok(false);
        }
        let path = self.document_path(id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.index.delete(id).await
    }
}
