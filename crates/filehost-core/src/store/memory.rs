//! In-memory document store.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use filehost_model::types::{FileSummary, StoredFile};

use super::{DocumentStore, StoreTotals};
use crate::error::StoreError;
use crate::query::FileQuery;

/// Document store backed by a [`DashMap`].
///
/// The store starts closed; call [`DocumentStore::open`] before use.
///
/// ```
/// use filehost_core::store::{DocumentStore, InMemoryDocumentStore};
///
/// # tokio_test::block_on(async {
/// let store = InMemoryDocumentStore::new();
/// assert!(store.ping().await.is_err());
/// store.open().await.unwrap();
/// assert!(store.ping().await.is_ok());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    files: DashMap<String, StoredFile>,
    connected: AtomicBool,
}

impl InMemoryDocumentStore {
    /// Create a new, closed, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a document without any connectivity check.
    ///
    /// Used to seed the index while a persistent store is loading.
    pub(crate) fn load(&self, file: StoredFile) {
        self.files.insert(file.id.clone(), file);
    }

    /// Drop every document.
    pub(crate) fn clear(&self) {
        self.files.clear();
    }

    pub(crate) fn ensure_connected(&self) -> Result<(), StoreError> {
        if self.connected.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(StoreError::Disconnected)
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn backend(&self) -> &'static str {
        "in-memory store"
    }

    async fn open(&self) -> Result<(), StoreError> {
        self.connected.store(true, Ordering::Release);
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.connected.store(false, Ordering::Release);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.ensure_connected()
    }

    async fn insert(&self, file: StoredFile) -> Result<(), StoreError> {
        self.ensure_connected()?;
        match self.files.entry(file.id.clone()) {
            Entry::Occupied(entry) => Err(StoreError::DuplicateId {
                id: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(file);
                Ok(())
            }
        }
    }

    async fn find(&self, id: &str) -> Result<Option<StoredFile>, StoreError> {
        self.ensure_connected()?;
        Ok(self.files.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_many(
        &self,
        query: &FileQuery,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<FileSummary>, StoreError> {
        self.ensure_connected()?;
        let mut matched: Vec<FileSummary> = self
            .files
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| FileSummary::from(entry.value()))
            .collect();
        matched.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(matched.into_iter().skip(skip).take(limit).collect())
    }

    async fn count(&self, query: &FileQuery) -> Result<u64, StoreError> {
        self.ensure_connected()?;
        let count = self
            .files
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn totals(&self) -> Result<StoreTotals, StoreError> {
        self.ensure_connected()?;
        Ok(self
            .files
            .iter()
            .fold(StoreTotals::default(), |acc, entry| StoreTotals {
                files: acc.files + 1,
                size: acc.size.saturating_add(entry.size),
                downloads: acc.downloads.saturating_add(entry.downloads),
            }))
    }

    async fn increment_downloads(&self, id: &str) -> Result<Option<StoredFile>, StoreError> {
        self.ensure_connected()?;
        Ok(self.files.get_mut(id).map(|mut entry| {
            entry.downloads = entry.downloads.saturating_add(1);
            entry.value().clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.ensure_connected()?;
        Ok(self.files.remove(id).is_some())
    }
}
