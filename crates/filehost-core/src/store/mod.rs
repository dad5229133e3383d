//! Document storage for uploaded files.
//!
//! The [`DocumentStore`] trait is the `files` collection: documents addressed
//! by string id, with listing, counting, aggregate totals and an atomic
//! download counter. Stores have an explicit lifecycle; every operation on a
//! store that is not open fails with [`StoreError::Disconnected`].
//!
//! Two backends are provided:
//!
//! - [`InMemoryDocumentStore`]: a [`dashmap::DashMap`] keyed by id.
//! - [`JsonDirDocumentStore`]: the in-memory index plus write-through
//!   persistence of one JSON document per file.

mod json_dir;
mod memory;

use std::fmt;

use async_trait::async_trait;
use filehost_model::types::{FileSummary, StoredFile};

pub use json_dir::JsonDirDocumentStore;
pub use memory::InMemoryDocumentStore;

use crate::error::StoreError;
use crate::query::FileQuery;

/// Aggregates computed over every stored document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreTotals {
    /// Number of documents.
    pub files: u64,
    /// Sum of declared sizes.
    pub size: u64,
    /// Sum of download counters.
    pub downloads: u64,
}

/// The `files` collection.
#[async_trait]
pub trait DocumentStore: Send + Sync + fmt::Debug {
    /// Human-readable backend name, reported by the status endpoint.
    fn backend(&self) -> &'static str;

    /// Connect the store. Opening an open store is a no-op.
    async fn open(&self) -> Result<(), StoreError>;

    /// Disconnect the store. Later operations fail until it is reopened.
    async fn close(&self) -> Result<(), StoreError>;

    /// Check connectivity.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Insert a new document.
    async fn insert(&self, file: StoredFile) -> Result<(), StoreError>;

    /// Fetch a document by id.
    async fn find(&self, id: &str) -> Result<Option<StoredFile>, StoreError>;

    /// List matching documents, newest first, without their payloads.
    async fn find_many(
        &self,
        query: &FileQuery,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<FileSummary>, StoreError>;

    /// Count matching documents.
    async fn count(&self, query: &FileQuery) -> Result<u64, StoreError>;

    /// Aggregate totals over all documents.
    async fn totals(&self) -> Result<StoreTotals, StoreError>;

    /// Increment the download counter, returning the updated document.
    async fn increment_downloads(&self, id: &str) -> Result<Option<StoredFile>, StoreError>;

    /// Delete a document. Returns whether it existed.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}
