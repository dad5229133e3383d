//! FileHost core error types.
//!
//! [`StoreError`] covers document store failures and [`NotifyError`] covers
//! upload notification failures. Store errors surface to clients as `500`
//! responses through the [`From`] conversion into [`FileHostError`].

use filehost_model::error::FileHostError;

/// Document store error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store has not been opened or has been closed.
    #[error("database not connected")]
    Disconnected,

    /// A document with the same id already exists.
    #[error("document already exists: {id}")]
    DuplicateId {
        /// The conflicting document id.
        id: String,
    },

    /// Reading or writing the data directory failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be encoded or decoded.
    #[error("document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Anything else.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for FileHostError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        FileHostError::internal_error(message).with_source(err)
    }
}

/// Upload notification error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The request could not be sent or its response could not be read.
    #[error("notification request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The chat API answered with a non-success status.
    #[error("notification rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status returned by the chat API.
        status: u16,
        /// Response body returned by the chat API.
        body: String,
    },
}
