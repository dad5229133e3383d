//! FileHost model types.
//!
//! Hand-written serde types for the FileHost JSON API: the stored file
//! document, listing inputs and outputs, operation identifiers, and the
//! [`FileHostError`] type every layer reports failures with.
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod input;
pub mod operations;
pub mod output;
pub mod types;

pub use error::{FileHostError, FileHostErrorCode};
pub use operations::FileHostOperation;
pub use types::{FileCategory, FileSummary, StoredFile};
