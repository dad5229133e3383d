//! FileHost core business logic.
//!
//! - [`config`]: environment-driven [`FileHostConfig`](config::FileHostConfig).
//! - [`store`]: the [`DocumentStore`](store::DocumentStore) trait with
//!   in-memory and JSON-directory backends.
//! - [`query`]: listing predicates (regex search, extension categories).
//! - [`notify`]: upload notifications (Telegram).
//! - [`provider`]: the operations themselves.
//! - [`handler`]: the bridge from `filehost-http` to the provider.
#![allow(clippy::result_large_err)]

pub mod config;
pub mod error;
pub mod handler;
pub mod notify;
pub mod provider;
pub mod query;
pub mod store;
pub mod utils;

pub use config::FileHostConfig;
pub use error::{NotifyError, StoreError};
pub use handler::FileHostServiceHandler;
pub use provider::FileHostProvider;
