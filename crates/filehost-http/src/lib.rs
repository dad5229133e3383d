//! FileHost HTTP routing, multipart parsing, response serialization, and hyper service.
//!
//! This crate provides the HTTP layer for the FileHost server. It handles:
//!
//! - **Routing** ([`router`]): Maps HTTP requests to FileHost operations by
//!   examining method and path, and extracts the file id and query parameters.
//!
//! - **Multipart parsing** ([`multipart`]): Splits a buffered
//!   `multipart/form-data` body into named text fields and byte-exact file parts.
//!
//! - **Response serialization** ([`response`]): JSON success bodies, file
//!   attachments, and `{"error": ...}` error bodies.
//!
//! - **Dispatch** ([`dispatch`]): Routes identified operations to the business
//!   logic handler via the [`FileHostHandler`](dispatch::FileHostHandler) trait.
//!
//! - **Service** ([`service`]): The main
//!   [`FileHostHttpService`](service::FileHostHttpService) that implements
//!   hyper's `Service` trait.
//!
//! - **Body** ([`body`]): The [`FileHostResponseBody`](body::FileHostResponseBody)
//!   type supporting buffered and empty response modes.
//!
//! # Architecture
//!
//! ```text
//! HTTP Request
//!   -> FileHostHttpService (hyper Service)
//!     -> Health check / CORS interception
//!     -> FileHostRouter (operation identification)
//!     -> Body collection
//!     -> dispatch_operation (FileHostHandler trait)
//!     -> Common response headers (x-request-id, Server, CORS)
//!   <- HTTP Response
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use filehost_http::dispatch::NotImplementedHandler;
//! use filehost_http::service::{FileHostHttpConfig, FileHostHttpService};
//!
//! let config = FileHostHttpConfig::default();
//! let service = FileHostHttpService::new(NotImplementedHandler, &config);
//! // Use `service` with hyper server.
//! ```

// FileHostError carries a boxed source and is returned by value on every path.
#![allow(clippy::result_large_err)]

pub mod body;
pub mod dispatch;
pub mod multipart;
pub mod response;
pub mod router;
pub mod service;

pub use body::FileHostResponseBody;
pub use dispatch::{FileHostHandler, NotImplementedHandler};
pub use multipart::{MultipartForm, Part, parse_multipart, parse_multipart_with};
pub use router::{FileHostRouter, RoutingContext};
pub use service::{FileHostHttpConfig, FileHostHttpService};
