//! FileHost request routing.
//!
//! All operations live under a common prefix (`/api` by default):
//!
//! ```text
//! POST   /api/upload
//! GET    /api/files?search=&filter=&page=&limit=
//! GET    /api/download/{id}    (or /api/download?id={id})
//! DELETE /api/delete/{id}      (or /api/delete?id={id})
//! GET    /api/status
//! ```
//!
//! A known path requested with the wrong method is a `MethodNotAllowed`
//! error; anything else is `NotFound`.

use filehost_model::error::FileHostError;
use filehost_model::operations::FileHostOperation;
use percent_encoding::percent_decode_str;

/// Default path prefix for the API.
pub const DEFAULT_PREFIX: &str = "/api";

/// FileHost request router.
#[derive(Debug, Clone)]
pub struct FileHostRouter {
    /// Path prefix every route lives under, without a trailing slash.
    pub prefix: String,
}

/// The result of routing an HTTP request to a FileHost operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingContext {
    /// The identified operation.
    pub operation: FileHostOperation,
    /// The file id from the path or the `id` query parameter.
    pub file_id: Option<String>,
    /// Parsed query parameters from the request URI.
    pub query_params: Vec<(String, String)>,
}

impl RoutingContext {
    /// Get the value of a query parameter by name.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query_params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl Default for FileHostRouter {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl FileHostRouter {
    /// Create a router serving routes under `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: prefix.trim_end_matches('/').to_owned(),
        }
    }

    /// Resolve an HTTP request to a routing context.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown paths and `MethodNotAllowed` when the
    /// path is known but the method does not match.
    pub fn resolve<B>(&self, req: &http::Request<B>) -> Result<RoutingContext, FileHostError> {
        let query_params = parse_query_params(req.uri().query().unwrap_or(""));

        let rest = req
            .uri()
            .path()
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(FileHostError::route_not_found)?;
        let mut segments = rest.trim_end_matches('/').splitn(2, '/');
        let head = segments.next().unwrap_or_default();
        let tail = segments.next();

        let operation = match head {
            "upload" => FileHostOperation::UploadFile,
            "files" => FileHostOperation::ListFiles,
            "download" => FileHostOperation::DownloadFile,
            "delete" => FileHostOperation::DeleteFile,
            "status" => FileHostOperation::GetStatus,
            _ => return Err(FileHostError::route_not_found()),
        };

        // Only id-addressed operations take a second segment, and never a third.
        if tail.is_some_and(|t| !operation.takes_file_id() || t.contains('/')) {
            return Err(FileHostError::route_not_found());
        }

        if req.method() != operation.method() {
            return Err(FileHostError::method_not_allowed());
        }

        let file_id = if operation.takes_file_id() {
            tail.map(decode_uri_component)
                .or_else(|| {
                    query_params
                        .iter()
                        .find(|(k, _)| k == "id")
                        .map(|(_, v)| v.clone())
                })
                .filter(|id| !id.is_empty())
        } else {
            None
        };

        Ok(RoutingContext {
            operation,
            file_id,
            query_params,
        })
    }
}

/// Decode a percent-encoded URI component.
fn decode_uri_component(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

/// Parse a query string into key-value pairs (`+` decodes to a space).
fn parse_query_params(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
