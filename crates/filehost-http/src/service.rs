//! The main FileHost HTTP service implementing hyper's `Service` trait.
//!
//! [`FileHostHttpService`] ties together routing, dispatch, and response
//! serialization into a single hyper-compatible service. It handles:
//!
//! 1. Health check interception (`GET /health`, `GET /_health`)
//! 2. CORS preflight requests (`OPTIONS`)
//! 3. Request routing via [`FileHostRouter`]
//! 4. Request body collection
//! 5. Operation dispatch to the [`FileHostHandler`]
//! 6. Common response headers (`x-request-id`, `Server`, CORS)
//! 7. Error response formatting

use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use filehost_model::error::FileHostError;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::service::Service;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::body::FileHostResponseBody;
use crate::dispatch::{FileHostHandler, dispatch_operation};
use crate::response::error_to_response;
use crate::router::{DEFAULT_PREFIX, FileHostRouter};

/// Configuration for the FileHost HTTP service.
#[derive(Debug, Clone)]
pub struct FileHostHttpConfig {
    /// Path prefix all API routes live under.
    pub api_prefix: String,
}

impl Default for FileHostHttpConfig {
    fn default() -> Self {
        Self {
            api_prefix: DEFAULT_PREFIX.to_owned(),
        }
    }
}

/// The FileHost HTTP service.
///
/// # Type Parameters
///
/// - `H`: The business logic handler implementing [`FileHostHandler`].
#[derive(Debug)]
pub struct FileHostHttpService<H: FileHostHandler> {
    handler: Arc<H>,
    router: FileHostRouter,
}

impl<H: FileHostHandler> FileHostHttpService<H> {
    /// Create a new service with the given handler and configuration.
    #[must_use]
    pub fn new(handler: H, config: &FileHostHttpConfig) -> Self {
        Self::from_shared(Arc::new(handler), config)
    }

    /// Create a new service from an `Arc<H>` handler and configuration.
    #[must_use]
    pub fn from_shared(handler: Arc<H>, config: &FileHostHttpConfig) -> Self {
        Self {
            handler,
            router: FileHostRouter::new(config.api_prefix.as_str()),
        }
    }

    /// Run one request through the full pipeline.
    ///
    /// Accepts any body type so the pipeline can be driven without a socket.
    pub async fn handle<B>(&self, req: http::Request<B>) -> http::Response<FileHostResponseBody>
    where
        B: http_body::Body<Data = Bytes> + Send,
        B::Error: Display,
    {
        let request_id = Uuid::new_v4().to_string();
        let response = process_request(req, self.handler.as_ref(), &self.router, &request_id).await;
        add_common_headers(response, &request_id)
    }
}

impl<H: FileHostHandler> Clone for FileHostHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            router: self.router.clone(),
        }
    }
}

impl<H: FileHostHandler> Service<http::Request<Incoming>> for FileHostHttpService<H> {
    type Response = http::Response<FileHostResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.handle(req).await) })
    }
}

/// Process an incoming HTTP request through the FileHost pipeline.
async fn process_request<B, H>(
    req: http::Request<B>,
    handler: &H,
    router: &FileHostRouter,
    request_id: &str,
) -> http::Response<FileHostResponseBody>
where
    B: http_body::Body<Data = Bytes> + Send,
    B::Error: Display,
    H: FileHostHandler,
{
    let method = req.method().clone();
    let uri = req.uri().clone();
    debug!(%method, %uri, request_id, "processing request");

    // 1. Health check interception.
    if is_health_check(&method, uri.path()) {
        return health_check_response();
    }

    // 2. CORS preflight.
    if method == http::Method::OPTIONS {
        return cors_preflight_response();
    }

    // 3. Route the request.
    let ctx = match router.resolve(&req) {
        Ok(ctx) => ctx,
        Err(err) => {
            warn!(%method, %uri, error = %err, request_id, "failed to route request");
            return error_to_response(&err);
        }
    };

    info!(
        operation = %ctx.operation,
        file_id = ?ctx.file_id,
        request_id,
        "routed request"
    );

    // 4. Collect body.
    let (parts, incoming) = req.into_parts();
    let body = match collect_body(incoming).await {
        Ok(body) => body,
        Err(err) => {
            error!(error = %err, request_id, "failed to collect request body");
            return error_to_response(&err);
        }
    };

    // 5. Dispatch to handler.
    match dispatch_operation(handler, parts, body, ctx).await {
        Ok(response) => response,
        Err(err) => {
            if err.status_code.is_server_error() {
                error!(error = %err, request_id, "operation failed");
            } else {
                debug!(error = %err, request_id, "operation returned error");
            }
            error_to_response(&err)
        }
    }
}

/// Collect the full body into `Bytes`.
async fn collect_body<B>(body: B) -> Result<Bytes, FileHostError>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: Display,
{
    body.collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| FileHostError::internal_error(format!("Failed to read request body: {e}")))
}

/// Check if the request is a health check probe.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/health" || path == "/_health")
}

/// Produce a health check response.
fn health_check_response() -> http::Response<FileHostResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(FileHostResponseBody::from_string(
            r#"{"status":"running","service":"filehost"}"#,
        ))
        .expect("static health response should be valid")
}

/// Produce a CORS preflight response.
fn cors_preflight_response() -> http::Response<FileHostResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, DELETE, OPTIONS")
        .header("Access-Control-Allow-Headers", "*, Content-Type")
        .header("Access-Control-Max-Age", "86400")
        .body(FileHostResponseBody::empty())
        .expect("static CORS response should be valid")
}

/// Add common response headers to every response.
fn add_common_headers(
    mut response: http::Response<FileHostResponseBody>,
    request_id: &str,
) -> http::Response<FileHostResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::header::HeaderValue::from_str(request_id) {
        headers.insert("x-request-id", hv);
    }

    headers.insert("Server", http::header::HeaderValue::from_static("FileHost"));

    headers.insert(
        "Access-Control-Allow-Origin",
        http::header::HeaderValue::from_static("*"),
    );
    headers.insert(
        "Access-Control-Expose-Headers",
        http::header::HeaderValue::from_static("x-request-id, Content-Disposition"),
    );

    response
}
