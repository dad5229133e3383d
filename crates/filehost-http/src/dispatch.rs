//! FileHost handler trait and operation dispatch.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use filehost_model::error::FileHostError;
use filehost_model::operations::FileHostOperation;

use crate::body::FileHostResponseBody;
use crate::router::RoutingContext;

/// Boxed future returned by [`FileHostHandler::handle_operation`].
pub type HandlerFuture = Pin<
    Box<dyn Future<Output = Result<http::Response<FileHostResponseBody>, FileHostError>> + Send>,
>;

/// Trait that the FileHost business logic provider must implement.
///
/// This is the boundary between the HTTP transport layer and the business
/// logic. The handler receives the identified operation, raw HTTP parts, the
/// collected body and the routing context, and returns a complete response.
pub trait FileHostHandler: Send + Sync + 'static {
    /// Handle a FileHost operation and produce an HTTP response.
    fn handle_operation(
        &self,
        op: FileHostOperation,
        parts: http::request::Parts,
        body: Bytes,
        ctx: RoutingContext,
    ) -> HandlerFuture;
}

/// Dispatch a routed request to the handler.
pub async fn dispatch_operation<H: FileHostHandler>(
    handler: &H,
    parts: http::request::Parts,
    body: Bytes,
    ctx: RoutingContext,
) -> Result<http::Response<FileHostResponseBody>, FileHostError> {
    let op = ctx.operation;
    tracing::debug!(operation = %op, file_id = ?ctx.file_id, "dispatching FileHost operation");
    handler.handle_operation(op, parts, body, ctx).await
}

/// A handler that fails every operation with an internal error.
///
/// Useful for testing the HTTP routing layer in isolation.
#[derive(Debug, Clone, Default)]
pub struct NotImplementedHandler;

impl FileHostHandler for NotImplementedHandler {
    fn handle_operation(
        &self,
        op: FileHostOperation,
        _parts: http::request::Parts,
        _body: Bytes,
        _ctx: RoutingContext,
    ) -> HandlerFuture {
        Box::pin(async move {
            Err(FileHostError::internal_error(format!(
                "{op} is not implemented"
            )))
        })
    }
}
