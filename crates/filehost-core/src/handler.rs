//! FileHost handler implementation bridging HTTP to business logic.

use std::sync::Arc;

use bytes::Bytes;
use filehost_http::body::FileHostResponseBody;
use filehost_http::dispatch::{FileHostHandler, HandlerFuture};
use filehost_http::response::{file_response, json_response};
use filehost_http::router::RoutingContext;
use filehost_model::error::FileHostError;
use filehost_model::input::ListFilesInput;
use filehost_model::operations::FileHostOperation;

use crate::provider::FileHostProvider;

/// Handler that bridges the HTTP layer to the FileHost provider.
#[derive(Debug)]
pub struct FileHostServiceHandler {
    provider: Arc<FileHostProvider>,
}

impl FileHostServiceHandler {
    /// Create a new handler wrapping a provider.
    #[must_use]
    pub fn new(provider: Arc<FileHostProvider>) -> Self {
        Self { provider }
    }
}

impl FileHostHandler for FileHostServiceHandler {
    fn handle_operation(
        &self,
        op: FileHostOperation,
        parts: http::request::Parts,
        body: Bytes,
        ctx: RoutingContext,
    ) -> HandlerFuture {
        let provider = Arc::clone(&self.provider);
        Box::pin(async move { dispatch(provider.as_ref(), op, &parts, &body, &ctx).await })
    }
}

/// Dispatch a FileHost operation to the appropriate provider method.
async fn dispatch(
    provider: &FileHostProvider,
    op: FileHostOperation,
    parts: &http::request::Parts,
    body: &[u8],
    ctx: &RoutingContext,
) -> Result<http::Response<FileHostResponseBody>, FileHostError> {
    match op {
        FileHostOperation::UploadFile => {
            let content_type = parts
                .headers
                .get(http::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok());
            let output = provider.upload(content_type, body).await?;
            json_response(&output)
        }
        FileHostOperation::ListFiles => {
            let input =
                ListFilesInput::from_query(&ctx.query_params, provider.config().default_page_limit)?;
            let output = provider.list_files(&input).await?;
            json_response(&output)
        }
        FileHostOperation::DownloadFile => {
            let payload = provider.download(ctx.file_id.as_deref()).await?;
            Ok(file_response(
                &payload.filename,
                payload.content_type.as_deref(),
                payload.data,
            ))
        }
        FileHostOperation::DeleteFile => {
            let output = provider.delete(ctx.file_id.as_deref()).await?;
            json_response(&output)
        }
        FileHostOperation::GetStatus => json_response(&provider.status().await),
    }
}
