//! FileHost response serialization and error formatting.

use bytes::Bytes;
use filehost_model::error::FileHostError;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

use crate::body::FileHostResponseBody;

/// Content type for JSON responses.
pub const CONTENT_TYPE: &str = "application/json";

/// Content type used for downloads whose document has no declared type.
pub const DEFAULT_FILE_CONTENT_TYPE: &str = "application/octet-stream";

/// Characters left alone by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Serialize a FileHost error into a JSON response body.
///
/// ```json
/// { "error": "File not found" }
/// ```
#[must_use]
pub fn error_to_json(error: &FileHostError) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({ "error": error.message }))
        .expect("JSON serialization of error cannot fail")
}

/// Convert a `FileHostError` into a complete HTTP error response.
#[must_use]
pub fn error_to_response(error: &FileHostError) -> http::Response<FileHostResponseBody> {
    http::Response::builder()
        .status(error.status_code)
        .header(http::header::CONTENT_TYPE, CONTENT_TYPE)
        .body(FileHostResponseBody::from_json(error_to_json(error)))
        .expect("valid error response")
}

/// Serialize `value` into a `200 OK` JSON response.
///
/// # Errors
///
/// Returns an internal error if `value` cannot be serialized.
pub fn json_response<T: Serialize>(
    value: &T,
) -> Result<http::Response<FileHostResponseBody>, FileHostError> {
    let json = serde_json::to_vec(value).map_err(|e| {
        FileHostError::internal_error(format!("Failed to serialize response: {e}")).with_source(e)
    })?;

    Ok(http::Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, CONTENT_TYPE)
        .body(FileHostResponseBody::from_json(json))
        .expect("valid JSON response"))
}

/// Build a `200 OK` attachment response carrying raw file bytes.
///
/// A missing, empty, or unusable content type falls back to
/// [`DEFAULT_FILE_CONTENT_TYPE`].
pub fn file_response(
    filename: &str,
    content_type: Option<&str>,
    data: Bytes,
) -> http::Response<FileHostResponseBody> {
    let content_type = content_type
        .filter(|ct| !ct.is_empty())
        .and_then(|ct| http::HeaderValue::from_str(ct).ok())
        .unwrap_or(http::HeaderValue::from_static(DEFAULT_FILE_CONTENT_TYPE));

    // Percent-encoding leaves only visible ASCII, so this header is always valid.
    let disposition = format!(
        "attachment; filename=\"{}\"",
        utf8_percent_encode(filename, URI_COMPONENT)
    );

    http::Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, content_type)
        .header(http::header::CONTENT_DISPOSITION, disposition)
        .header(http::header::CONTENT_LENGTH, data.len())
        .body(FileHostResponseBody::from_bytes(data))
        .expect("valid file response")
}
