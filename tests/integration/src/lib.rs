//! Integration tests for the FileHost server.
//!
//! These tests require a running FileHost server at `localhost:3000`.
//! They are marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p filehost-integration -- --ignored
//! ```

use std::sync::Once;

static INIT: Once = Once::new();

/// Boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "----filehost-integration-boundary";

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Base URL of the server under test.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("FILEHOST_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

/// Build an absolute URL for `path`.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", endpoint_url().trim_end_matches('/'))
}

/// Create an HTTP client for the tests.
#[must_use]
pub fn client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// Generate a unique filename for a test.
#[must_use]
pub fn test_filename(prefix: &str, ext: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}.{ext}")
}

/// Encode a `multipart/form-data` body with one `file` part and extra plain fields.
#[must_use]
pub fn multipart_body(filename: &str, payload: &[u8], fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Upload a file and return the parsed JSON response.
pub async fn upload(client: &reqwest::Client, filename: &str, payload: &[u8]) -> serde_json::Value {
    let resp = client
        .post(url("/api/upload"))
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(multipart_body(filename, payload, &[]))
        .send()
        .await
        .unwrap_or_else(|e| panic!("failed to upload {filename}: {e}"));
    assert_eq!(resp.status(), reqwest::StatusCode::OK, "upload of {filename}");
    resp.json().await.expect("upload response json")
}

/// Delete a file, ignoring failures.
pub async fn cleanup_file(client: &reqwest::Client, id: &str) {
    let _ = client.delete(url(&format!("/api/delete/{id}"))).send().await;
}

mod test_download;
mod test_error;
mod test_files;
mod test_status;
mod test_upload;
