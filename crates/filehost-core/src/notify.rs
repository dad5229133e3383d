//! Upload notifications.
//!
//! After a successful upload the provider hands an [`UploadEvent`] to a
//! [`Notifier`]. The only real sink is [`TelegramNotifier`], which posts the
//! message rendered by [`render_upload_message`] to the Bot API.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::config::FileHostConfig;
use crate::error::NotifyError;
use crate::utils::format_file_size;

/// A file that was just stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEvent {
    /// Document id.
    pub id: String,
    /// Stored filename.
    pub filename: String,
    /// Declared size in bytes.
    pub size: u64,
}

/// Sink for upload notifications.
#[async_trait]
pub trait Notifier: Send + Sync + fmt::Debug {
    /// Deliver a notification for `event`.
    async fn notify_upload(&self, event: &UploadEvent) -> Result<(), NotifyError>;
}

/// Render the chat message announcing an upload.
#[must_use]
pub fn render_upload_message(event: &UploadEvent) -> String {
    format!(
        "📁 New file uploaded!\n\n📄 Name: {}\n📦 Size: {}\n🔗 ID: {}",
        event.filename,
        format_file_size(event.size),
        event.id
    )
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: String,
}

/// Notifier posting to the Telegram Bot API `sendMessage` method.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: reqwest::Client,
    endpoint: String,
    chat_id: String,
}

impl fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The endpoint embeds the bot token.
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramNotifier {
    /// Create a notifier for `chat_id` using `token` against `api_base`.
    #[must_use]
    pub fn new(api_base: &str, token: &str, chat_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/bot{token}/sendMessage", api_base.trim_end_matches('/')),
            chat_id: chat_id.into(),
        }
    }

    /// Build a notifier when both the bot token and chat id are configured.
    #[must_use]
    pub fn from_config(config: &FileHostConfig) -> Option<Self> {
        config
            .telegram_credentials()
            .map(|(token, chat_id)| Self::new(&config.telegram_api_base, token, chat_id))
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify_upload(&self, event: &UploadEvent) -> Result<(), NotifyError> {
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text: render_upload_message(event),
        };
        let response = self.client.post(&self.endpoint).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(id = %event.id, "sent upload notification");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    use super::*;

    /// Request captured by [`serve_once`]: head and body.
    type Captured = (String, Vec<u8>);

    /// Accept one HTTP/1.1 request on a local port and answer it with `status`
    /// and `body`. Returns the base URL and the captured request.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let base = format!("http://{}", listener.local_addr().expect("addr"));
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let head_end = loop {
                let n = socket.read(&mut chunk).await.expect("read");
                assert!(n > 0, "connection closed before request head");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            while buf.len() < head_end + content_length {
                let n = socket.read(&mut chunk).await.expect("read");
                assert!(n > 0, "connection closed before request body");
                buf.extend_from_slice(&chunk[..n]);
            }
            let request_body = buf[head_end..head_end + content_length].to_vec();

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            socket.shutdown().await.ok();
            let _ = tx.send((head, request_body));
        });

        (base, rx)
    }

    /// Notifier against `base` that ignores any system proxy.
    fn local_notifier(base: &str, token: &str) -> TelegramNotifier {
        TelegramNotifier {
            client: reqwest::Client::builder()
                .no_proxy()
                .build()
                .expect("client"),
            ..TelegramNotifier::new(base, token, "42")
        }
    }

    fn event() -> UploadEvent {
        UploadEvent {
            id: "0b9c".to_owned(),
            filename: "report.txt".to_owned(),
            size: 1536,
        }
    }

    #[test]
    fn test_should_render_upload_message() {
        assert_eq!(
            render_upload_message(&event()),
            "📁 New file uploaded!\n\n📄 Name: report.txt\n📦 Size: 1.5 KB\n🔗 ID: 0b9c"
        );
    }

    #[test]
    fn test_should_build_endpoint_from_base() {
        let notifier = TelegramNotifier::new("http://localhost:9000/", "123:abc", "42");
        assert_eq!(
            notifier.endpoint,
            "http://localhost:9000/bot123:abc/sendMessage"
        );
        assert!(!format!("{notifier:?}").contains("123:abc"));
    }

    #[test]
    fn test_should_require_both_credentials() {
        let config = FileHostConfig::builder()
            .telegram_bot_token("t".into())
            .build();
        assert!(TelegramNotifier::from_config(&config).is_none());

        let config = FileHostConfig::builder()
            .telegram_bot_token("t".into())
            .telegram_chat_id("c".into())
            .build();
        assert!(TelegramNotifier::from_config(&config).is_some());
    }

    #[test]
    fn test_should_serialize_send_message_body() {
        let body = SendMessageRequest {
            chat_id: "42",
            text: "hi".to_owned(),
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json, serde_json::json!({ "chat_id": "42", "text": "hi" }));
    }

    #[tokio::test]
    async fn test_should_post_send_message_to_bot_api() {
        let (base, captured) = serve_once("200 OK", r#"{"ok":true}"#).await;
        let notifier = local_notifier(&base, "123:abc");

        notifier.notify_upload(&event()).await.expect("notify");

        let (head, body) = captured.await.expect("captured request");
        assert!(head.starts_with("POST /bot123:abc/sendMessage HTTP/1.1\r\n"));
        assert!(head.to_ascii_lowercase().contains("content-type: application/json"));
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(
            json,
            serde_json::json!({ "chat_id": "42", "text": render_upload_message(&event()) })
        );
    }

    #[tokio::test]
    async fn test_should_report_rejected_notification() {
        let (base, _captured) = serve_once("401 Unauthorized", "Unauthorized").await;
        let notifier = local_notifier(&base, "bad");

        let err = notifier.notify_upload(&event()).await.unwrap_err();
        assert!(matches!(
            err,
            NotifyError::Rejected { status: 401, ref body } if body == "Unauthorized"
        ));
    }

    #[tokio::test]
    async fn test_should_report_unreachable_bot_api() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let base = format!("http://{}", listener.local_addr().expect("addr"));
        drop(listener);
        let notifier = local_notifier(&base, "123:abc");

        let err = notifier.notify_upload(&event()).await.unwrap_err();
        assert!(matches!(err, NotifyError::Http(_)));
    }
}
