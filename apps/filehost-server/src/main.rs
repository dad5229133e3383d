//! FileHost Server - store uploaded files as base64 documents and serve them back.
//!
//! # Usage
//!
//! ```text
//! GATEWAY_LISTEN=0.0.0.0:3000 filehost-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:3000` | Bind address |
//! | `DB_NAME` | `filehost` | Database name reported by `/api/status` |
//! | `PERSISTENCE` | `false` | Persist documents to `DATA_DIR` |
//! | `DATA_DIR` | `/var/lib/filehost` | Document directory when persistence is on |
//! | `DEFAULT_PAGE_LIMIT` | `50` | Listing page size |
//! | `TELEGRAM_BOT_TOKEN` | *(unset)* | Bot token for upload notifications |
//! | `TELEGRAM_CHAT_ID` | *(unset)* | Chat receiving upload notifications |
//! | `TELEGRAM_API_BASE` | `https://api.telegram.org` | Bot API base URL |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use filehost_core::notify::TelegramNotifier;
use filehost_core::store::{DocumentStore, InMemoryDocumentStore, JsonDirDocumentStore};
use filehost_core::{FileHostConfig, FileHostProvider, FileHostServiceHandler};
use filehost_http::dispatch::FileHostHandler;
use filehost_http::service::{FileHostHttpConfig, FileHostHttpService};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Build the document store selected by the configuration.
fn build_store(config: &FileHostConfig) -> Arc<dyn DocumentStore> {
    if config.persistence {
        Arc::new(JsonDirDocumentStore::new(&config.data_dir))
    } else {
        Arc::new(InMemoryDocumentStore::new())
    }
}

/// Build the provider, attaching the Telegram notifier when configured.
fn build_provider(store: Arc<dyn DocumentStore>, config: &FileHostConfig) -> FileHostProvider {
    let provider = FileHostProvider::new(store, config.clone());
    match TelegramNotifier::from_config(config) {
        Some(notifier) => {
            info!("upload notifications enabled");
            provider.with_notifier(Arc::new(notifier))
        }
        None => provider,
    }
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve<H: FileHostHandler>(
    listener: TcpListener,
    service: FileHostHttpService<H>,
) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained");

    Ok(())
}

/// Perform a health check by connecting to the server and requesting the health endpoint.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if is_healthy_response(&response) {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

fn is_healthy_response(response: &str) -> bool {
    response.contains("200 OK") && response.contains("\"status\":\"running\"")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle --health-check flag for Docker HEALTHCHECK.
    if std::env::args().any(|a| a == "--health-check") {
        let config = FileHostConfig::from_env();
        let addr = config.gateway_listen.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    let config = FileHostConfig::from_env();

    init_tracing(&config.log_level)?;

    info!(
        gateway_listen = %config.gateway_listen,
        db_name = %config.db_name,
        persistence = config.persistence,
        version = VERSION,
        "starting FileHost server",
    );

    let store = build_store(&config);
    store
        .open()
        .await
        .with_context(|| format!("failed to open {}", store.backend()))?;

    let provider = build_provider(Arc::clone(&store), &config);
    let handler = FileHostServiceHandler::new(Arc::new(provider));
    let service = FileHostHttpService::new(handler, &FileHostHttpConfig::default());

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, backend = store.backend(), "listening for connections");

    let served = serve(listener, service).await;

    store
        .close()
        .await
        .with_context(|| format!("failed to close {}", store.backend()))?;
    info!("store closed, exiting");

    served
}
