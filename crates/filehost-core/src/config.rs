//! FileHost configuration.
//!
//! Provides [`FileHostConfig`] for configuring the FileHost server.
//! Configuration values are loaded from environment variables.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Default page size for file listings.
pub const DEFAULT_PAGE_LIMIT: u64 = 50;

/// FileHost service configuration.
///
/// # Examples
///
/// ```
/// use filehost_core::config::FileHostConfig;
///
/// let config = FileHostConfig::default();
/// assert_eq!(config.gateway_listen, "0.0.0.0:3000");
/// assert!(!config.persistence);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct FileHostConfig {
    /// Bind address for the server (e.g. `"0.0.0.0:3000"`).
    #[builder(default = String::from("0.0.0.0:3000"))]
    pub gateway_listen: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,

    /// Database name reported by the status endpoint.
    #[builder(default = String::from("filehost"))]
    pub db_name: String,

    /// Whether documents are persisted to `data_dir`.
    #[builder(default = false)]
    pub persistence: bool,

    /// Data directory used when persistence is enabled.
    #[builder(default = String::from("/var/lib/filehost"))]
    pub data_dir: String,

    /// Page size used when a listing does not ask for one.
    #[builder(default = DEFAULT_PAGE_LIMIT)]
    pub default_page_limit: u64,

    /// Telegram bot token for upload notifications.
    #[builder(default, setter(strip_option))]
    pub telegram_bot_token: Option<String>,

    /// Telegram chat receiving upload notifications.
    #[builder(default, setter(strip_option))]
    pub telegram_chat_id: Option<String>,

    /// Base URL of the Telegram Bot API.
    #[builder(default = String::from("https://api.telegram.org"))]
    pub telegram_api_base: String,
}

impl Default for FileHostConfig {
    fn default() -> Self {
        Self {
            gateway_listen: String::from("0.0.0.0:3000"),
            log_level: String::from("info"),
            db_name: String::from("filehost"),
            persistence: false,
            data_dir: String::from("/var/lib/filehost"),
            default_page_limit: DEFAULT_PAGE_LIMIT,
            telegram_bot_token: None,
            telegram_chat_id: None,
            telegram_api_base: String::from("https://api.telegram.org"),
        }
    }
}

impl FileHostConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GATEWAY_LISTEN` | `0.0.0.0:3000` |
    /// | `LOG_LEVEL` | `info` |
    /// | `DB_NAME` | `filehost` |
    /// | `PERSISTENCE` | `false` |
    /// | `DATA_DIR` | `/var/lib/filehost` |
    /// | `DEFAULT_PAGE_LIMIT` | `50` |
    /// | `TELEGRAM_BOT_TOKEN` | unset |
    /// | `TELEGRAM_CHAT_ID` | unset |
    /// | `TELEGRAM_API_BASE` | `https://api.telegram.org` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = lookup("DB_NAME") {
            config.db_name = v;
        }
        if let Some(v) = lookup("PERSISTENCE") {
            config.persistence = parse_bool(&v);
        }
        if let Some(v) = lookup("DATA_DIR") {
            config.data_dir = v;
        }
        if let Some(v) = lookup("DEFAULT_PAGE_LIMIT") {
            if let Ok(n) = v.parse::<u64>() {
                if n > 0 {
                    config.default_page_limit = n;
                }
            }
        }
        config.telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN").filter(|v| !v.is_empty());
        config.telegram_chat_id = lookup("TELEGRAM_CHAT_ID").filter(|v| !v.is_empty());
        if let Some(v) = lookup("TELEGRAM_API_BASE") {
            config.telegram_api_base = v;
        }

        config
    }

    /// Returns the bot token and chat id when both are configured.
    #[must_use]
    pub fn telegram_credentials(&self) -> Option<(&str, &str)> {
        match (&self.telegram_bot_token, &self.telegram_chat_id) {
            (Some(token), Some(chat_id)) => Some((token.as_str(), chat_id.as_str())),
            _ => None,
        }
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
