//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::defaults::*;

/// Environment variable that supplies the chat password when the config
/// file leaves it out.
pub const PASSWORD_ENV: &str = "TMIBOT_PASSWORD";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Chat server connection.
    #[serde(default)]
    pub server: ServerConfig,
    /// Identity, prefix and channels.
    pub bot: BotConfig,
    /// Helix API client.
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// A missing `bot.password` is filled from [`PASSWORD_ENV`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.bot.fill_password(std::env::var(PASSWORD_ENV).ok());
        Ok(config)
    }
}

/// Chat server connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Chat server host (default: irc.chat.twitch.tv).
    #[serde(default = "default_host")]
    pub host: String,
    /// Chat server port (default: 6667).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Longest inbound line accepted, in bytes.
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_line_len: default_max_line_len(),
        }
    }
}

/// Bot identity and command configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Login name of the bot account.
    pub username: String,
    /// Chat password, usually `oauth:<token>`.
    #[serde(default)]
    pub password: Option<String>,
    /// Literal prefix that marks a message as a command (default: "!").
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Channels joined at startup.
    #[serde(default)]
    pub channels: Vec<String>,
}

impl BotConfig {
    /// Build a config with the default prefix and no channels.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: None,
            prefix: default_prefix(),
            channels: Vec::new(),
        }
    }

    /// Use `fallback` when no password was configured.
    pub fn fill_password(&mut self, fallback: Option<String>) {
        if self.password.is_none() {
            self.password = fallback;
        }
    }
}

/// Helix API client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Application client id, sent as `Client-ID`.
    #[serde(default)]
    pub client_id: Option<String>,
    /// App or user access token, sent as a bearer token.
    #[serde(default)]
    pub oauth_token: Option<String>,
    /// Retries after a 429 before giving up (must be positive).
    #[serde(default = "default_retry_limit")]
    pub retry_limit: u32,
    /// First backoff delay after a 429, doubled per retry.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    /// Upper bound for a single backoff delay.
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
    /// Base URL of the authenticated API.
    #[serde(default = "default_helix_url")]
    pub helix_url: String,
    /// Base URL of the legacy chatters endpoint.
    #[serde(default = "default_chatters_url")]
    pub chatters_url: String,
}

impl ApiConfig {
    /// First backoff delay.
    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    /// Largest backoff delay.
    pub fn backoff_max(&self) -> Duration {
        Duration::from_millis(self.backoff_max_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            oauth_token: None,
            retry_limit: default_retry_limit(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
            helix_url: default_helix_url(),
            chatters_url: default_chatters_url(),
        }
    }
}
