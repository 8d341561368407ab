//! Global configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::{AppError, Result};

/// Keychain service name under which Slack credentials are stored.
pub const KEYRING_SERVICE: &str = "presence-board";

/// Slack connectivity settings.
///
/// The bot token is loaded at runtime via OS keychain or environment
/// variable, never from the TOML config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SlackConfig {
    /// Channel that receives the daily board message.
    pub channel_id: String,
    /// Bot user token used for all Web API calls (populated at runtime).
    #[serde(skip)]
    pub bot_token: String,
}

fn default_http_host() -> String {
    "127.0.0.1".into()
}

fn default_http_port() -> u16 {
    3000
}

fn default_database_path() -> PathBuf {
    PathBuf::from("presence-board.db")
}

fn default_utc_offset_hours() -> i32 {
    9
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_http_host")]
    pub http_host: String,
    /// Port the HTTP server binds to; `0` picks an ephemeral port.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// `SQLite` database file holding status records.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Fixed UTC offset, in hours, that defines the calendar day.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    /// Accounts that never appear in the roster (bots without the bot flag,
    /// shared service users, and similar).
    #[serde(default)]
    pub excluded_user_ids: Vec<String>,
    /// Slack connectivity settings.
    pub slack: SlackConfig,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the Slack bot token from OS keychain with env-var fallback.
    ///
    /// Tries the `presence-board` keyring service first, then falls back
    /// to the `SLACK_BOT_TOKEN` environment variable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if neither source provides the token.
    pub async fn load_credentials(&mut self) -> Result<()> {
        self.slack.bot_token = load_credential("slack_bot_token", "SLACK_BOT_TOKEN").await?;
        Ok(())
    }

    /// Socket address for the HTTP listener.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `http_host` is not a valid IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.http_host, self.http_port)
            .parse()
            .map_err(|err| AppError::Config(format!("invalid http_host: {err}")))
    }

    /// Whether a user is on the roster denylist.
    #[must_use]
    pub fn is_excluded(&self, user_id: &str) -> bool {
        self.excluded_user_ids.iter().any(|id| id == user_id)
    }

    fn validate(&self) -> Result<()> {
        if self.slack.channel_id.trim().is_empty() {
            return Err(AppError::Config(
                "slack.channel_id must not be empty".into(),
            ));
        }

        if !(-23..=23).contains(&self.utc_offset_hours) {
            return Err(AppError::Config(format!(
                "utc_offset_hours must be between -23 and 23, got {}",
                self.utc_offset_hours
            )));
        }

        Ok(())
    }
}

/// Load a single credential from OS keychain with env-var fallback.
async fn load_credential(keyring_key: &str, env_key: &str) -> Result<String> {
    let key = keyring_key.to_owned();

    // keyring is synchronous I/O.
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYRING_SERVICE, &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(value),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(err) => {
            warn!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
    }

    match env::var(env_key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(AppError::Config(format!(
            "credential {keyring_key} not found in keychain or {env_key} env var"
        ))),
    }
}
