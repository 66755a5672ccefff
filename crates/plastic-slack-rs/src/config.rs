// ABOUTME: Configuration loading and validation for the Slack relay.
// ABOUTME: TOML config files with environment variable expansion, or plain environment variables.

use crate::error::{RelayError, Result};
use plastic_relay_core::DispatchConfig;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BODY_LIMIT_BYTES: usize = 50 * 1024 * 1024;

/// Top-level configuration structure for plastic-slack-rs.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub slack: SlackConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dispatch: DispatchSettings,
}

/// Slack Web API credentials and channel fallback.
#[derive(Clone, Deserialize)]
pub struct SlackConfig {
    /// Bot token (xoxb-...) or user token (xoxp-...) used for chat.postMessage.
    pub bot_token: String,
    /// Channel used by `POST /notify` when no channel is given in the path.
    #[serde(default)]
    pub default_channel: Option<String>,
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("bot_token", &"[REDACTED]")
            .field("default_channel", &self.default_channel)
            .finish()
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address, e.g. "0.0.0.0:3000".
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Maximum accepted JSON body size.
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

fn default_bind() -> String {
    format!("0.0.0.0:{DEFAULT_PORT}")
}

fn default_body_limit_bytes() -> usize {
    DEFAULT_BODY_LIMIT_BYTES
}

/// Message dispatch behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchSettings {
    /// Group messages longer than this are logged as failures instead of sent.
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            max_message_chars: default_max_message_chars(),
        }
    }
}

fn default_max_message_chars() -> usize {
    DispatchConfig::default().max_message_chars
}

impl Config {
    /// Load configuration from the specified path or default location.
    ///
    /// Default location: `~/.config/plastic-relay/relay.toml`. When no path is
    /// given and that file does not exist, configuration comes from the
    /// `SLACK_TOKEN`, `SLACK_CHANNEL` and `PORT` environment variables.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(&path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                info!("No config file found, reading configuration from environment");
                Self::from_env_with(|key| std::env::var(key).ok())
            }
        }
    }

    /// Load a TOML config file, expanding `${VAR}` references.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RelayError::Config(format!("Failed to read config from {:?}: {}", path, e))
        })?;

        // Expand environment variables, warning on undefined vars.
        let contents = shellexpand::env_with_context_no_errors(&contents, |var: &str| {
            match std::env::var(var) {
                Ok(val) => Some(val),
                Err(_) => {
                    warn!(
                        variable = %var,
                        "Environment variable not defined, using empty string"
                    );
                    Some(String::new())
                }
            }
        });

        let config: Config = toml::from_str(&contents)
            .map_err(|e| RelayError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Build configuration from environment-style lookups.
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("SLACK_TOKEN")
            .ok_or_else(|| RelayError::Config("SLACK_TOKEN environment variable is not set".into()))?;

        let port = match lookup("PORT") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|e| RelayError::Config(format!("Invalid PORT {:?}: {}", port, e)))?,
            None => DEFAULT_PORT,
        };

        let config = Config {
            slack: SlackConfig {
                bot_token,
                default_channel: lookup("SLACK_CHANNEL"),
            },
            server: ServerConfig {
                bind: format!("0.0.0.0:{port}"),
                ..ServerConfig::default()
            },
            dispatch: DispatchSettings::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate that required fields are present and properly formatted.
    fn validate(&self) -> Result<()> {
        if self.slack.bot_token.is_empty() {
            return Err(RelayError::Config("slack.bot_token is required".into()));
        }
        if !self.slack.bot_token.starts_with("xoxb-") && !self.slack.bot_token.starts_with("xoxp-")
        {
            return Err(RelayError::Config(
                "slack.bot_token must start with 'xoxb-' (bot token) or 'xoxp-' (user token)"
                    .into(),
            ));
        }
        if self.dispatch.max_message_chars == 0 {
            return Err(RelayError::Config(
                "dispatch.max_message_chars must be greater than zero".into(),
            ));
        }
        self.bind_addr()?;
        Ok(())
    }

    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server.bind.parse().map_err(|e| {
            RelayError::Config(format!(
                "server.bind {:?} is not a socket address: {}",
                self.server.bind, e
            ))
        })
    }

    /// Fallback channel, if one is configured and non-empty.
    pub fn default_channel(&self) -> Option<&str> {
        self.slack
            .default_channel
            .as_deref()
            .filter(|channel| !channel.is_empty())
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            max_message_chars: self.dispatch.max_message_chars,
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("plastic-relay").join("relay.toml"))
}
