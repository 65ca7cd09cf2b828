//! Application configuration module
//!
//! Connection settings for the REST gateway and the push channel, plus the
//! viewer identity. Values come from a builder, a TOML file, or both (the
//! client-side [`crate::client::config::Config`] layers environment
//! overrides on top).

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default REST base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
/// Default push socket URL
pub const DEFAULT_PUSH_URL: &str = "ws://localhost:8080/ws";
/// Fixed delay between reconnection attempts
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(5000);
/// Keep-alive interval, both directions
pub const DEFAULT_HEARTBEAT: Duration = Duration::from_millis(4000);
/// Per-request timeout for REST calls
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// REST base URL, without trailing slash
    pub api_url: String,
    /// Push socket URL
    pub push_url: String,
    /// Logged-in user, if any
    pub viewer_id: Option<String>,
    pub reconnect_delay: Duration,
    pub heartbeat_outgoing: Duration,
    pub heartbeat_incoming: Duration,
    pub request_timeout: Duration,
    /// Avatar substituted when the backend sends none
    pub default_avatar: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            push_url: DEFAULT_PUSH_URL.to_string(),
            viewer_id: None,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            heartbeat_outgoing: DEFAULT_HEARTBEAT,
            heartbeat_incoming: DEFAULT_HEARTBEAT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            default_avatar: crate::shared::post::DEFAULT_AVATAR.to_string(),
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url(&self.api_url, &["http", "https"])?;
        check_url(&self.push_url, &["ws", "wss"])?;
        if self.reconnect_delay.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "reconnect_delay",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout",
                message: "must be greater than zero".to_string(),
            });
        }
        if let Some(viewer) = &self.viewer_id {
            if viewer.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "viewer_id",
                    message: "must not be blank".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Load a TOML file and apply it over the defaults
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse TOML text and apply it over the defaults
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        file.apply(AppConfig::builder()).build()
    }
}

fn check_url(raw: &str, schemes: &[&str]) -> Result<(), ConfigError> {
    let url = reqwest::Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", raw, e)))?;
    if !schemes.contains(&url.scheme()) {
        return Err(ConfigError::InvalidUrl(format!(
            "{}: expected scheme {}",
            raw,
            schemes.join(" or ")
        )));
    }
    Ok(())
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    api_url: Option<String>,
    push_url: Option<String>,
    viewer_id: Option<String>,
    reconnect_delay: Option<Duration>,
    heartbeat_outgoing: Option<Duration>,
    heartbeat_incoming: Option<Duration>,
    request_timeout: Option<Duration>,
    default_avatar: Option<String>,
}

impl AppConfigBuilder {
    /// Set the REST base URL
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Set the push socket URL
    pub fn push_url(mut self, url: impl Into<String>) -> Self {
        self.push_url = Some(url.into());
        self
    }

    pub fn viewer_id(mut self, viewer_id: impl Into<String>) -> Self {
        self.viewer_id = Some(viewer_id.into());
        self
    }

    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = Some(delay);
        self
    }

    /// Set both heartbeat directions at once
    pub fn heartbeat(mut self, interval: Duration) -> Self {
        self.heartbeat_outgoing = Some(interval);
        self.heartbeat_incoming = Some(interval);
        self
    }

    pub fn heartbeat_outgoing(mut self, interval: Duration) -> Self {
        self.heartbeat_outgoing = Some(interval);
        self
    }

    pub fn heartbeat_incoming(mut self, interval: Duration) -> Self {
        self.heartbeat_incoming = Some(interval);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn default_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.default_avatar = Some(avatar.into());
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            api_url: self
                .api_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            push_url: self.push_url.unwrap_or(defaults.push_url),
            viewer_id: self.viewer_id.or(defaults.viewer_id),
            reconnect_delay: self.reconnect_delay.unwrap_or(defaults.reconnect_delay),
            heartbeat_outgoing: self.heartbeat_outgoing.unwrap_or(defaults.heartbeat_outgoing),
            heartbeat_incoming: self.heartbeat_incoming.unwrap_or(defaults.heartbeat_incoming),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            default_avatar: self.default_avatar.unwrap_or(defaults.default_avatar),
        };
        config.validate()?;
        Ok(config)
    }
}

/// On-disk configuration. Durations are in milliseconds.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    api_url: Option<String>,
    push_url: Option<String>,
    viewer_id: Option<String>,
    reconnect_delay_ms: Option<u64>,
    heartbeat_outgoing_ms: Option<u64>,
    heartbeat_incoming_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
    default_avatar: Option<String>,
}

impl ConfigFile {
    fn apply(self, mut builder: AppConfigBuilder) -> AppConfigBuilder {
        if let Some(v) = self.api_url {
            builder = builder.api_url(v);
        }
        if let Some(v) = self.push_url {
            builder = builder.push_url(v);
        }
        if let Some(v) = self.viewer_id {
            builder = builder.viewer_id(v);
        }
        if let Some(v) = self.reconnect_delay_ms {
            builder = builder.reconnect_delay(Duration::from_millis(v));
        }
        if let Some(v) = self.heartbeat_outgoing_ms {
            builder = builder.heartbeat_outgoing(Duration::from_millis(v));
        }
        if let Some(v) = self.heartbeat_incoming_ms {
            builder = builder.heartbeat_incoming(Duration::from_millis(v));
        }
        if let Some(v) = self.request_timeout_ms {
            builder = builder.request_timeout(Duration::from_millis(v));
        }
        if let Some(v) = self.default_avatar {
            builder = builder.default_avatar(v);
        }
        builder
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}
