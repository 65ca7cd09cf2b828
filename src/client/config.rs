use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Overrides the REST base URL
pub const ENV_API_URL: &str = "FEED_API_URL";
/// Overrides the push socket URL
pub const ENV_PUSH_URL: &str = "FEED_PUSH_URL";
/// Sets the viewer identity
pub const ENV_VIEWER_ID: &str = "FEED_VIEWER_ID";
/// Points at a TOML configuration file
pub const ENV_CONFIG_FILE: &str = "FEED_CONFIG";

/// Client configuration wrapper.
///
/// Holds the validated [`AppConfig`], including the startup viewer identity.
/// The gateway keeps its own copy; runtime login/logout goes through
/// [`FeedStore::set_viewer`](crate::client::store::FeedStore::set_viewer).
#[derive(Debug, Clone, Default)]
pub struct Config {
    app: AppConfig,
}

impl Config {
    /// Create a configuration with built-in defaults only
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self { app: builder.build()? })
    }

    pub fn from_app(app: AppConfig) -> Result<Self, ConfigError> {
        app.validate()?;
        Ok(Self { app })
    }

    /// Load configuration the way the binary does.
    ///
    /// Order: defaults, then the TOML file (`path`, else `$FEED_CONFIG`, else
    /// the per-user default location if it exists), then environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(ENV_CONFIG_FILE).ok().map(PathBuf::from))
            .or_else(|| default_config_path().filter(|p| p.exists()));

        let base = match file {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                AppConfig::from_toml_file(&path)?
            }
            None => AppConfig::default(),
        };
        Self::from_app(apply_env(base))
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_app(apply_env(AppConfig::default()))
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    /// Set the logged-in viewer
    pub fn set_viewer(&mut self, viewer_id: Option<String>) {
        self.app.viewer_id = viewer_id.filter(|v| !v.trim().is_empty());
    }

    pub fn viewer_id(&self) -> Option<&str> {
        self.app.viewer_id.as_deref()
    }

    /// Forget the viewer (logout)
    pub fn clear_viewer(&mut self) {
        self.app.viewer_id = None;
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.app.api_url, path)
    }

    pub fn push_url(&self) -> &str {
        &self.app.push_url
    }

    pub fn reconnect_delay(&self) -> Duration {
        self.app.reconnect_delay
    }

    pub fn heartbeat_outgoing(&self) -> Duration {
        self.app.heartbeat_outgoing
    }

    pub fn heartbeat_incoming(&self) -> Duration {
        self.app.heartbeat_incoming
    }

    pub fn request_timeout(&self) -> Duration {
        self.app.request_timeout
    }

    pub fn default_avatar(&self) -> &str {
        &self.app.default_avatar
    }
}

/// `<config dir>/post-reactions/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("post-reactions").join("config.toml"))
}

fn apply_env(mut app: AppConfig) -> AppConfig {
    if let Ok(url) = std::env::var(ENV_API_URL) {
        app.api_url = url.trim_end_matches('/').to_string();
    }
    if let Ok(url) = std::env::var(ENV_PUSH_URL) {
        app.push_url = url;
    }
    if let Ok(viewer) = std::env::var(ENV_VIEWER_ID) {
        app.viewer_id = Some(viewer).filter(|v| !v.trim().is_empty());
    }
    app
}
