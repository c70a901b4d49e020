use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use url::Url;

/// Default port the server listens on when neither the CLI argument nor the
/// `PORT` environment variable provides one.
pub const DEFAULT_PORT: u16 = 3000;

/// Default rotation period between artwork changes, in seconds.
pub const DEFAULT_ROTATION_INTERVAL_SECS: u64 = 10;

/// Default timeout applied to every outbound collection API request.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

const DEFAULT_API_BASE_URL: &str = "https://collectionapi.metmuseum.org/public/collection/v1";

/// Application configuration structure
///
/// Contains all configuration parameters for the Gallery Relay front-end.
/// Every field has a default, so the application runs without a config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Name of the site displayed in the page title
    pub site_name: String,
    /// Base URL of the remote collection API
    pub api_base_url: String,
    /// Seconds between artwork rotation ticks
    pub rotation_interval_secs: u64,
    /// Timeout in seconds for each outbound API request
    pub request_timeout_secs: u64,
    /// Throttling applied to the search route
    pub throttle: ThrottleConfig,
}

/// Throttle parameters for the search route.
///
/// Requests within a window pass at full speed until `delay_after`, are
/// slowed by `delay_ms` per extra request after that, and are rejected with
/// a 429 once `max_requests` is exceeded.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ThrottleConfig {
    pub window_secs: u64,
    pub max_requests: u32,
    pub delay_after: u32,
    pub delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_name: "Gallery Relay".to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            rotation_interval_secs: DEFAULT_ROTATION_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            throttle: ThrottleConfig::default(),
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            window_secs: 60,
            max_requests: 500,
            delay_after: 500,
            delay_ms: 1000,
        }
    }
}

impl Config {
    /// Load the application configuration from a JSON5 file.
    ///
    /// When `path` is `None` the built-in defaults are used, which point at
    /// the public Metropolitan Museum collection API.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed,
    /// or if the configured values fail validation.
    pub fn load(path: Option<&Path>) -> crate::error::Result<Self> {
        let config = match path {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                let config_str = fs::read_to_string(path)?;
                json5::from_str(&config_str)?
            }
            None => {
                tracing::debug!("No configuration file given, using defaults");
                Config::default()
            }
        };

        config.validate()?;
        tracing::info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate the loaded configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if the API base URL is not a valid absolute URL or
    /// if the rotation interval is zero.
    pub fn validate(&self) -> crate::error::Result<()> {
        Url::parse(&self.api_base_url)?;

        if self.rotation_interval_secs == 0 {
            return Err(crate::error::GalleryError::Generic(
                "rotation_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(crate::error::GalleryError::Generic(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Resolve the listening port: CLI argument first, then the `PORT`
/// environment variable, then [`DEFAULT_PORT`].
#[must_use]
pub fn resolve_port(cli_arg: Option<String>) -> u16 {
    if let Some(port) = cli_arg.and_then(|arg| arg.parse().ok()) {
        return port;
    }
    if let Some(port) = env::var("PORT").ok().and_then(|val| val.parse().ok()) {
        return port;
    }
    DEFAULT_PORT
}
