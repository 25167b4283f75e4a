//! Configuration for search-client
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `SEARCH_CLIENT__SECTION__KEY` environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "SEARCH_CLIENT";

/// Main client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Search endpoint configuration
    pub endpoint: EndpointConfig,
    /// Result display configuration
    #[serde(default)]
    pub display: DisplayConfig,
    /// Query session configuration
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Search endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointConfig {
    /// Full URL of the search endpoint (e.g., "http://localhost:8080/search")
    pub url: String,
    /// Per-request deadline in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Result display configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Number of top-ranked rows to show
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Prefix joined with each result url to build its link
    #[serde(default = "default_link_base")]
    pub link_base: String,
}

/// Query session configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub resubmit: ResubmitPolicy,
}

/// What to do when the same text is submitted twice in a row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResubmitPolicy {
    /// Always perform a new round trip
    #[default]
    AlwaysQuery,
    /// Reuse the stored outcome when nothing is in flight
    ReuseLastOutcome,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("search-client/{}", env!("CARGO_PKG_VERSION"))
}

fn default_top_k() -> usize {
    crate::projector::DEFAULT_TOP_K
}

fn default_link_base() -> String {
    crate::projector::DEFAULT_LINK_BASE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            link_base: default_link_base(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl ClientConfig {
    /// Load defaults, then `path` (if given), then `SEARCH_CLIENT__*` variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Same as [`ClientConfig::load`] with a custom environment prefix
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder =
            ::config::Config::builder().add_source(::config::Config::try_from(&Self::development())?);

        if let Some(path) = path {
            if !path.exists() {
                return Err(ClientError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(
                ::config::File::from(path).format(::config::FileFormat::Toml),
            );
        }

        let config: Self = builder
            .add_source(
                ::config::Environment::with_prefix(env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document on its own, without defaults or environment
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ClientError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ClientError::Config(format!("Failed to render config: {}", e)))
    }

    /// Create a default development configuration
    pub fn development() -> Self {
        Self {
            endpoint: EndpointConfig {
                url: "http://localhost:8080/search".to_string(),
                timeout_seconds: default_timeout(),
                user_agent: default_user_agent(),
            },
            display: DisplayConfig::default(),
            session: SessionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Per-request deadline
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.endpoint.timeout_seconds)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let endpoint = url::Url::parse(&self.endpoint.url).map_err(|e| {
            ClientError::Config(format!(
                "Invalid endpoint URL '{}': {}",
                self.endpoint.url, e
            ))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "Unsupported endpoint scheme '{}'",
                endpoint.scheme()
            )));
        }

        url::Url::parse(&self.display.link_base).map_err(|e| {
            ClientError::Config(format!(
                "Invalid link base '{}': {}",
                self.display.link_base, e
            ))
        })?;

        if self.endpoint.timeout_seconds == 0 {
            return Err(ClientError::Config(
                "timeout_seconds must be at least 1".to_string(),
            ));
        }

        if self.display.top_k == 0 {
            return Err(ClientError::Config("top_k must be at least 1".to_string()));
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::development()
    }
}
