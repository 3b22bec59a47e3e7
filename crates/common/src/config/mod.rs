//! Configuration management for LabSite
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config.toml, config.yaml)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::{AppError, Result};

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Content backend configuration
    pub cms: CmsConfig,

    /// Site copy that does not come from the CMS
    #[serde(default)]
    pub site: SiteConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CmsConfig {
    /// Backend origin, e.g. `http://localhost:1337`
    pub base_url: String,

    /// Read token sent as a bearer credential
    pub api_token: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_cms_timeout")]
    pub timeout_secs: u64,

    /// Page size used when walking a whole collection
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    /// Group name shown in the page header
    #[serde(default = "default_site_name")]
    pub name: String,

    /// Short line under the name
    #[serde(default = "default_tagline")]
    pub tagline: String,

    /// Copy rendered when a section's data is unavailable
    #[serde(default = "default_empty_state")]
    pub empty_state_message: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Metrics port (0 to disable)
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 3000 }
fn default_shutdown_timeout() -> u64 { 30 }
fn default_cms_url() -> String { "http://localhost:1337".to_string() }
fn default_cms_timeout() -> u64 { 30 }
fn default_page_size() -> u32 { crate::DEFAULT_PAGE_SIZE }
fn default_site_name() -> String { "Research Group".to_string() }
fn default_tagline() -> String { "Research, people and publications".to_string() }
fn default_empty_state() -> String { "Connect to the backend to see this content.".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_metrics_port() -> u16 { 0 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            base_url: default_cms_url(),
            api_token: None,
            timeout_secs: default_cms_timeout(),
            page_size: default_page_size(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            tagline: default_tagline(),
            empty_state_message: default_empty_state(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            metrics_port: default_metrics_port(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> std::result::Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("cms.base_url", default_cms_url())?

            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__CMS__BASE_URL=https://cms.example.org
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        config.try_deserialize()
    }

    /// Check values that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<()> {
        self.cms.base_url()?;

        if self.cms.page_size == 0 {
            return Err(AppError::Configuration {
                message: "cms.page_size must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }
}

impl CmsConfig {
    /// Parsed backend origin
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url).map_err(|e| AppError::Configuration {
            message: format!("cms.base_url '{}' is not a valid URL: {}", self.base_url, e),
        })?;

        if url.cannot_be_a_base() {
            return Err(AppError::Configuration {
                message: format!("cms.base_url '{}' cannot be used as a base", self.base_url),
            });
        }

        Ok(url)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            cms: CmsConfig::default(),
            site: SiteConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.cms.base_url, "http://localhost:1337");
        assert_eq!(config.cms.page_size, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = AppConfig::default();
        config.cms.base_url = "not a url".to_string();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut config = AppConfig::default();
        config.cms.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.cms.timeout(), Duration::from_secs(30));
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(30));
    }
}
