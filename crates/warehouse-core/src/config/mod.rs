//! Configuration types for the Warehouse SDK.
//!
//! Configuration is loaded from a single YAML file:
//!
//! ```yaml
//! host: https://warehouse.example.com
//! api_key_env: WAREHOUSE_API_KEY
//! retry:
//!   delay_ms: 10000
//! token:
//!   default_ttl_minutes: 30
//!   padding: oaep-sha1
//! ```
//!
//! Secrets can be given inline (`api_key`) or through an environment
//! variable (`api_key_env`). The environment variable wins when both are set.

pub mod retry;
pub mod token;

use crate::options::RegisterOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use retry::RetryConfig;
pub use token::{PaddingScheme, TokenConfig};

/// Complete warehouse configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    /// Base URL of the warehouse authority.
    pub host: String,

    /// API key, inline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable containing the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Bootstrap retry behaviour.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Token issuing and validation settings.
    #[serde(default)]
    pub token: TokenConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WarehouseConfig {
    /// Create a configuration with an inline API key and defaults elsewhere.
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_key: Some(api_key.into()),
            api_key_env: None,
            retry: RetryConfig::default(),
            token: TokenConfig::default(),
        }
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Resolve the API key from the environment or the inline value.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        if let Some(env_var) = &self.api_key_env {
            if let Ok(key) = std::env::var(env_var) {
                return Ok(key);
            }
        }

        self.api_key.clone().ok_or_else(|| {
            ConfigError::Config(match &self.api_key_env {
                Some(env_var) => {
                    format!("API key not set: {} is empty and no api_key given", env_var)
                }
                None => "API key not set: provide api_key or api_key_env".to_string(),
            })
        })
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.host)
            .map_err(|e| ConfigError::Config(format!("invalid host '{}': {}", self.host, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Config(format!(
                "host must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if url.query().is_some() {
            return Err(ConfigError::Config("host must not contain a query string".to_string()));
        }

        self.resolve_api_key()?;
        self.token.validate()?;
        Ok(())
    }

    /// Build the caller half of the settings.
    pub fn register_options(&self) -> Result<RegisterOptions, ConfigError> {
        self.validate()?;
        Ok(RegisterOptions::new(&self.host, self.resolve_api_key()?)
            .with_retry_delay(self.retry.delay()))
    }
}
