//! Where setup information comes from.

use crate::error::FetchError;
use async_trait::async_trait;
use std::time::Duration;
use warehouse_core::{RegisterOptions, SetupInfo};

/// Path of the setup endpoint, relative to the host.
pub const SETUP_INFO_PATH: &str = "/setup/info";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "api-key";

/// Timeout for a single setup request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A source of the authority's setup information.
///
/// `Ok(None)` is a successful response without a body (`null`); the
/// bootstrapper treats it like a failure and retries.
#[async_trait]
pub trait SetupSource: Send + Sync {
    async fn fetch_setup_info(&self) -> Result<Option<SetupInfo>, FetchError>;
}

/// Fetches setup information with `GET {host}/setup/info`.
pub struct HttpSetupSource {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl HttpSetupSource {
    /// Create a source with the default request timeout.
    pub fn new(host: &str, api_key: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(host, api_key, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        host: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: format!("{}{}", host.trim_end_matches('/'), SETUP_INFO_PATH),
            api_key: api_key.into(),
        })
    }

    pub fn from_options(options: &RegisterOptions) -> Result<Self, FetchError> {
        Self::new(&options.host, options.api_key.clone())
    }

    /// The full setup URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SetupSource for HttpSetupSource {
    async fn fetch_setup_info(&self) -> Result<Option<SetupInfo>, FetchError> {
        tracing::debug!(url = %self.url, "Requesting setup information");

        let response = self
            .client
            .get(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        serde_json::from_slice::<Option<SetupInfo>>(&body)
            .map_err(|e| FetchError::InvalidBody(e.to_string()))
    }
}
