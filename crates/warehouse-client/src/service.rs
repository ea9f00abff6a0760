//! The file access service.

use crate::bootstrap::{BootstrapHandle, RetryPolicy, SetupBootstrapper};
use crate::error::ServiceError;
use crate::source::{HttpSetupSource, SetupSource};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use warehouse_core::{RegisterOptions, Settings, SignOptions, TokenConfig, WarehouseConfig};
use warehouse_token::{DecodedToken, FileAccess, TokenError, TokenIssuer, TokenValidator};

/// Issues file access tokens for one warehouse.
///
/// Constructed only from complete [`Settings`], so every method can issue
/// tokens immediately. Cheap to clone and share.
#[derive(Debug, Clone)]
pub struct WarehouseService {
    settings: Arc<Settings>,
    issuer: TokenIssuer,
}

impl WarehouseService {
    /// Create a service from settings that are already resolved.
    pub fn new(settings: Settings) -> Result<Self, ServiceError> {
        let issuer = TokenIssuer::from_settings(&settings)?;
        Ok(Self {
            settings: Arc::new(settings),
            issuer,
        })
    }

    /// Bootstrap over HTTP, retrying every `options.retry_delay` until the
    /// authority answers, then create the service.
    pub async fn connect(options: RegisterOptions) -> Result<Self, ServiceError> {
        let source = HttpSetupSource::from_options(&options)?;
        let policy = RetryPolicy::fixed(options.retry_delay);
        Self::connect_with(source, options, policy, &CancellationToken::new()).await
    }

    /// Bootstrap from a custom source and policy.
    pub async fn connect_with(
        source: impl SetupSource + 'static,
        options: RegisterOptions,
        policy: RetryPolicy,
        cancel: &CancellationToken,
    ) -> Result<Self, ServiceError> {
        let setup = SetupBootstrapper::new(source, policy).fetch(cancel).await?;
        Self::new(Settings::new(options, setup))
    }

    /// Wait for a background bootstrap, then create the service.
    pub async fn from_bootstrap(
        handle: BootstrapHandle,
        options: RegisterOptions,
    ) -> Result<Self, ServiceError> {
        let setup = handle.wait().await?;
        Self::new(Settings::new(options, setup))
    }

    /// Bootstrap with everything taken from a configuration file.
    pub async fn from_config(
        config: &WarehouseConfig,
        cancel: &CancellationToken,
    ) -> Result<Self, ServiceError> {
        let options = config.register_options()?;
        let source = HttpSetupSource::from_options(&options)?;
        let policy = RetryPolicy::from(&config.retry);

        let service = Self::connect_with(source, options, policy, cancel).await?;
        service.with_token_config(&config.token)
    }

    /// Apply padding and default lifetime from token configuration.
    pub fn with_token_config(mut self, config: &TokenConfig) -> Result<Self, ServiceError> {
        let default_ttl = config.default_ttl()?;
        self.issuer = self
            .issuer
            .with_padding(config.padding)
            .with_default_ttl(default_ttl);
        Ok(self)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Issue a token for one file and build its access URL.
    pub fn generate_file_access(&self, options: &SignOptions) -> Result<FileAccess, TokenError> {
        self.issuer.issue(options)
    }

    /// Issue only the token string.
    pub fn generate_signed_token(&self, options: &SignOptions) -> Result<String, TokenError> {
        self.issuer.generate_signed_token(options)
    }

    /// Decode a token with the authority's private key, using this service's padding.
    pub fn decode_access_token(
        &self,
        token: &str,
        private_key_pem: &str,
    ) -> Result<DecodedToken, TokenError> {
        TokenValidator::from_private_key_pem(private_key_pem)?
            .with_padding(self.issuer.padding())
            .decode(token)
    }
}
