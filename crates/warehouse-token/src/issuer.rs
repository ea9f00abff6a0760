//! Token issuing.

use crate::cipher;
use crate::envelope::AccessToken;
use crate::error::TokenError;
use crate::keys::load_public_key_pem;
use crate::payload::{SignedPayload, iso_millis};
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use rsa::RsaPublicKey;
use serde::Serialize;
use warehouse_core::{DEFAULT_TOKEN_TTL_MINUTES, PaddingScheme, Settings, SignOptions};

/// Issues file access tokens with the authority's public key.
///
/// Holds no mutable state; a single issuer can be shared across tasks.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    warehouse_name: String,
    host: String,
    public_key: RsaPublicKey,
    padding: PaddingScheme,
    default_ttl: Duration,
}

/// A freshly issued token and where to use it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAccess {
    /// `{host}/warehouse/file?token={token}`
    pub url: String,

    /// The token string.
    pub token: String,

    /// Base URL of the warehouse.
    #[serde(rename = "warehouseHost")]
    pub host: String,

    /// Expiry embedded in the token, at millisecond precision.
    #[serde(with = "iso_millis")]
    pub expires_at: DateTime<Utc>,
}

impl TokenIssuer {
    /// Create an issuer for `warehouse_name` served at `host`.
    pub fn new(
        warehouse_name: impl Into<String>,
        host: impl Into<String>,
        public_key: RsaPublicKey,
    ) -> Self {
        let host: String = host.into();
        Self {
            warehouse_name: warehouse_name.into(),
            host: host.trim_end_matches('/').to_string(),
            public_key,
            padding: PaddingScheme::default(),
            default_ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
        }
    }

    /// Create an issuer from bootstrapped settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, TokenError> {
        let public_key = load_public_key_pem(settings.public_key())?;
        Ok(Self::new(settings.warehouse_name(), settings.host(), public_key))
    }

    pub fn with_padding(mut self, padding: PaddingScheme) -> Self {
        self.padding = padding;
        self
    }

    /// Lifetime of tokens requested without an expiry.
    pub fn with_default_ttl(mut self, default_ttl: Duration) -> Self {
        self.default_ttl = default_ttl;
        self
    }

    pub fn warehouse_name(&self) -> &str {
        &self.warehouse_name
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn padding(&self) -> PaddingScheme {
        self.padding
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token and build its access URL.
    pub fn issue(&self, options: &SignOptions) -> Result<FileAccess, TokenError> {
        self.issue_at(options, Utc::now())
    }

    /// Issue a token as of `now`.
    pub fn issue_at(
        &self,
        options: &SignOptions,
        now: DateTime<Utc>,
    ) -> Result<FileAccess, TokenError> {
        let (token, expires_at) = self.sign(options, now)?;

        Ok(FileAccess {
            url: self.file_url(&token),
            token,
            host: self.host.clone(),
            expires_at,
        })
    }

    /// Issue only the token string.
    pub fn generate_signed_token(&self, options: &SignOptions) -> Result<String, TokenError> {
        self.sign(options, Utc::now()).map(|(token, _)| token)
    }

    /// The URL a token is redeemed at.
    pub fn file_url(&self, token: &str) -> String {
        format!("{}/warehouse/file?token={}", self.host, token)
    }

    fn sign(
        &self,
        options: &SignOptions,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), TokenError> {
        if options.resource_id.is_empty() {
            return Err(TokenError::InvalidOptions("fileId must not be empty".to_string()));
        }

        let expires_at = self.resolve_expiry(options, now)?;
        let payload = SignedPayload::new(options.resource_id.clone(), expires_at);
        let plaintext = serde_json::to_vec(&payload)
            .map_err(|e| TokenError::SerializationError(e.to_string()))?;

        let ciphertext = cipher::encrypt(&self.public_key, self.padding, &plaintext)?;
        let token = AccessToken::new(&self.warehouse_name, STANDARD.encode(ciphertext)).encode()?;

        tracing::debug!(
            warehouse = %self.warehouse_name,
            expires_at = %expires_at,
            padding = %self.padding,
            "Issued file access token"
        );

        Ok((token, expires_at))
    }

    /// The effective expiry, truncated to what the wire format carries.
    fn resolve_expiry(
        &self,
        options: &SignOptions,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, TokenError> {
        let requested = match options.expires_at {
            Some(expires_at) => expires_at,
            None => now.checked_add_signed(self.default_ttl).ok_or_else(|| {
                TokenError::InvalidOptions(format!(
                    "default lifetime of {} is out of range",
                    self.default_ttl
                ))
            })?,
        };

        // Compare what the token will actually carry.
        let expires_at = requested.trunc_subsecs(3);
        if expires_at <= now {
            return Err(TokenError::InvalidExpiry { expires_at: requested });
        }
        Ok(expires_at)
    }
}
