//! Token validation.

use crate::cipher;
use crate::envelope::AccessToken;
use crate::error::{MalformedToken, TokenError};
use crate::keys::{KeyPair, load_private_key_pem};
use crate::payload::{DecodedToken, SignedPayload};
use chrono::{DateTime, Utc};
use rsa::RsaPrivateKey;
use warehouse_core::PaddingScheme;

/// Decodes and validates tokens with the authority's private key.
///
/// Stateless: every call is an independent check of one token.
#[derive(Clone)]
pub struct TokenValidator {
    private_key: RsaPrivateKey,
    padding: PaddingScheme,
}

impl TokenValidator {
    /// Create a new token validator with the given private key.
    pub fn new(private_key: RsaPrivateKey) -> Self {
        Self {
            private_key,
            padding: PaddingScheme::default(),
        }
    }

    /// Create a validator from a PEM-encoded private key.
    pub fn from_private_key_pem(pem: &str) -> Result<Self, TokenError> {
        load_private_key_pem(pem).map(Self::new)
    }

    pub fn from_keypair(keypair: &KeyPair) -> Self {
        Self::new(keypair.private_key().clone())
    }

    pub fn with_padding(mut self, padding: PaddingScheme) -> Self {
        self.padding = padding;
        self
    }

    /// Decode a token and reject it if expired.
    pub fn decode(&self, token: &str) -> Result<DecodedToken, TokenError> {
        self.decode_at(token, Utc::now())
    }

    /// Decode a token as of `now`.
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<DecodedToken, TokenError> {
        let result = self.open(token).and_then(|decoded| {
            if decoded.expires_at <= now {
                Err(TokenError::Expired {
                    expired_at: decoded.expires_at,
                })
            } else {
                Ok(decoded)
            }
        });

        if let Err(e) = &result {
            tracing::debug!(kind = ?e.kind(), error = %e, "Rejected file access token");
        }
        result
    }

    fn open(&self, token: &str) -> Result<DecodedToken, TokenError> {
        let envelope = AccessToken::decode(token)?;
        let ciphertext = envelope.ciphertext()?;
        let plaintext = cipher::decrypt(&self.private_key, self.padding, &ciphertext)?;
        let payload: SignedPayload =
            serde_json::from_slice(&plaintext).map_err(|_| MalformedToken::InvalidPayload)?;

        Ok(DecodedToken::new(envelope.warehouse_name, payload))
    }
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator")
            .field("padding", &self.padding)
            .finish_non_exhaustive()
    }
}

/// Decode a token with a PEM private key, using the default padding.
pub fn decode_access_token(token: &str, private_key_pem: &str) -> Result<DecodedToken, TokenError> {
    TokenValidator::from_private_key_pem(private_key_pem)?.decode(token)
}
