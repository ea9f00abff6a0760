//! Error types for the token crate.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur while issuing or validating tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The requested expiry is not in the future.
    #[error("expiresAt must be a future time, got {expires_at}")]
    InvalidExpiry { expires_at: DateTime<Utc> },

    /// The sign options are unusable.
    #[error("invalid sign options: {0}")]
    InvalidOptions(String),

    /// Failed to generate keypair.
    #[error("failed to generate keypair: {0}")]
    KeyGenerationFailed(String),

    /// Failed to parse private key.
    #[error("failed to parse private key: {0}")]
    InvalidPrivateKey(String),

    /// Failed to parse public key.
    #[error("failed to parse public key: {0}")]
    InvalidPublicKey(String),

    /// Failed to encrypt the payload.
    #[error("failed to encrypt token payload: {0}")]
    EncryptionFailed(String),

    /// Token has expired.
    #[error("token has expired at {expired_at}")]
    Expired { expired_at: DateTime<Utc> },

    /// Token could not be decoded, decrypted or parsed.
    #[error("malformed token: {0}")]
    Malformed(#[from] MalformedToken),

    /// Failed to serialize token.
    #[error("token serialization error: {0}")]
    SerializationError(String),

    /// IO error (reading/writing keys).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Why a token was rejected as malformed.
///
/// Variants never carry token or plaintext content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedToken {
    #[error("token is not valid base64")]
    InvalidBase64,

    #[error("token envelope is not valid UTF-8")]
    InvalidEncoding,

    #[error("token envelope is not valid JSON")]
    InvalidEnvelope,

    #[error("unsupported token envelope version")]
    UnsupportedVersion,

    #[error("signed payload is not valid base64 ciphertext")]
    InvalidCiphertext,

    #[error("signed payload could not be decrypted")]
    DecryptionFailed,

    #[error("signed payload is not a valid token payload")]
    InvalidPayload,
}

/// Coarse classification of [`TokenError`], for mapping to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller input was rejected at issuance.
    Validation,
    /// The token is well formed but no longer grants access.
    AccessDenied,
    /// The token is corrupt, forged, or encrypted for another key.
    Malformed,
    /// A key could not be loaded or generated.
    Key,
    /// Anything else.
    Internal,
}

impl TokenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TokenError::InvalidExpiry { .. } | TokenError::InvalidOptions(_) => {
                ErrorKind::Validation
            }
            TokenError::Expired { .. } => ErrorKind::AccessDenied,
            TokenError::Malformed(_) => ErrorKind::Malformed,
            TokenError::KeyGenerationFailed(_)
            | TokenError::InvalidPrivateKey(_)
            | TokenError::InvalidPublicKey(_) => ErrorKind::Key,
            TokenError::EncryptionFailed(_)
            | TokenError::SerializationError(_)
            | TokenError::IoError(_) => ErrorKind::Internal,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.kind() == ErrorKind::AccessDenied
    }

    pub fn is_malformed(&self) -> bool {
        self.kind() == ErrorKind::Malformed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let expired = TokenError::Expired { expired_at: Utc::now() };
        assert_eq!(expired.kind(), ErrorKind::AccessDenied);
        assert!(expired.is_expired());

        let malformed = TokenError::from(MalformedToken::DecryptionFailed);
        assert_eq!(malformed.kind(), ErrorKind::Malformed);
        assert!(malformed.is_malformed());
        assert!(!malformed.is_expired());

        let invalid = TokenError::InvalidExpiry { expires_at: Utc::now() };
        assert_eq!(invalid.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_malformed_message() {
        let err = TokenError::from(MalformedToken::InvalidPayload);
        assert_eq!(err.to_string(), "malformed token: signed payload is not a valid token payload");
    }
}
