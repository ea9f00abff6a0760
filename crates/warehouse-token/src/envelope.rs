//! The outer, plaintext layer of a token.
//!
//! `base64( {"w": warehouse, "st": base64 ciphertext, "v": 1} )`

use crate::error::{MalformedToken, TokenError};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

/// Envelope version written by this crate.
pub const ENVELOPE_VERSION: u32 = 1;

/// The token envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Warehouse the token was issued for.
    #[serde(rename = "w")]
    pub warehouse_name: String,

    /// Base64 RSA-OAEP ciphertext of the [`SignedPayload`](crate::SignedPayload).
    #[serde(rename = "st")]
    pub signed_payload: String,

    /// Envelope version. Absent on tokens from legacy issuers.
    #[serde(rename = "v", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

impl AccessToken {
    /// Create a current-version envelope.
    pub fn new(warehouse_name: impl Into<String>, signed_payload: impl Into<String>) -> Self {
        Self {
            warehouse_name: warehouse_name.into(),
            signed_payload: signed_payload.into(),
            version: Some(ENVELOPE_VERSION),
        }
    }

    /// Serialize to the token string handed to callers.
    pub fn encode(&self) -> Result<String, TokenError> {
        let json =
            serde_json::to_string(self).map_err(|e| TokenError::SerializationError(e.to_string()))?;
        Ok(STANDARD.encode(json))
    }

    /// Parse a token string back into its envelope.
    pub fn decode(token: &str) -> Result<Self, MalformedToken> {
        let bytes = STANDARD
            .decode(token.trim())
            .map_err(|_| MalformedToken::InvalidBase64)?;
        let json = String::from_utf8(bytes).map_err(|_| MalformedToken::InvalidEncoding)?;
        let envelope: AccessToken =
            serde_json::from_str(&json).map_err(|_| MalformedToken::InvalidEnvelope)?;

        match envelope.version {
            None | Some(ENVELOPE_VERSION) => Ok(envelope),
            Some(_) => Err(MalformedToken::UnsupportedVersion),
        }
    }

    /// Decode the ciphertext bytes.
    pub fn ciphertext(&self) -> Result<Vec<u8>, MalformedToken> {
        STANDARD
            .decode(&self.signed_payload)
            .map_err(|_| MalformedToken::InvalidCiphertext)
    }
}

/// Decode only the outer layer of a token (for debugging).
///
/// Does not decrypt the payload and does not check expiry.
pub fn inspect_token_unverified(token: &str) -> Result<TokenInfo, TokenError> {
    let envelope = AccessToken::decode(token)?;
    let ciphertext_len = envelope.ciphertext()?.len();

    Ok(TokenInfo {
        warehouse_name: envelope.warehouse_name,
        version: envelope.version,
        ciphertext_len,
    })
}

/// Information about a token (for inspection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    /// Warehouse named in the envelope.
    pub warehouse_name: String,
    /// Envelope version, if present.
    pub version: Option<u32>,
    /// Length of the encrypted payload in bytes.
    pub ciphertext_len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_field_names() {
        let token = AccessToken::new("main", "Y2lwaGVy").encode().unwrap();
        let json = String::from_utf8(STANDARD.decode(&token).unwrap()).unwrap();
        assert_eq!(json, r#"{"w":"main","st":"Y2lwaGVy","v":1}"#);
    }

    #[test]
    fn test_legacy_envelope_without_version() {
        let token = STANDARD.encode(r#"{"w":"main","st":"Y2lwaGVy"}"#);
        let envelope = AccessToken::decode(&token).unwrap();
        assert_eq!(envelope.warehouse_name, "main");
        assert_eq!(envelope.version, None);
        assert_eq!(envelope.ciphertext().unwrap(), b"cipher");
    }

    #[test]
    fn test_unknown_version_rejected() {
        let token = STANDARD.encode(r#"{"w":"main","st":"Y2lwaGVy","v":7}"#);
        assert_eq!(AccessToken::decode(&token), Err(MalformedToken::UnsupportedVersion));
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(AccessToken::decode("%%%"), Err(MalformedToken::InvalidBase64));
        assert_eq!(
            AccessToken::decode(&STANDARD.encode([0xff, 0xfe, 0xfd])),
            Err(MalformedToken::InvalidEncoding)
        );
        assert_eq!(
            AccessToken::decode(&STANDARD.encode("not json")),
            Err(MalformedToken::InvalidEnvelope)
        );
        assert_eq!(
            AccessToken::decode(&STANDARD.encode(r#"{"w":"main"}"#)),
            Err(MalformedToken::InvalidEnvelope)
        );
    }

    #[test]
    fn test_inspect_token_unverified() {
        let token = AccessToken::new("archive", STANDARD.encode([7u8; 256])).encode().unwrap();
        let info = inspect_token_unverified(&token).unwrap();
        assert_eq!(info.warehouse_name, "archive");
        assert_eq!(info.version, Some(ENVELOPE_VERSION));
        assert_eq!(info.ciphertext_len, 256);
    }
}
