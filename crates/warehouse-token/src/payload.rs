//! Inner token payload and the validator's decoded view.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};

/// Length of the per-token salt.
pub const SALT_LEN: usize = 24;

/// The encrypted layer of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedPayload {
    /// When the grant expires.
    #[serde(rename = "expiresAt", with = "iso_millis")]
    pub expires_at: DateTime<Utc>,

    /// The file the grant applies to.
    #[serde(rename = "fileId")]
    pub resource_id: String,

    /// Random filler so equal grants encrypt differently. Not validated.
    #[serde(default)]
    pub salt: String,
}

impl SignedPayload {
    /// Create a payload with a fresh salt.
    pub fn new(resource_id: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            expires_at,
            resource_id: resource_id.into(),
            salt: generate_salt(),
        }
    }
}

/// Draw a salt of [`SALT_LEN`] alphanumeric characters from the thread CSPRNG.
pub fn generate_salt() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LEN)
        .map(char::from)
        .collect()
}

/// A validated token: the envelope's warehouse joined with the decrypted payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedToken {
    pub warehouse_name: String,

    #[serde(rename = "fileId")]
    pub resource_id: String,

    #[serde(with = "iso_millis")]
    pub expires_at: DateTime<Utc>,

    pub salt: String,
}

impl DecodedToken {
    pub(crate) fn new(warehouse_name: String, payload: SignedPayload) -> Self {
        Self {
            warehouse_name,
            resource_id: payload.resource_id,
            expires_at: payload.expires_at,
            salt: payload.salt,
        }
    }

    /// Time left before the token expires, as of `now`.
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> chrono::Duration {
        self.expires_at - now
    }
}

/// RFC 3339 timestamps with millisecond precision and a `Z` suffix.
pub(crate) mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}
