//! Caller-supplied options.

use crate::DEFAULT_RETRY_DELAY;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Options supplied by the host application at startup.
///
/// Together with the fetched [`SetupInfo`](crate::SetupInfo) these form the
/// [`Settings`](crate::Settings) used to issue tokens.
#[derive(Clone)]
pub struct RegisterOptions {
    /// API key sent to the authority in the `api-key` header.
    pub api_key: String,

    /// Base URL of the warehouse authority.
    pub host: String,

    /// Fixed delay between bootstrap attempts.
    pub retry_delay: Duration,
}

impl RegisterOptions {
    /// Create options with the default retry delay.
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            host: host.into(),
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Override the delay between bootstrap attempts.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}

impl fmt::Debug for RegisterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterOptions")
            .field("api_key", &"<redacted>")
            .field("host", &self.host)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

/// A request for access to a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOptions {
    /// Identifier of the file the token grants access to.
    #[serde(rename = "fileId")]
    pub resource_id: String,

    /// When the grant expires. Must be in the future at issuance time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SignOptions {
    /// Request access to `resource_id` with the default lifetime.
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            expires_at: None,
        }
    }

    /// Set an absolute expiry.
    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Set an expiry relative to now.
    ///
    /// Fails when `now + duration` falls outside the range `DateTime<Utc>` can represent.
    pub fn expires_in(self, duration: chrono::Duration) -> Result<Self, ExpiryOutOfRange> {
        let expires_at = Utc::now()
            .checked_add_signed(duration)
            .ok_or(ExpiryOutOfRange { duration })?;
        Ok(self.expires_at(expires_at))
    }
}

/// A relative expiry that cannot be represented as a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expiry {duration} from now is out of range")]
pub struct ExpiryOutOfRange {
    pub duration: chrono::Duration,
}
