//! Settings resolved once at startup.

use crate::options::RegisterOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Setup information published by the warehouse authority.
///
/// Returned by `GET {host}/setup/info`. Treated as trusted once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupInfo {
    /// PEM-encoded RSA public key used to encrypt token payloads.
    pub public_key: String,

    /// Name of the warehouse, carried in plaintext in every token.
    pub warehouse_name: String,
}

/// Immutable settings for the lifetime of the process.
#[derive(Clone)]
pub struct Settings {
    api_key: String,
    host: String,
    retry_delay: Duration,
    setup: SetupInfo,
}

impl Settings {
    /// Join the caller options with the fetched setup information.
    ///
    /// A trailing `/` on the host is dropped so joined URLs never contain `//`.
    pub fn new(options: RegisterOptions, setup: SetupInfo) -> Self {
        let host = options.host.trim_end_matches('/').to_string();
        Self {
            api_key: options.api_key,
            host,
            retry_delay: options.retry_delay,
            setup,
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Base URL of the warehouse, without a trailing slash.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    pub fn setup(&self) -> &SetupInfo {
        &self.setup
    }

    pub fn public_key(&self) -> &str {
        &self.setup.public_key
    }

    pub fn warehouse_name(&self) -> &str {
        &self.setup.warehouse_name
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("host", &self.host)
            .field("retry_delay", &self.retry_delay)
            .field("warehouse_name", &self.setup.warehouse_name)
            .finish()
    }
}
