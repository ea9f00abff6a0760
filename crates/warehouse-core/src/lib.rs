//! # warehouse-core
//!
//! Shared data model and configuration for the Warehouse SDK.
//!
//! The types here are the ones every other crate agrees on:
//!
//! - [`SetupInfo`]: the authority's public key and warehouse name, fetched once at startup
//! - [`RegisterOptions`]: the caller-supplied half of the settings (host, API key, retry delay)
//! - [`Settings`]: both halves joined, immutable for the lifetime of the process
//! - [`SignOptions`]: what a caller asks for when requesting file access
//! - [`WarehouseConfig`]: the YAML configuration surface

pub mod config;
pub mod options;
pub mod settings;

pub use config::{ConfigError, PaddingScheme, RetryConfig, TokenConfig, WarehouseConfig};
pub use options::{ExpiryOutOfRange, RegisterOptions, SignOptions};
pub use settings::{SetupInfo, Settings};

use std::time::Duration;

/// Delay between bootstrap attempts when none is configured.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Lifetime of an access token when the caller does not pick an expiry.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;
