//! Error types for the client crate.

use thiserror::Error;

/// A single failed attempt to fetch setup information.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Failed to build the HTTP client.
    #[error("failed to create HTTP client: {0}")]
    Client(String),

    /// The request did not complete.
    #[error("setup request failed: {0}")]
    Request(String),

    /// The authority answered with a non-success status.
    #[error("authority returned HTTP {status}")]
    Status { status: u16 },

    /// The response body is not setup information.
    #[error("invalid setup response: {0}")]
    InvalidBody(String),
}

/// Why the bootstrap stopped without setup information.
///
/// With the default retry policy only cancellation ends the loop early.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("bootstrap cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },

    #[error("bootstrap gave up after {attempts} attempt(s)")]
    AttemptsExhausted { attempts: u32 },

    #[error("bootstrap deadline elapsed after {attempts} attempt(s)")]
    DeadlineElapsed { attempts: u32 },

    #[error("bootstrap task failed: {0}")]
    TaskFailed(String),
}

/// Errors from constructing or using the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Token(#[from] warehouse_token::TokenError),

    #[error(transparent)]
    Config(#[from] warehouse_core::ConfigError),
}
