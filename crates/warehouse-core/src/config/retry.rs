//! Bootstrap retry configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the setup handshake retries.
///
/// The default retries forever at a fixed 10 second interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Fixed delay between attempts, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Give up after this many attempts. Unbounded when unset.
    #[serde(default)]
    pub max_attempts: Option<u32>,

    /// Give up once this much time has passed since the first attempt.
    #[serde(default)]
    pub deadline_ms: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            max_attempts: None,
            deadline_ms: None,
        }
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

fn default_delay_ms() -> u64 {
    crate::DEFAULT_RETRY_DELAY.as_millis() as u64
}
