//! One-shot retrieval of the authority's setup information.
//!
//! The default policy retries forever at a fixed interval: token issuing is
//! unusable without the authority's public key, so startup waits for it.
//! Callers that need an upper bound use a [`RetryPolicy`] with
//! `max_attempts` or `deadline`, or cancel through the [`CancellationToken`].

use crate::error::BootstrapError;
use crate::source::SetupSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use warehouse_core::{DEFAULT_RETRY_DELAY, RetryConfig, SetupInfo};

/// When to retry a failed setup fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Fixed delay between attempts.
    pub delay: Duration,
    /// Stop after this many attempts.
    pub max_attempts: Option<u32>,
    /// Stop once this much time has passed since the first attempt.
    pub deadline: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_RETRY_DELAY)
    }
}

impl RetryPolicy {
    /// Retry forever every `delay`.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: None,
            deadline: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            delay: config.delay(),
            max_attempts: config.max_attempts,
            deadline: config.deadline(),
        }
    }
}

/// Fetches [`SetupInfo`] from a [`SetupSource`], retrying per a [`RetryPolicy`].
#[derive(Clone)]
pub struct SetupBootstrapper {
    source: Arc<dyn SetupSource>,
    policy: RetryPolicy,
}

impl SetupBootstrapper {
    pub fn new(source: impl SetupSource + 'static, policy: RetryPolicy) -> Self {
        Self::from_arc(Arc::new(source), policy)
    }

    pub fn from_arc(source: Arc<dyn SetupSource>, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch setup information, retrying until success, cancellation, or the
    /// policy's limits.
    ///
    /// Every failed attempt is logged as a warning and never returned.
    pub async fn fetch(&self, cancel: &CancellationToken) -> Result<SetupInfo, BootstrapError> {
        let deadline = self.policy.deadline.map(|d| Instant::now() + d);
        let mut attempts = 0u32;

        loop {
            if cancel.is_cancelled() {
                return Err(BootstrapError::Cancelled { attempts });
            }
            attempts += 1;

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(BootstrapError::Cancelled { attempts }),
                _ = sleep_until_deadline(deadline) => {
                    return Err(BootstrapError::DeadlineElapsed { attempts });
                }
                outcome = self.source.fetch_setup_info() => outcome,
            };

            match outcome {
                Ok(Some(setup)) => {
                    info!(
                        warehouse = %setup.warehouse_name,
                        attempts,
                        "Obtained warehouse setup information"
                    );
                    return Ok(setup);
                }
                Ok(None) => {
                    warn!(attempt = attempts, "Cannot obtain setup information: empty response");
                }
                Err(e) => {
                    warn!(attempt = attempts, error = %e, "Cannot obtain setup information");
                }
            }

            if self.policy.max_attempts.is_some_and(|max| attempts >= max) {
                return Err(BootstrapError::AttemptsExhausted { attempts });
            }
            if deadline.is_some_and(|at| Instant::now() + self.policy.delay >= at) {
                return Err(BootstrapError::DeadlineElapsed { attempts });
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(BootstrapError::Cancelled { attempts }),
                _ = tokio::time::sleep(self.policy.delay) => {}
            }
        }
    }

    /// Run [`fetch`](Self::fetch) on a background task.
    pub fn spawn(self) -> BootstrapHandle {
        self.spawn_with(CancellationToken::new())
    }

    /// Run [`fetch`](Self::fetch) on a background task, cancelled by `cancel`.
    pub fn spawn_with(self, cancel: CancellationToken) -> BootstrapHandle {
        let token = cancel.clone();
        let task = tokio::spawn(async move { self.fetch(&token).await });
        BootstrapHandle { cancel, task }
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// A bootstrap running in the background.
///
/// [`wait`](Self::wait) resolves once, with the setup information or the
/// reason the bootstrap stopped.
pub struct BootstrapHandle {
    cancel: CancellationToken,
    task: JoinHandle<Result<SetupInfo, BootstrapError>>,
}

impl BootstrapHandle {
    /// Stop retrying. A pending [`wait`](Self::wait) returns `Cancelled`.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the bootstrap to finish.
    pub async fn wait(self) -> Result<SetupInfo, BootstrapError> {
        self.task
            .await
            .map_err(|e| BootstrapError::TaskFailed(e.to_string()))?
    }
}
