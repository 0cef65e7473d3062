//! Retry logic with exponential backoff.
//!
//! Provides automatic retry for transient transport failures with
//! configurable backoff and jitter to prevent thundering herd. This is the
//! only layer that retries: operation handlers and the transaction builder
//! propagate errors unchanged.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::config::RetryConfig;
use crate::errors::ClientError;

/// Executor that handles retries with exponential backoff.
#[derive(Clone)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    /// Create a new retry executor with the given configuration.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Create a retry executor that doesn't retry (for testing).
    pub fn no_retry() -> Self {
        Self::new(RetryConfig {
            max_retries: 0,
            initial_delay_ms: 0,
            max_delay_ms: 0,
            backoff_multiplier: 1.0,
            confirmation_timeout_ms: 60_000,
        })
    }

    /// Execute an operation with retry logic.
    ///
    /// The operation will be retried up to `max_retries` times if it fails
    /// with a retryable error. Non-retryable errors are returned immediately.
    pub async fn execute<F, Fut, T>(&self, operation: F) -> Result<T, ClientError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let mut attempts = 0;
        let mut delay = self.config.initial_delay_ms;

        loop {
            attempts += 1;

            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !e.is_retryable() || attempts > self.config.max_retries {
                        return Err(e);
                    }

                    if let Some(hint) = e.retry_hint_ms() {
                        delay = delay.max(hint);
                    }

                    // Add jitter (0-25% of delay)
                    let wait_time = delay + self.jitter(delay);

                    tracing::debug!(
                        attempts = attempts,
                        delay_ms = wait_time,
                        error = %e,
                        "Retrying after error"
                    );

                    sleep(Duration::from_millis(wait_time)).await;

                    delay = ((delay as f64) * self.config.backoff_multiplier) as u64;
                    delay = delay.min(self.config.max_delay_ms);
                }
            }
        }
    }

    /// Calculate jitter for the given delay.
    fn jitter(&self, delay: u64) -> u64 {
        // Pseudo-random jitter from the system clock; avoids needing the
        // `rand` crate for this.
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);

        let max_jitter = delay / 4;
        if max_jitter == 0 {
            0
        } else {
            (nanos as u64) % max_jitter
        }
    }

    /// Get the confirmation timeout from config.
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_millis(self.config.confirmation_timeout_ms)
    }

    /// Get the maximum number of retries.
    pub fn max_retries(&self) -> u32 {
        self.config.max_retries
    }
}
