//! Bounded retry for calls to external collaborators.
//!
//! Each attempt runs under its own timeout. Between attempts the policy
//! sleeps for a fixed or doubling backoff. After the last attempt the final
//! failure is returned unchanged inside [`RetryError`].

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// How the delay between attempts evolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryStrategy {
    /// The same delay before every retry.
    #[default]
    Fixed,
    /// The delay doubles after every failed attempt.
    Exponential,
}

/// Attempt budget, per-attempt timeout and backoff for one collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    attempt_timeout: Duration,
    backoff: Duration,
    max_backoff: Option<Duration>,
    strategy: RetryStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(120),
            backoff: Duration::from_millis(1000),
            max_backoff: None,
            strategy: RetryStrategy::Fixed,
        }
    }
}

/// Failure after the retry budget is spent.
#[derive(Debug, Error)]
pub enum RetryError<E>
where
    E: std::error::Error + 'static,
{
    /// The last attempt did not finish within the per-attempt timeout.
    #[error("{operation} timed out after {attempts} attempts")]
    TimedOut {
        /// Name of the retried operation.
        operation: String,
        /// Attempts made.
        attempts: u32,
    },

    /// The last attempt failed.
    #[error("{operation} failed after {attempts} attempts: {source}")]
    Exhausted {
        /// Name of the retried operation.
        operation: String,
        /// Attempts made.
        attempts: u32,
        /// Failure of the final attempt.
        source: E,
    },
}

impl RetryPolicy {
    /// Creates a policy. A zero attempt budget is raised to one.
    #[must_use]
    pub fn new(max_attempts: u32, attempt_timeout: Duration, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            attempt_timeout,
            backoff,
            ..Self::default()
        }
    }

    /// Sets the backoff strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Caps the delay between attempts.
    #[must_use]
    pub const fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = Some(max_backoff);
        self
    }

    /// Returns the attempt budget.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the per-attempt timeout.
    #[must_use]
    pub const fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Delay to wait after the given failed attempt (1-based).
    #[must_use]
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let raw = match self.strategy {
            RetryStrategy::Fixed => self.backoff,
            RetryStrategy::Exponential => {
                let exponent = attempt.saturating_sub(1).min(16);
                self.backoff.saturating_mul(1_u32 << exponent)
            }
        };
        self.max_backoff.map_or(raw, |cap| raw.min(cap))
    }

    /// Runs `operation` until it succeeds or the budget is spent.
    ///
    /// # Errors
    ///
    /// Returns [`RetryError::TimedOut`] when the final attempt exceeded the
    /// per-attempt timeout, or [`RetryError::Exhausted`] carrying the final
    /// attempt's error.
    pub async fn run<T, E, F, Fut>(
        &self,
        operation: &str,
        mut attempt_fn: F,
    ) -> Result<T, RetryError<E>>
    where
        E: std::error::Error + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 1;
        loop {
            let outcome = tokio::time::timeout(self.attempt_timeout, attempt_fn()).await;
            let final_attempt = attempt >= self.max_attempts;
            match outcome {
                Ok(Ok(value)) => {
                    debug!(operation, attempt, "attempt succeeded");
                    return Ok(value);
                }
                Ok(Err(err)) if final_attempt => {
                    warn!(operation, attempt, error = %err, "giving up");
                    return Err(RetryError::Exhausted {
                        operation: operation.to_owned(),
                        attempts: attempt,
                        source: err,
                    });
                }
                Err(_) if final_attempt => {
                    warn!(operation, attempt, "giving up after timeout");
                    return Err(RetryError::TimedOut {
                        operation: operation.to_owned(),
                        attempts: attempt,
                    });
                }
                Ok(Err(err)) => {
                    warn!(operation, attempt, error = %err, "attempt failed, retrying");
                }
                Err(_) => {
                    warn!(operation, attempt, "attempt timed out, retrying");
                }
            }
            tokio::time::sleep(self.backoff_after(attempt)).await;
            attempt += 1;
        }
    }
}
