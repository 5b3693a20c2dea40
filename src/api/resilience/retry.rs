//! Retry policies with exponential backoff
//!
//! Transient catalog failures (connection problems, timeouts, 5xx, 429) are
//! retried; everything else fails on the first attempt.

use crate::api::error::CatalogError;
use log::{debug, warn};
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Constant delay between attempts, no jitter
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay: delay,
            max_delay: delay,
            backoff_multiplier: 1.0,
            jitter: false,
        }
    }

    /// A single attempt
    pub fn none() -> Self {
        Self::fixed(1, Duration::ZERO)
    }
}

/// Types of errors and their retry behavior
#[derive(Debug, Clone, PartialEq)]
pub enum RetryableError {
    /// Connection refused, DNS, broken pipe
    Network,
    ServerError(u16),
    RateLimited,
    Timeout,
    /// 4xx other than 408 and 429
    ClientError(u16),
    /// Not logged in or aborted; retrying cannot help
    Terminal,
    Unknown,
}

impl RetryableError {
    pub fn should_retry(&self) -> bool {
        matches!(
            self,
            RetryableError::Network
                | RetryableError::ServerError(_)
                | RetryableError::RateLimited
                | RetryableError::Timeout
        )
    }

    pub fn from_status_code(status: u16) -> Self {
        match status {
            408 => RetryableError::Timeout,
            429 => RetryableError::RateLimited,
            400..=499 => RetryableError::ClientError(status),
            500..=599 => RetryableError::ServerError(status),
            _ => RetryableError::Unknown,
        }
    }

    pub fn from_reqwest_error(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            RetryableError::Timeout
        } else if error.is_connect() || error.is_request() {
            RetryableError::Network
        } else if let Some(status) = error.status() {
            Self::from_status_code(status.as_u16())
        } else {
            RetryableError::Unknown
        }
    }
}

/// Errors the retry policy knows how to classify
pub trait Retryable {
    fn classify(&self) -> RetryableError;
}

impl Retryable for reqwest::Error {
    fn classify(&self) -> RetryableError {
        RetryableError::from_reqwest_error(self)
    }
}

impl Retryable for CatalogError {
    fn classify(&self) -> RetryableError {
        match self {
            CatalogError::Http { status, .. } => RetryableError::from_status_code(*status),
            CatalogError::Transport(e) => RetryableError::from_reqwest_error(e),
            CatalogError::Cancelled | CatalogError::NotLoggedIn => RetryableError::Terminal,
            CatalogError::Validation(_) => RetryableError::ClientError(400),
            CatalogError::Decode(_) => RetryableError::Unknown,
        }
    }
}

/// Retry policy that implements exponential backoff with jitter
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute an operation, retrying transient failures
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + std::fmt::Display,
    {
        self.execute_if(operation, |_| true).await
    }

    /// Execute an operation, retrying only while the classifier says the
    /// failure is transient and `proceed` still agrees
    pub async fn execute_if<F, Fut, T, E, P>(&self, operation: F, proceed: P) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + std::fmt::Display,
        P: Fn(&E) -> bool,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            debug!("Executing operation (attempt {}/{})", attempt, max_attempts);

            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!("Operation succeeded after {} attempts", attempt);
                    }
                    return Ok(result);
                }
                Err(error) => {
                    let should_retry = error.classify().should_retry() && proceed(&error);

                    if !should_retry || attempt >= max_attempts {
                        if attempt > 1 || should_retry {
                            warn!(
                                "Operation failed permanently on attempt {} (should_retry: {}): {}",
                                attempt, should_retry, error
                            );
                        }
                        return Err(error);
                    }

                    warn!("Operation failed on attempt {} (retryable): {}", attempt, error);

                    let delay = self.calculate_delay(attempt);
                    debug!("Waiting {:?} before retry", delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Calculate exponential backoff delay with optional jitter
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let delay_ms = (self.config.base_delay.as_millis() as f64)
            * self.config.backoff_multiplier.powi(attempt as i32 - 1);

        let mut delay = Duration::from_millis(delay_ms as u64);

        if delay > self.config.max_delay {
            delay = self.config.max_delay;
        }

        if self.config.jitter {
            let jitter_factor = rand::thread_rng().gen_range(0.5..=1.5);
            let jittered_ms = (delay.as_millis() as f64 * jitter_factor) as u64;
            delay = Duration::from_millis(jittered_ms);
        }

        delay
    }
}
