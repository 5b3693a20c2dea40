//! Retry policies and bulk operation settings

pub mod retry;
pub mod config;

pub use retry::{RetryPolicy, RetryConfig, Retryable, RetryableError};
pub use config::{BulkConfig, ResilienceConfig, ResilienceConfigBuilder};
