//! Resilience configuration with builder pattern
//!
//! Groups the read retry policy and the settings for chunked bulk work.

use super::retry::RetryConfig;
use std::time::Duration;

/// Resilience settings for catalog operations
#[derive(Debug, Clone, Default)]
pub struct ResilienceConfig {
    /// Applied to reads (entries, counts, fetch by id)
    pub retry: RetryConfig,
    pub bulk: BulkConfig,
}

/// Chunked bulk operation settings
#[derive(Debug, Clone)]
pub struct BulkConfig {
    /// Items started concurrently per chunk
    pub chunk_size: usize,
    /// Per-item retry; one retry after a short fixed delay
    pub item_retry: RetryConfig,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 10,
            item_retry: RetryConfig::fixed(2, Duration::from_millis(300)),
        }
    }
}

impl ResilienceConfig {
    pub fn builder() -> ResilienceConfigBuilder {
        ResilienceConfigBuilder::new()
    }

    /// No retries anywhere (for testing)
    pub fn disabled() -> Self {
        Self {
            retry: RetryConfig::none(),
            bulk: BulkConfig {
                chunk_size: 10,
                item_retry: RetryConfig::none(),
            },
        }
    }
}

/// Builder for ResilienceConfig
#[derive(Debug, Default)]
pub struct ResilienceConfigBuilder {
    config: ResilienceConfig,
}

impl ResilienceConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn max_retries(mut self, attempts: u32) -> Self {
        self.config.retry.max_attempts = attempts;
        self
    }

    /// Zero is treated as one
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.bulk.chunk_size = size.max(1);
        self
    }

    pub fn bulk_retry(mut self, retry: RetryConfig) -> Self {
        self.config.bulk.item_retry = retry;
        self
    }

    pub fn build(self) -> ResilienceConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResilienceConfig::default();

        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.bulk.chunk_size, 10);
        assert_eq!(config.bulk.item_retry.max_attempts, 2);
        assert!(!config.bulk.item_retry.jitter);
    }

    #[test]
    fn test_disabled_config() {
        let config = ResilienceConfig::disabled();

        assert_eq!(config.retry.max_attempts, 1);
        assert_eq!(config.bulk.item_retry.max_attempts, 1);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ResilienceConfig::builder()
            .max_retries(5)
            .chunk_size(0)
            .bulk_retry(RetryConfig::none())
            .build();

        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.bulk.chunk_size, 1);
        assert_eq!(config.bulk.item_retry.max_attempts, 1);
    }
}
