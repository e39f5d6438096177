//! Sort Configuration

use std::time::Duration;

use psort_scheduler::{DEFAULT_SHUTDOWN_TIMEOUT, PoolConfig, available_workers};

use crate::error::ConfigError;

/// Ranges shorter than this are sorted without dispatch
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 10_000;

/// Sort session options
#[derive(Debug, Clone)]
pub struct SortConfig {
    /// Element count from which a range is split across workers
    pub parallel_threshold: usize,

    /// Worker thread count
    pub pool_size: usize,

    /// Grace period for draining the pool once the sort ends
    ///
    /// Also bounds the wait for each dispatched half at the join barrier,
    /// so a value shorter than the time to sort half the input fails the
    /// sort with [`SortError::Task`](crate::SortError::Task) and leaves the
    /// buffer unsorted.
    pub shutdown_timeout: Duration,
}

impl SortConfig {
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parallel_threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if self.pool_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        Ok(())
    }

    /// Pool options derived from this session
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::default().with_pool_size(self.pool_size)
    }
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            pool_size: available_workers(),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SortConfig::default();
        assert_eq!(config.parallel_threshold, 10_000);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(60));
        assert!(config.pool_size >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let config = SortConfig::default().with_parallel_threshold(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroThreshold));
    }

    #[test]
    fn test_zero_pool_rejected() {
        let config = SortConfig::default().with_pool_size(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroPoolSize));
    }

    #[test]
    fn test_pool_config() {
        let config = SortConfig::default().with_pool_size(3);
        assert_eq!(config.pool_config().pool_size, 3);
    }
}
