//! Pool Configuration

use std::thread;
use std::time::Duration;

/// Grace period a shutdown waits before cancelling outstanding work
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(60);

/// Number of hardware execution contexts, or 4 when unknown
pub fn available_workers() -> usize {
    thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(4)
}

/// Worker pool options
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of worker threads (clamped to at least 1)
    pub pool_size: usize,

    /// Worker threads are named `{prefix}-{id}`
    pub thread_name_prefix: String,
}

impl PoolConfig {
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            pool_size: available_workers(),
            thread_name_prefix: "psort-worker".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool_size() {
        assert!(PoolConfig::default().pool_size >= 1);
    }

    #[test]
    fn test_builders() {
        let config = PoolConfig::default()
            .with_pool_size(3)
            .with_thread_name_prefix("sorter");
        assert_eq!(config.pool_size, 3);
        assert_eq!(config.thread_name_prefix, "sorter");
    }
}
