//! Sort errors

use std::fmt;

use psort_scheduler::{SchedulerError, TaskError};

/// Inclusive index range `[left, right]` into the sorted buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub left: usize,
    pub right: usize,
}

impl Span {
    pub fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }

    /// Element count; zero when `left > right`
    pub fn len(&self) -> usize {
        if self.left > self.right {
            0
        } else {
            self.right - self.left + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.left, self.right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("parallel threshold must be at least 1")]
    ZeroThreshold,

    #[error("pool size must be at least 1")]
    ZeroPoolSize,
}

#[derive(Debug, thiserror::Error)]
pub enum SortError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to start worker pool: {0}")]
    Pool(#[source] SchedulerError),

    #[error("could not dispatch range {span}: {source}")]
    Dispatch {
        span: Span,
        #[source]
        source: SchedulerError,
    },

    #[error("sorting range {span} failed: {source}")]
    Task {
        span: Span,
        #[source]
        source: TaskError,
    },

    #[error(
        "worker pool did not drain in time ({cancelled_tasks} tasks cancelled, {abandoned_workers} workers abandoned)"
    )]
    DegradedShutdown {
        cancelled_tasks: usize,
        abandoned_workers: usize,
        /// Failure that preceded the shutdown, if any
        #[source]
        cause: Option<Box<SortError>>,
    },
}
