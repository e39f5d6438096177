//! Scheduler errors

use std::any::Any;
use std::time::Duration;

/// Errors raised while creating a pool or handing it work
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("worker pool is shut down and no longer accepts work")]
    ShutDown,

    #[error("failed to spawn worker {id}: {source}")]
    Spawn {
        id: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of a single submitted unit of work, as seen by its handle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task panicked: {message}")]
    Panicked { message: String },

    #[error("task was cancelled before it completed")]
    Cancelled,

    #[error("task did not complete within {after:?}")]
    TimedOut { after: Duration },
}

impl TaskError {
    /// Build from a payload caught by `catch_unwind`
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::Panicked { message }
    }
}
