//! Executor Seam
//!
//! The two kinds of work a sort session hands out: dispatched subtasks
//! and direct synchronous calls.

use std::time::Duration;

use crate::error::SchedulerError;
use crate::handle::TaskHandle;
use crate::pool::{ShutdownStatus, WorkerPool};

/// Something that runs work on behalf of a sort session
pub trait Executor {
    /// Hand `work` to a worker; the handle reports its completion
    fn submit<F, R>(&self, work: F) -> Result<TaskHandle<R>, SchedulerError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static;

    /// Run `work` on the calling thread
    fn call<F, R>(&self, work: F) -> R
    where
        F: FnOnce() -> R,
    {
        work()
    }

    /// Stop accepting work and release workers within `timeout`
    fn shutdown(&mut self, timeout: Duration) -> ShutdownStatus;
}

impl Executor for WorkerPool {
    fn submit<F, R>(&self, work: F) -> Result<TaskHandle<R>, SchedulerError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        WorkerPool::submit(self, work)
    }

    fn shutdown(&mut self, timeout: Duration) -> ShutdownStatus {
        WorkerPool::shutdown(self, timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_both<E: Executor>(executor: &E) -> (u32, u32) {
        let handle = executor.submit(|| 2).unwrap();
        let inline = executor.call(|| 3);
        (handle.wait().unwrap(), inline)
    }

    #[test]
    fn test_pool_as_executor() {
        let mut pool = WorkerPool::new(1).unwrap();
        assert_eq!(run_both(&pool), (2, 3));
        assert!(Executor::shutdown(&mut pool, Duration::from_secs(1)).is_clean());
    }
}
