//! Task Handles
//!
//! One-shot completion signal between a worker and whoever submitted the task.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::error::TaskError;

/// Task ID counter
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> u64 {
    NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed)
}

/// Sending half kept by the job closure
pub(crate) type Completion<R> = Sender<Result<R, TaskError>>;

/// Create a linked completion sender and handle
pub(crate) fn completion<R>() -> (Completion<R>, TaskHandle<R>) {
    let (tx, rx) = crossbeam_channel::bounded(1);
    let handle = TaskHandle {
        id: next_task_id(),
        receiver: rx,
    };
    (tx, handle)
}

/// Handle to a submitted unit of work
///
/// Dropping the handle does not cancel the work; its result is discarded.
/// If the work is dropped without running (forced shutdown) the handle
/// resolves to [`TaskError::Cancelled`].
#[derive(Debug)]
pub struct TaskHandle<R> {
    id: u64,
    receiver: Receiver<Result<R, TaskError>>,
}

impl<R> TaskHandle<R> {
    /// Process-unique task ID
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Check whether a result is ready without blocking
    ///
    /// Stays false for work dropped by a forced shutdown, which never
    /// reports; [`wait`](Self::wait) resolves those to
    /// [`TaskError::Cancelled`].
    pub fn is_finished(&self) -> bool {
        !self.receiver.is_empty()
    }

    /// Block until the work finishes
    pub fn wait(self) -> Result<R, TaskError> {
        match self.receiver.recv() {
            Ok(outcome) => outcome,
            Err(_) => Err(TaskError::Cancelled),
        }
    }

    /// Block for at most `timeout`
    pub fn wait_timeout(self, timeout: Duration) -> Result<R, TaskError> {
        match self.receiver.recv_timeout(timeout) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => Err(TaskError::TimedOut { after: timeout }),
            Err(RecvTimeoutError::Disconnected) => Err(TaskError::Cancelled),
        }
    }
}
