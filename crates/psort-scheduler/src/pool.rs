//! Worker Pool
//!
//! Fixed-size thread pool using std::thread. Workers share a single FIFO
//! queue; every submitted job reports back through its own [`TaskHandle`].

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::{DEFAULT_SHUTDOWN_TIMEOUT, PoolConfig};
use crate::error::{SchedulerError, TaskError};
use crate::handle::{TaskHandle, completion};

/// Job function type
type Job = Box<dyn FnOnce() + Send + 'static>;

/// No user code runs while a pool lock is held, so a poisoned lock still
/// guards consistent state.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Outcome of [`WorkerPool::shutdown`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownStatus {
    /// Every queued and running job finished, every worker was joined
    Clean,
    /// The timeout elapsed with work outstanding
    Degraded {
        /// Queued jobs dropped without running
        cancelled_tasks: usize,
        /// Workers still busy and left detached
        abandoned_workers: usize,
    },
}

impl ShutdownStatus {
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Clean)
    }
}

struct QueueState {
    jobs: VecDeque<Job>,
    closed: bool,
    live_workers: usize,
    /// Jobs popped and not yet finished
    running: usize,
}

/// Shared job queue
struct WorkerQueue {
    state: Mutex<QueueState>,
    /// Signalled when a job arrives or the queue closes
    available: Condvar,
    /// Signalled when a worker exits
    exited: Condvar,
    /// Workers stop after their current job once set
    cancelled: AtomicBool,
}

impl WorkerQueue {
    fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                jobs: VecDeque::new(),
                closed: false,
                live_workers: 0,
                running: 0,
            }),
            available: Condvar::new(),
            exited: Condvar::new(),
            cancelled: AtomicBool::new(false),
        }
    }

    fn push(&self, job: Job) -> Result<(), SchedulerError> {
        let mut state = lock(&self.state);
        if state.closed {
            return Err(SchedulerError::ShutDown);
        }
        state.jobs.push_back(job);
        self.available.notify_one();
        Ok(())
    }

    /// Next job, or `None` once the queue is closed and drained
    fn wait_for_job(&self) -> Option<Job> {
        let mut state = lock(&self.state);

        loop {
            if self.cancelled.load(Ordering::Acquire) {
                return None;
            }

            if let Some(job) = state.jobs.pop_front() {
                state.running += 1;
                return Some(job);
            }

            if state.closed {
                return None;
            }

            state = self
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn close(&self) {
        lock(&self.state).closed = true;
        self.available.notify_all();
    }

    /// Drop every queued job and tell workers to stop; returns the drop count
    fn cancel(&self) -> usize {
        self.cancelled.store(true, Ordering::Release);
        let dropped: Vec<Job> = {
            let mut state = lock(&self.state);
            state.closed = true;
            state.jobs.drain(..).collect()
        };
        self.available.notify_all();
        dropped.len()
    }

    fn job_finished(&self) {
        lock(&self.state).running -= 1;
    }

    fn running(&self) -> usize {
        lock(&self.state).running
    }

    /// Nothing queued and nothing running
    fn is_drained(&self) -> bool {
        let state = lock(&self.state);
        state.jobs.is_empty() && state.running == 0
    }

    /// After a cancel, wait for idle workers to leave; returns the busy count
    fn wait_for_idle_exit(&self) -> usize {
        let mut state = lock(&self.state);
        while state.live_workers > state.running {
            state = self
                .exited
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.live_workers
    }

    fn worker_started(&self) {
        lock(&self.state).live_workers += 1;
    }

    fn worker_exited(&self) {
        lock(&self.state).live_workers -= 1;
        self.exited.notify_all();
    }

    /// Wait until every worker has exited or the deadline passes
    fn wait_for_exit(&self, deadline: Option<Instant>) -> bool {
        let mut state = lock(&self.state);

        while state.live_workers > 0 {
            state = match deadline {
                None => self
                    .exited
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner),
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    self.exited
                        .wait_timeout(state, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
            };
        }

        true
    }

    fn len(&self) -> usize {
        lock(&self.state).jobs.len()
    }
}

/// Decrements the live worker count however the worker loop ends
struct ExitGuard(Arc<WorkerQueue>);

impl Drop for ExitGuard {
    fn drop(&mut self) {
        self.0.worker_exited();
    }
}

struct Worker {
    id: usize,
    thread: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("running", &self.thread.is_some())
            .finish()
    }
}

impl Worker {
    fn spawn(
        id: usize,
        name: String,
        queue: Arc<WorkerQueue>,
    ) -> Result<Self, SchedulerError> {
        queue.worker_started();
        let guard = ExitGuard(Arc::clone(&queue));

        let thread = thread::Builder::new()
            .name(name)
            .spawn(move || {
                let _guard = guard;
                while let Some(job) = queue.wait_for_job() {
                    job();
                    queue.job_finished();
                }
            })
            .map_err(|source| SchedulerError::Spawn { id, source })?;

        Ok(Self {
            id,
            thread: Some(thread),
        })
    }

    fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }

    fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }

    fn detach(&mut self) {
        self.thread.take();
    }
}

/// Fixed-size worker pool
pub struct WorkerPool {
    /// Worker threads
    workers: Vec<Worker>,
    /// Shared job queue
    queue: Arc<WorkerQueue>,
    /// Number of workers
    worker_count: usize,
    /// Set by the first shutdown
    status: Option<ShutdownStatus>,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers)
            .field("worker_count", &self.worker_count)
            .field("active_tasks", &self.active_tasks())
            .field("status", &self.status)
            .finish()
    }
}

impl WorkerPool {
    /// Create a pool with `worker_count` workers (at least one)
    pub fn new(worker_count: usize) -> Result<Self, SchedulerError> {
        Self::with_config(&PoolConfig::default().with_pool_size(worker_count))
    }

    /// Create with one worker per hardware execution context
    pub fn default_size() -> Result<Self, SchedulerError> {
        Self::with_config(&PoolConfig::default())
    }

    pub fn with_config(config: &PoolConfig) -> Result<Self, SchedulerError> {
        let worker_count = config.pool_size.max(1);
        let mut pool = Self {
            workers: Vec::with_capacity(worker_count),
            queue: Arc::new(WorkerQueue::new()),
            worker_count,
            status: None,
        };

        // On error the partially built pool is dropped, which shuts down
        // the workers spawned so far.
        for id in 0..worker_count {
            let worker = Worker::spawn(
                id,
                format!("{}-{}", config.thread_name_prefix, id),
                Arc::clone(&pool.queue),
            )?;
            pool.workers.push(worker);
        }

        tracing::debug!("Worker pool started with {} workers", worker_count);
        Ok(pool)
    }

    /// Queue `work` for any idle worker
    ///
    /// A panic inside `work` is caught on the worker and delivered to the
    /// returned handle as [`TaskError::Panicked`]; the worker carries on.
    pub fn submit<F, R>(&self, work: F) -> Result<TaskHandle<R>, SchedulerError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, handle) = completion();
        let id = handle.id();

        let job: Job = Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(work)).map_err(|payload| {
                let err = TaskError::from_panic(payload);
                tracing::warn!("Task {} failed: {}", id, err);
                err
            });
            // The submitter may have stopped waiting
            let _ = tx.send(outcome);
        });

        self.queue.push(job)?;
        Ok(handle)
    }

    /// Get worker count
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Get queued (not yet started) job count
    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// Get running job count
    pub fn active_tasks(&self) -> usize {
        self.queue.running()
    }

    /// Check if pool is idle
    pub fn is_idle(&self) -> bool {
        self.pending_tasks() == 0 && self.active_tasks() == 0
    }

    /// Check whether shutdown has run
    pub fn is_shut_down(&self) -> bool {
        self.status.is_some()
    }

    /// Stop accepting work and drain the pool
    ///
    /// Queued and running jobs get up to `timeout` to finish. Past that,
    /// queued jobs are dropped (their handles resolve to
    /// [`TaskError::Cancelled`]) and workers still inside a job are
    /// detached. A pool with nothing queued or running always shuts down
    /// clean, even with a zero timeout. Only the
    /// first call does any work; later calls return its status.
    pub fn shutdown(&mut self, timeout: Duration) -> ShutdownStatus {
        if let Some(status) = self.status {
            return status;
        }

        tracing::debug!(
            "Shutting down worker pool ({} queued, {} running)",
            self.pending_tasks(),
            self.active_tasks()
        );
        self.queue.close();

        let deadline = Instant::now().checked_add(timeout);
        // Past the deadline with nothing queued or running, the remaining
        // workers are idle and already leaving the closed queue.
        let drained = self.queue.wait_for_exit(deadline) || self.queue.is_drained();
        let status = if drained {
            self.queue.wait_for_exit(None);
            for worker in &mut self.workers {
                worker.join();
            }
            ShutdownStatus::Clean
        } else {
            let cancelled_tasks = self.queue.cancel();
            let abandoned_workers = self.queue.wait_for_idle_exit();
            for worker in &mut self.workers {
                if worker.is_finished() {
                    worker.join();
                } else {
                    worker.detach();
                }
            }
            tracing::warn!(
                "Worker pool shutdown timed out after {:?}: {} tasks cancelled, {} workers abandoned",
                timeout,
                cancelled_tasks,
                abandoned_workers
            );
            ShutdownStatus::Degraded {
                cancelled_tasks,
                abandoned_workers,
            }
        };

        self.status = Some(status);
        status
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}
