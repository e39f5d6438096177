//! Parallel Merge Sort
//!
//! Top-level split across a worker pool. A range at or above the parallel
//! threshold is cut in two, each half is dispatched as a [`SortTask`] and
//! sorted sequentially on a worker, and the caller merges once both halves
//! have joined. Dispatched tasks never submit further work, so no worker
//! ever blocks on the pool it runs in, whatever the pool size.
//!
//! A task owns a copy of its half for its whole lifetime and hands it back
//! through its handle. The two returned halves are the merge's temporary
//! runs, and a task that hangs or is abandoned never writes into the
//! caller's buffer.

use std::time::{Duration, Instant};

use psort_scheduler::{Executor, ShutdownStatus, TaskHandle, WorkerPool};

use crate::config::SortConfig;
use crate::error::{SortError, Span};
use crate::merge::merge_into;
use crate::sequential::{sequential_sort, sequential_sort_all};

/// Sort `buffer` ascending with the default configuration
pub fn sort<T>(buffer: &mut [T]) -> Result<(), SortError>
where
    T: Ord + Clone + Send + 'static,
{
    sort_with_config(buffer, &SortConfig::default())
}

/// Sort `buffer` ascending on a pool built from `config`
pub fn sort_with_config<T>(buffer: &mut [T], config: &SortConfig) -> Result<(), SortError>
where
    T: Ord + Clone + Send + 'static,
{
    config.validate()?;
    let pool = WorkerPool::with_config(&config.pool_config()).map_err(SortError::Pool)?;
    sort_with_executor(buffer, pool, config)
}

/// Sort `buffer` ascending, dispatching through `executor`
///
/// The executor is shut down exactly once before this returns, on success,
/// on failure, and while unwinding. A shutdown that cannot drain within
/// `config.shutdown_timeout` is reported as [`SortError::DegradedShutdown`]
/// even if the sort itself succeeded.
pub fn sort_with_executor<T, E>(
    buffer: &mut [T],
    executor: E,
    config: &SortConfig,
) -> Result<(), SortError>
where
    T: Ord + Clone + Send + 'static,
    E: Executor,
{
    let mut session = Session::new(executor, config.shutdown_timeout);
    config.validate()?;

    let started = Instant::now();
    let outcome = sort_range(&session.executor, buffer, config);

    match session.finish() {
        ShutdownStatus::Clean => {
            outcome?;
            tracing::info!("Sorted {} elements in {:?}", buffer.len(), started.elapsed());
            Ok(())
        }
        ShutdownStatus::Degraded {
            cancelled_tasks,
            abandoned_workers,
        } => Err(SortError::DegradedShutdown {
            cancelled_tasks,
            abandoned_workers,
            cause: outcome.err().map(Box::new),
        }),
    }
}

/// Owns the executor for one sort session
struct Session<E: Executor> {
    executor: E,
    timeout: Duration,
    status: Option<ShutdownStatus>,
}

impl<E: Executor> Session<E> {
    fn new(executor: E, timeout: Duration) -> Self {
        Self {
            executor,
            timeout,
            status: None,
        }
    }

    fn finish(&mut self) -> ShutdownStatus {
        if let Some(status) = self.status {
            return status;
        }
        let status = self.executor.shutdown(self.timeout);
        self.status = Some(status);
        status
    }
}

impl<E: Executor> Drop for Session<E> {
    fn drop(&mut self) {
        self.finish();
    }
}

/// One half of the buffer, sorted sequentially on a worker
struct SortTask<T> {
    span: Span,
    items: Vec<T>,
}

impl<T: Ord + Clone> SortTask<T> {
    fn new(span: Span, items: Vec<T>) -> Self {
        Self { span, items }
    }

    fn run(mut self) -> Vec<T> {
        sequential_sort_all(&mut self.items);
        self.items
    }
}

/// A dispatched task awaiting its join
struct Pending<T> {
    span: Span,
    handle: TaskHandle<Vec<T>>,
}

impl<T> Pending<T> {
    fn join(self, timeout: Duration) -> Result<Vec<T>, SortError> {
        let span = self.span;
        self.handle
            .wait_timeout(timeout)
            .map_err(|source| SortError::Task { span, source })
    }
}

fn dispatch<T, E>(executor: &E, task: SortTask<T>) -> Result<Pending<T>, SortError>
where
    T: Ord + Clone + Send + 'static,
    E: Executor,
{
    let span = task.span;
    let handle = executor
        .submit(move || task.run())
        .map_err(|source| SortError::Dispatch { span, source })?;
    Ok(Pending { span, handle })
}

fn sort_range<T, E>(executor: &E, buffer: &mut [T], config: &SortConfig) -> Result<(), SortError>
where
    T: Ord + Clone + Send + 'static,
    E: Executor,
{
    let len = buffer.len();
    if len <= 1 {
        return Ok(());
    }

    let (left, right) = (0, len - 1);
    let mid = left + (right - left) / 2;

    if len < config.parallel_threshold {
        executor.call(|| sequential_sort(buffer, left, right));
        return Ok(());
    }

    let lower = Span::new(left, mid);
    let upper = Span::new(mid + 1, right);
    tracing::debug!("Dispatching {} and {}", lower, upper);

    let lower = dispatch(executor, SortTask::new(lower, buffer[..=mid].to_vec()))?;
    let upper = dispatch(executor, SortTask::new(upper, buffer[mid + 1..].to_vec()))?;

    // Join barrier: nothing is written back until both halves are sorted
    let lower = lower.join(config.shutdown_timeout)?;
    let upper = upper.join(config.shutdown_timeout)?;

    merge_into(buffer, &lower, &upper);
    Ok(())
}
