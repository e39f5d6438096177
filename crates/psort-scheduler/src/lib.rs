//! psort Scheduler
//!
//! A fixed-size pool of worker threads for fork-join style sorting.
//!
//! - Every submitted job gets its own [`TaskHandle`] to join on
//! - Panics inside jobs are caught and handed to the joiner
//! - Shutdown is bounded: outstanding work gets a grace period, then is
//!   cancelled and reported as [`ShutdownStatus::Degraded`]
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use psort_scheduler::WorkerPool;
//!
//! let mut pool = WorkerPool::new(2)?;
//! let handle = pool.submit(|| 40 + 2)?;
//! assert_eq!(handle.wait(), Ok(42));
//! assert!(pool.shutdown(Duration::from_secs(1)).is_clean());
//! # Ok::<(), psort_scheduler::SchedulerError>(())
//! ```

mod config;
mod error;
mod executor;
mod handle;
mod pool;

pub use config::{DEFAULT_SHUTDOWN_TIMEOUT, PoolConfig, available_workers};
pub use error::{SchedulerError, TaskError};
pub use executor::Executor;
pub use handle::TaskHandle;
pub use pool::{ShutdownStatus, WorkerPool};
