//! psort Engine
//!
//! Stable, in-place merge sort whose top split runs on a fixed worker pool.
//!
//! # Overview
//! - [`sort`] / [`sort_with_config`]: parallel entry points; the pool is
//!   created per call and always shut down before returning
//! - [`sort_with_executor`]: same, over any [`scheduler::Executor`]
//! - [`sequential_sort`]: single-threaded baseline over an inclusive range
//!
//! Ranges shorter than [`SortConfig::parallel_threshold`] are sorted on
//! the calling thread. Longer ranges are split once; each half is sorted
//! sequentially on a worker and the two are merged after both join.
//!
//! # Example
//! ```rust
//! use psort_engine::{SortConfig, sort_with_config};
//!
//! let mut data = vec![5i64, 3, 8, 3, 1];
//! let config = SortConfig::default().with_parallel_threshold(1).with_pool_size(2);
//! sort_with_config(&mut data, &config)?;
//! assert_eq!(data, vec![1, 3, 3, 5, 8]);
//! # Ok::<(), psort_engine::SortError>(())
//! ```

mod config;
mod error;
mod merge;
mod parallel;
mod sequential;

pub use config::{DEFAULT_PARALLEL_THRESHOLD, SortConfig};
pub use error::{ConfigError, SortError, Span};
pub use merge::merge;
pub use parallel::{sort, sort_with_config, sort_with_executor};
pub use sequential::{sequential_sort, sequential_sort_all};

pub use psort_scheduler as scheduler;
