//! Example: sequential vs parallel merge sort
//!
//! ```text
//! RUST_LOG=debug cargo run --release -p psort-engine --example basic -- 1000000
//! ```

use std::time::Instant;

use anyhow::{Context, ensure};
use psort_engine::{SortConfig, sequential_sort_all, sort_with_config};
use tracing_subscriber::EnvFilter;

/// XorShift generator for reproducible input
struct XorShift {
    state: u64,
}

impl XorShift {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let len: usize = match std::env::args().nth(1) {
        Some(arg) => arg.parse().context("element count must be a non-negative integer")?,
        None => 100_000,
    };

    let mut rng = XorShift::new(0x5EED);
    let input: Vec<i64> = (0..len).map(|_| (rng.next() % 1_000_000) as i64).collect();

    let mut sequential = input.clone();
    let started = Instant::now();
    sequential_sort_all(&mut sequential);
    let sequential_time = started.elapsed();

    let config = SortConfig::default();
    let mut parallel = input;
    let started = Instant::now();
    sort_with_config(&mut parallel, &config)?;
    let parallel_time = started.elapsed();

    ensure!(parallel == sequential, "parallel and sequential output differ");

    tracing::info!(
        "{} elements, {} workers, threshold {}",
        len,
        config.pool_size,
        config.parallel_threshold
    );
    tracing::info!("sequential: {:?}", sequential_time);
    tracing::info!("parallel:   {:?}", parallel_time);

    Ok(())
}
