//! Parallel processing configuration and management
//!
//! Compile jobs run on a dedicated Rayon pool. The default pool size is kept
//! well below the machine's core count because every job holds its full
//! scenario tables in memory.

use crate::errors::{EhcError, Result};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::info;

/// Upper bound on the default number of worker threads.
pub const MAX_DEFAULT_WORKERS: usize = 16;

/// Configuration for parallel processing
#[derive(Debug, Clone, Default)]
pub struct ParallelConfig {
    pub num_threads: Option<usize>,
}

impl ParallelConfig {
    /// Create a new parallel configuration
    pub fn new(num_threads: Option<usize>) -> Self {
        Self { num_threads }
    }

    /// Create a configuration that uses a specific number of threads
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
        }
    }

    /// Number of workers the pool will get.
    ///
    /// An explicit thread count wins; otherwise `min(16, cores / 2)`, never
    /// less than one.
    pub fn worker_count(&self) -> usize {
        match self.num_threads {
            Some(n) => n.max(1),
            None => default_worker_count(num_cpus::get()),
        }
    }

    /// Build a dedicated thread pool sized by [`ParallelConfig::worker_count`]
    pub fn build_pool(&self) -> Result<ThreadPool> {
        let workers = self.worker_count();
        ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("ehc-worker-{i}"))
            .build()
            .map_err(|e| {
                EhcError::ThreadPoolError(format!(
                    "Failed to initialize thread pool with {} threads: {}",
                    workers, e
                ))
            })
    }

    /// Apply `job` to every item on a dedicated pool, preserving input order.
    ///
    /// The first error aborts the map and is returned.
    pub fn map_jobs<T, R, F>(&self, items: &[T], job: F) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> Result<R> + Sync,
    {
        let pool = self.build_pool()?;
        info!(
            jobs = items.len(),
            workers = pool.current_num_threads(),
            "starting worker pool"
        );
        pool.install(|| items.par_iter().map(&job).collect())
    }
}

/// `min(16, cores / 2)`, at least one.
pub fn default_worker_count(available_cores: usize) -> usize {
    (available_cores / 2).clamp(1, MAX_DEFAULT_WORKERS)
}

/// Get information about the current parallel configuration
pub fn get_parallel_info() -> ParallelInfo {
    ParallelInfo {
        available_cores: num_cpus::get(),
        available_parallelism: std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1),
        default_workers: default_worker_count(num_cpus::get()),
    }
}

/// Information about the parallel processing environment
#[derive(Debug, Clone)]
pub struct ParallelInfo {
    pub available_cores: usize,
    pub available_parallelism: usize,
    pub default_workers: usize,
}

impl ParallelInfo {
    /// Log parallel processing information
    pub fn log_info(&self) {
        info!(
            available_cores = self.available_cores,
            available_parallelism = self.available_parallelism,
            default_workers = self.default_workers,
            "parallel processing environment"
        );
    }
}
