//! Rayon thread pool configuration for batch runs.

use crate::core::error::CombatError;
use rayon::ThreadPoolBuilder;

/// How many worker threads a parallel batch uses.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    /// If 0, use the global rayon pool (all cores).
    pub workers: usize,
}

impl WorkerPool {
    pub fn with_workers(workers: usize) -> Self {
        Self { workers }
    }

    /// Runs `f` on a pool with this worker count.
    pub fn install<F, R>(&self, f: F) -> Result<R, CombatError>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return Ok(f());
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| CombatError::Config(format!("worker pool: {e}")))?;
        Ok(pool.install(f))
    }
}
