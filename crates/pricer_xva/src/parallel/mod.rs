//! Rayon-based parallelisation utilities.
//!
//! Generic batch helpers shared by the valuation driver (scenario loop over
//! Monte Carlo samples) and the exposure/XVA aggregation steps.

use rayon::prelude::*;

/// Batch size for parallel processing.
///
/// Empirically tuned for cache efficiency.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Processes items in parallel batches.
pub fn process_in_batches<T, R, F>(items: &[T], batch_size: usize, processor: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&[T]) -> R + Sync + Send,
{
    items.par_chunks(batch_size.max(1)).map(processor).collect()
}

/// Parallel map with specified batch size.
pub fn parallel_map<T, R, F>(items: &[T], mapper: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    items.par_iter().map(mapper).collect()
}

/// Parallel reduce over items.
pub fn parallel_reduce<T, R, M, Red>(items: &[T], identity: R, mapper: M, reducer: Red) -> R
where
    T: Sync,
    R: Send + Sync + Copy,
    M: Fn(&T) -> R + Sync + Send,
    Red: Fn(R, R) -> R + Sync + Send,
{
    items.par_iter().map(mapper).reduce(|| identity, reducer)
}

/// Parallel sum of values.
pub fn parallel_sum<T, F>(items: &[T], extractor: F) -> f64
where
    T: Sync,
    F: Fn(&T) -> f64 + Sync + Send,
{
    items.par_iter().map(extractor).sum()
}

/// Configuration for parallel execution.
#[derive(Clone, Debug)]
pub struct ParallelConfig {
    /// Batch size for chunked processing
    pub batch_size: usize,
    /// Minimum items before using parallelism
    pub parallel_threshold: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            parallel_threshold: 100,
        }
    }
}

impl ParallelConfig {
    /// Creates a new parallel configuration.
    pub fn new(batch_size: usize, parallel_threshold: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            parallel_threshold,
        }
    }

    /// Returns whether to use parallel processing for the given item count.
    #[inline]
    pub fn should_parallelize(&self, n_items: usize) -> bool {
        n_items >= self.parallel_threshold
    }
}
