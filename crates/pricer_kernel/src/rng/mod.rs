//! Random number generation for Monte Carlo simulation.
//!
//! [`PricerRng`] wraps `rand::rngs::StdRng` directly (not `Box<dyn Rng>`) to
//! keep path generation free of vtable indirection. Variate generation uses
//! fixed-size `for` loops over pre-allocated buffers rather than dynamically
//! terminated loops, for the same reason.
//!
//! Quasi-Monte Carlo sequences are represented by the [`LowDiscrepancySequence`]
//! trait; only a placeholder implementation ([`SobolPlaceholder`]) exists so
//! far, deliberately panicking on construction until a real digital-net
//! generator lands.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Pseudo-random number generator used throughout the Monte Carlo kernel.
///
/// Wraps a seeded `StdRng` (ChaCha-based PRNG) for reproducible path
/// generation. Does not depend on `pricer_core`: this module is usable in
/// isolation by any crate that wants deterministic variates.
pub struct PricerRng {
    rng: StdRng,
    seed: u64,
}

impl PricerRng {
    /// Creates a generator seeded deterministically from `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Returns the seed this generator was constructed with.
    ///
    /// Note this is the *original* seed, not the current internal state;
    /// re-seeding with this value reproduces the same draw sequence from
    /// scratch.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws a single uniform variate in `[0, 1)`.
    #[inline]
    pub fn gen_uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Draws a single standard-normal variate.
    #[inline]
    pub fn gen_normal(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }

    /// Fills `buffer` with independent uniform variates in `[0, 1)`.
    pub fn fill_uniform(&mut self, buffer: &mut [f64]) {
        for slot in buffer.iter_mut() {
            *slot = self.rng.gen::<f64>();
        }
    }

    /// Fills `buffer` with independent standard-normal variates.
    pub fn fill_normal(&mut self, buffer: &mut [f64]) {
        for slot in buffer.iter_mut() {
            *slot = self.rng.sample(StandardNormal);
        }
    }
}

/// A low-discrepancy (quasi-random) sequence generator.
///
/// Distinct from [`PricerRng`]: implementors produce deterministic,
/// well-distributed point sets rather than statistically random draws.
pub trait LowDiscrepancySequence {
    /// Returns the dimensionality of each generated point.
    fn dimension(&self) -> usize;

    /// Fills `point` (of length [`LowDiscrepancySequence::dimension`]) with
    /// the next point in the sequence.
    fn next_point(&mut self, point: &mut [f64]);
}

/// Placeholder Sobol-sequence generator.
///
/// Construction always panics; this type exists to reserve the API surface
/// for a real digital-net implementation.
pub struct SobolPlaceholder {
    dimension: usize,
}

impl SobolPlaceholder {
    /// Always panics: Sobol sequence generation is not yet implemented.
    pub fn new(dimension: usize) -> Self {
        let _ = dimension;
        panic!("Sobol sequence not implemented in Phase 3.1a");
    }
}

impl LowDiscrepancySequence for SobolPlaceholder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn next_point(&mut self, _point: &mut [f64]) {
        unimplemented!("Sobol sequence not implemented in Phase 3.1a")
    }
}
