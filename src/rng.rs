//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct is the single source of randomness for
//! parent selection. It wraps the `rand` crate's `StdRng` so that a run can be
//! reproduced from the `seed` entry of the local parameter file.
//!
//! ## Example
//!
//! ```rust
//! use femo::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(42);
//! let index = rng.pick_index(5).unwrap();
//! assert!(index < 5);
//! ```

use rand::{rngs::StdRng, Rng, SeedableRng};

/// A wrapper around the `rand` crate's `StdRng` used for uniform tie-breaking.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance seeded from the system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// The selector seeds its generator this way from the local parameter
    /// file, which keeps whole runs reproducible.
    ///
    /// # Arguments
    ///
    /// * `seed` - The seed to use for the random number generator.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Picks an index uniformly from `0..len`.
    ///
    /// Returns `None` when `len` is zero.
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.rng.gen_range(0..len))
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}
