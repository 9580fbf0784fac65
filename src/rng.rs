//! Seeded random sources for field synthesis.
//!
//! The sampler reads standard-normal deviates through the [`NormalSource`]
//! trait, so tests can substitute a fixed sequence and batches can hand each
//! skewer its own stream. [`SkewerRng`] is the production source: ChaCha20
//! seeded from a `u64`, with independent streams forked from the same seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::StandardNormal;

/// A source of independent standard-normal deviates.
pub trait NormalSource {
    /// Next deviate.
    fn standard_normal(&mut self) -> f64;

    /// Fill `out` with consecutive deviates.
    fn fill_standard_normal(&mut self, out: &mut [f64]) {
        for value in out.iter_mut() {
            *value = self.standard_normal();
        }
    }
}

impl<S: NormalSource + ?Sized> NormalSource for &mut S {
    fn standard_normal(&mut self) -> f64 {
        (**self).standard_normal()
    }

    fn fill_standard_normal(&mut self, out: &mut [f64]) {
        (**self).fill_standard_normal(out)
    }
}

/// Deterministic ChaCha20 generator.
///
/// Two instances built from the same seed (and stream) produce the same
/// sequence on every platform. Only statistical equivalence with other
/// generators is guaranteed.
#[derive(Debug, Clone)]
pub struct SkewerRng {
    rng: ChaCha20Rng,
    seed: u64,
}

impl SkewerRng {
    /// Generator seeded from `seed`, on stream 0.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this generator was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Stream this generator draws from.
    pub fn stream(&self) -> u64 {
        self.rng.get_stream()
    }

    /// Independent generator on `stream`, sharing this generator's key.
    ///
    /// The fork starts at the beginning of its stream, independent of how
    /// much has been drawn from `self`.
    pub fn fork(&self, stream: u64) -> Self {
        let mut rng = ChaCha20Rng::from_seed(self.rng.get_seed());
        rng.set_stream(stream);
        Self {
            rng,
            seed: self.seed,
        }
    }
}

impl NormalSource for SkewerRng {
    fn standard_normal(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }
}

/// Deviates replayed from a fixed list, cycling when exhausted.
///
/// Useful for checking the spectral synthesis mode by mode.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<f64>,
    position: usize,
}

impl FixedSequence {
    /// Replay `values` in order; an empty list yields zeros.
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            position: 0,
        }
    }

    /// Number of deviates handed out so far.
    pub fn draws(&self) -> usize {
        self.position
    }
}

impl NormalSource for FixedSequence {
    fn standard_normal(&mut self) -> f64 {
        let value = if self.values.is_empty() {
            0.0
        } else {
            self.values[self.position % self.values.len()]
        };
        self.position += 1;
        value
    }
}
