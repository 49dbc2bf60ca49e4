//! Random draws used by grid creation and the update rule
//!
//! All randomness flows through [`RandomSource`] so the rule can be driven
//! by a seeded ChaCha stream in production and by fixed draws in tests.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::error::{Result, TideError};

/// Source of uniform draws
pub trait RandomSource {
    /// Uniform integer in `[0, n)`. Callers guarantee `n > 0`.
    fn below(&mut self, n: usize) -> usize;

    /// Uniform float in `[0, 1)`
    fn unit(&mut self) -> f64;

    /// Uniformly permute `values` in place (Fisher-Yates)
    fn shuffle(&mut self, values: &mut [usize]) {
        for i in (1..values.len()).rev() {
            let j = self.below(i + 1);
            values.swap(i, j);
        }
    }
}

/// Seeded production RNG
#[derive(Debug, Clone)]
pub struct SimRng {
    inner: ChaCha8Rng,
}

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }
}

impl RandomSource for SimRng {
    fn below(&mut self, n: usize) -> usize {
        self.inner.gen_range(0..n)
    }

    fn unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    fn shuffle(&mut self, values: &mut [usize]) {
        values.shuffle(&mut self.inner);
    }
}

/// Uniform integer in `[0, n)`
pub fn uniform_int(rng: &mut impl RandomSource, n: usize) -> Result<usize> {
    if n == 0 {
        return Err(TideError::domain("uniform_int requires a non-empty range"));
    }
    Ok(rng.below(n))
}

/// Uniform float in `[0, total)`
pub fn uniform_float(rng: &mut impl RandomSource, total: f64) -> Result<f64> {
    if !(total > 0.0) || !total.is_finite() {
        return Err(TideError::domain(format!(
            "uniform_float requires a positive finite bound, got {}",
            total
        )));
    }
    Ok(rng.unit() * total)
}

/// Weighted trial: one draw in `[0, total)`, true when it lands at or
/// below `success`.
///
/// `success` may exceed `total` (always true) or be zero (true only on an
/// exact zero draw).
pub fn chance(rng: &mut impl RandomSource, success: f64, total: f64) -> Result<bool> {
    let draw = uniform_float(rng, total)?;
    Ok(draw <= success)
}

/// Uniformly chosen element of `items`
pub fn random_element<'a, T>(rng: &mut impl RandomSource, items: &'a [T]) -> Result<&'a T> {
    if items.is_empty() {
        return Err(TideError::domain("cannot choose from an empty sequence"));
    }
    Ok(&items[rng.below(items.len())])
}

/// Uniformly random permutation of `0..n`
pub fn shuffled_indices(rng: &mut impl RandomSource, n: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    rng.shuffle(&mut indices);
    indices
}

/// Deterministic sources for exercising the rule
#[cfg(test)]
pub(crate) mod testing {
    use super::RandomSource;

    /// Replays fixed draws: `unit()` always returns `unit`, `below(n)`
    /// returns `pick.min(n - 1)`.
    #[derive(Debug, Clone)]
    pub struct FixedRandom {
        pub unit: f64,
        pub pick: usize,
    }

    impl FixedRandom {
        pub fn new(unit: f64, pick: usize) -> Self {
            Self { unit, pick }
        }
    }

    impl RandomSource for FixedRandom {
        fn below(&mut self, n: usize) -> usize {
            self.pick.min(n - 1)
        }

        fn unit(&mut self) -> f64 {
            self.unit
        }
    }

    /// Replays a scripted list of unit draws, cycling when exhausted
    #[derive(Debug, Clone)]
    pub struct ScriptedRandom {
        units: Vec<f64>,
        cursor: usize,
    }

    impl ScriptedRandom {
        pub fn new(units: Vec<f64>) -> Self {
            Self { units, cursor: 0 }
        }
    }

    impl RandomSource for ScriptedRandom {
        fn below(&mut self, n: usize) -> usize {
            ((self.unit() * n as f64) as usize).min(n - 1)
        }

        fn unit(&mut self) -> f64 {
            let value = self.units[self.cursor % self.units.len()];
            self.cursor += 1;
            value
        }
    }
}
