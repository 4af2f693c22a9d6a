//! Pseudo-random draws for simulated measurements.
//!
//! A [`RandomSampler`] owns its PRNG stream. It is passed explicitly to whoever
//! needs draws, so parallel workers each hold their own sampler instead of
//! sharing one stream.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Exp1, StandardNormal};

use crate::domain::DistributionKind;

#[derive(Debug, Clone)]
pub struct RandomSampler {
    rng: StdRng,
}

impl RandomSampler {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from OS entropy (non-reproducible runs).
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Draw one measurement for the given true parameter.
    ///
    /// Distribution parameters are validated when the mode is configured, so
    /// drawing never fails.
    pub fn sample(&mut self, distribution: DistributionKind, true_parameter: f64) -> f64 {
        match distribution {
            DistributionKind::Gaussian { sigma } => {
                let z: f64 = self.rng.sample(StandardNormal);
                true_parameter + sigma * z
            }
            DistributionKind::Exponential => {
                let e: f64 = self.rng.sample(Exp1);
                true_parameter * e
            }
        }
    }

    /// Uniform draw in `[lo, hi)`.
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        self.rng.gen_range(lo..hi)
    }

    /// Raw 64-bit draw, used to derive seeds for independent child streams.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }
}
