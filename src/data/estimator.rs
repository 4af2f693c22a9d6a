//! Point estimate of one simulated experiment.

use crate::data::sampler::RandomSampler;
use crate::domain::DistributionKind;
use crate::error::BeltError;

/// Draws `n_measurements` values and averages them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorModel {
    distribution: DistributionKind,
    n_measurements: usize,
}

impl EstimatorModel {
    pub fn new(distribution: DistributionKind, n_measurements: usize) -> Result<Self, BeltError> {
        if n_measurements == 0 {
            return Err(BeltError::invalid("measurements per experiment must be >= 1"));
        }
        distribution.validate()?;
        Ok(Self {
            distribution,
            n_measurements,
        })
    }

    pub fn distribution(&self) -> DistributionKind {
        self.distribution
    }

    pub fn n_measurements(&self) -> usize {
        self.n_measurements
    }

    /// Arithmetic mean of `n_measurements` independent draws at `true_parameter`.
    pub fn estimate(&self, sampler: &mut RandomSampler, true_parameter: f64) -> f64 {
        let sum: f64 = (0..self.n_measurements)
            .map(|_| sampler.sample(self.distribution, true_parameter))
            .sum();
        sum / self.n_measurements as f64
    }
}
