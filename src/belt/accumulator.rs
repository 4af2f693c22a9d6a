//! Monte-Carlo belt construction.
//!
//! For every grid point `i` of the domain we simulate `experiments_per_point`
//! experiments at `true = grid_value(i)` and record each experiment's estimate
//! in row `i` of the [`BeltTable`].
//!
//! Work is `O(bins × experiments × measurements)`. Rows are independent, so
//! [`BeltAccumulator::build_parallel`] runs them on rayon workers, each with
//! its own PRNG stream seeded from a master sampler.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::belt::table::{BeltTable, RowCounts};
use crate::data::{EstimatorModel, RandomSampler};
use crate::domain::{ModeSpec, OutOfRangePolicy, ParameterDomain};
use crate::error::BeltError;

#[derive(Debug, Clone)]
pub struct BeltAccumulator {
    domain: ParameterDomain,
    estimator: EstimatorModel,
    experiments_per_point: usize,
    policy: OutOfRangePolicy,
}

impl BeltAccumulator {
    pub fn new(
        spec: &ModeSpec,
        experiments_per_point: usize,
        n_measurements: usize,
        policy: OutOfRangePolicy,
    ) -> Result<Self, BeltError> {
        spec.validate()?;
        if experiments_per_point == 0 {
            return Err(BeltError::invalid("experiments per grid point must be >= 1"));
        }
        let estimator = EstimatorModel::new(spec.distribution, n_measurements)?;
        Ok(Self {
            domain: spec.domain,
            estimator,
            experiments_per_point,
            policy,
        })
    }

    pub fn domain(&self) -> &ParameterDomain {
        &self.domain
    }

    pub fn estimator(&self) -> &EstimatorModel {
        &self.estimator
    }

    /// Build the belt from a single PRNG stream, one row after another.
    pub fn build(&self, sampler: &mut RandomSampler) -> Result<BeltTable, BeltError> {
        info!(
            bins = self.domain.bins(),
            experiments = self.experiments_per_point,
            measurements = self.estimator.n_measurements(),
            "building belt (sequential)"
        );
        let rows: Vec<RowCounts> = (0..self.domain.bins())
            .map(|i| self.simulate_row(i, sampler))
            .collect();
        self.assemble(rows)
    }

    /// Build the belt with one independent PRNG stream per grid row.
    ///
    /// Row seeds are drawn from `master` in grid order, so a seeded master gives
    /// the same table regardless of how rayon schedules the rows.
    pub fn build_parallel(&self, master: &mut RandomSampler) -> Result<BeltTable, BeltError> {
        info!(
            bins = self.domain.bins(),
            experiments = self.experiments_per_point,
            measurements = self.estimator.n_measurements(),
            "building belt (parallel)"
        );
        let seeds: Vec<u64> = (0..self.domain.bins()).map(|_| master.next_seed()).collect();
        let rows: Vec<RowCounts> = seeds
            .par_iter()
            .enumerate()
            .map(|(i, &seed)| {
                let mut sampler = RandomSampler::from_seed(seed);
                self.simulate_row(i, &mut sampler)
            })
            .collect();
        self.assemble(rows)
    }

    fn simulate_row(&self, i: usize, sampler: &mut RandomSampler) -> RowCounts {
        let axis = self.domain.axis();
        let true_parameter = self.domain.grid_value(i);
        let mut row = RowCounts::new(self.domain.bins());
        for _ in 0..self.experiments_per_point {
            let estimate = self.estimator.estimate(sampler, true_parameter);
            row.record(&axis, self.policy, estimate);
        }
        debug!(
            row = i,
            true_parameter,
            underflow = row.underflow,
            overflow = row.overflow,
            "belt row done"
        );
        row
    }

    fn assemble(&self, rows: Vec<RowCounts>) -> Result<BeltTable, BeltError> {
        let table = BeltTable::from_rows(self.domain, self.policy, self.experiments_per_point as u64, rows)?;
        info!(
            in_range = table.total_in_range(),
            dropped = table.total_dropped(),
            "belt complete"
        );
        Ok(table)
    }
}
