//! Vertical slices of the belt.
//!
//! Reading the belt's column at a fixed measured value and normalizing it gives
//! a distribution over the true parameter. This is only a posterior under an
//! implicitly flat prior over the scanned grid; the slice is reported as-is.

use serde::Serialize;
use tracing::warn;

use crate::belt::table::BeltTable;
use crate::domain::ParameterDomain;
use crate::error::BeltError;
use crate::math::{BinLookup, weighted_mean, weighted_std_dev};

/// Normalized column of a [`BeltTable`], one entry per true-parameter bin.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceDistribution {
    domain: ParameterDomain,
    observed_value: f64,
    estimate_bin: usize,
    source_total: u64,
    probabilities: Vec<f64>,
}

/// Central interval read off a slice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliceInterval {
    pub confidence_level: f64,
    pub lower: f64,
    pub upper: f64,
    /// Probability mass actually enclosed (bins are discrete, so this is >= `confidence_level`).
    pub coverage: f64,
}

/// Extract and normalize the column of `table` that contains `observed_value`.
///
/// Fails with [`BeltError::DegenerateSlice`] when the value is off the axis or
/// no simulated experiment ever produced an estimate in its bin.
pub fn extract_slice(table: &BeltTable, observed_value: f64) -> Result<SliceDistribution, BeltError> {
    let axis = table.axis();
    let estimate_bin = match axis.find_bin(observed_value) {
        BinLookup::Bin(j) => j,
        BinLookup::Underflow | BinLookup::Overflow => {
            return Err(BeltError::DegenerateSlice {
                observed: observed_value,
                reason: format!(
                    "outside the simulated estimate range [{:.4}, {:.4})",
                    axis.min(),
                    axis.max()
                ),
            });
        }
    };

    let column = table.column(estimate_bin);
    let source_total: u64 = column.iter().sum();
    if source_total == 0 {
        warn!(observed_value, estimate_bin, "slice column is empty");
        return Err(BeltError::DegenerateSlice {
            observed: observed_value,
            reason: format!("no simulated experiment produced an estimate in bin {estimate_bin}"),
        });
    }

    let norm = source_total as f64;
    let probabilities = column.iter().map(|&c| c as f64 / norm).collect();

    Ok(SliceDistribution {
        domain: *table.domain(),
        observed_value,
        estimate_bin,
        source_total,
        probabilities,
    })
}

impl SliceDistribution {
    /// Grid the probabilities are indexed by.
    pub fn domain(&self) -> &ParameterDomain {
        &self.domain
    }

    pub fn observed_value(&self) -> f64 {
        self.observed_value
    }

    pub fn estimate_bin(&self) -> usize {
        self.estimate_bin
    }

    /// Raw count of the column before normalization.
    pub fn source_total(&self) -> u64 {
        self.source_total
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// True-parameter value of bin `i`.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.domain.grid_value(i)
    }

    pub fn centers(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.bin_center(i)).collect()
    }

    /// Bin with the largest mass; ties go to the lowest index.
    pub fn mode_index(&self) -> usize {
        let mut best = 0;
        for (i, &p) in self.probabilities.iter().enumerate() {
            if p > self.probabilities[best] {
                best = i;
            }
        }
        best
    }

    pub fn mean(&self) -> f64 {
        weighted_mean(&self.centers(), &self.probabilities).unwrap_or(f64::NAN)
    }

    pub fn std_dev(&self) -> f64 {
        weighted_std_dev(&self.centers(), &self.probabilities).unwrap_or(f64::NAN)
    }

    /// Central interval leaving at most `(1 - cl) / 2` of the mass in each tail.
    pub fn central_interval(&self, confidence_level: f64) -> Result<SliceInterval, BeltError> {
        if !(confidence_level > 0.0 && confidence_level < 1.0) {
            return Err(BeltError::invalid(format!(
                "confidence level must be in (0, 1), got {confidence_level}"
            )));
        }
        let tail = (1.0 - confidence_level) / 2.0;

        let mut acc = 0.0;
        let mut lo = 0;
        for (i, &p) in self.probabilities.iter().enumerate() {
            acc += p;
            if acc > tail {
                lo = i;
                break;
            }
        }

        acc = 0.0;
        let mut hi = self.len() - 1;
        for (i, &p) in self.probabilities.iter().enumerate().rev() {
            acc += p;
            if acc > tail {
                hi = i;
                break;
            }
        }

        let coverage = self.probabilities[lo..=hi].iter().sum();
        Ok(SliceInterval {
            confidence_level,
            lower: self.bin_center(lo),
            upper: self.bin_center(hi),
            coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::belt::accumulator::BeltAccumulator;
    use crate::belt::table::RowCounts;
    use crate::data::RandomSampler;
    use crate::domain::{ExperimentMode, OutOfRangePolicy};
    use proptest::prelude::*;

    fn hand_table() -> BeltTable {
        let domain = ParameterDomain::new(0, 3, 1.0).unwrap();
        let rows = [[2, 1, 0, 0], [1, 2, 0, 0], [0, 1, 0, 0], [0, 0, 0, 1]]
            .into_iter()
            .map(|c| RowCounts {
                counts: c.to_vec(),
                underflow: 0,
                overflow: 0,
            })
            .collect();
        BeltTable::from_rows(domain, OutOfRangePolicy::Drop, 3, rows).unwrap()
    }

    #[test]
    fn slice_normalizes_the_column() {
        let slice = extract_slice(&hand_table(), 1.2).unwrap();
        assert_eq!(slice.estimate_bin(), 1);
        assert_eq!(slice.source_total(), 4);
        assert_eq!(slice.probabilities(), &[0.25, 0.5, 0.25, 0.0]);
        assert_eq!(slice.mode_index(), 1);
        assert!((slice.mean() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_column_is_degenerate() {
        let err = extract_slice(&hand_table(), 2.0).unwrap_err();
        assert!(matches!(err, BeltError::DegenerateSlice { observed, .. } if observed == 2.0));
    }

    #[test]
    fn off_axis_value_is_degenerate() {
        assert!(matches!(
            extract_slice(&hand_table(), 50.0),
            Err(BeltError::DegenerateSlice { .. })
        ));
        assert!(matches!(
            extract_slice(&hand_table(), -0.6),
            Err(BeltError::DegenerateSlice { .. })
        ));
    }

    #[test]
    fn central_interval_trims_tails() {
        let slice = extract_slice(&hand_table(), 1.0).unwrap();
        let wide = slice.central_interval(0.9).unwrap();
        assert_eq!((wide.lower, wide.upper), (0.0, 2.0));
        assert!((wide.coverage - 1.0).abs() < 1e-12);

        let narrow = slice.central_interval(0.4).unwrap();
        assert_eq!((narrow.lower, narrow.upper), (1.0, 1.0));
        assert!((narrow.coverage - 0.5).abs() < 1e-12);

        assert!(slice.central_interval(1.0).is_err());
    }

    #[test]
    fn gaussian_slice_at_zero_is_symmetric_and_peaked() {
        let domain = ParameterDomain::new(-10, 10, 1.0).unwrap();
        let spec = ExperimentMode::MeanEstimation.spec().with_domain(domain).unwrap();
        let acc = BeltAccumulator::new(&spec, 1_000, 1, OutOfRangePolicy::Drop).unwrap();
        let table = acc.build(&mut RandomSampler::from_seed(2024)).unwrap();

        let slice = extract_slice(&table, 0.0).unwrap();
        let p = slice.probabilities();
        assert_eq!(slice.len(), 21);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);

        let mode = slice.mode_index();
        assert!((9..=11).contains(&mode), "mode bin {mode}");
        assert!(p[mode] > 0.05 && p[mode] < 0.30, "mode mass {}", p[mode]);

        for k in 1..=6 {
            assert!((p[10 - k] - p[10 + k]).abs() < 0.05, "asymmetric at offset {k}");
        }
        assert!(slice.mean().abs() < 0.3, "mean {}", slice.mean());
        // Far tails carry almost nothing.
        assert!(p[0] < 0.01 && p[20] < 0.01);
    }

    proptest! {
        #[test]
        fn supported_slices_sum_to_one(observed in -10.5f64..10.5, seed in 0u64..1_000) {
            let domain = ParameterDomain::new(-10, 10, 1.0).unwrap();
            let spec = ExperimentMode::MeanEstimation.spec().with_domain(domain).unwrap();
            let acc = BeltAccumulator::new(&spec, 20, 1, OutOfRangePolicy::Drop).unwrap();
            let table = acc.build(&mut RandomSampler::from_seed(seed)).unwrap();

            match extract_slice(&table, observed) {
                Ok(slice) => {
                    prop_assert!(slice.probabilities().iter().all(|&p| p >= 0.0));
                    let sum: f64 = slice.probabilities().iter().sum();
                    prop_assert!((sum - 1.0).abs() < 1e-9);
                }
                Err(BeltError::DegenerateSlice { .. }) => {
                    let bin = table.axis().find_bin(observed).index().unwrap();
                    prop_assert!(table.column(bin).iter().all(|&c| c == 0));
                }
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
        }
    }
}
