//! Shared domain types.
//!
//! Experiment modes are data, not branches: each [`ExperimentMode`] resolves to a
//! row of [`MODE_TABLE`] holding its parameter domain, sampling distribution and
//! axis labels. Adding a parameter type means adding a row.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::BeltError;
use crate::math::LinearAxis;
use crate::minimize::MinimizerKind;

/// Which parameter the simulated experiments estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentMode {
    /// Mean of a Gaussian with fixed spread.
    MeanEstimation,
    /// Mean lifetime of an exponential distribution.
    RateEstimation,
}

impl ExperimentMode {
    pub const ALL: [ExperimentMode; 2] = [ExperimentMode::MeanEstimation, ExperimentMode::RateEstimation];

    pub fn display_name(self) -> &'static str {
        match self {
            ExperimentMode::MeanEstimation => "gaus",
            ExperimentMode::RateEstimation => "exp",
        }
    }

    /// The mode's row of [`MODE_TABLE`].
    pub fn spec(self) -> &'static ModeSpec {
        // The table is indexed in `ALL` order.
        match self {
            ExperimentMode::MeanEstimation => &MODE_TABLE[0],
            ExperimentMode::RateEstimation => &MODE_TABLE[1],
        }
    }
}

/// Distribution each single measurement is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DistributionKind {
    /// `N(true, sigma^2)`.
    Gaussian { sigma: f64 },
    /// Exponential with mean equal to the true parameter.
    Exponential,
}

impl DistributionKind {
    pub fn validate(&self) -> Result<(), BeltError> {
        match *self {
            DistributionKind::Gaussian { sigma } => {
                if !(sigma.is_finite() && sigma > 0.0) {
                    return Err(BeltError::invalid(format!(
                        "Gaussian spread must be finite and > 0, got {sigma}"
                    )));
                }
                Ok(())
            }
            DistributionKind::Exponential => Ok(()),
        }
    }
}

/// True-parameter range and bin pitch: the integer grid `low..=high`, each point
/// divided by `scale`.
///
/// Fields are private so a domain cannot change after construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterDomain {
    low: i64,
    high: i64,
    scale: f64,
}

impl ParameterDomain {
    pub fn new(low: i64, high: i64, scale: f64) -> Result<Self, BeltError> {
        if low > high {
            return Err(BeltError::invalid(format!(
                "domain lower bound {low} exceeds upper bound {high}"
            )));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(BeltError::invalid(format!("domain scale must be finite and > 0, got {scale}")));
        }
        Ok(Self { low, high, scale })
    }

    /// Unchecked constructor for the static mode table.
    const fn fixed(low: i64, high: i64, scale: f64) -> Self {
        Self { low, high, scale }
    }

    pub fn low(&self) -> i64 {
        self.low
    }

    pub fn high(&self) -> i64 {
        self.high
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Number of grid points, equal to the number of bins on each belt axis.
    pub fn bins(&self) -> usize {
        (self.high - self.low).unsigned_abs() as usize + 1
    }

    /// True-parameter value of grid index `k` (`0..bins()`).
    pub fn grid_value(&self, k: usize) -> f64 {
        (self.low + k as i64) as f64 / self.scale
    }

    /// Smallest and largest grid values.
    pub fn value_range(&self) -> (f64, f64) {
        (self.low as f64 / self.scale, self.high as f64 / self.scale)
    }

    /// Axis whose bins are centered on the grid points.
    pub fn axis(&self) -> LinearAxis {
        let half = 0.5 / self.scale;
        let (lo, hi) = self.value_range();
        LinearAxis::new(lo - half, hi + half, self.bins())
    }
}

/// One row of the mode table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeSpec {
    pub mode: ExperimentMode,
    pub domain: ParameterDomain,
    pub distribution: DistributionKind,
    pub true_label: &'static str,
    pub measured_label: &'static str,
    pub slice_label: &'static str,
}

/// Default configuration per experiment mode.
pub const MODE_TABLE: [ModeSpec; 2] = [
    ModeSpec {
        mode: ExperimentMode::MeanEstimation,
        domain: ParameterDomain::fixed(-100, 100, 10.0),
        distribution: DistributionKind::Gaussian { sigma: 2.0 },
        true_label: "mu true",
        measured_label: "mu meas",
        slice_label: "P(mu | mu_meas, sigma)",
    },
    ModeSpec {
        mode: ExperimentMode::RateEstimation,
        domain: ParameterDomain::fixed(1, 100, 100.0),
        distribution: DistributionKind::Exponential,
        true_label: "lambda true",
        measured_label: "lambda meas",
        slice_label: "P(lambda | lambda_meas)",
    },
];

impl ModeSpec {
    /// Copy of this row with a different domain, validated against the distribution.
    pub fn with_domain(&self, domain: ParameterDomain) -> Result<ModeSpec, BeltError> {
        let spec = ModeSpec { domain, ..*self };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), BeltError> {
        self.distribution.validate()?;
        if self.distribution == DistributionKind::Exponential {
            let (lo, _) = self.domain.value_range();
            if lo <= 0.0 {
                return Err(BeltError::invalid(format!(
                    "exponential mode needs a strictly positive domain, lowest grid value is {lo}"
                )));
            }
        }
        Ok(())
    }
}

/// How an estimate outside the axis range is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfRangePolicy {
    /// Count it in the row's underflow/overflow tally, not in any visible bin.
    #[default]
    Drop,
    /// Collapse it into the first or last bin.
    Clip,
}

/// A belt run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct BeltConfig {
    pub mode: ExperimentMode,
    pub n_measurements: usize,
    pub observed_value: f64,
    pub experiments_per_point: usize,
    /// Master seed; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Use one PRNG stream for the whole belt instead of one per grid row.
    pub sequential: bool,
    pub policy: OutOfRangePolicy,
    /// Confidence level for the interval read off the slice.
    pub confidence_level: f64,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub svg: bool,
    pub out_dir: PathBuf,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

impl BeltConfig {
    pub fn validate(&self) -> Result<(), BeltError> {
        if self.n_measurements == 0 {
            return Err(BeltError::invalid("measurements per experiment must be >= 1"));
        }
        if self.experiments_per_point == 0 {
            return Err(BeltError::invalid("experiments per grid point must be >= 1"));
        }
        if !self.observed_value.is_finite() {
            return Err(BeltError::invalid(format!(
                "observed value must be finite, got {}",
                self.observed_value
            )));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(BeltError::invalid(format!(
                "confidence level must be in (0, 1), got {}",
                self.confidence_level
            )));
        }
        self.mode.spec().validate()
    }
}

/// A minimization run's configuration.
#[derive(Debug, Clone)]
pub struct MinimizeConfig {
    pub algorithm: MinimizerKind,
    pub initial_guess: f64,
    pub initial_step: f64,
    pub max_iterations: usize,
    pub max_function_calls: usize,
    pub tolerance: f64,
    /// Absolute threshold for the caller-side sanity check.
    pub threshold: f64,
}

impl MinimizeConfig {
    pub fn validate(&self) -> Result<(), BeltError> {
        if !self.initial_guess.is_finite() {
            return Err(BeltError::invalid("initial guess must be finite"));
        }
        if !(self.initial_step.is_finite() && self.initial_step != 0.0) {
            return Err(BeltError::invalid("initial step must be finite and non-zero"));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(BeltError::invalid("tolerance must be finite and > 0"));
        }
        if !self.threshold.is_finite() {
            return Err(BeltError::invalid("convergence threshold must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_table_rows_match_their_modes() {
        for mode in ExperimentMode::ALL {
            let spec = mode.spec();
            assert_eq!(spec.mode, mode);
            spec.validate().unwrap();
        }
        assert_eq!(ExperimentMode::MeanEstimation.spec().domain.bins(), 201);
        assert_eq!(ExperimentMode::RateEstimation.spec().domain.bins(), 100);
    }

    #[test]
    fn domain_grid_and_axis_agree() {
        let d = ParameterDomain::new(-10, 10, 1.0).unwrap();
        assert_eq!(d.bins(), 21);
        let axis = d.axis();
        for k in 0..d.bins() {
            assert_eq!(axis.find_bin(d.grid_value(k)).index(), Some(k));
            assert!((axis.bin_center(k) - d.grid_value(k)).abs() < 1e-12);
        }
    }

    #[test]
    fn invalid_domains_are_rejected() {
        assert!(ParameterDomain::new(5, 1, 1.0).is_err());
        assert!(ParameterDomain::new(0, 1, 0.0).is_err());
        assert!(ParameterDomain::new(0, 1, f64::NAN).is_err());
        let single = ParameterDomain::new(3, 3, 1.0).unwrap();
        assert_eq!(single.bins(), 1);
    }

    #[test]
    fn exponential_mode_needs_positive_domain() {
        let spec = ExperimentMode::RateEstimation.spec();
        let bad = ParameterDomain::new(0, 10, 10.0).unwrap();
        assert!(matches!(spec.with_domain(bad), Err(BeltError::InvalidConfiguration(_))));
        let good = ParameterDomain::new(1, 10, 10.0).unwrap();
        assert!(spec.with_domain(good).is_ok());
    }
}
