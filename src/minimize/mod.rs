//! One-dimensional numerical minimization.
//!
//! A [`Minimizer1D`] takes a scalar objective, a start point and a step, and
//! iterates until the estimated distance to the minimum drops below the
//! tolerance or the iteration / call budget runs out. Running out of budget is
//! a result (`converged == false`), not an error.
//!
//! Backends:
//! - [`QuasiNewtonMinimizer`]: finite-difference Newton steps with backtracking
//! - [`BrentMinimizer`]: bracketing followed by Brent's parabolic/golden search

use clap::ValueEnum;
use serde::Serialize;
use tracing::{error, warn};

pub mod brent;
pub mod objectives;
pub mod quasi_newton;

pub use brent::BrentMinimizer;
pub use objectives::*;
pub use quasi_newton::QuasiNewtonMinimizer;

/// Stopping criteria and starting point for one minimization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MinimizerSettings {
    pub initial_guess: f64,
    pub initial_step: f64,
    pub max_iterations: usize,
    pub max_function_calls: usize,
    /// Bound on the estimated distance to the minimum.
    pub tolerance: f64,
}

impl Default for MinimizerSettings {
    fn default() -> Self {
        Self {
            initial_guess: 0.0,
            initial_step: 0.01,
            max_iterations: 10_000,
            max_function_calls: 1_000_000,
            tolerance: 0.001,
        }
    }
}

/// Why a minimization stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Converged,
    IterationLimit,
    CallLimit,
    NonFinite,
    /// No trial step lowered the objective before the tolerance was met.
    NoProgress,
}

/// Outcome of a single [`Minimizer1D::minimize`] call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MinimizationResult {
    pub parameter_value: f64,
    pub function_value: f64,
    pub converged: bool,
    /// Estimated distance to the minimum at the returned point
    /// (backend-specific; infinite when no estimate exists).
    pub edm: f64,
    pub iterations: usize,
    pub function_calls: usize,
    pub stop_reason: StopReason,
}

impl MinimizationResult {
    pub(crate) fn finish(
        parameter_value: f64,
        function_value: f64,
        edm: f64,
        iterations: usize,
        function_calls: usize,
        stop_reason: StopReason,
    ) -> Self {
        Self {
            parameter_value,
            function_value,
            converged: stop_reason == StopReason::Converged,
            edm,
            iterations,
            function_calls,
            stop_reason,
        }
    }
}

/// A pluggable 1-D minimization backend.
///
/// Implementations hold no state between calls.
pub trait Minimizer1D: Send + Sync {
    fn name(&self) -> &'static str;

    fn minimize(&self, objective: &dyn Fn(f64) -> f64, settings: &MinimizerSettings) -> MinimizationResult;
}

/// Available backends (CLI `--algorithm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MinimizerKind {
    #[default]
    QuasiNewton,
    Brent,
}

/// Construct the backend for `kind`.
pub fn create_minimizer(kind: MinimizerKind) -> Box<dyn Minimizer1D> {
    match kind {
        MinimizerKind::QuasiNewton => Box::new(QuasiNewtonMinimizer::default()),
        MinimizerKind::Brent => Box::new(BrentMinimizer),
    }
}

/// Objective wrapper that enforces the function-call budget.
pub(crate) struct CallBudget<'a> {
    objective: &'a dyn Fn(f64) -> f64,
    calls: usize,
    max_calls: usize,
}

/// The call budget ran out before the evaluation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CallLimitReached;

impl<'a> CallBudget<'a> {
    pub(crate) fn new(objective: &'a dyn Fn(f64) -> f64, max_calls: usize) -> Self {
        Self {
            objective,
            calls: 0,
            max_calls,
        }
    }

    pub(crate) fn eval(&mut self, x: f64) -> Result<f64, CallLimitReached> {
        if self.calls >= self.max_calls {
            return Err(CallLimitReached);
        }
        self.calls += 1;
        Ok((self.objective)(x))
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls
    }
}

/// Caller-side sanity check of a minimization result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConvergenceCheck {
    Passed,
    /// The backend gave up before meeting its tolerance.
    NotConverged { stop_reason: StopReason },
    /// The backend claims convergence but the values fail the threshold.
    Mismatch {
        reported: f64,
        reevaluated: f64,
        threshold: f64,
    },
}

impl ConvergenceCheck {
    pub fn passed(&self) -> bool {
        matches!(self, ConvergenceCheck::Passed)
    }
}

/// Check both the reported minimum and a fresh evaluation at the returned
/// point against `threshold` (`value < threshold`).
///
/// Failures are logged and returned; they never abort the caller.
pub fn validate_minimum(
    result: &MinimizationResult,
    objective: &dyn Fn(f64) -> f64,
    threshold: f64,
) -> ConvergenceCheck {
    if !result.converged {
        warn!(
            stop_reason = ?result.stop_reason,
            iterations = result.iterations,
            calls = result.function_calls,
            "minimizer did not converge"
        );
        return ConvergenceCheck::NotConverged {
            stop_reason: result.stop_reason,
        };
    }

    let reevaluated = objective(result.parameter_value);
    if result.function_value < threshold && reevaluated < threshold {
        ConvergenceCheck::Passed
    } else {
        error!(
            x = result.parameter_value,
            reported = result.function_value,
            reevaluated,
            threshold,
            "minimizer failed to converge to the expected minimum"
        );
        ConvergenceCheck::Mismatch {
            reported: result.function_value,
            reevaluated,
            threshold,
        }
    }
}
