//! Finite-difference Newton minimizer.
//!
//! Each iteration estimates the gradient `g` and curvature `g2` by central
//! differences. Where the curvature is positive the Newton step `-g / g2` is
//! tried and the estimated distance to the minimum is
//!
//! ```text
//! edm = g^2 / (2 g2)
//! ```
//!
//! which must fall below `0.002 * tolerance` (the Minuit convention). Where the
//! curvature is not positive there is no Newton step, so we walk downhill with
//! a step that doubles after every successful move. Both kinds of step are
//! halved until the objective decreases. A Newton direction along which no
//! halving decreases the objective ends the run with
//! [`StopReason::NoProgress`]; only the `edm` test reports convergence.

use crate::minimize::{CallBudget, MinimizationResult, Minimizer1D, MinimizerSettings, StopReason};

/// Relative step for the central differences.
const FD_REL: f64 = 1e-4;

/// Minuit-style scale between `tolerance` and the accepted `edm`.
const EDM_FACTOR: f64 = 0.002;

#[derive(Debug, Clone, Copy)]
pub struct QuasiNewtonMinimizer {
    /// Step halvings tried before an iteration gives up on a direction.
    pub max_halvings: usize,
}

impl Default for QuasiNewtonMinimizer {
    fn default() -> Self {
        Self { max_halvings: 60 }
    }
}

impl Minimizer1D for QuasiNewtonMinimizer {
    fn name(&self) -> &'static str {
        "quasi-newton"
    }

    fn minimize(&self, objective: &dyn Fn(f64) -> f64, settings: &MinimizerSettings) -> MinimizationResult {
        let mut budget = CallBudget::new(objective, settings.max_function_calls);
        let mut x = settings.initial_guess;
        let mut fx = match budget.eval(x) {
            Ok(v) => v,
            Err(_) => {
                return MinimizationResult::finish(x, f64::NAN, f64::INFINITY, 0, budget.calls(), StopReason::CallLimit);
            }
        };
        if !fx.is_finite() {
            return MinimizationResult::finish(x, fx, f64::INFINITY, 0, budget.calls(), StopReason::NonFinite);
        }

        let mut step_len = settings.initial_step.abs();
        let mut edm = f64::INFINITY;
        let mut iterations = 0;

        while iterations < settings.max_iterations {
            iterations += 1;

            let h = FD_REL * (1.0 + x.abs());
            let (fp, fm) = match (budget.eval(x + h), budget.eval(x - h)) {
                (Ok(fp), Ok(fm)) => (fp, fm),
                _ => {
                    return MinimizationResult::finish(x, fx, edm, iterations, budget.calls(), StopReason::CallLimit);
                }
            };
            let g = (fp - fm) / (2.0 * h);
            let g2 = (fp - 2.0 * fx + fm) / (h * h);
            if !(g.is_finite() && g2.is_finite()) {
                return MinimizationResult::finish(x, fx, edm, iterations, budget.calls(), StopReason::NonFinite);
            }

            let convex = g2 > 0.0;
            let dx = if convex {
                edm = g * g / (2.0 * g2);
                if edm < EDM_FACTOR * settings.tolerance {
                    return MinimizationResult::finish(x, fx, edm, iterations, budget.calls(), StopReason::Converged);
                }
                -g / g2
            } else {
                edm = f64::INFINITY;
                let direction = if g != 0.0 { -g.signum() } else { 1.0 };
                direction * step_len
            };

            let mut t = 1.0;
            let mut accepted = None;
            for _ in 0..self.max_halvings {
                let x_new = x + t * dx;
                match budget.eval(x_new) {
                    Ok(f_new) if f_new.is_finite() && f_new < fx => {
                        accepted = Some((x_new, f_new));
                        break;
                    }
                    Ok(_) => t *= 0.5,
                    Err(_) => {
                        return MinimizationResult::finish(x, fx, edm, iterations, budget.calls(), StopReason::CallLimit);
                    }
                }
            }

            match accepted {
                Some((x_new, f_new)) => {
                    x = x_new;
                    fx = f_new;
                    if !convex {
                        step_len *= 2.0;
                    }
                }
                // No decrease along a Newton direction while edm is still above the limit.
                None if convex => {
                    return MinimizationResult::finish(x, fx, edm, iterations, budget.calls(), StopReason::NoProgress);
                }
                None => step_len *= 0.5,
            }
        }

        MinimizationResult::finish(x, fx, edm, iterations, budget.calls(), StopReason::IterationLimit)
    }
}
