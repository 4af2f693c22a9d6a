//! Derivative-free minimizer: bracket, then Brent's method.
//!
//! 1. Bracketing walks downhill from `(guess, guess + step)` with golden-ratio
//!    growth until the objective rises again, giving `a < b < c` (in either
//!    order) with `f(b)` below both ends.
//! 2. Brent's method shrinks the bracket with parabolic steps, falling back to
//!    golden-section steps when the parabola is not trusted.
//!
//! The estimated distance to the minimum is the larger distance from the
//! current best point to a bracket end. Brent's test adds a relative floor,
//! so convergence means
//!
//! ```text
//! edm <= tolerance + 2 * sqrt(eps) * |x|
//! ```
//!
//! Below that floor the bracket cannot shrink further in `f64` around a large
//! `|x|`. Bracket expansions and Brent steps both count as iterations.

use crate::minimize::{CallBudget, MinimizationResult, Minimizer1D, MinimizerSettings, StopReason};

const GOLD: f64 = 1.618_034;
const CGOLD: f64 = 0.381_966_0;

#[derive(Debug, Clone, Copy, Default)]
pub struct BrentMinimizer;

impl Minimizer1D for BrentMinimizer {
    fn name(&self) -> &'static str {
        "brent"
    }

    fn minimize(&self, objective: &dyn Fn(f64) -> f64, settings: &MinimizerSettings) -> MinimizationResult {
        let mut budget = CallBudget::new(objective, settings.max_function_calls);
        let mut iterations = 0;

        let mut a = settings.initial_guess;
        let Ok(mut fa) = budget.eval(a) else {
            return MinimizationResult::finish(a, f64::NAN, f64::INFINITY, 0, budget.calls(), StopReason::CallLimit);
        };
        if !fa.is_finite() {
            return MinimizationResult::finish(a, fa, f64::INFINITY, 0, budget.calls(), StopReason::NonFinite);
        }
        let mut b = a + settings.initial_step;
        let Ok(mut fb) = budget.eval(b) else {
            return MinimizationResult::finish(a, fa, f64::INFINITY, 0, budget.calls(), StopReason::CallLimit);
        };
        if !(fb <= fa) {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }

        // Bracketing.
        let c = loop {
            if iterations >= settings.max_iterations {
                return MinimizationResult::finish(b, fb, f64::INFINITY, iterations, budget.calls(), StopReason::IterationLimit);
            }
            iterations += 1;

            let c = b + GOLD * (b - a);
            let Ok(fc) = budget.eval(c) else {
                return MinimizationResult::finish(b, fb, f64::INFINITY, iterations, budget.calls(), StopReason::CallLimit);
            };
            if !(fc < fb) {
                break c;
            }
            a = b;
            b = c;
            fb = fc;
        };

        // Brent's method on [lo, hi] starting from the bracket's interior point.
        let (mut lo, mut hi) = if a < c { (a, c) } else { (c, a) };
        let (mut x, mut w, mut v) = (b, b, b);
        let (mut fx, mut fw, mut fv) = (fb, fb, fb);
        let mut d: f64 = 0.0;
        let mut e: f64 = 0.0;

        loop {
            let xm = 0.5 * (lo + hi);
            let tol1 = f64::EPSILON.sqrt() * x.abs() + 0.5 * settings.tolerance;
            let tol2 = 2.0 * tol1;
            let edm = (x - lo).max(hi - x);

            if (x - xm).abs() <= tol2 - 0.5 * (hi - lo) {
                return MinimizationResult::finish(x, fx, edm, iterations, budget.calls(), StopReason::Converged);
            }
            if iterations >= settings.max_iterations {
                return MinimizationResult::finish(x, fx, edm, iterations, budget.calls(), StopReason::IterationLimit);
            }
            iterations += 1;

            if e.abs() > tol1 {
                // Parabola through (x, w, v).
                let r = (x - w) * (fx - fv);
                let mut q = (x - v) * (fx - fw);
                let mut p = (x - v) * q - (x - w) * r;
                q = 2.0 * (q - r);
                if q > 0.0 {
                    p = -p;
                }
                q = q.abs();
                let e_prev = e;
                e = d;
                if p.abs() >= (0.5 * q * e_prev).abs() || p <= q * (lo - x) || p >= q * (hi - x) {
                    e = if x >= xm { lo - x } else { hi - x };
                    d = CGOLD * e;
                } else {
                    d = p / q;
                    let u = x + d;
                    if u - lo < tol2 || hi - u < tol2 {
                        d = tol1.copysign(xm - x);
                    }
                }
            } else {
                e = if x >= xm { lo - x } else { hi - x };
                d = CGOLD * e;
            }

            let u = if d.abs() >= tol1 { x + d } else { x + tol1.copysign(d) };
            let Ok(fu) = budget.eval(u) else {
                return MinimizationResult::finish(x, fx, edm, iterations, budget.calls(), StopReason::CallLimit);
            };

            if fu <= fx {
                if u >= x {
                    lo = x;
                } else {
                    hi = x;
                }
                (v, w, x) = (w, x, u);
                (fv, fw, fx) = (fw, fx, fu);
            } else {
                if u < x {
                    lo = u;
                } else {
                    hi = u;
                }
                if fu <= fw || w == x {
                    (v, w) = (w, u);
                    (fv, fw) = (fw, fu);
                } else if fu <= fv || v == x || v == w {
                    v = u;
                    fv = fu;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadratic_is_located_to_tolerance() {
        let settings = MinimizerSettings {
            initial_guess: 10.0,
            initial_step: 0.5,
            tolerance: 1e-6,
            ..MinimizerSettings::default()
        };
        let result = BrentMinimizer.minimize(&|x: f64| (x - 2.0).powi(2) + 1.0, &settings);
        assert!(result.converged);
        assert!((result.parameter_value - 2.0).abs() < 1e-5);
        assert!(result.edm < 1e-5);
    }

    #[test]
    fn monotone_objective_never_brackets() {
        let settings = MinimizerSettings {
            max_iterations: 100,
            ..MinimizerSettings::default()
        };
        let result = BrentMinimizer.minimize(&|x: f64| x, &settings);
        assert!(!result.converged);
        assert_eq!(result.stop_reason, StopReason::IterationLimit);
        assert_eq!(result.iterations, 100);
    }

    #[test]
    fn negative_step_walks_the_other_way() {
        let settings = MinimizerSettings {
            initial_guess: 5.0,
            initial_step: -0.1,
            ..MinimizerSettings::default()
        };
        let result = BrentMinimizer.minimize(&|x: f64| (x + 1.0).powi(2), &settings);
        assert!(result.converged);
        assert!((result.parameter_value + 1.0).abs() < 2e-3);
    }

    #[test]
    fn convergence_far_from_origin_respects_relative_floor() {
        let center = 1e7;
        let settings = MinimizerSettings {
            initial_guess: center + 5.0,
            ..MinimizerSettings::default()
        };
        let result = BrentMinimizer.minimize(&|x: f64| (x - center).powi(2), &settings);
        assert!(result.converged);
        let floor = settings.tolerance + 2.0 * f64::EPSILON.sqrt() * result.parameter_value.abs();
        assert!(result.edm <= floor, "edm {} above floor {floor}", result.edm);
        assert!((result.parameter_value - center).abs() <= floor);
    }
}
