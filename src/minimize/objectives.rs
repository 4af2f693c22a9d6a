//! Reference objectives with known minima.

/// `exp(-x^2) * sin(x)`.
pub fn gaus_sin(x: f64) -> f64 {
    (-x * x).exp() * x.sin()
}

/// Global minimum of [`gaus_sin`] as `(x, f(x))`.
pub const GAUS_SIN_MINIMUM: (f64, f64) = (-0.653_271_187_094_403_1, -0.396_652_961_085_471);
