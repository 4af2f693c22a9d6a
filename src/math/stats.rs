//! Summary statistics over raw samples and binned distributions.

/// Arithmetic mean. Returns `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (`n - 1` denominator). Needs at least two values.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() as f64 - 1.0)).sqrt())
}

/// Mean of bin centers weighted by non-negative weights.
pub fn weighted_mean(centers: &[f64], weights: &[f64]) -> Option<f64> {
    let total: f64 = weights.iter().sum();
    if !(total > 0.0) {
        return None;
    }
    let s: f64 = centers.iter().zip(weights).map(|(x, w)| x * w).sum();
    Some(s / total)
}

/// Population standard deviation of bin centers under non-negative weights.
pub fn weighted_std_dev(centers: &[f64], weights: &[f64]) -> Option<f64> {
    let m = weighted_mean(centers, weights)?;
    let total: f64 = weights.iter().sum();
    let ss: f64 = centers
        .iter()
        .zip(weights)
        .map(|(x, w)| w * (x - m) * (x - m))
        .sum();
    Some((ss / total).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unweighted_moments() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!((mean(&v).unwrap() - 2.5).abs() < 1e-12);
        assert!((std_dev(&v).unwrap() - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!(mean(&[]).is_none());
        assert!(std_dev(&[1.0]).is_none());
    }

    #[test]
    fn weighted_moments_ignore_zero_weight_bins() {
        let centers = [-1.0, 0.0, 1.0, 100.0];
        let weights = [1.0, 2.0, 1.0, 0.0];
        assert!(weighted_mean(&centers, &weights).unwrap().abs() < 1e-12);
        let sd = weighted_std_dev(&centers, &weights).unwrap();
        assert!((sd - 0.5f64.sqrt()).abs() < 1e-12);
        assert!(weighted_mean(&centers, &[0.0; 4]).is_none());
    }
}
