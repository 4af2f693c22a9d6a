//! Fixed-range linear binning.
//!
//! Both axes of the belt share one binning: every integer grid point `i` of a
//! [`ParameterDomain`](crate::domain::ParameterDomain) sits at the center of its
//! own bin, so the axis spans `[(low - 0.5) / scale, (high + 0.5) / scale)`.
//!
//! Bins are half-open (`[lo, hi)`). Values below the first edge are
//! underflow; values at or above the last edge (and non-finite values) are
//! overflow.

/// Where a value lands on a [`LinearAxis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinLookup {
    Underflow,
    Bin(usize),
    Overflow,
}

impl BinLookup {
    pub fn index(self) -> Option<usize> {
        match self {
            BinLookup::Bin(i) => Some(i),
            BinLookup::Underflow | BinLookup::Overflow => None,
        }
    }
}

/// An axis of `bins` equal-width bins over `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearAxis {
    min: f64,
    max: f64,
    bins: usize,
}

impl LinearAxis {
    /// Build an axis. Callers guarantee `bins > 0` and `max > min`.
    pub fn new(min: f64, max: f64, bins: usize) -> Self {
        Self { min, max, bins }
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.bins as f64
    }

    pub fn find_bin(&self, x: f64) -> BinLookup {
        if x.is_nan() {
            return BinLookup::Overflow;
        }
        if x < self.min {
            return BinLookup::Underflow;
        }
        if x >= self.max {
            return BinLookup::Overflow;
        }

        let u = (x - self.min) / self.bin_width();
        // Rounding at the upper edge can push `u` to exactly `bins`.
        let idx = (u.floor() as usize).min(self.bins - 1);
        BinLookup::Bin(idx)
    }

    /// Bin index with out-of-range values collapsed into the edge bins.
    pub fn find_bin_clamped(&self, x: f64) -> usize {
        match self.find_bin(x) {
            BinLookup::Bin(i) => i,
            BinLookup::Underflow => 0,
            BinLookup::Overflow => self.bins - 1,
        }
    }

    pub fn bin_center(&self, i: usize) -> f64 {
        self.min + (i as f64 + 0.5) * self.bin_width()
    }

    pub fn bin_low_edge(&self, i: usize) -> f64 {
        self.min + i as f64 * self.bin_width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn mean_axis() -> LinearAxis {
        // Grid -100..=100 at scale 10.
        LinearAxis::new(-10.05, 10.05, 201)
    }

    #[test]
    fn grid_points_land_in_their_own_bin() {
        let axis = mean_axis();
        for i in -100..=100_i64 {
            let x = i as f64 / 10.0;
            assert_eq!(axis.find_bin(x), BinLookup::Bin((i + 100) as usize), "grid point {x}");
        }
    }

    #[test]
    fn edges_are_half_open() {
        let axis = LinearAxis::new(0.0, 1.0, 4);
        assert_eq!(axis.find_bin(0.0), BinLookup::Bin(0));
        assert_eq!(axis.find_bin(0.25), BinLookup::Bin(1));
        assert_eq!(axis.find_bin(1.0), BinLookup::Overflow);
        assert_eq!(axis.find_bin(-1e-12), BinLookup::Underflow);
        assert_eq!(axis.find_bin(f64::NAN), BinLookup::Overflow);
        assert_eq!(axis.find_bin(f64::INFINITY), BinLookup::Overflow);
        assert_eq!(axis.find_bin(f64::NEG_INFINITY), BinLookup::Underflow);
    }

    #[test]
    fn clamped_lookup_collapses_into_edge_bins() {
        let axis = LinearAxis::new(0.0, 1.0, 4);
        assert_eq!(axis.find_bin_clamped(-5.0), 0);
        assert_eq!(axis.find_bin_clamped(5.0), 3);
        assert_eq!(axis.find_bin_clamped(0.6), 2);
    }

    proptest! {
        #[test]
        fn in_range_values_are_inside_their_bin(x in -10.05f64..10.05) {
            let axis = mean_axis();
            let i = axis.find_bin(x).index().unwrap();
            let lo = axis.bin_low_edge(i);
            let hi = lo + axis.bin_width();
            prop_assert!(x >= lo - 1e-9 && x < hi + 1e-9);
        }
    }
}
