//! The 2-D frequency table of (true parameter, estimate).
//!
//! Rows are true-parameter grid points, columns are estimate bins. Both axes
//! come from the same [`ParameterDomain`], so the table is square. Estimates that
//! fall outside the axis under [`OutOfRangePolicy::Drop`] are tallied per row in
//! `underflow` / `overflow`, which keeps every row's bookkeeping exact:
//!
//! ```text
//! in_range(row) + underflow(row) + overflow(row) == experiments_per_point
//! ```

use nalgebra::DMatrix;

use crate::domain::{OutOfRangePolicy, ParameterDomain};
use crate::error::BeltError;
use crate::math::{BinLookup, LinearAxis};

/// Counts of a single true-parameter row, produced by one worker.
#[derive(Debug, Clone, PartialEq)]
pub struct RowCounts {
    pub counts: Vec<u64>,
    pub underflow: u64,
    pub overflow: u64,
}

impl RowCounts {
    pub fn new(bins: usize) -> Self {
        Self {
            counts: vec![0; bins],
            underflow: 0,
            overflow: 0,
        }
    }

    /// Record one estimate on `axis` following `policy`.
    pub fn record(&mut self, axis: &LinearAxis, policy: OutOfRangePolicy, estimate: f64) {
        match (axis.find_bin(estimate), policy) {
            (BinLookup::Bin(j), _) => self.counts[j] += 1,
            (BinLookup::Underflow, OutOfRangePolicy::Drop) => self.underflow += 1,
            (BinLookup::Overflow, OutOfRangePolicy::Drop) => self.overflow += 1,
            (_, OutOfRangePolicy::Clip) => self.counts[axis.find_bin_clamped(estimate)] += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeltTable {
    domain: ParameterDomain,
    policy: OutOfRangePolicy,
    experiments_per_point: u64,
    counts: DMatrix<u64>,
    underflow: Vec<u64>,
    overflow: Vec<u64>,
}

impl BeltTable {
    /// An all-zero table.
    pub fn empty(domain: ParameterDomain, policy: OutOfRangePolicy) -> Self {
        let n = domain.bins();
        Self {
            domain,
            policy,
            experiments_per_point: 0,
            counts: DMatrix::zeros(n, n),
            underflow: vec![0; n],
            overflow: vec![0; n],
        }
    }

    /// Assemble a table from one [`RowCounts`] per grid point, in grid order.
    pub(crate) fn from_rows(
        domain: ParameterDomain,
        policy: OutOfRangePolicy,
        experiments_per_point: u64,
        rows: Vec<RowCounts>,
    ) -> Result<Self, BeltError> {
        let n = domain.bins();
        if rows.len() != n {
            return Err(BeltError::invalid(format!(
                "expected {n} belt rows, got {}",
                rows.len()
            )));
        }

        let mut table = Self::empty(domain, policy);
        table.experiments_per_point = experiments_per_point;
        for (i, row) in rows.into_iter().enumerate() {
            if row.counts.len() != n {
                return Err(BeltError::invalid(format!(
                    "belt row {i} has {} bins, expected {n}",
                    row.counts.len()
                )));
            }
            for (j, c) in row.counts.into_iter().enumerate() {
                table.counts[(i, j)] = c;
            }
            table.underflow[i] = row.underflow;
            table.overflow[i] = row.overflow;
        }
        Ok(table)
    }

    pub fn domain(&self) -> &ParameterDomain {
        &self.domain
    }

    pub fn policy(&self) -> OutOfRangePolicy {
        self.policy
    }

    pub fn axis(&self) -> LinearAxis {
        self.domain.axis()
    }

    /// Number of bins per axis.
    pub fn bins(&self) -> usize {
        self.counts.nrows()
    }

    pub fn experiments_per_point(&self) -> u64 {
        self.experiments_per_point
    }

    pub fn count(&self, true_bin: usize, estimate_bin: usize) -> u64 {
        self.counts[(true_bin, estimate_bin)]
    }

    pub fn row(&self, true_bin: usize) -> Vec<u64> {
        self.counts.row(true_bin).iter().copied().collect()
    }

    pub fn column(&self, estimate_bin: usize) -> Vec<u64> {
        self.counts.column(estimate_bin).iter().copied().collect()
    }

    /// Counts that landed in visible bins of a row.
    pub fn row_in_range(&self, true_bin: usize) -> u64 {
        self.counts.row(true_bin).iter().sum()
    }

    pub fn underflow(&self, true_bin: usize) -> u64 {
        self.underflow[true_bin]
    }

    pub fn overflow(&self, true_bin: usize) -> u64 {
        self.overflow[true_bin]
    }

    /// Every recorded experiment of a row, visible or not.
    pub fn row_total(&self, true_bin: usize) -> u64 {
        self.row_in_range(true_bin) + self.underflow[true_bin] + self.overflow[true_bin]
    }

    pub fn total_in_range(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn total_dropped(&self) -> u64 {
        self.underflow.iter().sum::<u64>() + self.overflow.iter().sum::<u64>()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Non-zero cells as `(true_bin, estimate_bin, count)`, row-major.
    pub fn nonzero_cells(&self) -> impl Iterator<Item = (usize, usize, u64)> + '_ {
        let n = self.bins();
        (0..n).flat_map(move |i| {
            (0..n).filter_map(move |j| {
                let c = self.counts[(i, j)];
                (c > 0).then_some((i, j, c))
            })
        })
    }

    /// Cell-wise sum of another table built over the same domain and policy.
    pub fn merge(&mut self, other: &BeltTable) -> Result<(), BeltError> {
        if self.domain != other.domain {
            return Err(BeltError::invalid("cannot merge belts built over different domains"));
        }
        if self.policy != other.policy {
            return Err(BeltError::invalid("cannot merge belts built with different out-of-range policies"));
        }
        self.counts += &other.counts;
        for (a, b) in self.underflow.iter_mut().zip(&other.underflow) {
            *a += b;
        }
        for (a, b) in self.overflow.iter_mut().zip(&other.overflow) {
            *a += b;
        }
        self.experiments_per_point += other.experiments_per_point;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_domain() -> ParameterDomain {
        ParameterDomain::new(0, 3, 1.0).unwrap()
    }

    fn row(counts: [u64; 4], underflow: u64, overflow: u64) -> RowCounts {
        RowCounts {
            counts: counts.to_vec(),
            underflow,
            overflow,
        }
    }

    #[test]
    fn record_follows_policy() {
        let axis = tiny_domain().axis();
        let mut dropped = RowCounts::new(4);
        let mut clipped = RowCounts::new(4);
        for x in [-3.0, 0.2, 2.6, 9.0, f64::NAN] {
            dropped.record(&axis, OutOfRangePolicy::Drop, x);
            clipped.record(&axis, OutOfRangePolicy::Clip, x);
        }
        assert_eq!(dropped.counts, vec![1, 0, 0, 1]);
        assert_eq!((dropped.underflow, dropped.overflow), (1, 2));
        assert_eq!(clipped.counts, vec![2, 0, 0, 3]);
        assert_eq!((clipped.underflow, clipped.overflow), (0, 0));
    }

    #[test]
    fn rows_and_columns_read_back() {
        let rows = vec![
            row([3, 1, 0, 0], 1, 0),
            row([1, 3, 1, 0], 0, 0),
            row([0, 1, 3, 1], 0, 0),
            row([0, 0, 1, 3], 0, 1),
        ];
        let table = BeltTable::from_rows(tiny_domain(), OutOfRangePolicy::Drop, 5, rows).unwrap();

        assert_eq!(table.bins(), 4);
        assert_eq!(table.row(2), vec![0, 1, 3, 1]);
        assert_eq!(table.column(0), vec![3, 1, 0, 0]);
        for i in 0..4 {
            assert_eq!(table.row_total(i), 5);
        }
        assert_eq!(table.row_in_range(0), 4);
        assert_eq!(table.total_dropped(), 2);
        assert_eq!(table.max_count(), 3);
        assert_eq!(table.nonzero_cells().count(), 10);
    }

    #[test]
    fn merge_sums_cells_and_rejects_mismatched_domains() {
        let rows = || (0..4).map(|_| row([1, 0, 0, 0], 0, 1)).collect::<Vec<_>>();
        let mut a = BeltTable::from_rows(tiny_domain(), OutOfRangePolicy::Drop, 2, rows()).unwrap();
        let b = BeltTable::from_rows(tiny_domain(), OutOfRangePolicy::Drop, 2, rows()).unwrap();
        a.merge(&b).unwrap();
        assert_eq!(a.count(3, 0), 2);
        assert_eq!(a.overflow(1), 2);
        assert_eq!(a.experiments_per_point(), 4);
        assert_eq!(a.row_total(0), 4);

        let other = BeltTable::empty(ParameterDomain::new(0, 4, 1.0).unwrap(), OutOfRangePolicy::Drop);
        assert!(a.merge(&other).is_err());
    }

    #[test]
    fn from_rows_checks_shape() {
        let err = BeltTable::from_rows(tiny_domain(), OutOfRangePolicy::Drop, 1, vec![RowCounts::new(4)]);
        assert!(err.is_err());
    }
}
