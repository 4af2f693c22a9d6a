//! ASCII plotting for terminal output.
//!
//! Fixed-size character grids, optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! When the grid is narrower than the axis, each character cell sums a block
//! of adjacent bins; when it is wider, bins are repeated.

use std::ops::Range;

use crate::belt::{BeltTable, SliceDistribution};

/// Density ramp, lightest first. Index 0 is reserved for empty cells.
const SHADES: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Render the belt as a heat map: true parameter on x, estimate on y (largest at the top).
pub fn render_belt_heatmap(table: &BeltTable, width: usize, height: usize) -> String {
    let width = width.max(1);
    let height = height.max(1);
    let bins = table.bins();

    // Block sums first, so the shading is relative to the busiest cell.
    let mut cells = vec![vec![0u64; width]; height];
    for (r, row) in cells.iter_mut().enumerate() {
        let est_bins = block(height - 1 - r, height, bins);
        for (c, cell) in row.iter_mut().enumerate() {
            let true_bins = block(c, width, bins);
            *cell = true_bins
                .clone()
                .map(|i| est_bins.clone().map(|j| table.count(i, j)).sum::<u64>())
                .sum();
        }
    }
    let max = cells.iter().flatten().copied().max().unwrap_or(0);

    let axis = table.axis();
    let mut out = String::new();
    out.push_str(&format!(
        "Belt: true=[{:.2}, {:.2}] (x) | estimate=[{:.2}, {:.2}] (y) | max={max}\n",
        axis.min(),
        axis.max(),
        axis.min(),
        axis.max()
    ));
    for row in cells {
        out.extend(row.into_iter().map(|v| shade(v, max)));
        out.push('\n');
    }
    out
}

/// Render a slice as vertical bars over the true-parameter axis.
pub fn render_slice_histogram(slice: &SliceDistribution, width: usize, height: usize) -> String {
    let width = width.max(1);
    let height = height.max(1);
    let probs = slice.probabilities();

    let columns: Vec<f64> = (0..width)
        .map(|c| block(c, width, probs.len()).map(|i| probs[i]).sum())
        .collect();
    let peak = columns.iter().copied().fold(0.0_f64, f64::max);
    let bars: Vec<usize> = columns
        .iter()
        .map(|&v| {
            if peak > 0.0 {
                (v / peak * height as f64).round() as usize
            } else {
                0
            }
        })
        .collect();

    let axis = slice.domain().axis();
    let (lo, hi) = (axis.min(), axis.max());

    let mut out = String::new();
    out.push_str(&format!(
        "Slice: true=[{lo:.2}, {hi:.2}] | observed={:.3} | peak p={:.4}\n",
        slice.observed_value(),
        probs.iter().copied().fold(0.0_f64, f64::max)
    ));
    for r in 0..height {
        let level = height - r;
        out.extend(bars.iter().map(|&b| if b >= level { '#' } else { ' ' }));
        out.push('\n');
    }
    out
}

/// Bins covered by cell `i` of `cells` over an axis of `bins` bins.
fn block(i: usize, cells: usize, bins: usize) -> Range<usize> {
    if bins == 0 {
        return 0..0;
    }
    let start = (i * bins / cells).min(bins - 1);
    let end = ((i + 1) * bins / cells).max(start + 1).min(bins);
    start..end
}

fn shade(value: u64, max: u64) -> char {
    if value == 0 || max == 0 {
        return SHADES[0];
    }
    let top = (SHADES.len() - 1) as u64;
    // Integer ceiling keeps any non-empty cell visible.
    let idx = (value * top).div_ceil(max);
    SHADES[idx.min(top) as usize]
}
