//! Mathematical utilities: fixed-range binning and summary statistics.

pub mod binning;
pub mod stats;

pub use binning::*;
pub use stats::*;
