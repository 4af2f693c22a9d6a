//! Belt and slice rendering.
//!
//! - terminal output with fixed character grids (`ascii`)
//! - SVG artifacts via Plotters (`svg`)

pub mod ascii;
pub mod svg;

pub use ascii::*;
pub use svg::*;
