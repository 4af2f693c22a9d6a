//! `neyman-belt` library crate.
//!
//! Monte-Carlo construction of Neyman confidence belts, plus a small
//! one-dimensional minimizer abstraction.
//!
//! The binary (`neyman`) is a thin wrapper around this library so that:
//!
//! - belts and slices can be built and tested without spawning processes
//! - the sampling, binning and minimization pieces are reusable on their own

pub mod app;
pub mod belt;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod minimize;
pub mod plot;
pub mod report;
