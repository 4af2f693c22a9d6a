//! Simulated measurement generation.
//!
//! - `sampler`: per-stream random draws from the configured distribution
//! - `estimator`: averages repeated draws into one experiment's point estimate

pub mod estimator;
pub mod sampler;

pub use estimator::*;
pub use sampler::*;
