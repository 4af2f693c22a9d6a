//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - experiment modes and the static mode table (`ExperimentMode`, `ModeSpec`)
//! - the true-parameter grid (`ParameterDomain`)
//! - run configurations (`BeltConfig`, `MinimizeConfig`)

pub mod types;

pub use types::*;
