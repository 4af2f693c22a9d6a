//! Formatted terminal output for belt and minimization runs.
//!
//! Formatting lives here so the simulation code stays free of presentation
//! concerns and output changes stay localized.

mod format;

pub use format::*;
