//! Neyman belt construction and slicing.
//!
//! Responsibilities:
//!
//! - simulate experiments over the true-parameter grid (`accumulator`)
//! - hold the joint (true, estimate) frequency table (`table`)
//! - read a normalized slice at an observed value (`slice`)

pub mod accumulator;
pub mod slice;
pub mod table;

pub use accumulator::*;
pub use slice::*;
pub use table::*;
