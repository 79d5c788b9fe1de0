//! Analysis modules.
//!
//! Bin edge handling and the accumulation of parsed histogram files
//! into one normalized result.

pub mod aggregator;
pub mod binning;

pub use aggregator::*;
pub use binning::*;
