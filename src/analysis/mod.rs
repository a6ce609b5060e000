//! Analysis modules.
//!
//! Aggregation of per-game scans into monthly summaries.

pub mod aggregator;

pub use aggregator::*;
