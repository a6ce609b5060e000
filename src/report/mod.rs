//! Index page generation.

pub mod generator;
pub mod index;

pub use index::build_index;
