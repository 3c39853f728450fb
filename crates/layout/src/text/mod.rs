//! Text segmentation helpers used by line layout.

pub mod breaks;

pub use breaks::break_opportunities;
