//! Geometry algorithms that do not depend on renderers.

pub mod flex_solver;
pub mod floats;
pub mod grid;
