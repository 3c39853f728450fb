//! Drawing helpers shared by renderers.

pub mod border_runs;
pub mod box_painter;
