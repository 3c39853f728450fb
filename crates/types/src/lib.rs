pub mod color;
pub mod geometry;
pub mod ids;
pub mod transform;

pub use color::Color;
pub use geometry::{Point, Rect, Size};
pub use ids::{AnchorId, RendererId};
pub use transform::AffineTransform;
