//! CSS grid placement and track sizing, independent of the renderer tree.

pub mod placement;
pub mod sizing;
pub mod template;

pub use placement::{GridArea, GridPlacement, ItemLines, place_items};
pub use sizing::{Contribution, Track, size_tracks, span_length, track_offsets};
pub use template::{ExpandedTemplate, expand_template};
