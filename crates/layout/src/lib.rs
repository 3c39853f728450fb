use quire_style::StyleParseError;
use quire_traits::{CanvasError, FontError};
use quire_types::RendererId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Structure violation in {renderer}: {message}")]
    StructureViolation {
        renderer: &'static str,
        message: String,
    },
    #[error("Builder mismatch: Expected {0} node, got {1}.")]
    BuilderMismatch(&'static str, &'static str),
    #[error("Renderer {renderer} does not fit on an empty page {page_number}, even with forced placement.")]
    ElementTooLarge {
        renderer: RendererId,
        page_number: usize,
    },
    #[error("Invalid style: {0}")]
    InvalidStyle(#[from] StyleParseError),
    #[error("Font error: {0}")]
    Font(#[from] FontError),
    #[error("Canvas error: {0}")]
    Canvas(#[from] CanvasError),
    #[error("Generic layout error: {0}")]
    Generic(String),
}

pub(crate) mod engine;
pub use self::engine::{LayoutEngine, RenderSummary};

pub mod algorithms;
pub mod builder;
pub mod config;
pub mod fonts;
pub mod interface;
pub mod nodes;
pub mod painting;
pub mod perf;
pub mod style;
pub mod text;

pub use self::config::LayoutConfig;
pub use self::fonts::TtfFontMetrics;
pub use self::interface::{
    AnchorLocation, DrawContext, LayoutArea, LayoutContext, LayoutResult, LayoutStatus,
    MinMaxWidth, Renderer,
};
pub use self::nodes::document::{DocumentRenderer, PageFragment};
pub use self::nodes::RenderNode;
pub use self::style::ComputedStyle;

#[cfg(test)]
mod flex_test;
#[cfg(test)]
mod grid_test;
#[cfg(test)]
mod multicol_test;
#[cfg(test)]
mod paragraph_test;
#[cfg(test)]
mod style_test;
#[cfg(test)]
mod table_test;
#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod text_test;
