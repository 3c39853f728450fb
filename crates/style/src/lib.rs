pub mod border;
pub mod boxes;
pub mod dimension;
pub mod flex;
pub mod font;
pub mod grid;
pub mod list;
pub mod parsers;
pub mod stylesheet;
pub mod table;
pub mod text;

pub use border::{Border, BorderStyle};
pub use boxes::{Clear, FloatSide, Overflow};
pub use dimension::{Dimension, Margins, PageSize};
pub use flex::{AlignContent, AlignItems, AlignSelf, FlexDirection, FlexWrap, JustifyContent};
pub use font::{FontStyle, FontWeight};
pub use grid::{GridAutoFlow, GridLine, GridTemplate, RepeatCount, TrackListItem, TrackSize};
pub use list::{ListStylePosition, ListStyleType};
pub use parsers::StyleParseError;
pub use stylesheet::{ElementStyle, PageLayout, Stylesheet};
pub use table::{BorderCollapse, TableLayout, VerticalAlign};
pub use text::{BaseDirection, TabAlignment, TabStop, TextAlign, TextDecoration};
