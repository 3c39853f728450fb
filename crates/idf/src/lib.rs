//! Intermediate Document Format (IDF)
//! The in-memory document tree handed to the layout engine. Nodes carry style references
//! and content only; no geometry.

use quire_style::dimension::Dimension;
use quire_style::stylesheet::ElementStyle;
use std::sync::Arc;

pub type TextStr = String;

/// Reference-counted immutable bytes, e.g. encoded image data.
pub type SharedData = Arc<Vec<u8>>;

/// Metadata shared by all block-level `IRNode`s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeMetadata {
    /// Anchor id. The document renderer records the page it lands on.
    pub id: Option<TextStr>,
    pub style_sets: Vec<Arc<ElementStyle>>,
    pub style_override: Option<ElementStyle>,
}

impl NodeMetadata {
    pub fn with_style(style: ElementStyle) -> Self {
        Self {
            style_override: Some(style),
            ..Default::default()
        }
    }
}

/// Metadata shared by all styled `InlineNode`s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InlineMetadata {
    pub style_sets: Vec<Arc<ElementStyle>>,
    pub style_override: Option<ElementStyle>,
}

/// An image reference with its intrinsic size in points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageSource {
    pub src: TextStr,
    pub intrinsic_width: f32,
    pub intrinsic_height: f32,
    pub data: Option<SharedData>,
}

impl ImageSource {
    pub fn new(src: impl Into<TextStr>, intrinsic_width: f32, intrinsic_height: f32) -> Self {
        Self {
            src: src.into(),
            intrinsic_width,
            intrinsic_height,
            data: None,
        }
    }
}

/// A block-level element in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum IRNode {
    /// The document root; its children flow through pages.
    Root(Vec<IRNode>),
    Block {
        meta: NodeMetadata,
        children: Vec<IRNode>,
    },
    /// A paragraph with inline content only.
    Paragraph {
        meta: NodeMetadata,
        children: Vec<InlineNode>,
    },
    Image {
        meta: NodeMetadata,
        source: ImageSource,
    },
    FlexContainer {
        meta: NodeMetadata,
        children: Vec<IRNode>,
    },
    GridContainer {
        meta: NodeMetadata,
        children: Vec<IRNode>,
    },
    /// A multi-column container. Column count and gap come from the style.
    MultiColumn {
        meta: NodeMetadata,
        children: Vec<IRNode>,
    },
    List {
        meta: NodeMetadata,
        start: Option<usize>,
        children: Vec<IRNode>,
    },
    ListItem {
        meta: NodeMetadata,
        children: Vec<IRNode>,
    },
    Table(Box<TableNode>),
    /// Ends the current area (page or document column), optionally switching page master.
    AreaBreak { master_name: Option<TextStr> },
}

impl IRNode {
    pub fn meta(&self) -> Option<&NodeMetadata> {
        match self {
            IRNode::Block { meta, .. }
            | IRNode::Paragraph { meta, .. }
            | IRNode::Image { meta, .. }
            | IRNode::FlexContainer { meta, .. }
            | IRNode::GridContainer { meta, .. }
            | IRNode::MultiColumn { meta, .. }
            | IRNode::List { meta, .. }
            | IRNode::ListItem { meta, .. } => Some(meta),
            IRNode::Table(table) => Some(&table.meta),
            IRNode::Root(_) | IRNode::AreaBreak { .. } => None,
        }
    }

    pub fn style_sets(&self) -> &[Arc<ElementStyle>] {
        self.meta().map(|m| m.style_sets.as_slice()).unwrap_or(&[])
    }

    pub fn style_override(&self) -> Option<&ElementStyle> {
        self.meta().and_then(|m| m.style_override.as_ref())
    }

    pub fn id(&self) -> Option<&str> {
        self.meta().and_then(|m| m.id.as_deref())
    }

    /// A string identifier for the node type, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            IRNode::Root(_) => "root",
            IRNode::Block { .. } => "block",
            IRNode::Paragraph { .. } => "paragraph",
            IRNode::Image { .. } => "image",
            IRNode::FlexContainer { .. } => "flex-container",
            IRNode::GridContainer { .. } => "grid-container",
            IRNode::MultiColumn { .. } => "multi-column",
            IRNode::List { .. } => "list",
            IRNode::ListItem { .. } => "list-item",
            IRNode::Table(_) => "table",
            IRNode::AreaBreak { .. } => "area-break",
        }
    }

    pub fn paragraph(text: impl Into<TextStr>) -> Self {
        IRNode::Paragraph {
            meta: NodeMetadata::default(),
            children: vec![InlineNode::Text(text.into())],
        }
    }
}

/// An inline-level element inside a `Paragraph`.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineNode {
    Text(TextStr),
    StyledSpan {
        meta: InlineMetadata,
        children: Vec<InlineNode>,
    },
    Image {
        meta: InlineMetadata,
        source: ImageSource,
    },
    /// Advances to the next tab stop.
    Tab,
    /// A forced line break.
    LineBreak,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableNode {
    pub meta: NodeMetadata,
    pub columns: Vec<TableColumnDefinition>,
    /// Repeated at the top of every page the table spans.
    pub header: Option<TableSection>,
    /// Repeated at the bottom of every page the table spans.
    pub footer: Option<TableSection>,
    pub body: TableSection,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableColumnDefinition {
    pub width: Option<Dimension>,
    pub style: Option<ElementStyle>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableSection {
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub meta: NodeMetadata,
    pub children: Vec<IRNode>,
    pub col_span: usize,
    pub row_span: usize,
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            meta: NodeMetadata::default(),
            children: Vec::new(),
            col_span: 1,
            row_span: 1,
        }
    }
}

impl TableCell {
    pub fn text(text: impl Into<TextStr>) -> Self {
        Self {
            children: vec![IRNode::paragraph(text)],
            ..Default::default()
        }
    }

    pub fn spanning(mut self, col_span: usize, row_span: usize) -> Self {
        self.col_span = col_span;
        self.row_span = row_span;
        self
    }
}
