use crate::engine::{LayoutEngine, RenderSummary};
use crate::interface::{LayoutArea, LayoutContext, LayoutResult, Renderer};
use crate::nodes::RenderNode;
use crate::{LayoutConfig, LayoutError};
use quire_idf::{IRNode, InlineNode, NodeMetadata};
use quire_style::dimension::{Margins, PageSize};
use quire_style::stylesheet::{ElementStyle, PageLayout, Stylesheet};
use quire_traits::{RecordingCanvas, TagRecorder};
use quire_types::Rect;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a default layout engine for testing purposes.
pub fn create_test_engine() -> LayoutEngine {
    init_logging();
    LayoutEngine::new(Stylesheet::default(), LayoutConfig::default())
}

/// A stylesheet with a single `width` x `height` page master and no margins.
pub fn page_stylesheet(width: f32, height: f32) -> Stylesheet {
    let mut stylesheet = Stylesheet::default();
    stylesheet.page_masters.insert(
        "default".to_string(),
        PageLayout {
            size: PageSize::Custom { width, height },
            margins: Some(Margins::default()),
            columns: None,
            column_gap: None,
        },
    );
    stylesheet.default_page_master_name = Some("default".to_string());
    stylesheet
}

pub fn engine_with_page(width: f32, height: f32) -> LayoutEngine {
    init_logging();
    LayoutEngine::new(page_stylesheet(width, height), LayoutConfig::default())
}

/// Builds the single top-level renderer of `node`.
pub fn build_node(engine: &LayoutEngine, node: IRNode) -> RenderNode {
    let mut document = engine.build(&IRNode::Root(vec![node])).expect("document builds");
    document.children.remove(0)
}

/// Lays `node` out in a `width` x `height` area with its top-left corner at
/// the origin of a tall page.
pub fn layout_in(
    engine: &LayoutEngine,
    node: &mut RenderNode,
    width: f32,
    height: f32,
) -> Result<LayoutResult<RenderNode>, LayoutError> {
    let area = LayoutArea::new(1, Rect::from_top_left(0.0, 1000.0, width, height));
    let mut floats = Vec::new();
    let mut ctx = LayoutContext::new(engine, area, &mut floats);
    node.layout(&mut ctx)
}

/// Lays out and draws `nodes` as a whole document.
pub fn render_nodes(
    engine: &LayoutEngine,
    nodes: Vec<IRNode>,
) -> Result<(RecordingCanvas, TagRecorder, RenderSummary), LayoutError> {
    let mut canvas = RecordingCanvas::new();
    let mut tags = TagRecorder::new();
    let summary = engine.render(&IRNode::Root(nodes), &mut canvas, Some(&mut tags))?;
    Ok((canvas, tags, summary))
}

pub fn create_paragraph(text: &str) -> IRNode {
    let mut children = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            children.push(InlineNode::LineBreak);
        }
        if !line.is_empty() {
            children.push(InlineNode::Text(line.to_string()));
        }
    }

    IRNode::Paragraph {
        meta: NodeMetadata::default(),
        children,
    }
}

pub fn styled_paragraph(text: &str, style: ElementStyle) -> IRNode {
    IRNode::Paragraph {
        meta: NodeMetadata::with_style(style),
        children: vec![InlineNode::Text(text.to_string())],
    }
}

pub fn styled_block(style: ElementStyle, children: Vec<IRNode>) -> IRNode {
    IRNode::Block {
        meta: NodeMetadata::with_style(style),
        children,
    }
}
