//! Turns an [`IRNode`] tree into a renderer tree.
//!
//! Styles are resolved here, once per node, against the parent's computed
//! style. Content that a container cannot take as an item directly gets an
//! anonymous box around it.

use crate::LayoutError;
use crate::engine::LayoutEngine;
use crate::nodes::RenderNode;
use crate::nodes::area_break::AreaBreakRenderer;
use crate::nodes::block::{BlockKind, BlockRenderer};
use crate::nodes::document::DocumentRenderer;
use crate::nodes::flex::FlexRenderer;
use crate::nodes::grid::GridRenderer;
use crate::nodes::image::ImageRenderer;
use crate::nodes::list_item::ListItemRenderer;
use crate::nodes::list_utils::{effective_style_type, get_marker_text};
use crate::nodes::multicol::MulticolRenderer;
use crate::nodes::paragraph::{InlineImageRenderer, InlineRenderer, ParagraphRenderer, TabRenderer, TextRenderer};
use crate::nodes::table::{CellSpec, TableRenderer};
use crate::style::ComputedStyle;
use quire_idf::{IRNode, InlineNode, NodeMetadata, TableColumnDefinition, TableNode, TableSection};
use quire_style::stylesheet::ElementStyle;
use quire_types::AnchorId;
use std::sync::Arc;

/// Which kind of container the children being built belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parent {
    Flow,
    /// Flex and grid containers take block-level boxes as items.
    ItemContainer,
}

pub struct TreeBuilder<'e> {
    engine: &'e LayoutEngine,
    list_depth: usize,
}

fn anchor_of(meta: &NodeMetadata) -> Option<AnchorId> {
    meta.id.as_deref().map(AnchorId::from)
}

/// Splits the style of a paragraph or image placed directly in a flex or grid
/// container between the anonymous box around it and the element itself. The
/// box takes the item properties, the outer margins and the width constraints.
fn split_item_style(style: &Arc<ComputedStyle>) -> (Arc<ComputedStyle>, Arc<ComputedStyle>) {
    let mut outer = (**style).clone();
    outer.border = Default::default();
    outer.box_model.padding = Default::default();
    outer.box_model.height = None;
    outer.box_model.min_height = None;
    outer.box_model.max_height = None;
    outer.misc.background_color = None;

    let mut inner = (**style).clone();
    inner.box_model.margin = Default::default();
    inner.box_model.width = None;
    inner.box_model.min_width = None;
    inner.box_model.max_width = None;
    inner.flex = Default::default();
    inner.grid = Default::default();
    (Arc::new(outer), Arc::new(inner))
}

impl<'e> TreeBuilder<'e> {
    pub fn new(engine: &'e LayoutEngine) -> Self {
        Self { engine, list_depth: 0 }
    }

    pub fn build_document(&mut self, root: &IRNode) -> Result<DocumentRenderer, LayoutError> {
        let IRNode::Root(children) = root else {
            return Err(LayoutError::BuilderMismatch("root", root.kind()));
        };
        let style = self.engine.get_default_style();
        let mut nodes = Vec::with_capacity(children.len());
        for child in children {
            if let IRNode::AreaBreak { master_name } = child {
                nodes.push(AreaBreakRenderer::new(master_name.clone(), style.clone()).into());
            } else {
                nodes.extend(self.build_node(child, &style, Parent::Flow)?);
            }
        }
        log::debug!("Built {} top-level renderers", nodes.len());
        Ok(DocumentRenderer::new(style, nodes))
    }

    fn style_for(&self, node: &IRNode, parent: &Arc<ComputedStyle>) -> Arc<ComputedStyle> {
        self.engine.compute_style(node.style_sets(), node.style_override(), parent)
    }

    fn build_children(
        &mut self,
        children: &[IRNode],
        style: &Arc<ComputedStyle>,
        parent: Parent,
    ) -> Result<Vec<RenderNode>, LayoutError> {
        let mut nodes = Vec::with_capacity(children.len());
        for child in children {
            nodes.extend(self.build_node(child, style, parent)?);
        }
        Ok(nodes)
    }

    /// Builds one node. Area breaks below the root produce nothing.
    fn build_node(
        &mut self,
        node: &IRNode,
        parent_style: &Arc<ComputedStyle>,
        parent: Parent,
    ) -> Result<Option<RenderNode>, LayoutError> {
        let style = self.style_for(node, parent_style);
        let built: RenderNode = match node {
            IRNode::Root(_) => return Err(LayoutError::BuilderMismatch("block-level", node.kind())),
            IRNode::AreaBreak { .. } => {
                log::warn!("Area break inside a nested container ignored; breaks only apply at the document root");
                return Ok(None);
            }
            IRNode::Block { meta, children } => {
                let children = self.build_children(children, &style, Parent::Flow)?;
                BlockRenderer::new(BlockKind::Div, style, children)
                    .with_anchor(anchor_of(meta))
                    .into()
            }
            IRNode::Paragraph { meta, children } if parent == Parent::ItemContainer => {
                let (outer, inner) = split_item_style(&style);
                let inlines = self.build_inlines(children, &inner);
                let paragraph = ParagraphRenderer::new(inner, inlines).with_anchor(anchor_of(meta));
                BlockRenderer::anonymous(outer, vec![paragraph.into()]).into()
            }
            IRNode::Paragraph { meta, children } => {
                let inlines = self.build_inlines(children, &style);
                ParagraphRenderer::new(style, inlines).with_anchor(anchor_of(meta)).into()
            }
            IRNode::Image { meta, source } if parent == Parent::ItemContainer => {
                let (outer, inner) = split_item_style(&style);
                let image = ImageRenderer::new(inner, source.clone()).with_anchor(anchor_of(meta));
                BlockRenderer::anonymous(outer, vec![image.into()]).into()
            }
            IRNode::Image { meta, source } => ImageRenderer::new(style, source.clone())
                .with_anchor(anchor_of(meta))
                .into(),
            IRNode::FlexContainer { meta, children } => {
                let items = self.build_children(children, &style, Parent::ItemContainer)?;
                FlexRenderer::new(style, items).with_anchor(anchor_of(meta)).into()
            }
            IRNode::GridContainer { meta, children } => {
                let items = self.build_children(children, &style, Parent::ItemContainer)?;
                GridRenderer::new(style, items).with_anchor(anchor_of(meta)).into()
            }
            IRNode::MultiColumn { meta, children } => {
                let children = self.build_children(children, &style, Parent::Flow)?;
                MulticolRenderer::new(style, children)
                    .with_anchor(anchor_of(meta))
                    .into()
            }
            IRNode::List { meta, start, children } => self.build_list(meta, *start, children, style)?.into(),
            IRNode::ListItem { meta, children } => {
                // An item outside a list is numbered as a list of one.
                self.build_list_item(meta, children, style, 1)?.into()
            }
            IRNode::Table(table) => self.build_table(table, style)?.into(),
        };
        Ok(Some(built))
    }

    fn build_list(
        &mut self,
        meta: &NodeMetadata,
        start: Option<usize>,
        children: &[IRNode],
        style: Arc<ComputedStyle>,
    ) -> Result<BlockRenderer, LayoutError> {
        let numbering = effective_style_type(style.list.style_type, self.list_depth);
        let mut index = start.unwrap_or(1);
        let mut items = Vec::with_capacity(children.len());
        for child in children {
            match child {
                IRNode::ListItem {
                    meta: item_meta,
                    children: item_children,
                } => {
                    let item_style = self.style_for(child, &style);
                    let item = self.build_list_item(item_meta, item_children, item_style, index)?;
                    items.push(item.into());
                    index += 1;
                }
                other => {
                    log::warn!("List holds a {} where a list item is expected; laying it out as a block", other.kind());
                    items.extend(self.build_node(other, &style, Parent::Flow)?);
                }
            }
        }
        Ok(BlockRenderer::new(BlockKind::List { numbering }, style, items).with_anchor(anchor_of(meta)))
    }

    fn build_list_item(
        &mut self,
        meta: &NodeMetadata,
        children: &[IRNode],
        style: Arc<ComputedStyle>,
        index: usize,
    ) -> Result<ListItemRenderer, LayoutError> {
        let marker = get_marker_text(&style, index, self.list_depth);
        self.list_depth += 1;
        let body = self.build_children(children, &style, Parent::Flow);
        self.list_depth -= 1;
        let body_style = self.engine.compute_style(&[], None, &style);
        let body = BlockRenderer::anonymous(body_style, body?);
        Ok(ListItemRenderer::new(style, marker, body).with_anchor(anchor_of(meta)))
    }

    fn build_table(&mut self, table: &TableNode, style: Arc<ComputedStyle>) -> Result<TableRenderer, LayoutError> {
        let columns = table.columns.iter().map(|c| c.width).collect();
        let header = table
            .header
            .as_ref()
            .map(|s| self.build_section(s, &table.columns, &style))
            .transpose()?;
        let footer = table
            .footer
            .as_ref()
            .map(|s| self.build_section(s, &table.columns, &style))
            .transpose()?;
        let body = self.build_section(&table.body, &table.columns, &style)?;
        Ok(TableRenderer::new(style, columns, header, body, footer)?.with_anchor(anchor_of(&table.meta)))
    }

    /// Builds the cells of a section. A column's style applies beneath the
    /// style of cells starting in that column.
    fn build_section(
        &mut self,
        section: &TableSection,
        columns: &[TableColumnDefinition],
        table_style: &Arc<ComputedStyle>,
    ) -> Result<Vec<Vec<CellSpec>>, LayoutError> {
        let mut rows = Vec::with_capacity(section.rows.len());
        for row in &section.rows {
            let mut cells = Vec::with_capacity(row.cells.len());
            let mut column = 0;
            for cell in &row.cells {
                let mut style_sets: Vec<Arc<ElementStyle>> = Vec::new();
                if let Some(col_style) = columns.get(column).and_then(|c| c.style.as_ref()) {
                    style_sets.push(Arc::new(col_style.clone()));
                }
                style_sets.extend(cell.meta.style_sets.iter().cloned());
                let style = self
                    .engine
                    .compute_style(&style_sets, cell.meta.style_override.as_ref(), table_style);

                let children = self.build_children(&cell.children, &style, Parent::Flow)?;
                let content_style = self.engine.compute_style(&[], None, &style);
                cells.push(CellSpec {
                    anchor: anchor_of(&cell.meta),
                    content: BlockRenderer::anonymous(content_style, children),
                    col_span: cell.col_span.max(1),
                    row_span: cell.row_span.max(1),
                    style,
                });
                column += cell.col_span.max(1);
            }
            rows.push(cells);
        }
        Ok(rows)
    }

    fn build_inlines(&self, inlines: &[InlineNode], style: &Arc<ComputedStyle>) -> Vec<InlineRenderer> {
        let mut out = Vec::with_capacity(inlines.len());
        self.collect_inlines(inlines, style, &mut out);
        out
    }

    fn collect_inlines(&self, inlines: &[InlineNode], style: &Arc<ComputedStyle>, out: &mut Vec<InlineRenderer>) {
        for inline in inlines {
            match inline {
                InlineNode::Text(text) => out.push(InlineRenderer::Text(TextRenderer::new(style.clone(), text.clone()))),
                InlineNode::StyledSpan { meta, children } => {
                    let span_style =
                        self.engine
                            .compute_style(&meta.style_sets, meta.style_override.as_ref(), style);
                    self.collect_inlines(children, &span_style, out);
                }
                InlineNode::Image { meta, source } => {
                    let image_style =
                        self.engine
                            .compute_style(&meta.style_sets, meta.style_override.as_ref(), style);
                    out.push(InlineRenderer::Image(InlineImageRenderer::new(image_style, source.clone())));
                }
                InlineNode::Tab => out.push(InlineRenderer::Tab(TabRenderer::new(style.clone()))),
                InlineNode::LineBreak => out.push(InlineRenderer::LineBreak),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LayoutConfig;
    use crate::interface::Renderer;
    use quire_idf::{TableCell, TableRow};
    use quire_style::list::ListStyleType;
    use quire_style::stylesheet::Stylesheet;

    fn engine() -> LayoutEngine {
        LayoutEngine::new(Stylesheet::default(), LayoutConfig::default())
    }

    fn build(root: IRNode) -> DocumentRenderer {
        let engine = engine();
        TreeBuilder::new(&engine).build_document(&root).unwrap()
    }

    #[test]
    fn rejects_a_non_root_document() {
        let engine = engine();
        let err = TreeBuilder::new(&engine)
            .build_document(&IRNode::paragraph("x"))
            .unwrap_err();
        assert!(matches!(err, LayoutError::BuilderMismatch("root", "paragraph")));
    }

    #[test]
    fn paragraphs_in_flex_containers_get_anonymous_boxes() {
        let doc = build(IRNode::Root(vec![IRNode::FlexContainer {
            meta: NodeMetadata::default(),
            children: vec![IRNode::paragraph("a"), IRNode::paragraph("b")],
        }]));
        let RenderNode::Flex(flex) = &doc.children[0] else {
            panic!("expected a flex container");
        };
        assert_eq!(flex.items.len(), 2);
        for item in &flex.items {
            let RenderNode::Block(block) = item else {
                panic!("expected an anonymous box, got {}", item.kind());
            };
            assert_eq!(block.kind, BlockKind::Anonymous);
            assert_eq!(block.children[0].kind(), "paragraph");
        }
    }

    #[test]
    fn nested_area_breaks_are_dropped() {
        let doc = build(IRNode::Root(vec![
            IRNode::Block {
                meta: NodeMetadata::default(),
                children: vec![IRNode::AreaBreak { master_name: None }, IRNode::paragraph("x")],
            },
            IRNode::AreaBreak { master_name: None },
        ]));
        assert_eq!(doc.children.len(), 2);
        let RenderNode::Block(block) = &doc.children[0] else {
            panic!("expected a block");
        };
        assert_eq!(block.children.len(), 1);
        assert!(doc.children[1].is_area_break());
    }

    #[test]
    fn list_items_are_numbered_from_start() {
        let mut style = ElementStyle::default();
        style.list_style_type = Some(ListStyleType::Decimal);
        let item = || IRNode::ListItem {
            meta: NodeMetadata::default(),
            children: vec![IRNode::paragraph("item")],
        };
        let doc = build(IRNode::Root(vec![IRNode::List {
            meta: NodeMetadata::with_style(style),
            start: Some(4),
            children: vec![item(), item()],
        }]));
        let RenderNode::Block(list) = &doc.children[0] else {
            panic!("expected a list block");
        };
        assert_eq!(list.kind, BlockKind::List { numbering: ListStyleType::Decimal });
        let markers: Vec<_> = list
            .children
            .iter()
            .map(|n| match n {
                RenderNode::ListItem(li) => li.marker.text.clone(),
                _ => String::new(),
            })
            .collect();
        assert_eq!(markers, ["4.", "5."]);
    }

    #[test]
    fn table_cells_keep_their_spans() {
        let table = TableNode {
            body: TableSection {
                rows: vec![
                    TableRow {
                        cells: vec![TableCell::text("wide").spanning(2, 1)],
                    },
                    TableRow {
                        cells: vec![TableCell::text("a"), TableCell::text("b")],
                    },
                ],
            },
            ..Default::default()
        };
        let doc = build(IRNode::Root(vec![IRNode::Table(Box::new(table))]));
        let RenderNode::Table(table) = &doc.children[0] else {
            panic!("expected a table");
        };
        assert_eq!(table.column_count, 2);
        assert!(table.next_renderer().id() != table.id());
    }
}
