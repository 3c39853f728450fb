//! The renderer tree: one variant per element kind, dispatched through
//! [`Renderer`].

pub mod area_break;
pub mod block;
pub mod document;
pub mod flex;
pub mod frame;
pub mod grid;
pub mod image;
pub mod list_item;
pub mod list_utils;
pub mod multicol;
pub mod paragraph;
pub mod table;

use self::area_break::AreaBreakRenderer;
use self::block::BlockRenderer;
use self::flex::FlexRenderer;
use self::frame::BoxGeometry;
use self::grid::GridRenderer;
use self::image::ImageRenderer;
use self::list_item::ListItemRenderer;
use self::multicol::MulticolRenderer;
use self::paragraph::ParagraphRenderer;
use self::table::TableRenderer;
use crate::interface::{DrawContext, LayoutArea, LayoutContext, LayoutResult, MinMaxWidth, Renderer};
use crate::style::ComputedStyle;
use crate::{LayoutEngine, LayoutError};
use quire_style::text::TextAlign;
use quire_traits::TagAttributes;
use quire_types::RendererId;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum RenderNode {
    Block(Box<BlockRenderer>),
    Paragraph(Box<ParagraphRenderer>),
    Image(Box<ImageRenderer>),
    Table(Box<TableRenderer>),
    ListItem(Box<ListItemRenderer>),
    Flex(Box<FlexRenderer>),
    Grid(Box<GridRenderer>),
    Multicol(Box<MulticolRenderer>),
    AreaBreak(Box<AreaBreakRenderer>),
}

macro_rules! dispatch {
    ($node:expr, $r:ident => $body:expr) => {
        match $node {
            RenderNode::Block($r) => $body,
            RenderNode::Paragraph($r) => $body,
            RenderNode::Image($r) => $body,
            RenderNode::Table($r) => $body,
            RenderNode::ListItem($r) => $body,
            RenderNode::Flex($r) => $body,
            RenderNode::Grid($r) => $body,
            RenderNode::Multicol($r) => $body,
            RenderNode::AreaBreak($r) => $body,
        }
    };
}

macro_rules! impl_from {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(impl From<$ty> for RenderNode {
            fn from(r: $ty) -> Self {
                RenderNode::$variant(Box::new(r))
            }
        })*
    };
}

impl_from! {
    Block => BlockRenderer,
    Paragraph => ParagraphRenderer,
    Image => ImageRenderer,
    Table => TableRenderer,
    ListItem => ListItemRenderer,
    Flex => FlexRenderer,
    Grid => GridRenderer,
    Multicol => MulticolRenderer,
    AreaBreak => AreaBreakRenderer,
}

impl RenderNode {
    pub fn style(&self) -> &Arc<ComputedStyle> {
        dispatch!(self, r => &r.style)
    }

    fn style_mut(&mut self) -> &mut Arc<ComputedStyle> {
        dispatch!(self, r => &mut r.style)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RenderNode::Block(_) => "block",
            RenderNode::Paragraph(_) => "paragraph",
            RenderNode::Image(_) => "image",
            RenderNode::Table(_) => "table",
            RenderNode::ListItem(_) => "list-item",
            RenderNode::Flex(_) => "flex",
            RenderNode::Grid(_) => "grid",
            RenderNode::Multicol(_) => "multicol",
            RenderNode::AreaBreak(_) => "area-break",
        }
    }

    pub fn margin_bottom(&self) -> f32 {
        self.style().box_model.margin.bottom
    }

    pub fn keep_with_next(&self) -> bool {
        self.style().misc.keep_with_next
    }

    pub fn is_floating(&self) -> bool {
        self.style().is_floating()
    }

    pub fn is_area_break(&self) -> bool {
        matches!(self, RenderNode::AreaBreak(_))
    }

    /// Drops the element's own width so it fills the slot a flex line or grid
    /// area gives it.
    pub fn release_width(&mut self) {
        if self.style().box_model.width.is_some() {
            Arc::make_mut(self.style_mut()).box_model.width = None;
        }
    }
}

impl Renderer for RenderNode {
    fn id(&self) -> RendererId {
        dispatch!(self, r => r.id())
    }

    fn layout(&mut self, ctx: &mut LayoutContext) -> Result<LayoutResult<Self>, LayoutError> {
        Ok(match self {
            RenderNode::Block(r) => r.layout(ctx)?.map(RenderNode::from),
            RenderNode::Paragraph(r) => r.layout(ctx)?.map(RenderNode::from),
            RenderNode::Image(r) => r.layout(ctx)?.map(RenderNode::from),
            RenderNode::Table(r) => r.layout(ctx)?.map(RenderNode::from),
            RenderNode::ListItem(r) => r.layout(ctx)?.map(RenderNode::from),
            RenderNode::Flex(r) => r.layout(ctx)?.map(RenderNode::from),
            RenderNode::Grid(r) => r.layout(ctx)?.map(RenderNode::from),
            RenderNode::Multicol(r) => r.layout(ctx)?.map(RenderNode::from),
            RenderNode::AreaBreak(r) => r.layout(ctx)?.map(RenderNode::from),
        })
    }

    fn draw(&self, ctx: &mut DrawContext) -> Result<(), LayoutError> {
        dispatch!(self, r => r.draw(ctx))
    }

    fn next_renderer(&self) -> Self {
        dispatch!(self, r => RenderNode::from(r.next_renderer()))
    }

    fn min_max_width(&self, engine: &LayoutEngine) -> Result<MinMaxWidth, LayoutError> {
        dispatch!(self, r => r.min_max_width(engine))
    }

    fn occupied_area(&self) -> Option<LayoutArea> {
        dispatch!(self, r => r.occupied_area())
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        dispatch!(self, r => r.translate(dx, dy))
    }
}

fn text_align_name(align: TextAlign) -> Option<&'static str> {
    match align {
        TextAlign::Left => None,
        TextAlign::Right => Some("End"),
        TextAlign::Center => Some("Center"),
        TextAlign::Justify | TextAlign::JustifyAll => Some("Justify"),
    }
}

/// Layout attributes of a block-level structure element.
pub(crate) fn block_attributes(style: &ComputedStyle, geom: &BoxGeometry) -> TagAttributes {
    let margin = style.box_model.margin;
    let nonzero = |v: f32| (v != 0.0).then_some(v);
    let borders = [style.border.top, style.border.right, style.border.bottom, style.border.left];
    let visible = borders.iter().flatten().filter(|b| b.is_visible());
    let border_color = visible.clone().map(|b| b.color).next();
    let border_thickness = visible.map(|b| b.width).reduce(f32::max);
    TagAttributes {
        bbox: Some(geom.border_box),
        space_before: nonzero(margin.top).filter(|_| geom.draw_top),
        space_after: nonzero(margin.bottom).filter(|_| geom.draw_bottom),
        start_indent: nonzero(margin.left),
        end_indent: nonzero(margin.right),
        text_align: text_align_name(style.text.text_align),
        background_color: style.misc.background_color,
        border_color,
        border_thickness,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_style::border::Border;
    use quire_style::dimension::Dimension;
    use quire_types::Rect;

    fn block(style: ComputedStyle) -> RenderNode {
        BlockRenderer::new(block::BlockKind::Div, Arc::new(style), Vec::new()).into()
    }

    #[test]
    fn release_width_leaves_other_nodes_untouched() {
        let mut style = ComputedStyle::default();
        style.box_model.width = Some(Dimension::Pt(120.0));
        let original = block(style);
        let mut released = original.clone();
        released.release_width();
        assert_eq!(released.style().box_model.width, None);
        assert_eq!(original.style().box_model.width, Some(Dimension::Pt(120.0)));
    }

    #[test]
    fn attributes_report_margins_and_borders() {
        let mut style = ComputedStyle::default();
        style.box_model.margin.top = 6.0;
        style.border.left = Some(Border::solid(2.0));
        style.text.text_align = TextAlign::Center;
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let geom = BoxGeometry {
            page_number: 1,
            margin_box: rect,
            border_box: rect,
            content_box: rect,
            draw_top: true,
            draw_bottom: true,
        };
        let attrs = block_attributes(&style, &geom);
        assert_eq!(attrs.space_before, Some(6.0));
        assert_eq!(attrs.space_after, None);
        assert_eq!(attrs.border_thickness, Some(2.0));
        assert_eq!(attrs.text_align, Some("Center"));
    }
}
