use super::block::BlockRenderer;
use super::block_attributes;
use super::frame::{BoxFrame, BoxGeometry, FrameOptions, outer_min_max};
use super::paragraph::{TextPlacement, TextRenderer};
use crate::interface::{DrawContext, LayoutArea, LayoutContext, LayoutResult, LayoutStatus, MinMaxWidth, Renderer};
use crate::painting::box_painter::paint_box;
use crate::style::ComputedStyle;
use crate::{LayoutEngine, LayoutError};
use quire_style::list::ListStylePosition;
use quire_traits::{TagAttributes, TagRole};
use quire_types::{AnchorId, Point, Rect, RendererId};
use std::sync::Arc;

/// A list item: a marker label next to an anonymous body block.
#[derive(Debug, Clone)]
pub struct ListItemRenderer {
    pub id: RendererId,
    pub style: Arc<ComputedStyle>,
    pub anchor: Option<AnchorId>,
    pub marker: TextRenderer,
    pub body: BlockRenderer,
    pub continuation: bool,
    pub geometry: Option<BoxGeometry>,
}

impl ListItemRenderer {
    pub fn new(style: Arc<ComputedStyle>, marker_text: String, body: BlockRenderer) -> Self {
        Self {
            id: RendererId::next(),
            marker: TextRenderer::new(style.clone(), marker_text),
            style,
            anchor: None,
            body,
            continuation: false,
            geometry: None,
        }
    }

    pub fn with_anchor(mut self, anchor: Option<AnchorId>) -> Self {
        self.anchor = anchor;
        self
    }

    fn is_outside(&self) -> bool {
        self.style.list.style_position == ListStylePosition::Outside
    }

    fn has_marker(&self) -> bool {
        !self.marker.text.is_empty()
    }

    /// Horizontal space an inside marker takes from the body.
    fn inside_offset(&self, engine: &LayoutEngine) -> f32 {
        if self.is_outside() || !self.has_marker() {
            return 0.0;
        }
        engine.measure_text(&self.style, &self.marker.text) + self.style.list.symbol_indent
    }

    fn place_marker(&mut self, engine: &LayoutEngine, page_number: usize, content: Rect) {
        let width = engine.measure_text(&self.style, &self.marker.text);
        let (ascent, descent) = engine.line_extents(&self.style);
        let x = if self.is_outside() {
            content.left() - self.style.list.symbol_indent - width
        } else {
            content.left()
        };
        self.marker.placement = Some(TextPlacement {
            page_number,
            origin: Point::new(x, content.top() - ascent),
            width,
            ascent,
            descent,
            extra_char_spacing: 0.0,
            extra_word_spacing: 0.0,
        });
    }
}

impl Renderer for ListItemRenderer {
    fn id(&self) -> RendererId {
        self.id
    }

    fn layout(&mut self, ctx: &mut LayoutContext) -> Result<LayoutResult<Self>, LayoutError> {
        let engine = ctx.engine;
        let page = ctx.area.page_number;
        let frame = BoxFrame::open(
            &self.style,
            ctx.area.bbox,
            FrameOptions {
                margin_before: ctx.margin_before,
                continuation: self.continuation,
                ..Default::default()
            },
        );
        if !frame.top_fits(ctx.config().float_epsilon) && !ctx.forced_placement {
            return Ok(LayoutResult::nothing(self.id));
        }

        let content = frame.content_area();
        let offset = self.inside_offset(engine);
        let body_area = Rect::new(
            content.left() + offset,
            content.bottom(),
            (content.width - offset).max(0.0),
            content.height,
        );
        let mut body = self.body.clone();
        let result = {
            let mut cctx = ctx.child(LayoutArea::new(page, body_area));
            body.layout(&mut cctx)?
        };

        let (status, used) = (result.status, result.occupied_height());
        let (placed_body, rest) = match (status, result.split, result.overflow) {
            (LayoutStatus::Full, _, _) => (body, None),
            (LayoutStatus::Partial, Some(split), Some(overflow)) => (split, Some(overflow)),
            _ => return Ok(LayoutResult::nothing(result.cause_of_nothing.unwrap_or(self.id))),
        };

        let complete = rest.is_none();
        let geom = frame.close(page, used, complete, ctx.min_height);
        let occupied = LayoutArea::new(page, geom.margin_box);

        let mut placed = self.clone();
        placed.body = placed_body;
        placed.geometry = Some(geom);
        if !self.continuation && self.has_marker() {
            placed.place_marker(engine, page, content);
        }

        match rest {
            None => {
                *self = placed;
                Ok(LayoutResult::full(occupied))
            }
            Some(rest) => {
                let mut overflow = self.clone();
                overflow.body = rest;
                overflow.continuation = true;
                overflow.geometry = None;
                overflow.marker.placement = None;
                Ok(LayoutResult::partial(occupied, placed, overflow))
            }
        }
    }

    fn draw(&self, ctx: &mut DrawContext) -> Result<(), LayoutError> {
        let Some(geom) = self.geometry else {
            return Ok(());
        };
        if let Some(anchor) = &self.anchor {
            ctx.register_anchor(anchor, geom.page_number, geom.border_box.top());
        }
        ctx.open_tag(self.id, TagRole::LI, block_attributes(&self.style, &geom))?;
        paint_box(&mut *ctx.canvas, &self.style, &geom)?;
        if self.marker.placement.is_some() {
            ctx.open_tag(self.marker.id, TagRole::Lbl, TagAttributes::default())?;
            self.marker.draw(ctx)?;
            ctx.close_tag(self.marker.id)?;
        }
        ctx.open_tag(self.body.id, TagRole::LBody, TagAttributes::default())?;
        self.body.draw(ctx)?;
        ctx.close_tag(self.body.id)?;
        ctx.close_tag(self.id)
    }

    fn next_renderer(&self) -> Self {
        let mut next = self.clone();
        next.id = RendererId::next();
        next.body = self.body.next_renderer();
        next.marker = self.marker.next_renderer();
        next.geometry = None;
        next
    }

    fn min_max_width(&self, engine: &LayoutEngine) -> Result<MinMaxWidth, LayoutError> {
        let body = self.body.min_max_width(engine)?;
        Ok(outer_min_max(&self.style, body.plus(self.inside_offset(engine))))
    }

    fn occupied_area(&self) -> Option<LayoutArea> {
        self.geometry.map(|g| LayoutArea::new(g.page_number, g.margin_box))
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        if let Some(g) = self.geometry.as_mut() {
            g.translate(dx, dy);
        }
        self.marker.translate(dx, dy);
        self.body.translate(dx, dy);
    }
}
