use crate::interface::{DrawContext, LayoutArea, LayoutContext, LayoutResult, LayoutStatus, MinMaxWidth, Renderer};
use crate::nodes::block::BlockRenderer;
use crate::nodes::block_attributes;
use crate::nodes::frame::{BoxFrame, BoxGeometry, FrameOptions};
use crate::painting::box_painter::paint_borders;
use crate::style::ComputedStyle;
use crate::{LayoutEngine, LayoutError};
use quire_style::border::Border;
use quire_style::table::VerticalAlign;
use quire_traits::TagRole;
use quire_types::{AnchorId, RendererId};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CellRenderer {
    pub id: RendererId,
    pub style: Arc<ComputedStyle>,
    pub anchor: Option<AnchorId>,
    /// Slot of the cell in its section, before any page split.
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
    /// Row this fragment of the cell starts in.
    pub first_row: usize,
    pub is_header: bool,
    pub content: BlockRenderer,
    /// Border widths reserved inside the cell, `[top, right, bottom, left]`.
    pub insets: [f32; 4],
    /// Borders the cell paints itself (separated model only).
    pub borders: [Option<Border>; 4],
    pub continuation: bool,
    pub geometry: Option<BoxGeometry>,
}

impl CellRenderer {
    pub fn new(style: Arc<ComputedStyle>, content: BlockRenderer, row: usize, col: usize) -> Self {
        Self {
            id: RendererId::next(),
            style,
            anchor: None,
            row,
            col,
            row_span: 1,
            col_span: 1,
            first_row: row,
            is_header: false,
            content,
            insets: [0.0; 4],
            borders: [None; 4],
            continuation: false,
            geometry: None,
        }
    }

    /// First row after the cell.
    pub fn end_row(&self) -> usize {
        self.row + self.row_span
    }

    /// The part of the cell continuing at `row` with `content` left to place.
    pub fn continued_at(&self, row: usize, content: BlockRenderer) -> Self {
        let mut next = self.clone();
        next.first_row = row.max(self.row);
        next.content = content;
        next.continuation = true;
        next.geometry = None;
        next
    }

    /// The same cell with all of its content removed.
    pub fn emptied(&self) -> Self {
        let mut shell = self.clone();
        shell.content.children.clear();
        shell.geometry = None;
        shell
    }

    /// Stretches a placed cell down to `bottom` and applies its vertical alignment.
    pub fn fit_to(&mut self, bottom: f32) {
        let Some(geom) = self.geometry.as_mut() else {
            return;
        };
        let extra = geom.border_box.bottom() - bottom;
        if extra <= 0.0 {
            return;
        }
        geom.border_box.set_bottom(bottom);
        geom.margin_box.set_bottom(bottom);
        let shift = match self.style.table.vertical_align {
            VerticalAlign::Top => 0.0,
            VerticalAlign::Middle => extra / 2.0,
            VerticalAlign::Bottom => extra,
        };
        if shift > 0.0 {
            self.content.translate(0.0, -shift);
        }
    }

    pub fn bottom(&self) -> Option<f32> {
        self.geometry.map(|g| g.border_box.bottom())
    }

    fn horizontal_insets(&self) -> f32 {
        self.insets[1] + self.insets[3] + self.style.box_model.padding.horizontal()
    }
}

impl Renderer for CellRenderer {
    fn id(&self) -> RendererId {
        self.id
    }

    fn layout(&mut self, ctx: &mut LayoutContext) -> Result<LayoutResult<Self>, LayoutError> {
        let page = ctx.area.page_number;
        let frame = BoxFrame::open(
            &self.style,
            ctx.area.bbox,
            FrameOptions {
                continuation: self.continuation,
                content_width: Some((ctx.area.bbox.width - self.horizontal_insets()).max(0.0)),
                borders: Some(self.insets),
                no_margins: true,
                ..Default::default()
            },
        );
        if !frame.top_fits(ctx.config().float_epsilon) && !ctx.forced_placement {
            return Ok(LayoutResult::nothing(self.id));
        }

        let mut content = self.content.clone();
        let result = {
            let mut cctx = ctx.child(LayoutArea::new(page, frame.content_area()));
            content.layout(&mut cctx)?
        };
        let used = result.occupied_height();
        match (result.status, result.split, result.overflow) {
            (LayoutStatus::Full, _, _) => {
                let geom = frame.close(page, used, true, None);
                self.content = content;
                self.geometry = Some(geom);
                Ok(LayoutResult::full(LayoutArea::new(page, geom.margin_box)))
            }
            (LayoutStatus::Partial, Some(split), Some(rest)) => {
                let geom = frame.close(page, used, false, None);
                let mut placed = self.clone();
                placed.content = split;
                placed.geometry = Some(geom);
                let overflow = self.continued_at(self.first_row, rest);
                Ok(LayoutResult::partial(LayoutArea::new(page, geom.margin_box), placed, overflow))
            }
            _ => Ok(LayoutResult::nothing(result.cause_of_nothing.unwrap_or(self.id))),
        }
    }

    fn draw(&self, ctx: &mut DrawContext) -> Result<(), LayoutError> {
        let Some(geom) = self.geometry else {
            return Ok(());
        };
        if let Some(anchor) = &self.anchor {
            ctx.register_anchor(anchor, geom.page_number, geom.border_box.top());
        }
        let role = if self.is_header { TagRole::TH } else { TagRole::TD };
        let mut attributes = block_attributes(&self.style, &geom);
        attributes.row_span = Some(self.row_span);
        attributes.col_span = Some(self.col_span);
        ctx.open_tag(self.id, role, attributes)?;
        if let Some(color) = self.style.misc.background_color {
            ctx.canvas.fill_rect(geom.border_box, color)?;
        }
        let borders = [
            self.borders[0].filter(|_| geom.draw_top),
            self.borders[1],
            self.borders[2].filter(|_| geom.draw_bottom),
            self.borders[3],
        ];
        paint_borders(&mut *ctx.canvas, geom.border_box, &borders)?;
        self.content.draw(ctx)?;
        ctx.close_tag(self.id)
    }

    fn next_renderer(&self) -> Self {
        let mut next = self.clone();
        next.id = RendererId::next();
        next.content = self.content.next_renderer();
        next.geometry = None;
        next
    }

    fn min_max_width(&self, engine: &LayoutEngine) -> Result<MinMaxWidth, LayoutError> {
        Ok(self.content.min_max_width(engine)?.plus(self.horizontal_insets()))
    }

    fn occupied_area(&self) -> Option<LayoutArea> {
        self.geometry.map(|g| LayoutArea::new(g.page_number, g.margin_box))
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        if let Some(g) = self.geometry.as_mut() {
            g.translate(dx, dy);
        }
        self.content.translate(dx, dy);
    }
}
