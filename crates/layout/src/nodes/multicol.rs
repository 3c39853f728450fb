//! Multi-column containers.
//!
//! Content flows through the columns left to right. Column height is found
//! by a bounded search: the natural single-column height divided by the
//! column count is the first guess, and every pass that leaves content over
//! raises the guess by the smallest shortage among the columns that pushed
//! content on.

use super::block::layout_flow;
use super::frame::{BoxFrame, BoxGeometry, FrameOptions, outer_min_max};
use super::{RenderNode, block_attributes};
use crate::interface::{DrawContext, LayoutArea, LayoutContext, LayoutResult, MinMaxWidth, Renderer};
use crate::painting::box_painter::paint_box;
use crate::perf;
use crate::style::ComputedStyle;
use crate::{LayoutEngine, LayoutError};
use quire_traits::TagRole;
use quire_types::{AnchorId, Rect, RendererId};
use std::sync::Arc;

const MEASURE_HEIGHT: f32 = 1.0e6;
/// Smallest step of the height search.
const MIN_STEP: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct MulticolRenderer {
    pub id: RendererId,
    pub style: Arc<ComputedStyle>,
    pub anchor: Option<AnchorId>,
    pub children: Vec<RenderNode>,
    pub continuation: bool,
    pub fixed_height: Option<f32>,
    /// Placed content, column by column.
    pub columns: Vec<Vec<RenderNode>>,
    pub geometry: Option<BoxGeometry>,
}

#[derive(Debug, Default)]
struct ColumnFill {
    columns: Vec<Vec<RenderNode>>,
    remaining: Vec<RenderNode>,
    used: f32,
    cause: Option<RendererId>,
    /// Extra height each overflowing column needed for its next piece.
    shortages: Vec<f32>,
}

impl ColumnFill {
    fn smallest_shortage(&self) -> Option<f32> {
        self.shortages
            .iter()
            .copied()
            .filter(|s| *s > 0.0)
            .reduce(f32::min)
    }
}

impl MulticolRenderer {
    pub fn new(style: Arc<ComputedStyle>, children: Vec<RenderNode>) -> Self {
        let fixed_height = super::frame::style_fixed_height(&style);
        Self {
            id: RendererId::next(),
            style,
            anchor: None,
            children,
            continuation: false,
            fixed_height,
            columns: Vec::new(),
            geometry: None,
        }
    }

    pub fn with_anchor(mut self, anchor: Option<AnchorId>) -> Self {
        self.anchor = anchor;
        self
    }

    /// Column count and width for a content box `width` wide.
    pub fn column_layout(&self, width: f32) -> (usize, f32) {
        let gap = self.style.misc.column_gap;
        let count = match (self.style.misc.column_count, self.style.misc.column_width) {
            (Some(n), _) => n.max(1) as usize,
            (None, Some(w)) if w > 0.0 => (((width + gap) / (w + gap)).floor() as usize).max(1),
            _ => 1,
        };
        let column_width = ((width - gap * (count - 1) as f32) / count as f32).max(0.0);
        (count, column_width)
    }

    /// Height of `children` flowed through one column, without limit.
    fn natural_height(ctx: &LayoutContext, content: Rect, width: f32, children: &[RenderNode]) -> Result<f32, LayoutError> {
        if children.is_empty() {
            return Ok(0.0);
        }
        let area = Rect::from_top_left(content.left(), content.top(), width, MEASURE_HEIGHT);
        let mut floats = Vec::new();
        let mut mctx = ctx.isolated(LayoutArea::new(ctx.area.page_number, area), &mut floats);
        mctx.clipped_height = false;
        Ok(layout_flow(&mut mctx, area, children)?.used)
    }

    /// Height of the smallest leading piece of `node` a column has to hold.
    fn leading_piece(ctx: &LayoutContext, content: Rect, width: f32, node: &RenderNode) -> Result<f32, LayoutError> {
        let area = Rect::from_top_left(content.left(), content.top(), width, 0.0);
        let mut floats = Vec::new();
        let mut mctx = ctx.isolated(LayoutArea::new(ctx.area.page_number, area), &mut floats);
        mctx.clipped_height = false;
        mctx.forced_placement = true;
        mctx.first_in_area = true;
        mctx.measuring = true;
        let mut piece = node.clone();
        Ok(piece.layout(&mut mctx)?.occupied_height())
    }

    /// Flows the children through `count` columns `height` tall. With
    /// `track_shortage`, every column that pushes content on records how much
    /// taller it would have to be for the next piece.
    fn fill(
        &self,
        ctx: &mut LayoutContext,
        content: Rect,
        height: f32,
        track_shortage: bool,
    ) -> Result<ColumnFill, LayoutError> {
        let page = ctx.area.page_number;
        let gap = self.style.misc.column_gap;
        let (count, width) = self.column_layout(content.width);
        let mut out = ColumnFill {
            remaining: self.children.clone(),
            ..Default::default()
        };
        for i in 0..count {
            if out.remaining.is_empty() {
                break;
            }
            let left = content.left() + i as f32 * (width + gap);
            let area = Rect::from_top_left(left, content.top(), width, height);
            let mut floats = Vec::new();
            let mut cctx = ctx.isolated(LayoutArea::new(page, area), &mut floats);
            cctx.first_in_area = ctx.first_in_area || i > 0;
            cctx.forced_placement = ctx.forced_placement && i == 0;
            let flow = layout_flow(&mut cctx, area, &out.remaining)?;
            if track_shortage && let Some(next) = flow.remaining.first() {
                let piece = Self::leading_piece(ctx, area, width, next)?;
                out.shortages.push(piece - (height - flow.used));
            }
            if flow.placed.is_empty() {
                out.cause = flow.cause;
                break;
            }
            out.used = out.used.max(flow.used);
            out.columns.push(flow.placed);
            out.remaining = flow.remaining;
        }
        Ok(out)
    }

    fn balance(&self, ctx: &mut LayoutContext, content: Rect) -> Result<ColumnFill, LayoutError> {
        let available = content.height;
        let definite = self.fixed_height.is_some() && !self.continuation;
        let (count, width) = self.column_layout(content.width);
        if definite || count == 1 {
            return self.fill(ctx, content, available, false);
        }

        let total = Self::natural_height(ctx, content, width, &self.children)?;
        let mut guess = (total / count as f32).min(available);
        let max_passes = ctx.config().max_relayout_count.max(1);
        for pass in 0..max_passes {
            ctx.engine.profiler().count("multicol_pass");
            let fill = self.fill(ctx, content, guess, true)?;
            if fill.remaining.is_empty() || guess >= available {
                log::trace!("Multicol {} balanced at {:.1}pt after {} passes", self.id, guess, pass + 1);
                return Ok(fill);
            }
            let step = fill.smallest_shortage().unwrap_or(MIN_STEP).max(MIN_STEP);
            guess = (guess + step).min(available);
        }
        log::warn!(
            "Multicol {} not balanced after {} passes; filling columns to the available height",
            self.id,
            max_passes
        );
        self.fill(ctx, content, available, false)
    }
}

impl Renderer for MulticolRenderer {
    fn id(&self) -> RendererId {
        self.id
    }

    fn layout(&mut self, ctx: &mut LayoutContext) -> Result<LayoutResult<Self>, LayoutError> {
        let page = ctx.area.page_number;
        let frame = BoxFrame::open(
            &self.style,
            ctx.area.bbox,
            FrameOptions {
                margin_before: ctx.margin_before,
                continuation: self.continuation,
                fixed_height: self.fixed_height,
                ..Default::default()
            },
        );
        if !frame.top_fits(ctx.config().float_epsilon) && !ctx.forced_placement {
            return Ok(LayoutResult::nothing(self.id));
        }

        let content = frame.content_area();
        let outer_clipped = ctx.clipped_height;
        ctx.clipped_height = true;
        let engine = ctx.engine;
        let fill = perf::measure(engine.profiler(), "multicol_balance", || self.balance(ctx, content));
        ctx.clipped_height = outer_clipped;
        let fill = fill?;

        if fill.columns.is_empty() && !fill.remaining.is_empty() {
            return Ok(LayoutResult::nothing(fill.cause.unwrap_or(self.id)));
        }

        let complete = fill.remaining.is_empty() && frame.fixed_height_remainder().is_none();
        let geom = frame.close(page, fill.used, complete, ctx.min_height);
        let occupied = LayoutArea::new(page, geom.margin_box);
        if complete {
            self.columns = fill.columns;
            self.geometry = Some(geom);
            return Ok(LayoutResult::full(occupied));
        }

        let mut split = self.clone();
        split.columns = fill.columns;
        split.geometry = Some(geom);

        let mut overflow = self.clone();
        overflow.children = fill.remaining;
        overflow.continuation = true;
        overflow.fixed_height = frame.fixed_height_remainder();
        overflow.columns = Vec::new();
        overflow.geometry = None;
        Ok(LayoutResult::partial(occupied, split, overflow))
    }

    fn draw(&self, ctx: &mut DrawContext) -> Result<(), LayoutError> {
        let Some(geom) = self.geometry else {
            return Ok(());
        };
        if let Some(anchor) = &self.anchor {
            ctx.register_anchor(anchor, geom.page_number, geom.border_box.top());
        }
        ctx.open_tag(self.id, TagRole::Div, block_attributes(&self.style, &geom))?;
        paint_box(&mut *ctx.canvas, &self.style, &geom)?;
        for node in self.columns.iter().flatten() {
            node.draw(ctx)?;
        }
        ctx.close_tag(self.id)
    }

    fn next_renderer(&self) -> Self {
        let mut next = self.clone();
        next.id = RendererId::next();
        next.columns = Vec::new();
        next.geometry = None;
        next
    }

    fn min_max_width(&self, engine: &LayoutEngine) -> Result<MinMaxWidth, LayoutError> {
        let mut content = MinMaxWidth::default();
        for child in &self.children {
            content = content.stack(child.min_max_width(engine)?);
        }
        let count = self.style.misc.column_count.unwrap_or(1).max(1) as f32;
        let gaps = self.style.misc.column_gap * (count - 1.0);
        let min = match self.style.misc.column_width {
            Some(w) => content.min.max(w),
            None => content.min * count + gaps,
        };
        let columns = MinMaxWidth::new(min, (content.max * count + gaps).max(min));
        Ok(outer_min_max(&self.style, columns))
    }

    fn occupied_area(&self) -> Option<LayoutArea> {
        self.geometry.map(|g| LayoutArea::new(g.page_number, g.margin_box))
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        if let Some(g) = self.geometry.as_mut() {
            g.translate(dx, dy);
        }
        for node in self.columns.iter_mut().flatten() {
            node.translate(dx, dy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_columns(count: Option<u32>, width: Option<f32>, gap: f32) -> MulticolRenderer {
        let mut style = ComputedStyle::default();
        style.misc.column_count = count;
        style.misc.column_width = width;
        style.misc.column_gap = gap;
        MulticolRenderer::new(Arc::new(style), Vec::new())
    }

    #[test]
    fn explicit_count_divides_the_width() {
        let (count, width) = with_columns(Some(3), None, 15.0).column_layout(330.0);
        assert_eq!(count, 3);
        assert_eq!(width, 100.0);
    }

    #[test]
    fn column_width_derives_the_count() {
        let (count, width) = with_columns(None, Some(100.0), 10.0).column_layout(340.0);
        assert_eq!(count, 3);
        assert!((width - 106.666_67).abs() < 1e-3);
        assert_eq!(with_columns(None, Some(500.0), 10.0).column_layout(340.0).0, 1);
    }
}
