//! Flex containers.
//!
//! Row containers resolve item widths line by line and lay every item of a
//! line out from the same top. Column containers flow their items top-down;
//! `column-reverse` holds them in reverse and, with a definite height, packs
//! them against the bottom edge. A row line whose first item does not fit
//! completely moves to the next area as a whole; otherwise the items after the
//! first split one are cut at the same height, and the unfinished items of the
//! line continue in the next area at the positions they were given here.

use super::frame::{BoxFrame, BoxGeometry, FrameOptions, outer_min_max};
use super::{RenderNode, block_attributes};
use crate::algorithms::flex_solver::{FlexItemInfo, collect_lines, justify_offsets, resolve_flexible_lengths};
use crate::interface::{DrawContext, LayoutArea, LayoutContext, LayoutResult, LayoutStatus, MinMaxWidth, Renderer};
use crate::painting::box_painter::paint_box;
use crate::style::ComputedStyle;
use crate::{LayoutEngine, LayoutError};
use quire_style::dimension::Dimension;
use quire_style::flex::{AlignItems, FlexDirection, FlexWrap};
use quire_style::text::BaseDirection;
use quire_traits::TagRole;
use quire_types::{AnchorId, Rect, RendererId};
use std::sync::Arc;

/// Height offered when measuring the natural height of a column item.
const MEASURE_HEIGHT: f32 = 1.0e6;

/// How the main axis maps onto the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlexDirector {
    Row,
    RowReverse,
    Column,
    ColumnReverse,
    /// A `row` container with right-to-left base direction.
    RtlRow,
}

impl FlexDirector {
    pub fn for_style(style: &ComputedStyle) -> Self {
        let rtl = style.text.base_direction == BaseDirection::RightToLeft;
        match (style.flex.direction, rtl) {
            (FlexDirection::Row, false) | (FlexDirection::RowReverse, true) => FlexDirector::Row,
            (FlexDirection::Row, true) => FlexDirector::RtlRow,
            (FlexDirection::RowReverse, false) => FlexDirector::RowReverse,
            (FlexDirection::Column, _) => FlexDirector::Column,
            (FlexDirection::ColumnReverse, _) => FlexDirector::ColumnReverse,
        }
    }

    pub fn is_row(self) -> bool {
        matches!(self, FlexDirector::Row | FlexDirector::RowReverse | FlexDirector::RtlRow)
    }

    pub fn is_reversed(self) -> bool {
        matches!(
            self,
            FlexDirector::RowReverse | FlexDirector::ColumnReverse | FlexDirector::RtlRow
        )
    }

    /// Left edge of an item `size` wide placed `offset` from the line start
    /// on a line spanning `start..start + extent`.
    pub fn main_position(self, start: f32, extent: f32, offset: f32, size: f32) -> f32 {
        if self.is_reversed() {
            start + extent - offset - size
        } else {
            start + offset
        }
    }
}

/// An item with its resolved main-axis slot on a line.
#[derive(Debug, Clone)]
pub struct LineItem {
    pub node: RenderNode,
    /// Distance from the line start.
    pub offset: f32,
    pub width: f32,
}

#[derive(Debug, Clone)]
pub struct FlexRenderer {
    pub id: RendererId,
    pub style: Arc<ComputedStyle>,
    pub anchor: Option<AnchorId>,
    /// Items not yet placed, in layout order.
    pub items: Vec<RenderNode>,
    /// Unfinished items of a line split in the previous fragment.
    pub carried: Vec<LineItem>,
    pub continuation: bool,
    pub fixed_height: Option<f32>,
    pub placed: Vec<RenderNode>,
    pub geometry: Option<BoxGeometry>,
}

#[derive(Debug, Default)]
struct FlexOutcome {
    placed: Vec<RenderNode>,
    carried: Vec<LineItem>,
    remaining: Vec<RenderNode>,
    used: f32,
    cause: Option<RendererId>,
}

enum LineOutcome {
    Placed { nodes: Vec<RenderNode>, height: f32 },
    Split { nodes: Vec<RenderNode>, height: f32, carried: Vec<LineItem> },
    Deferred(Option<RendererId>),
}

fn outer_bottom(result: &LayoutResult<RenderNode>, top: f32) -> f32 {
    result.occupied_area.map_or(top, |a| a.bbox.bottom().min(top))
}

impl FlexRenderer {
    pub fn new(style: Arc<ComputedStyle>, mut items: Vec<RenderNode>) -> Self {
        items.sort_by_key(|item| item.style().flex.order);
        if style.flex.direction == FlexDirection::ColumnReverse {
            items.reverse();
        }
        let fixed_height = super::frame::style_fixed_height(&style);
        Self {
            id: RendererId::next(),
            style,
            anchor: None,
            items,
            carried: Vec::new(),
            continuation: false,
            fixed_height,
            placed: Vec::new(),
            geometry: None,
        }
    }

    pub fn with_anchor(mut self, anchor: Option<AnchorId>) -> Self {
        self.anchor = anchor;
        self
    }

    /// Main-axis inputs of a row item, and the item with its own width released
    /// so it fills whatever width the line gives it.
    fn row_item(&self, engine: &LayoutEngine, item: &RenderNode, container: f32) -> Result<(FlexItemInfo, RenderNode), LayoutError> {
        let style = item.style();
        let extras = style.horizontal_extras();
        let mut released = item.clone();
        released.release_width();
        let content = released.min_max_width(engine)?;
        let resolve = |d: Option<Dimension>| d.and_then(|d| d.resolve(Some(container))).map(|w| w + extras);

        let basis = match style.flex.basis {
            Dimension::Auto => resolve(style.box_model.width),
            explicit => resolve(Some(explicit)),
        }
        .unwrap_or(content.max);
        let min = resolve(style.box_model.min_width).unwrap_or(content.min.min(basis));
        let max = resolve(style.box_model.max_width).unwrap_or(f32::INFINITY);
        let info = FlexItemInfo::new(basis, style.flex.grow, style.flex.shrink).with_limits(min, max);
        Ok((info, released))
    }

    /// Resolves the lines of the items still to place.
    fn build_lines(&self, engine: &LayoutEngine, width: f32) -> Result<Vec<Vec<LineItem>>, LayoutError> {
        let gap = self.style.misc.column_gap;
        let mut infos = Vec::with_capacity(self.items.len());
        let mut nodes = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let (info, node) = self.row_item(engine, item, width)?;
            infos.push(info);
            nodes.push(node);
        }
        let wrap = self.style.flex.wrap != FlexWrap::NoWrap;
        let mut lines: Vec<Vec<LineItem>> = collect_lines(&infos, width, gap, wrap)
            .into_iter()
            .map(|range| {
                let n = range.len();
                let gaps = gap * n.saturating_sub(1) as f32;
                let sizes = resolve_flexible_lengths(&infos[range.clone()], width - gaps);
                let free = width - gaps - sizes.iter().sum::<f32>();
                let (lead, between) = justify_offsets(self.style.flex.justify_content, free, n);
                let mut offset = lead;
                range
                    .zip(sizes)
                    .map(|(i, size)| {
                        let item = LineItem {
                            node: nodes[i].clone(),
                            offset,
                            width: size.max(0.0),
                        };
                        offset += size + gap + between;
                        item
                    })
                    .collect()
            })
            .collect();
        if self.style.flex.wrap == FlexWrap::WrapReverse {
            lines.reverse();
        }
        Ok(lines)
    }

    fn layout_line(
        &self,
        ctx: &mut LayoutContext,
        content: Rect,
        director: FlexDirector,
        line: &[LineItem],
        top: f32,
        first_line: bool,
    ) -> Result<LineOutcome, LayoutError> {
        let page = ctx.area.page_number;
        let eps = ctx.config().float_epsilon;
        let first = ctx.first_in_area && first_line;
        let forced = ctx.forced_placement && first_line;
        let area_of = |item: &LineItem| {
            let x = director.main_position(content.left(), content.width, item.offset, item.width);
            Rect::new(x, content.bottom(), item.width, (top - content.bottom()).max(0.0))
        };

        let mut results = Vec::with_capacity(line.len());
        for item in line {
            let mut node = item.node.clone();
            let result = {
                let mut cctx = ctx.child(LayoutArea::new(page, area_of(item)));
                cctx.first_in_area = first;
                cctx.forced_placement = forced;
                node.layout(&mut cctx)?
            };
            results.push((node, result));
        }

        if results.iter().all(|(_, r)| r.is_full()) {
            let height = results
                .iter()
                .map(|(_, r)| top - outer_bottom(r, top))
                .fold(0.0, f32::max);
            let mut nodes = Vec::with_capacity(results.len());
            for (item, (mut node, result)) in line.iter().zip(results) {
                let h = top - outer_bottom(&result, top);
                let align = node.style().flex.align_self.resolve(self.style.flex.align_items);
                match align {
                    AlignItems::Stretch if node.style().box_model.height.is_none() && h < height - eps => {
                        let mut stretched = item.node.clone();
                        let result = {
                            let mut cctx = ctx.child(LayoutArea::new(page, area_of(item)));
                            cctx.first_in_area = first;
                            cctx.forced_placement = forced;
                            cctx.min_height = Some(height);
                            stretched.layout(&mut cctx)?
                        };
                        if result.is_full() {
                            node = stretched;
                        }
                    }
                    AlignItems::FlexEnd => node.translate(0.0, -(height - h)),
                    AlignItems::Center => node.translate(0.0, -(height - h) / 2.0),
                    _ => {}
                }
                nodes.push(node);
            }
            return Ok(LineOutcome::Placed { nodes, height });
        }

        let cause = results.iter().find_map(|(_, r)| r.cause_of_nothing);
        let first_fits = results.first().is_some_and(|(_, r)| r.is_full());
        if !first_fits && !(first || forced) {
            return Ok(LineOutcome::Deferred(cause));
        }

        // Items after the first split one break at the height it reached.
        if let Some(p) = results.iter().position(|(_, r)| r.status == LayoutStatus::Partial) {
            let cut = top - outer_bottom(&results[p].1, top);
            for (item, slot) in line.iter().zip(results.iter_mut()).skip(p + 1) {
                let slot_area = area_of(item);
                let area = Rect::new(slot_area.left(), top - cut, slot_area.width, cut);
                let mut node = item.node.clone();
                let result = {
                    let mut cctx = ctx.child(LayoutArea::new(page, area));
                    cctx.first_in_area = first;
                    cctx.forced_placement = forced;
                    node.layout(&mut cctx)?
                };
                *slot = (node, result);
            }
        }

        let mut nodes = Vec::new();
        let mut carried = Vec::new();
        let mut height: f32 = 0.0;
        for (item, (node, result)) in line.iter().zip(results) {
            match (result.status, result.split, result.overflow) {
                (LayoutStatus::Full, _, _) => {
                    height = height.max(top - node.occupied_area().map_or(top, |a| a.bbox.bottom()));
                    nodes.push(node);
                }
                (LayoutStatus::Partial, Some(split), Some(rest)) => {
                    height = height.max(top - split.occupied_area().map_or(top, |a| a.bbox.bottom()));
                    nodes.push(split);
                    carried.push(LineItem { node: rest, ..item.clone() });
                }
                _ => carried.push(item.clone()),
            }
        }
        if nodes.is_empty() {
            return Ok(LineOutcome::Deferred(cause));
        }
        log::debug!("Flex line of {} continues in the next area with {} items", self.id, carried.len());
        Ok(LineOutcome::Split { nodes, height, carried })
    }

    fn layout_rows(&self, ctx: &mut LayoutContext, content: Rect, director: FlexDirector) -> Result<FlexOutcome, LayoutError> {
        let gap = self.style.misc.row_gap;
        let mut lines = Vec::new();
        if !self.carried.is_empty() {
            lines.push(self.carried.clone());
        }
        lines.extend(self.build_lines(ctx.engine, content.width)?);
        let carried_first = !self.carried.is_empty();

        let mut out = FlexOutcome::default();
        let mut top = content.top();
        let mut placed_lines = 0;
        for (i, line) in lines.iter().enumerate() {
            let rest = || lines[i + 1..].iter().flatten().map(|item| item.node.clone());
            match self.layout_line(ctx, content, director, line, top, placed_lines == 0)? {
                LineOutcome::Placed { nodes, height } => {
                    out.placed.extend(nodes);
                    out.used = content.top() - (top - height);
                    top -= height + gap;
                    placed_lines += 1;
                }
                LineOutcome::Split { nodes, height, carried } => {
                    out.placed.extend(nodes);
                    out.used = content.top() - (top - height);
                    out.carried = carried;
                    out.remaining = rest().collect();
                    break;
                }
                LineOutcome::Deferred(cause) => {
                    out.cause = cause;
                    if i == 0 && carried_first {
                        out.carried = line.clone();
                    } else {
                        out.remaining.extend(line.iter().map(|item| item.node.clone()));
                    }
                    out.remaining.extend(rest());
                    break;
                }
            }
        }
        Ok(out)
    }

    /// Target outer heights of column items when the container has a definite height.
    fn column_targets(&self, ctx: &mut LayoutContext, content: Rect, height: f32) -> Result<Vec<f32>, LayoutError> {
        let page = ctx.area.page_number;
        let mut infos = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let style = item.style();
            let extras = style.box_model.margin.vertical() + style.border_y() + style.padding_y();
            let explicit = match style.flex.basis {
                Dimension::Auto => style.box_model.height.and_then(|h| h.points()),
                basis => basis.resolve(Some(height)),
            };
            let basis = match explicit {
                Some(b) => b + extras,
                None => {
                    let mut trial = item.clone();
                    let mut floats = Vec::new();
                    let area = Rect::from_top_left(content.left(), content.top(), content.width, MEASURE_HEIGHT);
                    let mut mctx = ctx.isolated(LayoutArea::new(page, area), &mut floats);
                    mctx.clipped_height = false;
                    trial.layout(&mut mctx)?.occupied_height()
                }
            };
            infos.push(FlexItemInfo::new(basis, style.flex.grow, style.flex.shrink));
        }
        let gaps = self.style.misc.row_gap * self.items.len().saturating_sub(1) as f32;
        Ok(resolve_flexible_lengths(&infos, height - gaps))
    }

    fn layout_column(&self, ctx: &mut LayoutContext, content: Rect, director: FlexDirector) -> Result<FlexOutcome, LayoutError> {
        let page = ctx.area.page_number;
        let gap = self.style.misc.row_gap;
        let definite = self
            .fixed_height
            .filter(|h| !self.continuation && *h <= content.height + ctx.config().float_epsilon);
        let targets = match definite {
            Some(h) => Some(self.column_targets(ctx, content, h)?),
            None => None,
        };
        let (lead, between) = match (&targets, definite) {
            (Some(t), Some(h)) => {
                let n = self.items.len();
                let gaps = gap * n.saturating_sub(1) as f32;
                let free = h - gaps - t.iter().sum::<f32>();
                let (lead, between) = justify_offsets(self.style.flex.justify_content, free, n);
                if director == FlexDirector::ColumnReverse {
                    // Items are held in reverse; main-start is the bottom edge.
                    ((free - lead - between * n.saturating_sub(1) as f32).max(0.0), between)
                } else {
                    (lead, between)
                }
            }
            _ => (0.0, 0.0),
        };

        let mut out = FlexOutcome::default();
        let mut cursor = content.top() - lead;
        for (i, item) in self.items.iter().enumerate() {
            let align = item.style().flex.align_self.resolve(self.style.flex.align_items);
            let (x, width) = match align {
                AlignItems::Stretch => (content.left(), content.width),
                _ => {
                    let w = item.min_max_width(ctx.engine)?.max.min(content.width);
                    let x = match align {
                        AlignItems::FlexEnd => content.right() - w,
                        AlignItems::Center => content.left() + (content.width - w) / 2.0,
                        _ => content.left(),
                    };
                    (x, w)
                }
            };
            let area = Rect::new(x, content.bottom(), width, (cursor - content.bottom()).max(0.0));
            let mut node = item.clone();
            let result = {
                let first_in_area = ctx.first_in_area && out.placed.is_empty();
                let forced_placement = ctx.forced_placement && out.placed.is_empty();
                let mut cctx = ctx.child(LayoutArea::new(page, area));
                cctx.first_in_area = first_in_area;
                cctx.forced_placement = forced_placement;
                cctx.min_height = targets.as_ref().and_then(|t| t.get(i).copied());
                node.layout(&mut cctx)?
            };
            match (result.status, result.split, result.overflow) {
                (LayoutStatus::Full, _, _) => {
                    let bottom = node.occupied_area().map_or(cursor, |a| a.bbox.bottom());
                    out.used = content.top() - bottom;
                    cursor = bottom - gap - between;
                    out.placed.push(node);
                }
                (LayoutStatus::Partial, Some(split), Some(rest)) => {
                    if let Some(a) = split.occupied_area() {
                        out.used = content.top() - a.bbox.bottom();
                    }
                    out.placed.push(split);
                    out.remaining.push(rest);
                    out.remaining.extend(self.items[i + 1..].iter().cloned());
                    break;
                }
                _ => {
                    out.cause = result.cause_of_nothing;
                    out.remaining.extend(self.items[i..].iter().cloned());
                    break;
                }
            }
        }
        Ok(out)
    }
}

impl Renderer for FlexRenderer {
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
        let director = FlexDirector::for_style(&self.style);
        let float_mark = ctx.floats.len();
        let outer_clipped = ctx.clipped_height;
        ctx.clipped_height = outer_clipped || frame.is_clipped();
        let outcome = if director.is_row() {
            self.layout_rows(ctx, content, director)
        } else {
            self.layout_column(ctx, content, director)
        };
        ctx.clipped_height = outer_clipped;
        let outcome = outcome?;

        let unfinished = !outcome.remaining.is_empty() || !outcome.carried.is_empty();
        if outcome.placed.is_empty() && unfinished {
            ctx.floats.truncate(float_mark);
            return Ok(LayoutResult::nothing(outcome.cause.unwrap_or(self.id)));
        }

        let complete = !unfinished && frame.fixed_height_remainder().is_none();
        let geom = frame.close(page, outcome.used, complete, ctx.min_height);
        let occupied = LayoutArea::new(page, geom.margin_box);
        if complete {
            self.placed = outcome.placed;
            self.geometry = Some(geom);
            return Ok(LayoutResult::full(occupied));
        }

        let mut split = self.clone();
        split.placed = outcome.placed;
        split.geometry = Some(geom);

        let mut overflow = self.clone();
        overflow.items = outcome.remaining;
        overflow.carried = outcome.carried;
        overflow.continuation = true;
        overflow.fixed_height = frame.fixed_height_remainder();
        overflow.placed = Vec::new();
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
        for item in &self.placed {
            item.draw(ctx)?;
        }
        ctx.close_tag(self.id)
    }

    fn next_renderer(&self) -> Self {
        let mut next = self.clone();
        next.id = RendererId::next();
        next.placed = Vec::new();
        next.geometry = None;
        next
    }

    fn min_max_width(&self, engine: &LayoutEngine) -> Result<MinMaxWidth, LayoutError> {
        let director = FlexDirector::for_style(&self.style);
        let wraps = self.style.flex.wrap != FlexWrap::NoWrap;
        let gap = self.style.misc.column_gap;
        let mut content = MinMaxWidth::default();
        for (i, item) in self.items.iter().enumerate() {
            let mm = item.min_max_width(engine)?;
            content = if !director.is_row() {
                content.stack(mm)
            } else {
                let gap = if i > 0 { gap } else { 0.0 };
                let min = if wraps { content.min.max(mm.min) } else { content.min + gap + mm.min };
                MinMaxWidth::new(min, content.max + gap + mm.max)
            };
        }
        Ok(outer_min_max(&self.style, content))
    }

    fn occupied_area(&self) -> Option<LayoutArea> {
        self.geometry.map(|g| LayoutArea::new(g.page_number, g.margin_box))
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        if let Some(g) = self.geometry.as_mut() {
            g.translate(dx, dy);
        }
        for item in &mut self.placed {
            item.translate(dx, dy);
        }
    }
}
