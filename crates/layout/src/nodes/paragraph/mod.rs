//! Paragraphs: inline content broken into line boxes.

pub mod inline;
pub mod line;

pub use inline::{InlineImageRenderer, InlineRenderer, TabRenderer, TextPlacement, TextRenderer};
pub use line::{LineGeometry, LineRenderer};

use super::block_attributes;
use super::frame::{BoxFrame, BoxGeometry, FrameOptions, outer_min_max};
use crate::algorithms::floats::{band_at, next_float_bottom};
use crate::interface::{DrawContext, LayoutArea, LayoutContext, LayoutResult, LayoutStatus, MinMaxWidth, Renderer};
use crate::painting::box_painter::paint_box;
use crate::style::ComputedStyle;
use crate::{LayoutEngine, LayoutError};
use quire_traits::TagRole;
use quire_types::{AnchorId, Rect, RendererId};
use std::sync::Arc;

/// Height offered when counting the lines of content outside any page.
const UNBOUNDED_HEIGHT: f32 = 1.0e6;

#[derive(Debug, Clone)]
pub struct ParagraphRenderer {
    pub id: RendererId,
    pub style: Arc<ComputedStyle>,
    pub anchor: Option<AnchorId>,
    /// Content still to be laid out, in logical order.
    pub inlines: Vec<InlineRenderer>,
    pub continuation: bool,
    pub lines: Vec<LineRenderer>,
    pub geometry: Option<BoxGeometry>,
}

impl ParagraphRenderer {
    pub fn new(style: Arc<ComputedStyle>, inlines: Vec<InlineRenderer>) -> Self {
        Self {
            id: RendererId::next(),
            style,
            anchor: None,
            inlines,
            continuation: false,
            lines: Vec::new(),
            geometry: None,
        }
    }

    pub fn with_anchor(mut self, anchor: Option<AnchorId>) -> Self {
        self.anchor = anchor;
        self
    }

    /// Concatenated text of the placed lines, one line per entry.
    pub fn line_texts(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| {
                line.items
                    .iter()
                    .filter_map(|item| match item {
                        InlineRenderer::Text(t) => Some(t.text.as_str()),
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }

    /// Counts the lines `items` need at `width`, stopping once `limit` is reached.
    fn count_lines(
        &self,
        engine: &LayoutEngine,
        items: &[InlineRenderer],
        width: f32,
        limit: usize,
    ) -> Result<usize, LayoutError> {
        let mut floats = Vec::new();
        let area = LayoutArea::new(0, Rect::new(0.0, 0.0, width, UNBOUNDED_HEIGHT));
        let mut ctx = LayoutContext::new(engine, area, &mut floats);
        let mut queue = items.to_vec();
        let mut count = 0;
        while !queue.is_empty() && count < limit {
            let mut line = LineRenderer::new(self.style.clone(), std::mem::take(&mut queue));
            let result = line.layout(&mut ctx)?;
            match (result.status, result.overflow) {
                (LayoutStatus::Partial, Some(overflow)) => {
                    count += 1;
                    queue = overflow.items;
                }
                (LayoutStatus::Full, _) => count += 1,
                _ => break,
            }
        }
        Ok(count)
    }
}

/// Puts pulled-back line content in front of `queue`, rejoining text that a
/// line break had split.
fn restore_content(lines: Vec<LineRenderer>, queue: Vec<InlineRenderer>) -> Vec<InlineRenderer> {
    let mut out: Vec<InlineRenderer> = Vec::new();
    for item in lines.into_iter().flat_map(|l| l.logical).chain(queue) {
        if let (Some(InlineRenderer::Text(prev)), InlineRenderer::Text(next)) = (out.last_mut(), &item)
            && prev.id == next.id
        {
            prev.text.push_str(&next.text);
            continue;
        }
        out.push(item);
    }
    out
}

impl Renderer for ParagraphRenderer {
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
        let (strut_ascent, strut_descent) = engine.line_extents(&self.style);
        let strut = strut_ascent - strut_descent;
        let mut lines: Vec<LineRenderer> = Vec::new();
        let mut queue = self.inlines.clone();
        let mut cursor = content.top();

        while !queue.is_empty() {
            let indent = if !self.continuation && lines.is_empty() {
                self.style.text.first_line_indent
            } else {
                0.0
            };
            let (left, right) = band_at(ctx.floats, &content, cursor, strut);
            let needed = match queue.first() {
                Some(InlineRenderer::Text(t)) => t.first_segment_width(engine),
                Some(InlineRenderer::Image(i)) => i.width,
                _ => 0.0,
            };
            if right - left - indent < needed
                && right - left < content.width
                && let Some(below) = next_float_bottom(ctx.floats, cursor, strut)
            {
                cursor = below;
                continue;
            }

            let band = Rect::new(
                left + indent,
                content.bottom(),
                (right - left - indent).max(0.0),
                cursor - content.bottom(),
            );
            let mut line = LineRenderer::new(self.style.clone(), std::mem::take(&mut queue));
            line.id = self.id;
            let first = ctx.first_in_area && lines.is_empty();
            let forced = ctx.forced_placement && lines.is_empty();
            let result = {
                let mut lctx = ctx.child(LayoutArea::new(page, band));
                lctx.first_in_area = first;
                lctx.forced_placement = forced;
                line.layout(&mut lctx)?
            };
            let bottom = result.occupied_area.map(|a| a.bbox.bottom());
            match (result.status, result.split, result.overflow) {
                (LayoutStatus::Full, _, _) => {
                    cursor = bottom.unwrap_or(cursor);
                    lines.push(line);
                }
                (LayoutStatus::Partial, Some(split), Some(overflow)) => {
                    cursor = bottom.unwrap_or(cursor);
                    lines.push(split);
                    queue = overflow.items;
                }
                _ => {
                    queue = line.items;
                    match next_float_bottom(ctx.floats, cursor, strut) {
                        Some(below) => cursor = below,
                        None => break,
                    }
                }
            }
        }

        if lines.is_empty() {
            return Ok(LayoutResult::nothing(self.id));
        }

        if !queue.is_empty() {
            let orphans = if self.continuation { 1 } else { self.style.misc.orphans.max(1) };
            let widows = self.style.misc.widows.max(1);
            if lines.len() < orphans {
                if !ctx.forced_placement {
                    return Ok(LayoutResult::nothing(self.id));
                }
                if !ctx.measuring {
                    log::warn!(
                        "Paragraph {} places {} line(s), fewer than orphans={}; keeping them under forced placement",
                        self.id,
                        lines.len(),
                        orphans
                    );
                }
            } else {
                let remaining = self.count_lines(engine, &queue, content.width, widows)?;
                if remaining < widows {
                    let pull = widows - remaining;
                    if lines.len() >= orphans + pull {
                        let pulled = lines.split_off(lines.len() - pull);
                        queue = restore_content(pulled, queue);
                        cursor = lines
                            .last()
                            .and_then(|l| l.occupied_area())
                            .map_or(content.top(), |a| a.bbox.bottom());
                    } else if !ctx.forced_placement {
                        return Ok(LayoutResult::nothing(self.id));
                    } else if !ctx.measuring {
                        log::warn!(
                            "Paragraph {} leaves {} line(s) for the next area, fewer than widows={}; keeping them under forced placement",
                            self.id,
                            remaining,
                            widows
                        );
                    }
                }
            }
        }

        let complete = queue.is_empty();
        let geom = frame.close(page, content.top() - cursor, complete, ctx.min_height);
        let occupied = LayoutArea::new(page, geom.margin_box);
        if complete {
            self.lines = lines;
            self.geometry = Some(geom);
            return Ok(LayoutResult::full(occupied));
        }

        let mut split = self.clone();
        split.lines = lines;
        split.geometry = Some(geom);
        let mut overflow = self.clone();
        overflow.inlines = queue;
        overflow.continuation = true;
        overflow.lines = Vec::new();
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
        ctx.open_tag(self.id, TagRole::P, block_attributes(&self.style, &geom))?;
        paint_box(&mut *ctx.canvas, &self.style, &geom)?;
        for line in &self.lines {
            line.draw(ctx)?;
        }
        ctx.close_tag(self.id)
    }

    fn next_renderer(&self) -> Self {
        let mut next = self.clone();
        next.id = RendererId::next();
        next.lines = Vec::new();
        next.geometry = None;
        next
    }

    fn min_max_width(&self, engine: &LayoutEngine) -> Result<MinMaxWidth, LayoutError> {
        let mut mm = MinMaxWidth::default();
        for forced_line in self.inlines.split(|i| matches!(i, InlineRenderer::LineBreak)) {
            let line = LineRenderer::new(self.style.clone(), forced_line.to_vec());
            mm = mm.stack(line.min_max_width(engine)?);
        }
        let indent = self.style.text.first_line_indent.max(0.0);
        Ok(outer_min_max(&self.style, MinMaxWidth::new(mm.min, mm.max + indent)))
    }

    fn occupied_area(&self) -> Option<LayoutArea> {
        self.geometry.map(|g| LayoutArea::new(g.page_number, g.margin_box))
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        if let Some(g) = self.geometry.as_mut() {
            g.translate(dx, dy);
        }
        for line in &mut self.lines {
            line.translate(dx, dy);
        }
    }
}
