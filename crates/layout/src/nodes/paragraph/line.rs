use super::inline::InlineRenderer;
use crate::interface::{DrawContext, LayoutArea, LayoutContext, LayoutResult, LayoutStatus, MinMaxWidth, Renderer};
use crate::style::ComputedStyle;
use crate::{LayoutEngine, LayoutError};
use quire_style::text::{TabAlignment, TextAlign};
use quire_types::{Rect, RendererId};
use std::collections::VecDeque;
use std::sync::Arc;

const EPS: f32 = 1e-3;
const OBJECT_REPLACEMENT: char = '\u{FFFC}';

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineGeometry {
    pub page_number: usize,
    pub rect: Rect,
    pub baseline: f32,
}

/// One line box of a paragraph.
#[derive(Debug, Clone)]
pub struct LineRenderer {
    pub id: RendererId,
    pub style: Arc<ComputedStyle>,
    /// Before layout: content in logical order. After layout: placed items in
    /// visual order.
    pub items: Vec<InlineRenderer>,
    /// Logical content consumed by this line, untrimmed and unplaced.
    pub logical: Vec<InlineRenderer>,
    pub geometry: Option<LineGeometry>,
}

impl LineRenderer {
    pub fn new(style: Arc<ComputedStyle>, items: Vec<InlineRenderer>) -> Self {
        Self {
            id: RendererId::next(),
            style,
            items,
            logical: Vec::new(),
            geometry: None,
        }
    }

    /// Width of the gap a tab at `offset` from the line start advances over.
    fn tab_width(&self, engine: &LayoutEngine, offset: f32, next: Option<&InlineRenderer>) -> f32 {
        let text = &self.style.text;
        let stop = text.tab_stops.iter().find(|s| s.position > offset + EPS);
        let (position, alignment, anchor) = match stop {
            Some(s) => (s.position, s.alignment, s.anchor),
            None => {
                let pitch = text.tab_default.unwrap_or(engine.config().default_tab_pitch).max(1.0);
                (((offset / pitch).floor() + 1.0) * pitch, TabAlignment::Left, None)
            }
        };
        let next_width = |up_to: Option<char>| match next {
            Some(InlineRenderer::Text(t)) => {
                let s = t.text.trim_end();
                let s = up_to.and_then(|c| s.find(c)).map_or(s, |i| &s[..i]);
                engine.measure_text(&t.style, s)
            }
            Some(InlineRenderer::Image(i)) => i.width,
            _ => 0.0,
        };
        let shift = match alignment {
            TabAlignment::Left => 0.0,
            TabAlignment::Right => next_width(None),
            TabAlignment::Center => next_width(None) / 2.0,
            TabAlignment::Anchor => next_width(anchor),
        };
        (position - offset - shift).max(0.0)
    }

    /// Reorders placed items visually when the style asks for bidi processing.
    fn reorder(&self, engine: &LayoutEngine, placed: &mut Vec<InlineRenderer>, left: f32) {
        let base = self.style.text.base_direction;
        if !base.is_bidi() {
            return;
        }
        let chars: Vec<char> = placed
            .iter()
            .flat_map(|item| match item {
                InlineRenderer::Text(t) => t.text.chars().collect::<Vec<_>>(),
                _ => vec![OBJECT_REPLACEMENT],
            })
            .collect();
        let Some(levels) = engine.typography().bidi_levels(&chars, base) else {
            if base.is_rtl() {
                log::warn!("Bidi support is not available; laying out right-to-left text in logical order");
            }
            return;
        };
        if levels.len() != chars.len() {
            log::warn!(
                "Bidi resolver returned {} levels for {} characters; keeping logical order",
                levels.len(),
                chars.len()
            );
            return;
        }

        // Split text at level changes so every run has a single level.
        let mut runs: Vec<(u8, InlineRenderer)> = Vec::new();
        let mut pos = 0;
        for item in placed.drain(..) {
            match item {
                InlineRenderer::Text(t) => {
                    let offsets: Vec<usize> = t.text.char_indices().map(|(b, _)| b).collect();
                    let n = offsets.len();
                    if n == 0 {
                        runs.push((levels.get(pos).copied().unwrap_or(0), InlineRenderer::Text(t)));
                        continue;
                    }
                    let item_levels = &levels[pos..pos + n];
                    pos += n;
                    let mut start = 0;
                    for i in 1..=n {
                        if i == n || item_levels[i] != item_levels[start] {
                            let end_byte = offsets.get(i).copied().unwrap_or(t.text.len());
                            let mut piece = t.clone();
                            piece.text = t.text[offsets[start]..end_byte].to_string();
                            runs.push((item_levels[start], InlineRenderer::Text(piece)));
                            start = i;
                        }
                    }
                }
                other => {
                    runs.push((levels[pos], other));
                    pos += 1;
                }
            }
        }

        let typography = engine.typography();
        let run_levels: Vec<u8> = runs.iter().map(|(level, _)| *level).collect();
        let order = typography.visual_order(&run_levels).unwrap_or_else(|| {
            log::warn!("Bidi resolver cannot reorder lines; keeping logical order");
            (0..run_levels.len()).collect()
        });
        let mut slots: Vec<Option<(u8, InlineRenderer)>> = runs.into_iter().map(Some).collect();
        let mut x = left;
        for i in order {
            let Some((level, mut item)) = slots.get_mut(i).and_then(Option::take) else {
                continue;
            };
            if let InlineRenderer::Text(t) = &mut item {
                if level % 2 == 1 {
                    t.text = t
                        .text
                        .chars()
                        .rev()
                        .map(|c| typography.mirrored(c).unwrap_or(c))
                        .collect();
                }
                let width = engine.measure_text(&t.style, &t.text);
                if let Some(p) = t.placement.as_mut() {
                    p.width = width;
                }
            }
            item.set_x(x);
            x += item.width();
            placed.push(item);
        }
    }

    fn align(&self, engine: &LayoutEngine, placed: &mut [InlineRenderer], bbox: Rect, last_line: bool) {
        let text = &self.style.text;
        let align = if last_line {
            text.text_align_last.unwrap_or(match text.text_align {
                TextAlign::Justify => TextAlign::Left,
                other => other,
            })
        } else {
            text.text_align
        };
        let end = placed
            .iter()
            .filter_map(|item| item.x().map(|x| x + item.width()))
            .fold(bbox.left(), f32::max);
        let free = bbox.width - (end - bbox.left());
        let shift = match align {
            TextAlign::Left => return,
            TextAlign::Right => free,
            TextAlign::Center => free / 2.0,
            TextAlign::Justify | TextAlign::JustifyAll => {
                self.justify(engine, placed, free);
                return;
            }
        };
        if shift > 0.0 {
            for item in placed.iter_mut() {
                item.translate(shift, 0.0);
            }
        }
    }

    /// Spreads `free` space over the text after the last tab. Word spacing gets
    /// the style's spacing ratio of it and character spacing the rest.
    fn justify(&self, engine: &LayoutEngine, placed: &mut [InlineRenderer], free: f32) {
        if free <= EPS {
            return;
        }
        let start = placed
            .iter()
            .rposition(|i| matches!(i, InlineRenderer::Tab(_)))
            .map_or(0, |p| p + 1);
        let (mut spaces, mut glyphs) = (0usize, 0usize);
        for item in &placed[start..] {
            if let InlineRenderer::Text(t) = item {
                spaces += t.space_count();
                glyphs += t.glyph_count();
            }
        }
        if glyphs == 0 {
            return;
        }
        let ratio = if spaces == 0 {
            0.0
        } else {
            self.style.spacing_ratio(engine.config().spacing_ratio)
        };
        let denom = ratio * spaces as f32 + (1.0 - ratio) * glyphs.saturating_sub(1) as f32;
        if denom <= 0.0 {
            return;
        }
        let unit = free / denom;
        let (word_spacing, char_spacing) = (ratio * unit, (1.0 - ratio) * unit);

        let Some(mut x) = placed.get(start).and_then(|i| i.x()) else {
            return;
        };
        let mut last_text = None;
        for (i, item) in placed.iter_mut().enumerate().skip(start) {
            if let InlineRenderer::Text(t) = item {
                let (s, g) = (t.space_count() as f32, t.glyph_count() as f32);
                if let Some(p) = t.placement.as_mut() {
                    p.extra_word_spacing = word_spacing;
                    p.extra_char_spacing = char_spacing;
                    p.width += s * word_spacing + g * char_spacing;
                }
                last_text = Some(i);
            }
            item.set_x(x);
            x += item.width();
        }
        // The last glyph carries no spacing after it.
        if let Some(InlineRenderer::Text(t)) = last_text.and_then(|i| placed.get_mut(i))
            && let Some(p) = t.placement.as_mut()
        {
            p.width -= char_spacing;
        }
    }
}

impl Renderer for LineRenderer {
    fn id(&self) -> RendererId {
        self.id
    }

    fn layout(&mut self, ctx: &mut LayoutContext) -> Result<LayoutResult<Self>, LayoutError> {
        let engine = ctx.engine;
        let page = ctx.area.page_number;
        let bbox = ctx.area.bbox;
        let (strut_ascent, strut_descent) = engine.line_extents(&self.style);
        if !ctx.fits(strut_ascent - strut_descent, bbox.height) && !ctx.forced_placement {
            return Ok(LayoutResult::nothing(self.id));
        }

        let mut queue: VecDeque<InlineRenderer> = self.items.iter().cloned().collect();
        let mut placed: Vec<InlineRenderer> = Vec::new();
        let mut logical: Vec<InlineRenderer> = Vec::new();
        let mut x = bbox.left();
        let mut forced_break = false;

        while let Some(item) = queue.pop_front() {
            let remaining = (bbox.right() - x).max(0.0);
            let first = placed.is_empty();
            match item {
                InlineRenderer::LineBreak => {
                    logical.push(InlineRenderer::LineBreak);
                    forced_break = true;
                    break;
                }
                InlineRenderer::Tab(mut tab) => {
                    logical.push(InlineRenderer::Tab(tab.clone()));
                    let width = self
                        .tab_width(engine, x - bbox.left(), queue.front())
                        .min(remaining);
                    tab.width = width;
                    tab.placement = Some(LayoutArea::new(page, Rect::from_top_left(x, bbox.top(), width, 0.0)));
                    x += width;
                    placed.push(InlineRenderer::Tab(tab));
                }
                InlineRenderer::Text(mut text) => {
                    let original = text.clone();
                    let result = {
                        let area = Rect::new(x, bbox.bottom(), remaining, bbox.height);
                        let mut cctx = ctx.child(LayoutArea::new(page, area));
                        cctx.first_in_area = first;
                        text.layout(&mut cctx)?
                    };
                    match (result.status, result.split, result.overflow) {
                        (LayoutStatus::Full, _, _) => {
                            x += text.placement.map_or(0.0, |p| p.width);
                            logical.push(InlineRenderer::Text(original));
                            placed.push(InlineRenderer::Text(text));
                        }
                        (LayoutStatus::Partial, Some(split), Some(overflow)) => {
                            let mut consumed = split.clone();
                            consumed.placement = None;
                            logical.push(InlineRenderer::Text(consumed));
                            placed.push(InlineRenderer::Text(split));
                            queue.push_front(InlineRenderer::Text(overflow));
                            break;
                        }
                        _ => {
                            queue.push_front(InlineRenderer::Text(original));
                            break;
                        }
                    }
                }
                InlineRenderer::Image(mut image) => {
                    let original = image.clone();
                    let result = {
                        let area = Rect::new(x, bbox.bottom(), remaining, bbox.height);
                        let mut cctx = ctx.child(LayoutArea::new(page, area));
                        cctx.first_in_area = first;
                        image.layout(&mut cctx)?
                    };
                    if result.is_full() {
                        x += image.width;
                        logical.push(InlineRenderer::Image(original));
                        placed.push(InlineRenderer::Image(image));
                    } else {
                        queue.push_front(InlineRenderer::Image(original));
                        break;
                    }
                }
            }
        }

        if placed.is_empty() && !forced_break {
            return Ok(LayoutResult::nothing(self.id));
        }

        if let Some(InlineRenderer::Text(last)) = placed.last_mut() {
            last.trim_end(engine);
        }

        let (mut ascent, mut descent) = (strut_ascent, strut_descent);
        for item in &placed {
            let (a, d) = item.extents(engine);
            ascent = ascent.max(a);
            descent = descent.min(d);
        }
        if !ctx.fits(ascent - descent, bbox.height) && !ctx.forced_placement {
            return Ok(LayoutResult::nothing(self.id));
        }
        let baseline = bbox.top() - ascent;
        for item in &mut placed {
            item.set_baseline(baseline);
        }

        let last_line = queue.is_empty() || forced_break;
        self.reorder(engine, &mut placed, bbox.left());
        self.align(engine, &mut placed, bbox, last_line);

        let rect = Rect::from_top_left(bbox.left(), bbox.top(), bbox.width, ascent - descent);
        self.geometry = Some(LineGeometry {
            page_number: page,
            rect,
            baseline,
        });
        self.items = placed;
        self.logical = logical;
        let occupied = LayoutArea::new(page, rect);

        if queue.is_empty() {
            return Ok(LayoutResult::full(occupied));
        }
        let overflow = LineRenderer {
            id: self.id,
            style: self.style.clone(),
            items: queue.into_iter().collect(),
            logical: Vec::new(),
            geometry: None,
        };
        Ok(LayoutResult::partial(occupied, self.clone(), overflow))
    }

    fn draw(&self, ctx: &mut DrawContext) -> Result<(), LayoutError> {
        for item in &self.items {
            item.draw(ctx)?;
        }
        Ok(())
    }

    fn next_renderer(&self) -> Self {
        let mut next = self.clone();
        next.id = RendererId::next();
        next.geometry = None;
        next
    }

    fn min_max_width(&self, engine: &LayoutEngine) -> Result<MinMaxWidth, LayoutError> {
        let mut mm = MinMaxWidth::default();
        for item in &self.items {
            let item_mm = match item {
                InlineRenderer::Text(t) => t.min_max_width(engine)?,
                InlineRenderer::Image(i) => MinMaxWidth::fixed(i.width),
                InlineRenderer::Tab(_) => MinMaxWidth::new(0.0, engine.config().default_tab_pitch),
                InlineRenderer::LineBreak => MinMaxWidth::default(),
            };
            mm = MinMaxWidth::new(mm.min.max(item_mm.min), mm.max + item_mm.max);
        }
        Ok(mm)
    }

    fn occupied_area(&self) -> Option<LayoutArea> {
        self.geometry.map(|g| LayoutArea::new(g.page_number, g.rect))
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        if let Some(g) = self.geometry.as_mut() {
            g.rect.translate(dx, dy);
            g.baseline += dy;
        }
        for item in &mut self.items {
            item.translate(dx, dy);
        }
    }
}
