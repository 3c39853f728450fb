//! Leaf renderers that live inside a line box.

use crate::interface::{DrawContext, LayoutArea, LayoutContext, LayoutResult, MinMaxWidth, Renderer};
use crate::nodes::image::{image_transform, inline_image_size};
use crate::painting::box_painter::stroke;
use crate::style::ComputedStyle;
use crate::text::breaks::{break_opportunities, segments};
use crate::{LayoutEngine, LayoutError};
use quire_idf::ImageSource;
use quire_style::border::{Border, BorderStyle};
use quire_style::text::TextDecoration;
use quire_traits::{TagAttributes, TagRole, TextRun};
use quire_types::{Point, Rect, RendererId};
use std::sync::Arc;

/// Where a run of text landed. `origin` is the baseline start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    pub page_number: usize,
    pub origin: Point,
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
    /// Justification spacing added on top of the style's spacing.
    pub extra_char_spacing: f32,
    pub extra_word_spacing: f32,
}

#[derive(Debug, Clone)]
pub struct TextRenderer {
    pub id: RendererId,
    pub style: Arc<ComputedStyle>,
    pub text: String,
    pub placement: Option<TextPlacement>,
}

impl TextRenderer {
    pub fn new(style: Arc<ComputedStyle>, text: impl Into<String>) -> Self {
        Self {
            id: RendererId::next(),
            style,
            text: text.into(),
            placement: None,
        }
    }

    pub fn glyph_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn space_count(&self) -> usize {
        self.text.chars().filter(|c| *c == ' ').count()
    }

    /// Width of the first unbreakable segment.
    pub fn first_segment_width(&self, engine: &LayoutEngine) -> f32 {
        segments(&self.text)
            .first()
            .map_or(0.0, |s| engine.measure_text(&self.style, s.trim_end()))
    }

    /// Drops trailing whitespace at the end of a line.
    pub fn trim_end(&mut self, engine: &LayoutEngine) {
        let trimmed_len = self.text.trim_end().len();
        if trimmed_len < self.text.len() {
            self.text.truncate(trimmed_len);
            if let Some(p) = self.placement.as_mut() {
                p.width = engine.measure_text(&self.style, &self.text);
            }
        }
    }

    fn place(&mut self, ctx: &LayoutContext, text: String, width: f32) -> LayoutArea {
        let (ascent, descent) = ctx.engine.line_extents(&self.style);
        let bbox = ctx.area.bbox;
        self.text = text;
        self.placement = Some(TextPlacement {
            page_number: ctx.area.page_number,
            origin: Point::new(bbox.left(), bbox.top() - ascent),
            width,
            ascent,
            descent,
            extra_char_spacing: 0.0,
            extra_word_spacing: 0.0,
        });
        LayoutArea::new(
            ctx.area.page_number,
            Rect::from_top_left(bbox.left(), bbox.top(), width, ascent - descent),
        )
    }

    /// Byte index of the longest char prefix that fits `avail`, at least one char.
    fn char_split(&self, engine: &LayoutEngine, avail: f32) -> usize {
        let mut end = 0;
        for (idx, ch) in self.text.char_indices() {
            let next = idx + ch.len_utf8();
            if end > 0 && engine.measure_text(&self.style, &self.text[..next]) > avail {
                break;
            }
            end = next;
        }
        end
    }

    fn decoration(&self, engine: &LayoutEngine, placement: &TextPlacement) -> Option<(f32, Border)> {
        let size = self.style.text.font_size;
        let thickness = (size * 0.05).max(0.5);
        let border = Border::new(thickness, BorderStyle::Solid, self.style.text.color);
        match self.style.text.text_decoration {
            TextDecoration::None => None,
            TextDecoration::Underline => Some((placement.origin.y - size * 0.1, border)),
            TextDecoration::LineThrough => {
                let x_height = engine.vertical_metrics(&self.style).x_height;
                Some((placement.origin.y + x_height / 2.0, border))
            }
        }
    }
}

impl Renderer for TextRenderer {
    fn id(&self) -> RendererId {
        self.id
    }

    /// Fits as much text as possible into the width of `ctx.area`, breaking at
    /// the last opportunity that fits. A renderer first on its line splits
    /// inside a word rather than placing nothing.
    fn layout(&mut self, ctx: &mut LayoutContext) -> Result<LayoutResult<Self>, LayoutError> {
        let engine = ctx.engine;
        let (ascent, descent) = engine.line_extents(&self.style);
        if !ctx.fits(ascent - descent, ctx.area.bbox.height) && !ctx.forced_placement {
            return Ok(LayoutResult::nothing(self.id));
        }
        let avail = ctx.area.bbox.width;
        if ctx.fits(engine.measure_text(&self.style, self.text.trim_end()), avail) {
            let text = std::mem::take(&mut self.text);
            let width = engine.measure_text(&self.style, &text);
            let occupied = self.place(ctx, text, width);
            return Ok(LayoutResult::full(occupied));
        }

        let cut = break_opportunities(&self.text)
            .into_iter()
            .rev()
            .find(|b| ctx.fits(engine.measure_text(&self.style, self.text[..*b].trim_end()), avail));
        let cut = match cut {
            Some(cut) => cut,
            None if ctx.first_in_area => self.char_split(engine, avail),
            None => return Ok(LayoutResult::nothing(self.id)),
        };
        if cut >= self.text.len() {
            let text = std::mem::take(&mut self.text);
            let width = engine.measure_text(&self.style, &text);
            let occupied = self.place(ctx, text, width);
            return Ok(LayoutResult::full(occupied));
        }

        let mut split = self.clone();
        let head = self.text[..cut].to_string();
        let width = engine.measure_text(&self.style, &head);
        let occupied = split.place(ctx, head, width);
        let mut overflow = self.clone();
        overflow.text = self.text[cut..].to_string();
        overflow.placement = None;
        Ok(LayoutResult::partial(occupied, split, overflow))
    }

    fn draw(&self, ctx: &mut DrawContext) -> Result<(), LayoutError> {
        let Some(p) = self.placement else {
            return Ok(());
        };
        if self.text.is_empty() {
            return Ok(());
        }
        ctx.canvas.show_text(&TextRun {
            text: self.text.clone(),
            origin: p.origin,
            font: self.style.text.font.clone(),
            font_size: self.style.text.font_size,
            color: self.style.text.color,
            char_spacing: self.style.text.character_spacing + p.extra_char_spacing,
            word_spacing: self.style.text.word_spacing + p.extra_word_spacing,
        })?;
        if let Some((y, border)) = self.decoration(ctx.engine, &p) {
            stroke(
                &mut *ctx.canvas,
                Point::new(p.origin.x, y),
                Point::new(p.origin.x + p.width, y),
                &border,
            )?;
        }
        Ok(())
    }

    fn next_renderer(&self) -> Self {
        let mut next = self.clone();
        next.id = RendererId::next();
        next.placement = None;
        next
    }

    fn min_max_width(&self, engine: &LayoutEngine) -> Result<MinMaxWidth, LayoutError> {
        let min = segments(&self.text)
            .iter()
            .map(|s| engine.measure_text(&self.style, s.trim_end()))
            .fold(0.0, f32::max);
        Ok(MinMaxWidth::new(min, engine.measure_text(&self.style, &self.text)))
    }

    fn occupied_area(&self) -> Option<LayoutArea> {
        self.placement.map(|p| {
            LayoutArea::new(
                p.page_number,
                Rect::from_top_left(p.origin.x, p.origin.y + p.ascent, p.width, p.ascent - p.descent),
            )
        })
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        if let Some(p) = self.placement.as_mut() {
            p.origin = Point::new(p.origin.x + dx, p.origin.y + dy);
        }
    }
}

/// An image placed on the baseline of a line.
#[derive(Debug, Clone)]
pub struct InlineImageRenderer {
    pub id: RendererId,
    pub style: Arc<ComputedStyle>,
    pub source: Arc<ImageSource>,
    pub width: f32,
    pub height: f32,
    pub placement: Option<LayoutArea>,
}

impl InlineImageRenderer {
    pub fn new(style: Arc<ComputedStyle>, source: ImageSource) -> Self {
        let (width, height) = inline_image_size(&style, &source);
        Self {
            id: RendererId::next(),
            style,
            source: Arc::new(source),
            width,
            height,
            placement: None,
        }
    }
}

impl Renderer for InlineImageRenderer {
    fn id(&self) -> RendererId {
        self.id
    }

    fn layout(&mut self, ctx: &mut LayoutContext) -> Result<LayoutResult<Self>, LayoutError> {
        let bbox = ctx.area.bbox;
        let fits_width = ctx.fits(self.width, bbox.width);
        let fits_height = ctx.fits(self.height, bbox.height);
        if !ctx.forced_placement && (!fits_height || (!fits_width && !ctx.first_in_area)) {
            return Ok(LayoutResult::nothing(self.id));
        }
        if !fits_width || !fits_height {
            log::warn!(
                "Inline image '{}' ({}x{}) does not fit its line; placing it anyway",
                self.source.src,
                self.width,
                self.height
            );
        }
        let area = LayoutArea::new(
            ctx.area.page_number,
            Rect::from_top_left(bbox.left(), bbox.top(), self.width, self.height),
        );
        self.placement = Some(area);
        Ok(LayoutResult::full(area))
    }

    fn draw(&self, ctx: &mut DrawContext) -> Result<(), LayoutError> {
        let Some(area) = self.placement else {
            return Ok(());
        };
        ctx.open_tag(
            self.id,
            TagRole::Figure,
            TagAttributes {
                bbox: Some(area.bbox),
                ..Default::default()
            },
        )?;
        ctx.canvas.draw_image(&self.source.src, image_transform(&area.bbox))?;
        ctx.close_tag(self.id)
    }

    fn next_renderer(&self) -> Self {
        let mut next = self.clone();
        next.id = RendererId::next();
        next.placement = None;
        next
    }

    fn min_max_width(&self, _engine: &LayoutEngine) -> Result<MinMaxWidth, LayoutError> {
        Ok(MinMaxWidth::fixed(self.width))
    }

    fn occupied_area(&self) -> Option<LayoutArea> {
        self.placement
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        if let Some(area) = self.placement.as_mut() {
            area.bbox.translate(dx, dy);
        }
    }
}

/// Horizontal space up to the next tab stop. The width is resolved by the line.
#[derive(Debug, Clone)]
pub struct TabRenderer {
    pub id: RendererId,
    pub style: Arc<ComputedStyle>,
    pub width: f32,
    pub placement: Option<LayoutArea>,
}

impl TabRenderer {
    pub fn new(style: Arc<ComputedStyle>) -> Self {
        Self {
            id: RendererId::next(),
            style,
            width: 0.0,
            placement: None,
        }
    }
}

/// One item of inline content, in logical order.
#[derive(Debug, Clone)]
pub enum InlineRenderer {
    Text(TextRenderer),
    Image(InlineImageRenderer),
    Tab(TabRenderer),
    LineBreak,
}

impl InlineRenderer {
    pub fn id(&self) -> Option<RendererId> {
        match self {
            InlineRenderer::Text(t) => Some(t.id),
            InlineRenderer::Image(i) => Some(i.id),
            InlineRenderer::Tab(t) => Some(t.id),
            InlineRenderer::LineBreak => None,
        }
    }

    /// Placed advance width.
    pub fn width(&self) -> f32 {
        match self {
            InlineRenderer::Text(t) => t.placement.map_or(0.0, |p| p.width),
            InlineRenderer::Image(i) => i.width,
            InlineRenderer::Tab(t) => t.width,
            InlineRenderer::LineBreak => 0.0,
        }
    }

    /// Left edge of the placed item.
    pub fn x(&self) -> Option<f32> {
        match self {
            InlineRenderer::Text(t) => t.placement.map(|p| p.origin.x),
            InlineRenderer::Image(i) => i.placement.map(|a| a.bbox.left()),
            InlineRenderer::Tab(t) => t.placement.map(|a| a.bbox.left()),
            InlineRenderer::LineBreak => None,
        }
    }

    /// Ascent above and descent below the baseline.
    pub fn extents(&self, engine: &LayoutEngine) -> (f32, f32) {
        match self {
            InlineRenderer::Text(t) => engine.line_extents(&t.style),
            InlineRenderer::Image(i) => (i.height, 0.0),
            InlineRenderer::Tab(_) | InlineRenderer::LineBreak => (0.0, 0.0),
        }
    }

    /// Moves a placed item so its baseline sits at `baseline`.
    pub fn set_baseline(&mut self, baseline: f32) {
        match self {
            InlineRenderer::Text(t) => {
                if let Some(p) = t.placement.as_mut() {
                    p.origin.y = baseline;
                }
            }
            InlineRenderer::Image(i) => {
                if let Some(a) = i.placement.as_mut() {
                    a.bbox.y = baseline;
                }
            }
            InlineRenderer::Tab(t) => {
                if let Some(a) = t.placement.as_mut() {
                    a.bbox.y = baseline;
                }
            }
            InlineRenderer::LineBreak => {}
        }
    }

    pub fn set_x(&mut self, x: f32) {
        if let Some(current) = self.x() {
            self.translate(x - current, 0.0);
        }
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        match self {
            InlineRenderer::Text(t) => t.translate(dx, dy),
            InlineRenderer::Image(i) => i.translate(dx, dy),
            InlineRenderer::Tab(t) => {
                if let Some(a) = t.placement.as_mut() {
                    a.bbox.translate(dx, dy);
                }
            }
            InlineRenderer::LineBreak => {}
        }
    }

    pub fn draw(&self, ctx: &mut DrawContext) -> Result<(), LayoutError> {
        match self {
            InlineRenderer::Text(t) => t.draw(ctx),
            InlineRenderer::Image(i) => i.draw(ctx),
            InlineRenderer::Tab(_) | InlineRenderer::LineBreak => Ok(()),
        }
    }
}
