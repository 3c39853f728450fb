//! Drawing surface consumed by the draw phase.

use quire_style::border::BorderStyle;
use quire_types::{AffineTransform, Color, Point, Rect, RendererId, Size};
use std::sync::Arc;
use thiserror::Error;

use crate::font::FontDescriptor;

#[derive(Error, Debug, Clone)]
pub enum CanvasError {
    #[error("Drawing outside of a page: call begin_page first")]
    NoPage,

    #[error("Unbalanced marked content: {0}")]
    UnbalancedMarkedContent(RendererId),

    #[error("Canvas error: {0}")]
    Other(String),
}

/// A positioned run of glyphs. `origin` is the baseline start in page space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub origin: Point,
    pub font: FontDescriptor,
    pub font_size: f32,
    pub color: Color,
    pub char_spacing: f32,
    pub word_spacing: f32,
}

pub trait Canvas {
    fn begin_page(&mut self, page_number: usize, size: Size) -> Result<(), CanvasError>;
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), CanvasError>;
    fn stroke_line(
        &mut self,
        from: Point,
        to: Point,
        width: f32,
        style: BorderStyle,
        color: Color,
    ) -> Result<(), CanvasError>;
    fn show_text(&mut self, run: &TextRun) -> Result<(), CanvasError>;
    /// Draws the image `src` mapped from the unit square by `transform`.
    fn draw_image(&mut self, src: &str, transform: AffineTransform) -> Result<(), CanvasError>;
    fn begin_marked(&mut self, id: RendererId) -> Result<(), CanvasError>;
    fn end_marked(&mut self) -> Result<(), CanvasError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect { rect: Rect, color: Color },
    Line { from: Point, to: Point, width: f32, style: BorderStyle, color: Color },
    Text(TextRun),
    Image { src: Arc<str>, transform: AffineTransform },
    BeginMarked(RendererId),
    EndMarked,
}

#[derive(Debug, Clone, Default)]
pub struct RecordedPage {
    pub number: usize,
    pub size: Size,
    pub ops: Vec<DrawOp>,
}

/// A canvas that records every operation per page. Used by tests and for
/// inspecting output without a PDF backend.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub pages: Vec<RecordedPage>,
    open_marks: Vec<RendererId>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, op: DrawOp) -> Result<(), CanvasError> {
        let page = self.pages.last_mut().ok_or(CanvasError::NoPage)?;
        page.ops.push(op);
        Ok(())
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Text runs on a page (0-based index), in drawing order.
    pub fn texts(&self, page: usize) -> Vec<&TextRun> {
        self.pages
            .get(page)
            .map(|p| {
                p.ops
                    .iter()
                    .filter_map(|op| match op {
                        DrawOp::Text(run) => Some(run),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn lines(&self, page: usize) -> Vec<(Point, Point, f32)> {
        self.pages
            .get(page)
            .map(|p| {
                p.ops
                    .iter()
                    .filter_map(|op| match op {
                        DrawOp::Line { from, to, width, .. } => Some((*from, *to, *width)),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn all_text(&self) -> String {
        (0..self.pages.len())
            .flat_map(|i| self.texts(i))
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Canvas for RecordingCanvas {
    fn begin_page(&mut self, page_number: usize, size: Size) -> Result<(), CanvasError> {
        if let Some(id) = self.open_marks.last() {
            return Err(CanvasError::UnbalancedMarkedContent(*id));
        }
        self.pages.push(RecordedPage { number: page_number, size, ops: Vec::new() });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), CanvasError> {
        self.push(DrawOp::FillRect { rect, color })
    }

    fn stroke_line(
        &mut self,
        from: Point,
        to: Point,
        width: f32,
        style: BorderStyle,
        color: Color,
    ) -> Result<(), CanvasError> {
        self.push(DrawOp::Line { from, to, width, style, color })
    }

    fn show_text(&mut self, run: &TextRun) -> Result<(), CanvasError> {
        self.push(DrawOp::Text(run.clone()))
    }

    fn draw_image(&mut self, src: &str, transform: AffineTransform) -> Result<(), CanvasError> {
        self.push(DrawOp::Image { src: Arc::from(src), transform })
    }

    fn begin_marked(&mut self, id: RendererId) -> Result<(), CanvasError> {
        self.open_marks.push(id);
        self.push(DrawOp::BeginMarked(id))
    }

    fn end_marked(&mut self) -> Result<(), CanvasError> {
        self.open_marks
            .pop()
            .ok_or_else(|| CanvasError::Other("end_marked without begin_marked".into()))?;
        self.push(DrawOp::EndMarked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawing_requires_a_page() {
        let mut canvas = RecordingCanvas::new();
        assert!(canvas.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK).is_err());
        canvas.begin_page(1, Size::new(100.0, 100.0)).unwrap();
        canvas.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK).unwrap();
        assert_eq!(canvas.pages[0].ops.len(), 1);
    }

    #[test]
    fn marked_content_must_balance_across_pages() {
        let mut canvas = RecordingCanvas::new();
        canvas.begin_page(1, Size::new(10.0, 10.0)).unwrap();
        let id = RendererId::next();
        canvas.begin_marked(id).unwrap();
        assert!(canvas.begin_page(2, Size::new(10.0, 10.0)).is_err());
        canvas.end_marked().unwrap();
        assert!(canvas.begin_page(2, Size::new(10.0, 10.0)).is_ok());
    }
}
