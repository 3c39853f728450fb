//! Font metrics collaborator used by line-height and baseline math.

use quire_style::font::{FontStyle, FontWeight};
use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum FontError {
    #[error("Failed to parse font program '{family}': {message}")]
    Parse { family: String, message: String },

    #[error("Font not registered: {0}")]
    UnknownFont(String),
}

/// Identifies a font face by family, weight and style.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontDescriptor {
    pub family: Arc<str>,
    pub weight: FontWeight,
    pub style: FontStyle,
}

impl FontDescriptor {
    pub fn new(family: &str) -> Self {
        Self {
            family: Arc::from(family),
            weight: FontWeight::Regular,
            style: FontStyle::Normal,
        }
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::new("Helvetica")
    }
}

/// Vertical metrics in points for a font at a given size. `descender` is negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VerticalMetrics {
    pub ascender: f32,
    pub descender: f32,
    pub x_height: f32,
    pub line_gap: f32,
}

impl VerticalMetrics {
    pub fn content_height(&self) -> f32 {
        self.ascender - self.descender
    }
}

pub trait FontMetrics: Send + Sync + Debug {
    fn vertical_metrics(&self, font: &FontDescriptor, size: f32) -> VerticalMetrics;

    /// Horizontal advance of one character in points.
    fn advance(&self, font: &FontDescriptor, size: f32, ch: char) -> f32;

    fn measure(&self, font: &FontDescriptor, size: f32, text: &str) -> f32 {
        text.chars().map(|c| self.advance(font, size, c)).sum()
    }
}

/// Deterministic metrics: every character advances by a fixed fraction of the em.
#[derive(Debug, Clone, Copy)]
pub struct FixedPitchMetrics {
    pub advance_em: f32,
    pub ascender_em: f32,
    pub descender_em: f32,
    pub x_height_em: f32,
}

impl Default for FixedPitchMetrics {
    fn default() -> Self {
        Self {
            advance_em: 0.5,
            ascender_em: 0.8,
            descender_em: -0.2,
            x_height_em: 0.5,
        }
    }
}

impl FontMetrics for FixedPitchMetrics {
    fn vertical_metrics(&self, _font: &FontDescriptor, size: f32) -> VerticalMetrics {
        VerticalMetrics {
            ascender: self.ascender_em * size,
            descender: self.descender_em * size,
            x_height: self.x_height_em * size,
            line_gap: 0.0,
        }
    }

    fn advance(&self, _font: &FontDescriptor, size: f32, ch: char) -> f32 {
        if ch.is_control() || ch == '\u{200B}' {
            0.0
        } else {
            self.advance_em * size
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_pitch_measures_every_glyph_alike() {
        let m = FixedPitchMetrics::default();
        let font = FontDescriptor::default();
        assert_eq!(m.measure(&font, 10.0, "abc d"), 25.0);
        let v = m.vertical_metrics(&font, 10.0);
        assert_eq!(v.content_height(), 10.0);
    }
}
