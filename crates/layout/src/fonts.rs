//! Font metrics backed by TrueType/OpenType programs.
//!
//! `TtfFontMetrics` answers ascender, descender, x-height, line gap and advance
//! queries from registered font binaries using `ttf-parser`. Families that were
//! never registered are measured by a fallback implementation.

use quire_style::font::{FontStyle, FontWeight};
use quire_traits::{FixedPitchMetrics, FontDescriptor, FontError, FontMetrics, VerticalMetrics};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A registered font program with its design-unit metrics.
pub struct FontInstance {
    pub data: Arc<Vec<u8>>,
    units_per_em: f32,
    ascender: f32,
    descender: f32,
    x_height: f32,
    line_gap: f32,
}

impl std::fmt::Debug for FontInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontInstance")
            .field("data_len", &self.data.len())
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

impl FontInstance {
    pub fn parse(family: &str, data: Arc<Vec<u8>>) -> Result<Self, FontError> {
        let face = ttf_parser::Face::parse(&data, 0).map_err(|e| FontError::Parse {
            family: family.to_string(),
            message: e.to_string(),
        })?;
        let ascender = f32::from(face.ascender());
        let units_per_em = f32::from(face.units_per_em());
        let x_height = face
            .x_height()
            .map(f32::from)
            .unwrap_or(ascender * 0.5);
        let descender = f32::from(face.descender());
        let line_gap = f32::from(face.line_gap());
        Ok(Self {
            data,
            units_per_em,
            ascender,
            descender,
            x_height,
            line_gap,
        })
    }

    /// Creates a lightweight Face view over the font data.
    pub fn as_face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, 0).ok()
    }
}

/// Key for the font cache.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct FontCacheKey {
    family: String,
    weight: u16,
    style: u8, // 0=Normal, 1=Italic, 2=Oblique
}

impl FontCacheKey {
    fn new(family: &str, weight: FontWeight, style: FontStyle) -> Self {
        Self {
            family: family.to_lowercase(),
            weight: weight.numeric_value(),
            style: style_to_u8(&style),
        }
    }
}

fn style_to_u8(s: &FontStyle) -> u8 {
    match s {
        FontStyle::Normal => 0,
        FontStyle::Italic => 1,
        FontStyle::Oblique => 2,
    }
}

#[derive(Debug)]
pub struct TtfFontMetrics {
    fonts: RwLock<HashMap<FontCacheKey, Arc<FontInstance>>>,
    fallback: Arc<dyn FontMetrics>,
}

impl Default for TtfFontMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl TtfFontMetrics {
    pub fn new() -> Self {
        Self::with_fallback(Arc::new(FixedPitchMetrics::default()))
    }

    pub fn with_fallback(fallback: Arc<dyn FontMetrics>) -> Self {
        Self {
            fonts: RwLock::new(HashMap::new()),
            fallback,
        }
    }

    /// Registers a font program under a family, weight and style.
    pub fn register(
        &self,
        family: &str,
        weight: FontWeight,
        style: FontStyle,
        data: Arc<Vec<u8>>,
    ) -> Result<(), FontError> {
        let instance = FontInstance::parse(family, data)?;
        if let Ok(mut fonts) = self.fonts.write() {
            fonts.insert(FontCacheKey::new(family, weight, style), Arc::new(instance));
        }
        Ok(())
    }

    pub fn is_registered(&self, family: &str) -> bool {
        let family = family.to_lowercase();
        self.fonts
            .read()
            .map(|fonts| fonts.keys().any(|k| k.family == family))
            .unwrap_or(false)
    }

    /// Exact match first, then the same family with the closest weight.
    fn resolve(&self, font: &FontDescriptor) -> Option<Arc<FontInstance>> {
        let fonts = self.fonts.read().ok()?;
        let key = FontCacheKey::new(&font.family, font.weight, font.style);
        if let Some(found) = fonts.get(&key) {
            return Some(found.clone());
        }
        let target = font.weight.numeric_value();
        fonts
            .iter()
            .filter(|(k, _)| k.family == key.family)
            .min_by_key(|(k, _)| (k.style != key.style, k.weight.abs_diff(target)))
            .map(|(_, v)| v.clone())
    }
}

impl FontMetrics for TtfFontMetrics {
    fn vertical_metrics(&self, font: &FontDescriptor, size: f32) -> VerticalMetrics {
        match self.resolve(font) {
            Some(instance) => {
                let scale = size / instance.units_per_em;
                VerticalMetrics {
                    ascender: instance.ascender * scale,
                    descender: instance.descender * scale,
                    x_height: instance.x_height * scale,
                    line_gap: instance.line_gap * scale,
                }
            }
            None => self.fallback.vertical_metrics(font, size),
        }
    }

    fn advance(&self, font: &FontDescriptor, size: f32, ch: char) -> f32 {
        self.measure(font, size, ch.encode_utf8(&mut [0; 4]))
    }

    fn measure(&self, font: &FontDescriptor, size: f32, text: &str) -> f32 {
        let Some(instance) = self.resolve(font) else {
            return self.fallback.measure(font, size, text);
        };
        let Some(face) = instance.as_face() else {
            return self.fallback.measure(font, size, text);
        };
        let scale = size / instance.units_per_em;
        text.chars()
            .map(|ch| {
                face.glyph_index(ch)
                    .and_then(|gid| face.glyph_hor_advance(gid))
                    .map(|adv| f32::from(adv) * scale)
                    .unwrap_or_else(|| self.fallback.advance(font, size, ch))
            })
            .sum()
    }
}
