use super::block_attributes;
use super::frame::{BoxFrame, BoxGeometry, FrameOptions, outer_min_max};
use crate::interface::{DrawContext, LayoutArea, LayoutContext, LayoutResult, MinMaxWidth, Renderer};
use crate::painting::box_painter::paint_box;
use crate::style::ComputedStyle;
use crate::{LayoutEngine, LayoutError};
use quire_idf::ImageSource;
use quire_style::dimension::Dimension;
use quire_traits::TagRole;
use quire_types::{AffineTransform, AnchorId, Rect, RendererId};
use std::sync::Arc;

/// Size used when an image declares no usable intrinsic size.
const FALLBACK_SIZE: f32 = 100.0;

/// Maps the unit square onto `rect`.
pub fn image_transform(rect: &Rect) -> AffineTransform {
    AffineTransform::scale(rect.width, rect.height)
        .then(&AffineTransform::translate(rect.left(), rect.bottom()))
}

fn intrinsic_size(source: &ImageSource) -> (f32, f32) {
    if source.intrinsic_width > 0.0 && source.intrinsic_height > 0.0 {
        (source.intrinsic_width, source.intrinsic_height)
    } else {
        log::warn!(
            "Image '{}' has no intrinsic size; using {}x{}",
            source.src,
            FALLBACK_SIZE,
            FALLBACK_SIZE
        );
        (FALLBACK_SIZE, FALLBACK_SIZE)
    }
}

/// Content size of an image inside a containing block of width `containing`.
/// A missing dimension follows the intrinsic aspect ratio.
fn resolve_size(style: &ComputedStyle, source: &ImageSource, containing: Option<f32>) -> (f32, f32) {
    let (iw, ih) = intrinsic_size(source);
    let width = style.box_model.width.and_then(|d| d.resolve(containing));
    let height = match style.box_model.height {
        Some(Dimension::Pt(h)) => Some(h),
        Some(Dimension::Percent(_)) => {
            log::warn!("Percentage height on image '{}' is not supported; ignoring it", source.src);
            None
        }
        _ => None,
    };
    match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, w * ih / iw),
        (None, Some(h)) => (h * iw / ih, h),
        (None, None) => (iw, ih),
    }
}

pub(crate) fn inline_image_size(style: &ComputedStyle, source: &ImageSource) -> (f32, f32) {
    resolve_size(style, source, None)
}

#[derive(Debug, Clone)]
pub struct ImageRenderer {
    pub id: RendererId,
    pub style: Arc<ComputedStyle>,
    pub anchor: Option<AnchorId>,
    pub source: Arc<ImageSource>,
    pub geometry: Option<BoxGeometry>,
    pub image_rect: Option<Rect>,
}

impl ImageRenderer {
    pub fn new(style: Arc<ComputedStyle>, source: ImageSource) -> Self {
        Self {
            id: RendererId::next(),
            style,
            anchor: None,
            source: Arc::new(source),
            geometry: None,
            image_rect: None,
        }
    }

    pub fn with_anchor(mut self, anchor: Option<AnchorId>) -> Self {
        self.anchor = anchor;
        self
    }
}

impl Renderer for ImageRenderer {
    fn id(&self) -> RendererId {
        self.id
    }

    fn layout(&mut self, ctx: &mut LayoutContext) -> Result<LayoutResult<Self>, LayoutError> {
        let page = ctx.area.page_number;
        let area = ctx.area.bbox;
        let avail_width = (area.width - self.style.horizontal_extras()).max(0.0);
        let (mut width, mut height) = resolve_size(&self.style, &self.source, Some(avail_width));

        let scaling = BoxFrame::open(
            &self.style,
            area,
            FrameOptions {
                margin_before: ctx.margin_before,
                ..Default::default()
            },
        );
        if self.style.misc.auto_scale {
            let avail_height = scaling.available_height();
            let scale = (avail_width / width).min(avail_height / height).min(1.0);
            if scale > 0.0 && scale < 1.0 {
                log::debug!("Scaling image '{}' by {:.3} to fit its area", self.source.src, scale);
                width *= scale;
                height *= scale;
            }
        }

        let frame = BoxFrame::open(
            &self.style,
            area,
            FrameOptions {
                margin_before: ctx.margin_before,
                content_width: Some(width),
                ..Default::default()
            },
        );
        if !frame.top_fits(ctx.config().float_epsilon) && !ctx.forced_placement {
            return Ok(LayoutResult::nothing(self.id));
        }
        if !ctx.fits(height, frame.available_height()) {
            if !ctx.forced_placement {
                return Ok(LayoutResult::nothing(self.id));
            }
            if !ctx.measuring {
                log::warn!(
                    "Image '{}' ({}x{}) is taller than its area; placing it anyway",
                    self.source.src,
                    width,
                    height
                );
            }
        }
        if !ctx.fits(width, avail_width) {
            log::warn!(
                "Image '{}' is {}pt wide but only {}pt are available; it will overflow",
                self.source.src,
                width,
                avail_width
            );
        }

        let geom = frame.close(page, height, true, ctx.min_height);
        self.image_rect = Some(Rect::from_top_left(
            geom.content_box.left(),
            geom.content_box.top(),
            width,
            height,
        ));
        self.geometry = Some(geom);
        Ok(LayoutResult::full(LayoutArea::new(page, geom.margin_box)))
    }

    fn draw(&self, ctx: &mut DrawContext) -> Result<(), LayoutError> {
        let (Some(geom), Some(rect)) = (self.geometry, self.image_rect) else {
            return Ok(());
        };
        if let Some(anchor) = &self.anchor {
            ctx.register_anchor(anchor, geom.page_number, geom.border_box.top());
        }
        ctx.open_tag(self.id, TagRole::Figure, block_attributes(&self.style, &geom))?;
        paint_box(&mut *ctx.canvas, &self.style, &geom)?;
        ctx.canvas.draw_image(&self.source.src, image_transform(&rect))?;
        ctx.close_tag(self.id)
    }

    fn next_renderer(&self) -> Self {
        let mut next = self.clone();
        next.id = RendererId::next();
        next.geometry = None;
        next.image_rect = None;
        next
    }

    fn min_max_width(&self, _engine: &LayoutEngine) -> Result<MinMaxWidth, LayoutError> {
        let (width, _) = resolve_size(&self.style, &self.source, None);
        let min = if self.style.misc.auto_scale { 0.0 } else { width };
        Ok(outer_min_max(&self.style, MinMaxWidth::new(min, width)))
    }

    fn occupied_area(&self) -> Option<LayoutArea> {
        self.geometry.map(|g| LayoutArea::new(g.page_number, g.margin_box))
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        if let Some(g) = self.geometry.as_mut() {
            g.translate(dx, dy);
        }
        if let Some(r) = self.image_rect.as_mut() {
            r.translate(dx, dy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_types::Point;

    #[test]
    fn transform_maps_unit_square_onto_rect() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        let t = image_transform(&rect);
        assert_eq!(t.transform_point(Point::new(0.0, 0.0)), Point::new(10.0, 20.0));
        assert_eq!(t.transform_point(Point::new(1.0, 1.0)), Point::new(110.0, 70.0));
    }

    #[test]
    fn missing_dimension_keeps_aspect_ratio() {
        let mut style = ComputedStyle::default();
        style.box_model.width = Some(Dimension::Pt(50.0));
        let source = ImageSource::new("logo.png", 200.0, 100.0);
        assert_eq!(resolve_size(&style, &source, Some(500.0)), (50.0, 25.0));
        style.box_model.width = Some(Dimension::Percent(50.0));
        assert_eq!(resolve_size(&style, &source, Some(300.0)), (150.0, 75.0));
    }
}
