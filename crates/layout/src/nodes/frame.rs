//! Margin, border and padding resolution shared by all box renderers.
//!
//! A `BoxFrame` is opened against the offered area before children are laid
//! out and closed once the used content height is known.

use crate::interface::MinMaxWidth;
use crate::style::ComputedStyle;
use quire_style::dimension::{Dimension, Margins};
use quire_types::Rect;

const EPS: f32 = 1e-3;

/// Placed geometry of a box. Rectangles are in page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    pub page_number: usize,
    pub margin_box: Rect,
    pub border_box: Rect,
    pub content_box: Rect,
    /// The top border and padding belong to this fragment.
    pub draw_top: bool,
    /// The bottom border and padding belong to this fragment.
    pub draw_bottom: bool,
}

impl BoxGeometry {
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.margin_box.translate(dx, dy);
        self.border_box.translate(dx, dy);
        self.content_box.translate(dx, dy);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FrameOptions {
    /// Bottom margin of the previous sibling, already consumed.
    pub margin_before: f32,
    /// Continuation fragments drop the top margin, border and padding.
    pub continuation: bool,
    /// Content height to reach, in place of the style's height.
    pub fixed_height: Option<f32>,
    /// Content width to use, in place of the style's width.
    pub content_width: Option<f32>,
    /// Border widths to reserve, in place of the style's borders.
    pub borders: Option<[f32; 4]>,
    pub no_margins: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct BoxFrame {
    pub margin: Margins,
    pub border: [f32; 4],
    pub padding: Margins,
    pub area: Rect,
    pub border_left: f32,
    pub border_width: f32,
    /// Content box spanning all of the height left in the area.
    pub content: Rect,
    pub fixed_height: Option<f32>,
    pub max_height: Option<f32>,
    pub min_height: Option<f32>,
    pub continuation: bool,
}

/// Fixed content height from the style. Percent heights have no definite
/// base in a paged flow.
pub(crate) fn style_fixed_height(style: &ComputedStyle) -> Option<f32> {
    absolute_height(style.box_model.height, "height")
}

fn absolute_height(value: Option<Dimension>, property: &str) -> Option<f32> {
    match value {
        Some(Dimension::Pt(h)) => Some(h.max(0.0)),
        Some(Dimension::Percent(p)) => {
            log::warn!("Percentage {} ({}%) is not supported in paged flow; ignoring it", property, p);
            None
        }
        _ => None,
    }
}

/// Content width for an area of `containing` width, or `None` for auto.
pub(crate) fn specified_width(style: &ComputedStyle, containing: f32) -> Option<f32> {
    style
        .box_model
        .width
        .and_then(|d| d.resolve(Some(containing)))
        .map(|w| clamp_width(style, w, containing))
}

pub(crate) fn clamp_width(style: &ComputedStyle, width: f32, containing: f32) -> f32 {
    let mut w = width;
    if let Some(max) = style.box_model.max_width.and_then(|d| d.resolve(Some(containing))) {
        w = w.min(max);
    }
    if let Some(min) = style.box_model.min_width.and_then(|d| d.resolve(Some(containing))) {
        w = w.max(min);
    }
    w.max(0.0)
}

impl BoxFrame {
    pub fn open(style: &ComputedStyle, area: Rect, opts: FrameOptions) -> Self {
        let mut margin = if opts.no_margins {
            Margins::default()
        } else {
            style.box_model.margin
        };
        let mut border = opts.borders.unwrap_or_else(|| style.border.widths());
        let mut padding = style.box_model.padding;
        if opts.continuation {
            margin.top = 0.0;
            border[0] = 0.0;
            padding.top = 0.0;
        } else {
            margin.top = (margin.top - opts.margin_before).max(0.0);
        }

        let extras_x = border[1] + border[3] + padding.horizontal();
        let auto_width = (area.width - margin.horizontal() - extras_x).max(0.0);
        let content_width = opts
            .content_width
            .or_else(|| specified_width(style, area.width))
            .unwrap_or_else(|| clamp_width(style, auto_width, area.width));

        let border_left = area.left() + margin.left;
        let content_left = border_left + border[3] + padding.left;
        let content_top = area.top() - margin.top - border[0] - padding.top;
        let content_bottom = area.bottom() + padding.bottom + border[2];

        Self {
            margin,
            border,
            padding,
            area,
            border_left,
            border_width: content_width + extras_x,
            content: Rect::new(
                content_left,
                content_bottom,
                content_width,
                content_top - content_bottom,
            ),
            fixed_height: opts.fixed_height,
            max_height: absolute_height(style.box_model.max_height, "max-height"),
            min_height: absolute_height(style.box_model.min_height, "min-height"),
            continuation: opts.continuation,
        }
    }

    /// True if the top margin, border and padding fit in the area.
    pub fn top_fits(&self, tolerance: f32) -> bool {
        self.content.height >= -tolerance
    }

    pub fn available_height(&self) -> f32 {
        self.content.height.max(0.0)
    }

    /// The region offered to children.
    pub fn content_area(&self) -> Rect {
        let mut h = self.available_height();
        if let Some(f) = self.fixed_height {
            h = h.min(f);
        }
        if let Some(m) = self.max_height {
            h = h.min(m);
        }
        Rect::from_top_left(self.content.left(), self.content.top(), self.content.width, h)
    }

    /// Children may not grow the box past the content area.
    pub fn is_clipped(&self) -> bool {
        self.fixed_height.is_some() || self.max_height.is_some()
    }

    /// Part of the fixed height that does not fit in this area.
    pub fn fixed_height_remainder(&self) -> Option<f32> {
        self.fixed_height
            .map(|f| f - self.available_height())
            .filter(|rest| *rest > EPS)
    }

    /// Vertical space outside the content box, in this fragment.
    pub fn vertical_extras(&self, complete: bool) -> f32 {
        let bottom = if complete {
            self.padding.bottom + self.border[2] + self.margin.bottom
        } else {
            0.0
        };
        self.margin.top + self.border[0] + self.padding.top + bottom
    }

    /// Builds the placed geometry for `used` content height.
    ///
    /// `complete` is false for a fragment that continues elsewhere; it then owns
    /// no bottom border, padding or margin.
    pub fn close(
        &self,
        page_number: usize,
        used: f32,
        complete: bool,
        min_outer: Option<f32>,
    ) -> BoxGeometry {
        let avail = self.available_height();
        let mut h = used.max(0.0);
        if let Some(f) = self.fixed_height {
            h = f.min(avail);
        } else {
            if let Some(max) = self.max_height {
                h = h.min(max);
            }
            if let Some(min) = self.min_height {
                h = h.max(min.min(avail.max(h)));
            }
        }
        if let Some(outer) = min_outer {
            h = h.max(outer - self.vertical_extras(complete));
        }

        let content_box =
            Rect::from_top_left(self.content.left(), self.content.top(), self.content.width, h);
        let (bottom_extras, margin_bottom) = if complete {
            (self.padding.bottom + self.border[2], self.margin.bottom)
        } else {
            (0.0, 0.0)
        };
        let border_top = self.content.top() + self.padding.top + self.border[0];
        let border_bottom = content_box.bottom() - bottom_extras;
        let border_box = Rect::from_top_left(
            self.border_left,
            border_top,
            self.border_width,
            border_top - border_bottom,
        );
        let margin_bottom = margin_bottom.min((border_bottom - self.area.bottom()).max(0.0));
        let margin_box = Rect::new(
            self.area.left(),
            border_bottom - margin_bottom,
            self.area.width,
            self.area.top() - (border_bottom - margin_bottom),
        );

        BoxGeometry {
            page_number,
            margin_box,
            border_box,
            content_box,
            draw_top: !self.continuation,
            draw_bottom: complete,
        }
    }
}

/// Intrinsic widths of a box given the intrinsic widths of its content.
pub(crate) fn outer_min_max(style: &ComputedStyle, content: MinMaxWidth) -> MinMaxWidth {
    let extras = style.horizontal_extras();
    let mut mm = match style.box_model.width.and_then(|d| d.points()) {
        Some(w) => MinMaxWidth::fixed(w),
        None => content,
    };
    if let Some(max) = style.box_model.max_width.and_then(|d| d.points()) {
        mm = MinMaxWidth::new(mm.min.min(max), mm.max.min(max));
    }
    if let Some(min) = style.box_model.min_width.and_then(|d| d.points()) {
        mm = MinMaxWidth::new(mm.min.max(min), mm.max.max(min));
    }
    mm.plus(extras)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::BorderModel;
    use quire_style::border::Border;

    fn boxed() -> ComputedStyle {
        let mut style = ComputedStyle::default();
        style.box_model.margin = Margins::all(10.0);
        style.box_model.padding = Margins::all(5.0);
        style.border = BorderModel::uniform(Border::solid(2.0));
        style
    }

    #[test]
    fn content_box_is_inset_by_margin_border_and_padding() {
        let frame = BoxFrame::open(&boxed(), Rect::new(0.0, 0.0, 200.0, 500.0), FrameOptions::default());
        assert_eq!(frame.content.left(), 17.0);
        assert_eq!(frame.content.top(), 483.0);
        assert_eq!(frame.content.width, 166.0);
        let geom = frame.close(1, 100.0, true, None);
        assert_eq!(geom.border_box.top(), 490.0);
        assert_eq!(geom.border_box.height, 114.0);
        assert_eq!(geom.margin_box.height, 134.0);
    }

    #[test]
    fn top_margin_collapses_with_previous_bottom_margin() {
        let opts = FrameOptions {
            margin_before: 6.0,
            ..Default::default()
        };
        let frame = BoxFrame::open(&boxed(), Rect::new(0.0, 0.0, 200.0, 500.0), opts);
        assert_eq!(frame.margin.top, 4.0);
        let opts = FrameOptions {
            margin_before: 20.0,
            ..Default::default()
        };
        let frame = BoxFrame::open(&boxed(), Rect::new(0.0, 0.0, 200.0, 500.0), opts);
        assert_eq!(frame.margin.top, 0.0);
    }

    #[test]
    fn continuation_drops_top_decorations() {
        let opts = FrameOptions {
            continuation: true,
            ..Default::default()
        };
        let frame = BoxFrame::open(&boxed(), Rect::new(0.0, 0.0, 200.0, 500.0), opts);
        assert_eq!(frame.content.top(), 500.0);
        let geom = frame.close(2, 50.0, false, None);
        assert!(!geom.draw_top && !geom.draw_bottom);
        assert_eq!(geom.border_box.height, 50.0);
    }

    #[test]
    fn fixed_height_limits_content_area() {
        let opts = FrameOptions {
            fixed_height: Some(40.0),
            ..Default::default()
        };
        let frame = BoxFrame::open(&ComputedStyle::default(), Rect::new(0.0, 0.0, 100.0, 30.0), opts);
        assert!(frame.is_clipped());
        assert_eq!(frame.content_area().height, 30.0);
        assert_eq!(frame.fixed_height_remainder(), Some(10.0));
    }
}
