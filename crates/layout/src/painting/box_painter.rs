use crate::nodes::frame::BoxGeometry;
use crate::style::ComputedStyle;
use quire_style::border::Border;
use quire_traits::{Canvas, CanvasError};
use quire_types::{Point, Rect};

/// Paints the background and borders of a placed box.
///
/// The background fills the area inside the borders. Each border is stroked
/// along the center line of its side. The top side is skipped on continuation
/// fragments and the bottom side on fragments that continue elsewhere.
pub fn paint_box(
    canvas: &mut dyn Canvas,
    style: &ComputedStyle,
    geom: &BoxGeometry,
) -> Result<(), CanvasError> {
    let borders = [
        style.border.top.filter(|_| geom.draw_top),
        style.border.right,
        style.border.bottom.filter(|_| geom.draw_bottom),
        style.border.left,
    ];
    if let Some(color) = style.misc.background_color {
        let inner = inset(geom.border_box, &borders);
        if !inner.is_empty() {
            canvas.fill_rect(inner, color)?;
        }
    }
    paint_borders(canvas, geom.border_box, &borders)
}

/// Strokes up to four borders inside `rect`, in top/right/bottom/left order.
pub fn paint_borders(
    canvas: &mut dyn Canvas,
    rect: Rect,
    borders: &[Option<Border>; 4],
) -> Result<(), CanvasError> {
    let visible = |b: &Option<Border>| b.filter(|b| b.is_visible());
    if let Some(b) = visible(&borders[0]) {
        let y = rect.top() - b.width / 2.0;
        stroke(canvas, Point::new(rect.left(), y), Point::new(rect.right(), y), &b)?;
    }
    if let Some(b) = visible(&borders[2]) {
        let y = rect.bottom() + b.width / 2.0;
        stroke(canvas, Point::new(rect.left(), y), Point::new(rect.right(), y), &b)?;
    }
    if let Some(b) = visible(&borders[3]) {
        let x = rect.left() + b.width / 2.0;
        stroke(canvas, Point::new(x, rect.top()), Point::new(x, rect.bottom()), &b)?;
    }
    if let Some(b) = visible(&borders[1]) {
        let x = rect.right() - b.width / 2.0;
        stroke(canvas, Point::new(x, rect.top()), Point::new(x, rect.bottom()), &b)?;
    }
    Ok(())
}

pub(crate) fn stroke(
    canvas: &mut dyn Canvas,
    from: Point,
    to: Point,
    border: &Border,
) -> Result<(), CanvasError> {
    canvas.stroke_line(from, to, border.width, border.style, border.color)
}

fn inset(rect: Rect, borders: &[Option<Border>; 4]) -> Rect {
    let w = |b: &Option<Border>| b.filter(|b| b.is_visible()).map_or(0.0, |b| b.width);
    let mut inner = rect;
    inner.apply_margins(w(&borders[0]), w(&borders[1]), w(&borders[2]), w(&borders[3]), false);
    inner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::BorderModel;
    use quire_traits::{DrawOp, RecordingCanvas};
    use quire_types::{Color, Size};

    fn geometry(draw_top: bool, draw_bottom: bool) -> BoxGeometry {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        BoxGeometry {
            page_number: 1,
            margin_box: r,
            border_box: r,
            content_box: r,
            draw_top,
            draw_bottom,
        }
    }

    #[test]
    fn background_is_drawn_inside_borders() {
        let mut style = ComputedStyle::default();
        style.border = BorderModel::uniform(Border::solid(2.0));
        style.misc.background_color = Some(Color::gray(200));
        let mut canvas = RecordingCanvas::new();
        canvas.begin_page(1, Size::new(100.0, 100.0)).unwrap();
        paint_box(&mut canvas, &style, &geometry(true, true)).unwrap();

        let fill = canvas.pages[0].ops.iter().find_map(|op| match op {
            DrawOp::FillRect { rect, .. } => Some(*rect),
            _ => None,
        });
        assert_eq!(fill, Some(Rect::new(2.0, 2.0, 96.0, 46.0)));
        assert_eq!(canvas.lines(0).len(), 4);
    }

    #[test]
    fn fragment_edges_are_skipped() {
        let mut style = ComputedStyle::default();
        style.border = BorderModel::uniform(Border::solid(1.0));
        let mut canvas = RecordingCanvas::new();
        canvas.begin_page(1, Size::new(100.0, 100.0)).unwrap();
        paint_box(&mut canvas, &style, &geometry(false, true)).unwrap();
        let lines = canvas.lines(0);
        assert_eq!(lines.len(), 3);
        assert!(!lines.iter().any(|(from, to, _)| from.y == to.y && from.y > 49.0));
    }
}
