//! Float placement and clearance within one block formatting context.
//!
//! Floats are recorded as page-space rectangles in the order they were placed.
//! They never move content that was laid out before them.

use quire_style::boxes::{Clear, FloatSide};
use quire_types::Rect;

const EPS: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatBox {
    /// Margin box of the floated element.
    pub rect: Rect,
    pub side: FloatSide,
}

fn overlaps_strip(float: &FloatBox, top: f32, height: f32) -> bool {
    let bottom = top - height.max(2.0 * EPS);
    float.rect.bottom() < top - EPS && float.rect.top() > bottom + EPS
}

/// Horizontal extent `(left, right)` left free by floats inside `container` for the
/// strip that starts at `top` and extends `height` downwards.
pub fn band_at(floats: &[FloatBox], container: &Rect, top: f32, height: f32) -> (f32, f32) {
    let mut left = container.left();
    let mut right = container.right();
    for float in floats.iter().filter(|f| overlaps_strip(f, top, height)) {
        match float.side {
            FloatSide::Left => left = left.max(float.rect.right()),
            FloatSide::Right => right = right.min(float.rect.left()),
            FloatSide::None => {}
        }
    }
    (left, right.max(left))
}

/// The y a box must start at to be clear of floats on the requested sides.
pub fn clearance(floats: &[FloatBox], clear: Clear, top: f32) -> f32 {
    floats
        .iter()
        .filter(|f| clear.clears(f.side))
        .map(|f| f.rect.bottom())
        .fold(top, f32::min)
}

/// The nearest float bottom below `top` among floats that intrude at `top`.
pub fn next_float_bottom(floats: &[FloatBox], top: f32, height: f32) -> Option<f32> {
    floats
        .iter()
        .filter(|f| overlaps_strip(f, top, height))
        .map(|f| f.rect.bottom())
        .filter(|b| *b < top - EPS)
        .max_by(f32::total_cmp)
}

/// Candidate tops for a box, scanning from `top` downwards past every float bottom.
fn candidate_tops(floats: &[FloatBox], top: f32) -> Vec<f32> {
    let mut candidates: Vec<f32> = std::iter::once(top)
        .chain(floats.iter().map(|f| f.rect.bottom()).filter(|b| *b < top))
        .collect();
    candidates.sort_by(|a, b| b.total_cmp(a));
    candidates.dedup_by(|a, b| (*a - *b).abs() < EPS);
    candidates
}

/// Places a floated box of the given size with a first-fit scan from `top` downwards.
///
/// Returns `None` when no vacancy exists before the container bottom.
pub fn place_float(
    floats: &[FloatBox],
    container: &Rect,
    top: f32,
    width: f32,
    height: f32,
    side: FloatSide,
) -> Option<Rect> {
    for y in candidate_tops(floats, top) {
        if y - height < container.bottom() - EPS {
            break;
        }
        let (left, right) = band_at(floats, container, y, height);
        if right - left + EPS >= width {
            let x = match side {
                FloatSide::Right => right - width,
                _ => left,
            };
            return Some(Rect::from_top_left(x, y, width, height));
        }
    }
    None
}

/// Narrows `bbox` for a box that establishes its own formatting context and so may
/// not overlap floats. Moves the top down until at least `min_width` is free.
pub fn adjust_box_for_floats(floats: &[FloatBox], bbox: &Rect, min_width: f32) -> Rect {
    if floats.is_empty() {
        return *bbox;
    }
    for y in candidate_tops(floats, bbox.top()) {
        if y < bbox.bottom() {
            break;
        }
        let (left, right) = band_at(floats, bbox, y, EPS);
        if right - left + EPS >= min_width.min(bbox.width) {
            return Rect::new(left, bbox.bottom(), right - left, y - bbox.bottom());
        }
    }
    *bbox
}

/// Lowest bottom among the floats added since `mark`.
pub fn floats_bottom_since(floats: &[FloatBox], mark: usize) -> Option<f32> {
    floats
        .get(mark..)
        .unwrap_or_default()
        .iter()
        .map(|f| f.rect.bottom())
        .min_by(f32::total_cmp)
}
