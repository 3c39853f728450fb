//! Axis-aligned geometry in PDF user space.
//!
//! The origin is the bottom-left corner of the page and `y` grows upwards.
//! A `Rect` is anchored at its bottom-left corner, so `top()` is `y + height`.

/// Tolerance used by the approximate comparisons in this module.
pub const EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }
}

/// A mutable axis-aligned box.
///
/// Width and height may become negative while layout math is in progress;
/// call [`Rect::normalize`] before handing a rectangle to a drawing sink.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a rectangle from its top-left corner, the natural anchor for
    /// content that flows downwards.
    pub fn from_top_left(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self::new(left, top - height, width, height)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn move_down(&mut self, dy: f32) -> &mut Self {
        self.y -= dy;
        self
    }

    pub fn move_up(&mut self, dy: f32) -> &mut Self {
        self.y += dy;
        self
    }

    pub fn move_left(&mut self, dx: f32) -> &mut Self {
        self.x -= dx;
        self
    }

    pub fn move_right(&mut self, dx: f32) -> &mut Self {
        self.x += dx;
        self
    }

    pub fn translate(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.x += dx;
        self.y += dy;
        self
    }

    /// Shrinks the box from the top; the bottom edge stays put.
    pub fn decrease_height(&mut self, dh: f32) -> &mut Self {
        self.height -= dh;
        self
    }

    /// Grows the box upwards; the bottom edge stays put.
    pub fn increase_height(&mut self, dh: f32) -> &mut Self {
        self.height += dh;
        self
    }

    pub fn decrease_width(&mut self, dw: f32) -> &mut Self {
        self.width -= dw;
        self
    }

    pub fn increase_width(&mut self, dw: f32) -> &mut Self {
        self.width += dw;
        self
    }

    /// Moves the top edge to `top`, keeping the bottom edge.
    pub fn set_top(&mut self, top: f32) -> &mut Self {
        self.height = top - self.y;
        self
    }

    /// Moves the bottom edge to `bottom`, keeping the top edge.
    pub fn set_bottom(&mut self, bottom: f32) -> &mut Self {
        let top = self.top();
        self.y = bottom;
        self.height = top - bottom;
        self
    }

    /// Shrinks (or with `reverse`, grows) the box by the given edge widths.
    pub fn apply_margins(
        &mut self,
        top: f32,
        right: f32,
        bottom: f32,
        left: f32,
        reverse: bool,
    ) -> &mut Self {
        let sign = if reverse { -1.0 } else { 1.0 };
        self.x += left * sign;
        self.width -= (left + right) * sign;
        self.y += bottom * sign;
        self.height -= (top + bottom) * sign;
        self
    }

    /// Flips negative extents so that `width` and `height` are non-negative.
    pub fn normalize(&mut self) -> &mut Self {
        if self.width < 0.0 {
            self.x += self.width;
            self.width = -self.width;
        }
        if self.height < 0.0 {
            self.y += self.height;
            self.height = -self.height;
        }
        self
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.width <= EPSILON || self.height <= EPSILON
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.left() - EPSILON
            && p.x <= self.right() + EPSILON
            && p.y >= self.bottom() - EPSILON
            && p.y <= self.top() + EPSILON
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.left() >= self.left() - EPSILON
            && other.right() <= self.right() + EPSILON
            && other.bottom() >= self.bottom() - EPSILON
            && other.top() <= self.top() + EPSILON
    }

    /// True when the interiors overlap (touching edges do not count).
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right() - EPSILON
            && other.left() < self.right() - EPSILON
            && self.bottom() < other.top() - EPSILON
            && other.bottom() < self.top() - EPSILON
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let right = self.right().min(other.right());
        let bottom = self.bottom().max(other.bottom());
        let top = self.top().min(other.top());
        if right < left || top < bottom {
            return None;
        }
        Some(Rect::new(left, bottom, right - left, top - bottom))
    }

    /// Smallest rectangle that contains both rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let right = self.right().max(other.right());
        let bottom = self.bottom().min(other.bottom());
        let top = self.top().max(other.top());
        Rect::new(left, bottom, right - left, top - bottom)
    }

    pub fn approx_eq(&self, other: &Rect) -> bool {
        (self.x - other.x).abs() < EPSILON
            && (self.y - other.y).abs() < EPSILON
            && (self.width - other.width).abs() < EPSILON
            && (self.height - other.height).abs() < EPSILON
    }
}

/// Common bounding box of a set of rectangles, `None` for an empty set.
pub fn common_rectangle<'a, I>(rects: I) -> Option<Rect>
where
    I: IntoIterator<Item = &'a Rect>,
{
    rects.into_iter().fold(None, |acc: Option<Rect>, r| match acc {
        Some(a) => Some(a.union(r)),
        None => Some(*r),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_follow_y_up_convention() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.top(), 70.0);
        assert_eq!(r.bottom(), 20.0);
        assert_eq!(r.right(), 110.0);
        let tl = Rect::from_top_left(10.0, 70.0, 100.0, 50.0);
        assert!(tl.approx_eq(&r));
    }

    #[test]
    fn decrease_height_keeps_bottom() {
        let mut r = Rect::new(0.0, 0.0, 100.0, 100.0);
        r.decrease_height(30.0);
        assert_eq!(r.bottom(), 0.0);
        assert_eq!(r.top(), 70.0);
    }

    #[test]
    fn margins_shrink_and_restore() {
        let mut r = Rect::new(0.0, 0.0, 100.0, 100.0);
        r.apply_margins(1.0, 2.0, 3.0, 4.0, false);
        assert!(r.approx_eq(&Rect::new(4.0, 3.0, 94.0, 96.0)));
        r.apply_margins(1.0, 2.0, 3.0, 4.0, true);
        assert!(r.approx_eq(&Rect::new(0.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn normalize_flips_negative_extent() {
        let mut r = Rect::new(10.0, 10.0, -5.0, -4.0);
        r.normalize();
        assert!(r.approx_eq(&Rect::new(5.0, 6.0, 5.0, 4.0)));
    }

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.intersection(&b).is_some());
        let c = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn common_rectangle_of_many() {
        let rects = [Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(5.0, 5.0, 1.0, 1.0)];
        let common = common_rectangle(rects.iter()).unwrap();
        assert!(common.approx_eq(&Rect::new(0.0, 0.0, 6.0, 6.0)));
        assert!(common_rectangle(std::iter::empty()).is_none());
    }
}
