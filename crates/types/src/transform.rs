//! 2D affine transforms in PDF matrix order `[a b c d e f]`.
//!
//! A point `(x, y)` maps to `(a*x + c*y + e, b*x + d*y + f)`.

use crate::geometry::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn translate(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::identity()
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::identity()
        }
    }

    /// Counter-clockwise rotation by `angle` radians.
    pub fn rotate(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Returns `self` followed by `other` (apply `self` first).
    pub fn then(&self, other: &AffineTransform) -> AffineTransform {
        AffineTransform {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Axis-aligned bounding box of the transformed rectangle.
    pub fn transform_rect(&self, r: &Rect) -> Rect {
        let corners = [
            Point::new(r.left(), r.bottom()),
            Point::new(r.right(), r.bottom()),
            Point::new(r.left(), r.top()),
            Point::new(r.right(), r.top()),
        ]
        .map(|p| self.transform_point(p));
        let min_x = corners.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let max_x = corners.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
        let min_y = corners.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = corners.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    pub fn inverse(&self) -> Option<AffineTransform> {
        let det = self.determinant();
        if det.abs() < f32::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        Some(AffineTransform {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            e: (self.c * self.f - self.d * self.e) * inv,
            f: (self.b * self.e - self.a * self.f) * inv,
        })
    }

    pub fn as_array(&self) -> [f32; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn scale_then_translate_places_unit_square() {
        let m = AffineTransform::scale(50.0, 20.0).then(&AffineTransform::translate(10.0, 30.0));
        let r = m.transform_rect(&Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(r.approx_eq(&Rect::new(10.0, 30.0, 50.0, 20.0)));
    }

    #[test]
    fn rotation_bounding_box() {
        let m = AffineTransform::rotate(std::f32::consts::FRAC_PI_2);
        let r = m.transform_rect(&Rect::new(0.0, 0.0, 10.0, 5.0));
        assert!(close(r.width, 5.0));
        assert!(close(r.height, 10.0));
    }

    #[test]
    fn inverse_undoes_transform() {
        let m = AffineTransform::scale(2.0, 4.0).then(&AffineTransform::translate(3.0, -1.0));
        let inv = m.inverse().unwrap();
        let p = inv.transform_point(m.transform_point(Point::new(7.0, 9.0)));
        assert!(close(p.x, 7.0) && close(p.y, 9.0));
        assert!(AffineTransform::scale(0.0, 1.0).inverse().is_none());
    }
}
