//! Axis-aligned rectangles and point helpers in game-window pixels.
//!
//! Rectangles use a top-left origin with Y growing downward, matching the
//! sprite sheets and the level layout. Empty rectangles never intersect
//! anything, so degenerate collision queries fall out as "no contact".

use glam::DVec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }

    /// True when the rectangle has no area (including inverted or NaN edges).
    pub fn is_empty(&self) -> bool {
        !(self.left < self.right && self.top < self.bottom)
    }

    /// Strict overlap test: touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }
}

pub fn distance(a: DVec2, b: DVec2) -> f64 {
    a.distance(b)
}

/// Unit vector from `from` towards `to`, or `None` when the points coincide.
pub fn direction_towards(from: DVec2, to: DVec2) -> Option<DVec2> {
    let delta = to - from;
    let length = delta.length();
    if length > 0.0 && length.is_finite() {
        Some(delta / length)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn overlapping_rects_intersect() {
        let a = Rect::from_origin_size(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_origin_size(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::from_origin_size(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_origin_size(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn zero_size_rect_never_intersects() {
        let a = Rect::from_origin_size(0.0, 0.0, 10.0, 10.0);
        let flat = Rect::from_origin_size(2.0, 5.0, 4.0, 0.0);
        assert!(flat.is_empty());
        assert!(!a.intersects(&flat));
        assert!(!flat.intersects(&a));
    }

    #[test]
    fn nan_rect_is_empty() {
        let r = Rect::new(f64::NAN, 0.0, 1.0, 1.0);
        assert!(r.is_empty());
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rect::from_origin_size(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(DVec2::new(0.0, 0.0)));
        assert!(!r.contains(DVec2::new(10.0, 5.0)));
    }

    #[test]
    fn distance_between_points() {
        assert_relative_eq!(distance(DVec2::new(0.0, 0.0), DVec2::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn direction_towards_is_unit_or_none() {
        let dir = direction_towards(DVec2::new(1.0, 1.0), DVec2::new(4.0, 5.0)).unwrap();
        assert_relative_eq!(dir.length(), 1.0);
        assert!(direction_towards(DVec2::ONE, DVec2::ONE).is_none());
    }
}
