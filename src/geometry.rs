// src/geometry.rs

//! Integer pixel geometry shared by the canvas, the operations and textures.

/// A pixel position. May lie outside any texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Texture dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Size { width, height }
    }

    /// Number of pixels covered.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// A half-open rectangle: `min` is inside, `max` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub const fn new(min: Point, max: Point) -> Self {
        Rect { min, max }
    }

    /// Builds a well-formed rectangle from two arbitrary opposite corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Rect {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Rectangle of `width` x `height` centred on `center`.
    ///
    /// Odd extents are truncated the same way on both sides, so the result is
    /// `2 * (extent / 2)` pixels wide. Edges saturate at the `i32` range.
    pub fn centered(center: Point, width: i32, height: i32) -> Self {
        let (hw, hh) = (width / 2, height / 2);
        Rect {
            min: Point::new(center.x.saturating_sub(hw), center.y.saturating_sub(hh)),
            max: Point::new(center.x.saturating_add(hw), center.y.saturating_add(hh)),
        }
    }

    /// The rectangle covering a whole texture of `size`.
    pub fn from_size(size: Size) -> Self {
        Rect {
            min: Point::ORIGIN,
            max: Point::new(
                i32::try_from(size.width).unwrap_or(i32::MAX),
                i32::try_from(size.height).unwrap_or(i32::MAX),
            ),
        }
    }

    pub fn width(&self) -> i32 {
        self.max.x.saturating_sub(self.min.x)
    }

    pub fn height(&self) -> i32 {
        self.max.y.saturating_sub(self.min.y)
    }

    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Largest rectangle contained in both. Empty results collapse to `Rect::default()`.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let r = Rect {
            min: Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        };
        if r.is_empty() {
            Rect::default()
        } else {
            r
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        self.min.x <= p.x && p.x < self.max.x && self.min.y <= p.y && p.y < self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_corners_orders_any_two_corners() {
        let r = Rect::from_corners(Point::new(30, 5), Point::new(10, 40));
        assert_eq!(r.min, Point::new(10, 5));
        assert_eq!(r.max, Point::new(30, 40));
    }

    #[test]
    fn centered_rect_spans_both_sides() {
        let r = Rect::centered(Point::new(100, 100), 100, 300);
        assert_eq!(r, Rect::new(Point::new(50, -50), Point::new(150, 250)));
    }

    #[test]
    fn centered_rect_saturates_at_extremes() {
        let r = Rect::centered(Point::new(i32::MAX, i32::MIN), 100, 300);
        assert_eq!(r.min, Point::new(i32::MAX - 50, i32::MIN));
        assert_eq!(r.max, Point::new(i32::MAX, i32::MIN + 150));
        assert!(r.intersect(&Rect::from_size(Size::new(800, 800))).is_empty());
    }

    #[test]
    fn intersect_clips_to_overlap() {
        let bounds = Rect::from_size(Size::new(800, 800));
        let r = Rect::new(Point::new(-10, 700), Point::new(50, 900));
        assert_eq!(
            r.intersect(&bounds),
            Rect::new(Point::new(0, 700), Point::new(50, 800))
        );
    }

    #[test]
    fn disjoint_intersection_is_empty() {
        let a = Rect::new(Point::new(0, 0), Point::new(10, 10));
        let b = Rect::new(Point::new(20, 20), Point::new(30, 30));
        assert!(a.intersect(&b).is_empty());
    }

    #[test]
    fn half_open_contains() {
        let r = Rect::new(Point::new(0, 0), Point::new(2, 2));
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(1, 1)));
        assert!(!r.contains(Point::new(2, 1)));
    }
}
