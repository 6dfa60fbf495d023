use image::{GrayImage, RgbImage};
use imageproc::geometry::arc_length;
use imageproc::point::Point;

/// Color frame as delivered by a frame source (RGB channel order)
pub type Frame = RgbImage;

/// Single-channel edge mask produced by the edge extractor
pub type EdgeMask = GrayImage;

/// Closed boundary traced through connected edge pixels
#[derive(Debug, Clone)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enclosed area in pixels² (shoelace formula over the boundary points)
    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }

    /// Closed perimeter length
    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        arc_length(&self.points, true)
    }
}

/// Absolute area of a closed polygon given by its vertices
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut twice_area: i64 = 0;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        twice_area += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }

    (twice_area as f64 / 2.0).abs()
}

/// Four corners of a detected document.
///
/// Once produced by [`crate::detection::corners::reorder`] the points are in
/// canonical order: top-left, top-right, bottom-left, bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadCorners {
    pub points: [Point<i32>; 4],
}

impl QuadCorners {
    pub fn new(points: [Point<i32>; 4]) -> Self {
        Self { points }
    }

    /// Build from a polygon; anything but exactly four vertices is rejected
    pub fn from_polygon(polygon: &[Point<i32>]) -> Option<Self> {
        let points: [Point<i32>; 4] = polygon.try_into().ok()?;
        Some(Self { points })
    }

    pub fn top_left(&self) -> Point<i32> {
        self.points[0]
    }

    pub fn top_right(&self) -> Point<i32> {
        self.points[1]
    }

    pub fn bottom_left(&self) -> Point<i32> {
        self.points[2]
    }

    pub fn bottom_right(&self) -> Point<i32> {
        self.points[3]
    }

    pub fn area(&self) -> f64 {
        // Canonical order zig-zags (TL, TR, BL, BR), walk the outline instead
        polygon_area(&[
            self.points[0],
            self.points[1],
            self.points[3],
            self.points[2],
        ])
    }

    /// Corners as floating point control points
    pub fn as_control_points(&self) -> [(f32, f32); 4] {
        self.points.map(|p| (p.x as f32, p.y as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shoelace_area_of_square() {
        let square = vec![
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 10),
            Point::new(0, 10),
        ];
        assert_eq!(polygon_area(&square), 100.0);

        let reversed: Vec<_> = square.into_iter().rev().collect();
        assert_eq!(polygon_area(&reversed), 100.0);
    }

    #[test]
    fn degenerate_polygons_have_no_area() {
        assert_eq!(polygon_area(&[]), 0.0);
        assert_eq!(polygon_area(&[Point::new(1, 1), Point::new(5, 5)]), 0.0);
    }

    #[test]
    fn quad_requires_exactly_four_points() {
        let three = [Point::new(0, 0), Point::new(1, 0), Point::new(1, 1)];
        assert!(QuadCorners::from_polygon(&three).is_none());

        let four = [
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(1, 1),
            Point::new(0, 1),
        ];
        assert!(QuadCorners::from_polygon(&four).is_some());
    }
}
