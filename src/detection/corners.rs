use imageproc::point::Point;

use crate::models::QuadCorners;

/// Assign four unordered points to top-left, top-right, bottom-left, bottom-right.
///
/// Smallest `x + y` is top-left, largest is bottom-right; smallest `y - x` is
/// top-right, largest is bottom-left. Only meaningful for documents that are
/// roughly axis-aligned in the frame. Ties go to the earliest point.
pub fn reorder(quad: &QuadCorners) -> QuadCorners {
    let pts = quad.points;
    let sum = |p: &Point<i32>| p.x + p.y;
    let diff = |p: &Point<i32>| p.y - p.x;

    let top_left = pts[argmin(&pts, sum)];
    let bottom_right = pts[argmax(&pts, sum)];
    let top_right = pts[argmin(&pts, diff)];
    let bottom_left = pts[argmax(&pts, diff)];

    QuadCorners::new([top_left, top_right, bottom_left, bottom_right])
}

fn argmin(pts: &[Point<i32>; 4], key: impl Fn(&Point<i32>) -> i32) -> usize {
    let mut best = 0;
    for i in 1..pts.len() {
        if key(&pts[i]) < key(&pts[best]) {
            best = i;
        }
    }
    best
}

fn argmax(pts: &[Point<i32>; 4], key: impl Fn(&Point<i32>) -> i32) -> usize {
    let mut best = 0;
    for i in 1..pts.len() {
        if key(&pts[i]) > key(&pts[best]) {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(points: [(i32, i32); 4]) -> QuadCorners {
        QuadCorners::new(points.map(|(x, y)| Point::new(x, y)))
    }

    #[test]
    fn orders_shuffled_rectangle() {
        let shuffled = quad([(400, 300), (50, 40), (50, 300), (400, 40)]);
        let ordered = reorder(&shuffled);

        assert_eq!(ordered.top_left(), Point::new(50, 40));
        assert_eq!(ordered.top_right(), Point::new(400, 40));
        assert_eq!(ordered.bottom_left(), Point::new(50, 300));
        assert_eq!(ordered.bottom_right(), Point::new(400, 300));
    }

    #[test]
    fn orders_skewed_quad() {
        let skewed = quad([(30, 420), (60, 20), (440, 460), (400, 50)]);
        let ordered = reorder(&skewed);

        assert_eq!(ordered.top_left(), Point::new(60, 20));
        assert_eq!(ordered.top_right(), Point::new(400, 50));
        assert_eq!(ordered.bottom_left(), Point::new(30, 420));
        assert_eq!(ordered.bottom_right(), Point::new(440, 460));
    }

    #[test]
    fn reordering_is_idempotent() {
        let skewed = quad([(440, 460), (30, 420), (400, 50), (60, 20)]);
        let once = reorder(&skewed);
        assert_eq!(reorder(&once), once);
    }
}
