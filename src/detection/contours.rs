use image::Rgb;
use imageproc::contours::{BorderType, find_contours};
use imageproc::drawing::draw_filled_circle_mut;
use imageproc::geometry::approximate_polygon_dp;
use imageproc::point::Point;
use tracing::{debug, trace};

use crate::config::ScanConfig;
use crate::models::{Contour, EdgeMask, Frame, QuadCorners};

/// Color of the corner dots drawn on the annotation frame
pub const ANNOTATION_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
pub const ANNOTATION_RADIUS: i32 = 10;

/// Outer boundaries of the edge mask, nested holes and inner borders excluded
pub fn find_external_contours(edges: &EdgeMask) -> Vec<Contour> {
    find_contours::<i32>(edges)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| Contour::new(c.points))
        .collect()
}

/// Largest 4-vertex polygon among the external contours larger than `min_area`.
///
/// Vertices come back in whatever order the approximation produced them.
pub fn find_largest_quad(edges: &EdgeMask, config: &ScanConfig) -> Option<QuadCorners> {
    let contours = find_external_contours(edges);
    debug!(count = contours.len(), "external contours found");

    let mut best: Option<(f64, QuadCorners)> = None;

    for contour in &contours {
        let area = contour.area();
        if area <= config.min_area {
            continue;
        }

        let epsilon = config.approx_epsilon_ratio * contour.perimeter();
        let polygon = approximate_closed_polygon(&contour.points, epsilon);
        trace!(area, vertices = polygon.len(), "candidate contour");

        let Some(quad) = QuadCorners::from_polygon(&polygon) else {
            continue;
        };

        if best.as_ref().is_none_or(|(best_area, _)| area > *best_area) {
            best = Some((area, quad));
        }
    }

    if let Some((area, quad)) = &best {
        debug!(area, corners = ?quad.points, "document outline selected");
    }

    best.map(|(_, quad)| quad)
}

/// Locate the document and mark its corners on `annotation`
pub fn locate_document(
    edges: &EdgeMask,
    annotation: &mut Frame,
    config: &ScanConfig,
) -> Option<QuadCorners> {
    let quad = find_largest_quad(edges, config)?;
    annotate_corners(annotation, &quad);
    Some(quad)
}

/// Draw a filled dot on every corner
pub fn annotate_corners(annotation: &mut Frame, quad: &QuadCorners) {
    for p in quad.points {
        draw_filled_circle_mut(annotation, (p.x, p.y), ANNOTATION_RADIUS, ANNOTATION_COLOR);
    }
}

/// Douglas-Peucker for a closed curve.
///
/// The curve is split at the point farthest from its start; both halves are
/// simplified as open curves and joined without repeating shared vertices.
pub fn approximate_closed_polygon(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    if points.len() < 3 || epsilon <= 0.0 {
        return points.to_vec();
    }

    let start = points[0];
    let (split, _) = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let dx = (p.x - start.x) as i64;
            let dy = (p.y - start.y) as i64;
            (i, dx * dx + dy * dy)
        })
        .fold((0, 0), |best, cur| if cur.1 > best.1 { cur } else { best });

    if split == 0 {
        return vec![start];
    }

    let first_half = &points[..=split];
    let mut second_half: Vec<Point<i32>> = points[split..].to_vec();
    second_half.push(start);

    let mut polygon = approximate_polygon_dp(first_half, epsilon, false);
    let tail = approximate_polygon_dp(&second_half, epsilon, false);

    // Tail starts at the split vertex and ends back at the start vertex
    let inner = tail.len().saturating_sub(1);
    polygon.extend(tail.into_iter().take(inner).skip(1));
    polygon.dedup();

    polygon
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_outline(x0: i32, y0: i32, side: i32) -> Vec<Point<i32>> {
        let mut pts = Vec::new();
        for x in x0..x0 + side {
            pts.push(Point::new(x, y0));
        }
        for y in y0..y0 + side {
            pts.push(Point::new(x0 + side, y));
        }
        for x in (x0 + 1..=x0 + side).rev() {
            pts.push(Point::new(x, y0 + side));
        }
        for y in (y0 + 1..=y0 + side).rev() {
            pts.push(Point::new(x0, y));
        }
        pts
    }

    #[test]
    fn closed_square_reduces_to_its_corners() {
        let outline = square_outline(10, 20, 100);
        let polygon = approximate_closed_polygon(&outline, 8.0);

        assert_eq!(polygon.len(), 4);
        for corner in [
            Point::new(10, 20),
            Point::new(110, 20),
            Point::new(110, 120),
            Point::new(10, 120),
        ] {
            assert!(polygon.contains(&corner), "missing {:?} in {:?}", corner, polygon);
        }
    }

    #[test]
    fn tiny_curves_pass_through() {
        let pts = vec![Point::new(0, 0), Point::new(1, 1)];
        assert_eq!(approximate_closed_polygon(&pts, 1.0), pts);
    }
}
