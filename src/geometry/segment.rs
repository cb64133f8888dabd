use geo::algorithm::line_intersection::line_intersection;
use geo::{Closest, ClosestPoint, Line};

use crate::domain::Point;

/// Edges of a point sequence: edge `i` runs from `points[i]` to `points[i + 1]`
pub fn edges(points: &[Point]) -> Vec<Line<f64>> {
    points
        .windows(2)
        .map(|w| Line::new(w[0], w[1]))
        .collect()
}

/// Whether two segments share at least one point
///
/// Touching endpoints and collinear overlap both count as intersecting.
pub fn segments_intersect(a: &Line<f64>, b: &Line<f64>) -> bool {
    line_intersection(*a, *b).is_some()
}

pub fn point_distance(a: &Point, b: &Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Shortest distance from a point to a segment
pub fn point_segment_distance(p: &Point, segment: &Line<f64>) -> f64 {
    let target = geo::Point::from(*p);
    let closest = match segment.closest_point(&target) {
        Closest::Intersection(c) | Closest::SinglePoint(c) => c,
        // zero-length segment
        Closest::Indeterminate => segment.start_point(),
    };
    (target.x() - closest.x()).hypot(target.y() - closest.y())
}

/// Whether `p` lies strictly closer than `threshold` to any of `edges`
pub fn is_near_edges(p: &Point, edges: &[Line<f64>], threshold: f64) -> bool {
    edges
        .iter()
        .any(|e| point_segment_distance(p, e) < threshold)
}

/// Index and distance of the vertex nearest to `p`; the first one wins ties
pub fn nearest_vertex(p: &Point, vertices: &[Point]) -> Option<(usize, f64)> {
    vertices
        .iter()
        .enumerate()
        .map(|(i, v)| (i, point_distance(p, v)))
        .fold(None, |best, (i, d)| match best {
            Some((_, bd)) if bd <= d => best,
            _ => Some((i, d)),
        })
}
