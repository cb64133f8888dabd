use serde::{Deserialize, Serialize};

use super::Point;

/// A closed boundary: the first point is repeated as the last one.
///
/// Closure is enforced on construction. A ring built from an empty point list
/// stays empty; the cleaner rejects it together with every other ring that has
/// fewer than three distinct points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Point>", into = "Vec<Point>")]
pub struct Ring {
    points: Vec<Point>,
}

impl Ring {
    pub fn new(mut points: Vec<Point>) -> Self {
        if let (Some(&first), Some(&last)) = (points.first(), points.last())
            && first != last
        {
            points.push(first);
        }
        Self { points }
    }

    /// All points, including the closing repeat
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The points without the closing repeat, as a cyclic vertex array
    pub fn vertices(&self) -> &[Point] {
        match self.points.len() {
            0 => &[],
            n => &self.points[..n - 1],
        }
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.points.first() == self.points.last()
    }

    /// Number of coordinate-distinct points, closing repeat excluded
    pub fn distinct_count(&self) -> usize {
        let mut sorted = self.vertices().to_vec();
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        sorted.dedup();
        sorted.len()
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.points.contains(point)
    }

    /// Total boundary length
    pub fn perimeter(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| crate::geometry::point_distance(&w[0], &w[1]))
            .sum()
    }
}

impl From<Vec<Point>> for Ring {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

impl From<Ring> for Vec<Point> {
    fn from(ring: Ring) -> Self {
        ring.points
    }
}

impl FromIterator<Point> for Ring {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&c| Point::from(c)).collect()
    }

    #[test]
    fn test_new_closes_open_ring() {
        let ring = Ring::new(pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]));
        assert_eq!(ring.len(), 4);
        assert!(ring.is_closed());
        assert_eq!(ring.points()[3], Point::new(0.0, 0.0));
    }

    #[test]
    fn test_new_keeps_closed_ring() {
        let ring = Ring::new(pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]));
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.vertices().len(), 3);
    }

    #[test]
    fn test_empty_ring_stays_empty() {
        let ring = Ring::new(Vec::new());
        assert!(ring.is_empty());
        assert!(ring.vertices().is_empty());
        assert_eq!(ring.distinct_count(), 0);
    }

    #[test]
    fn test_distinct_count_ignores_repeats() {
        let ring = Ring::new(pts(&[(1.0, 1.0), (1.0, 1.0), (2.0, 2.0), (1.0, 1.0)]));
        assert_eq!(ring.distinct_count(), 2);
    }

    #[test]
    fn test_perimeter_unit_square() {
        let ring = Ring::new(pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]));
        assert!((ring.perimeter() - 4.0).abs() < 1e-12);
    }
}
