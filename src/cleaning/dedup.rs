use crate::domain::{Point, Ring};

/// Remove points equal to their immediate predecessor
///
/// Removal can expose a new equal pair at the same position; `Vec::dedup`
/// re-tests instead of advancing. Non-adjacent repeats are left alone.
/// Returns the number of removed points.
pub fn reduce_duplicates(points: &mut Vec<Point>) -> usize {
    let before = points.len();
    points.dedup();
    before - points.len()
}

/// Reduce a ring; closure is preserved since first and last stay in place
pub fn reduce_ring(ring: Ring) -> (Ring, usize) {
    let mut points = ring.into_points();
    let removed = reduce_duplicates(&mut points);
    (Ring::new(points), removed)
}

/// Like [`reduce_duplicates`], but over an open cyclic vertex array: the last
/// vertex is also compared against the first.
pub fn reduce_cyclic(vertices: &mut Vec<Point>) -> usize {
    let mut removed = reduce_duplicates(vertices);
    while vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
        removed += 1;
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(coords: &[(f64, f64)]) -> Ring {
        Ring::new(coords.iter().map(|&c| Point::from(c)).collect())
    }

    #[test]
    fn test_reduction_scenario() {
        let (reduced, removed) = reduce_ring(ring(&[(1.0, 1.0), (1.0, 1.0), (2.0, 2.0), (1.0, 1.0)]));
        assert_eq!(reduced, ring(&[(1.0, 1.0), (2.0, 2.0), (1.0, 1.0)]));
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_runs_of_duplicates_collapse() {
        let (reduced, removed) = reduce_ring(ring(&[
            (0.0, 0.0),
            (5.0, 0.0),
            (5.0, 0.0),
            (5.0, 0.0),
            (5.0, 5.0),
            (0.0, 0.0),
            (0.0, 0.0),
        ]));
        assert_eq!(removed, 3);
        assert_eq!(reduced.len(), 4);
        assert!(reduced.is_closed());
    }

    #[test]
    fn test_reduction_is_idempotent() {
        let input = ring(&[
            (0.0, 0.0),
            (0.0, 0.0),
            (3.0, 0.0),
            (3.0, 4.0),
            (3.0, 4.0),
            (0.0, 0.0),
        ]);
        let (once, _) = reduce_ring(input);
        let (twice, removed) = reduce_ring(once.clone());
        assert_eq!(once, twice);
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_no_adjacent_duplicates_remain() {
        let (reduced, _) = reduce_ring(ring(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
            (0.0, 1.0),
            (0.0, 0.0),
        ]));
        let vertices = reduced.vertices();
        let n = vertices.len();
        for i in 0..n {
            assert_ne!(vertices[i], vertices[(i + 1) % n]);
        }
    }

    #[test]
    fn test_non_adjacent_repeats_survive() {
        // figure-eight through (5, 5)
        let input = ring(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (5.0, 5.0),
            (0.0, 10.0),
            (10.0, 10.0),
            (5.0, 5.0),
        ]);
        let (reduced, removed) = reduce_ring(input.clone());
        assert_eq!(removed, 0);
        assert_eq!(reduced, input);
    }

    #[test]
    fn test_reduce_cyclic_compares_across_seam() {
        let mut vertices = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
        ];
        assert_eq!(reduce_cyclic(&mut vertices), 2);
        assert_eq!(vertices.len(), 3);
    }
}
