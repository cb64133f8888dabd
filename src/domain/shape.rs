use serde::{Deserialize, Serialize};

use super::Ring;

/// One outer boundary plus zero or more holes
///
/// Two shapes are equal iff their ordered point sequences are identical,
/// which is what item merging relies on.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Shape {
    #[serde(rename = "Outer")]
    pub outer: Ring,
    #[serde(rename = "Inner", default, skip_serializing_if = "Vec::is_empty")]
    pub inner: Vec<Ring>,
}

impl Shape {
    pub fn new(outer: Ring) -> Self {
        Self {
            outer,
            inner: Vec::new(),
        }
    }

    pub fn with_holes(outer: Ring, inner: Vec<Ring>) -> Self {
        Self { outer, inner }
    }

    /// Iterate over every ring, outer first
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.outer).chain(self.inner.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point;

    fn square(size: f64) -> Ring {
        Ring::new(vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ])
    }

    #[test]
    fn test_shape_equality_is_structural() {
        assert_eq!(Shape::new(square(10.0)), Shape::new(square(10.0)));
        assert_ne!(Shape::new(square(10.0)), Shape::new(square(11.0)));
        assert_ne!(
            Shape::new(square(10.0)),
            Shape::with_holes(square(10.0), vec![square(1.0)])
        );
    }

    #[test]
    fn test_rings_outer_first() {
        let shape = Shape::with_holes(square(10.0), vec![square(1.0), square(2.0)]);
        let lens: Vec<usize> = shape.rings().map(|r| r.len()).collect();
        assert_eq!(lens, vec![5, 5, 5]);
        assert_eq!(shape.rings().next(), Some(&shape.outer));
    }
}
