//! Self-intersection repair by 2-opt uncrossing
//!
//! # Algorithm
//! 1. Scan every pair of non-adjacent edges `(i, j)`, `i < j`, in ascending
//!    order and stop at the first pair that touches or crosses
//! 2. Reverse the points strictly between the two edges (`i + 1 ..= j`); the
//!    two edges become `p[i] -> p[j]` and `p[i + 1] -> p[j + 1]`, which no
//!    longer cross and shorten the perimeter
//! 3. Rescan from scratch, since the reversal rewrote every edge in between
//!
//! The loop is capped at `n²` reversals for an `n`-point ring.

use log::debug;

use super::dedup::reduce_duplicates;
use crate::domain::{Point, Ring};
use crate::error::CleanError;
use crate::geometry::{edges, segments_intersect};

/// Outcome of resolving a ring
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub ring: Ring,
    pub reversals: usize,
    /// Adjacent duplicates created by reversals and removed on the fly
    pub duplicates_removed: usize,
}

/// First pair of non-adjacent edges that intersect, scanning `i` then `j`
///
/// Edges `0` and `m - 1` meet at the closing point and count as adjacent.
pub fn first_crossing(points: &[Point]) -> Option<(usize, usize)> {
    let edges = edges(points);
    let m = edges.len();

    for i in 0..m {
        for j in (i + 2)..m {
            if i == 0 && j == m - 1 {
                continue;
            }
            if segments_intersect(&edges[i], &edges[j]) {
                return Some((i, j));
            }
        }
    }
    None
}

/// Remove all self-intersections from a duplicate-reduced ring
pub fn resolve_self_intersections(ring: Ring, label: &str) -> Result<Resolution, CleanError> {
    let cap = ring.len() * ring.len();
    resolve_bounded(ring, label, cap)
}

/// [`resolve_self_intersections`] with an explicit reversal cap
pub fn resolve_bounded(ring: Ring, label: &str, cap: usize) -> Result<Resolution, CleanError> {
    let mut points = ring.into_points();
    let mut reversals = 0;
    let mut duplicates_removed = 0;

    while let Some((i, j)) = first_crossing(&points) {
        if reversals >= cap {
            return Err(CleanError::ReversalCapExceeded {
                label: label.to_string(),
                reversals,
                cap,
            });
        }
        debug!("{}: edges {} and {} intersect, reversing {}..={}", label, i, j, i + 1, j);
        points[i + 1..=j].reverse();
        reversals += 1;
        duplicates_removed += reduce_duplicates(&mut points);
    }

    Ok(Resolution {
        ring: Ring::new(points),
        reversals,
        duplicates_removed,
    })
}
