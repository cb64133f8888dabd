//! Register a subordinate ring onto an authoritative reference ring
//!
//! Zones and their parent outlines are digitized independently, so a stretch
//! of boundary they are meant to share rarely matches exactly. This pass moves
//! the zone's near-boundary vertices onto the reference's exact vertices and
//! inserts reference vertices the zone skipped.
//!
//! Vertex indices are taken over the ring's distinct vertices (closing repeat
//! dropped) with true cyclic neighbours, see [`crate::geometry::cyclic`].

use geo::Line;

use super::dedup::reduce_cyclic;
use super::report::SnapReport;
use crate::domain::{Point, Ring};
use crate::geometry::{cyclic, edges, is_near_edges, nearest_vertex, point_distance};

/// Default candidate distance, in drawing units
pub const DEFAULT_THRESHOLD: f64 = 3.0;
/// Default snap search radius, as a multiple of the threshold
pub const DEFAULT_SNAP_MULTIPLIER: f64 = 10.0;

/// Distance parameters for snapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapParams {
    /// A vertex closer than this to a reference edge is a candidate
    pub threshold: f64,
    /// Candidates snap only to reference vertices within
    /// `threshold * snap_multiplier`
    pub snap_multiplier: f64,
}

impl Default for SnapParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            snap_multiplier: DEFAULT_SNAP_MULTIPLIER,
        }
    }
}

impl SnapParams {
    pub fn snap_radius(&self) -> f64 {
        self.threshold * self.snap_multiplier
    }
}

/// Edges of an open cyclic vertex array, closing edge included
fn cyclic_edges(vertices: &[Point]) -> Vec<Line<f64>> {
    let mut closed = vertices.to_vec();
    if let Some(&first) = vertices.first() {
        closed.push(first);
    }
    edges(&closed)
}

/// Snap `original` onto `reference`
///
/// # Algorithm
/// 1. Mark vertices closer than the threshold to any reference edge
/// 2. Unmark candidates whose cyclic predecessor and successor are both
///    unmarked; a real shared boundary gives a run of candidates
/// 3. Move each candidate onto its nearest reference vertex if that vertex is
///    inside the snap radius
/// 4. Collapse consecutive duplicates created by several candidates landing
///    on the same reference vertex
/// 5. Insert every missing reference vertex that lies within the threshold of
///    the ring, between its two nearest ring vertices when those are adjacent
pub fn snap_shared_vertices(
    original: &Ring,
    reference: &Ring,
    params: &SnapParams,
) -> (Ring, SnapReport) {
    let mut report = SnapReport::default();
    let reference_vertices = reference.vertices();
    let mut vertices = original.vertices().to_vec();
    let n = vertices.len();

    if n == 0 || reference_vertices.is_empty() {
        return (original.clone(), report);
    }

    // Step 1: candidates
    let reference_edges = edges(reference.points());
    let near: Vec<bool> = vertices
        .iter()
        .map(|v| is_near_edges(v, &reference_edges, params.threshold))
        .collect();
    report.candidates = near.iter().filter(|&&c| c).count();

    // Step 2: drop isolated candidates
    let has_marked_neighbour = |i: usize| {
        let (before, after) = (cyclic::prev(i, n), cyclic::next(i, n));
        (before != i && near[before]) || (after != i && near[after])
    };
    let keep: Vec<bool> = (0..n).map(|i| near[i] && has_marked_neighbour(i)).collect();
    report.false_positives = report.candidates - keep.iter().filter(|&&k| k).count();

    // Step 3: snap
    for (vertex, _) in vertices.iter_mut().zip(&keep).filter(|(_, k)| **k) {
        if let Some((index, distance)) = nearest_vertex(vertex, reference_vertices) {
            if distance < params.snap_radius() {
                *vertex = reference_vertices[index];
                report.snapped += 1;
            } else {
                report.too_far += 1;
            }
        }
    }

    // Step 4: collapse
    report.collapsed = reduce_cyclic(&mut vertices);

    // Step 5: inject
    for reference_vertex in reference_vertices {
        if vertices.len() < 2 || vertices.contains(reference_vertex) {
            continue;
        }
        if !is_near_edges(reference_vertex, &cyclic_edges(&vertices), params.threshold) {
            continue;
        }
        if let Some(at) = injection_index(reference_vertex, &vertices) {
            vertices.insert(at, *reference_vertex);
            report.injected += 1;
        }
    }

    (Ring::new(vertices), report)
}

/// Where to insert `p`: between its nearest and second-nearest vertices, if
/// those are cyclic neighbours
fn injection_index(p: &Point, vertices: &[Point]) -> Option<usize> {
    let n = vertices.len();
    let (nearest, _) = nearest_vertex(p, vertices)?;
    let (second, _) = vertices
        .iter()
        .enumerate()
        .filter(|(_, v)| **v != vertices[nearest])
        .map(|(i, v)| (i, point_distance(p, v)))
        .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
            Some((_, bd)) if bd <= d => best,
            _ => Some((i, d)),
        })?;

    if !cyclic::are_adjacent(nearest, second, n) {
        return None;
    }
    // insert after whichever of the two comes first along the ring
    if cyclic::next(nearest, n) == second {
        Some(nearest + 1)
    } else {
        Some(second + 1)
    }
}
