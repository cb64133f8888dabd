//! Geometric repair of raw polygons before they are persisted
//!
//! Per ring: duplicate reduction, then self-intersection resolution. Zone
//! outlines that register against a parent additionally get a shared-vertex
//! snapping pass against the parent's already-cleaned outer ring. The order
//! matters: zero-length edges break the intersection test, and snapping
//! before resolution could bring crossings back.

pub mod dedup;
pub mod intersection;
pub mod report;
pub mod snap;

use log::{debug, info};

pub use report::{RingReport, ShapeReport, SnapReport};
pub use snap::SnapParams;

use crate::domain::{Ring, Shape, Zone};
use crate::error::CleanError;

/// Minimum number of distinct points for a usable ring
pub const MIN_DISTINCT_POINTS: usize = 3;

/// Runs the cleaning stages over shapes and zones
///
/// Holds only immutable parameters, so one cleaner can be shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeCleaner {
    params: SnapParams,
}

impl ShapeCleaner {
    pub fn new(params: SnapParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SnapParams {
        &self.params
    }

    /// Reduce duplicates and resolve self-intersections in one ring
    pub fn clean_ring(&self, ring: Ring, label: &str) -> Result<(Ring, RingReport), CleanError> {
        let (reduced, duplicates_removed) = dedup::reduce_ring(ring);
        if duplicates_removed > 0 {
            info!("{}: removed {} duplicate points", label, duplicates_removed);
        }
        check_distinct(&reduced, label)?;

        let resolution = intersection::resolve_self_intersections(reduced, label)?;
        if resolution.reversals > 0 {
            info!(
                "{}: resolved self-intersections with {} reversals",
                label, resolution.reversals
            );
        }
        check_distinct(&resolution.ring, label)?;

        let report = RingReport {
            duplicates_removed: duplicates_removed + resolution.duplicates_removed,
            reversals: resolution.reversals,
            snap: None,
        };
        Ok((resolution.ring, report))
    }

    /// Clean the outer ring and every hole of a shape
    pub fn clean_shape(&self, shape: Shape, label: &str) -> Result<(Shape, ShapeReport), CleanError> {
        let mut report = ShapeReport::new(label);

        let (outer, outer_report) = self.clean_ring(shape.outer, label)?;
        report.outer = outer_report;

        let mut inner = Vec::with_capacity(shape.inner.len());
        for hole in shape.inner {
            let (cleaned, hole_report) = self.clean_ring(hole, label)?;
            inner.push(cleaned);
            report.inner.push(hole_report);
        }

        debug!("{}", report.summary());
        Ok((Shape::with_holes(outer, inner), report))
    }

    /// Clean a zone, then register its outer ring onto `parent_outer`
    ///
    /// `parent_outer` must already be cleaned. Holes are never snapped.
    pub fn clean_zone(
        &self,
        zone: Zone,
        parent_outer: Option<&Ring>,
        label: &str,
    ) -> Result<(Zone, ShapeReport), CleanError> {
        let (mut shape, mut report) = self.clean_shape(zone.shape, label)?;

        if let Some(reference) = parent_outer {
            let (snapped, snap_report) =
                snap::snap_shared_vertices(&shape.outer, reference, &self.params);
            check_distinct(&snapped, label)?;
            if snap_report.snapped > 0 {
                info!("Cleaned {}: {}", label, snap_report.summary());
            }
            shape.outer = snapped;
            report.outer.snap = Some(snap_report);
        }

        Ok((Zone::new(zone.quality, shape), report))
    }
}

fn check_distinct(ring: &Ring, label: &str) -> Result<(), CleanError> {
    let distinct = ring.distinct_count();
    if distinct < MIN_DISTINCT_POINTS {
        return Err(CleanError::TooFewPoints {
            label: label.to_string(),
            distinct,
        });
    }
    Ok(())
}
