//! Reader for the Baldacci leather-nesting instance format
//!
//! An instance is a directory holding `problem.dat`:
//!
//! ```text
//! Name : demo
//! Scale factor : 1
//! Number of objects : 1
//! object_0.dat
//! Number of items : 2
//! item_0.dat 3
//! item_1.dat 2
//! ```
//!
//! Each object/item file has three header lines, a vertex count (last token
//! of its line) followed by `x y` lines, then a defect count and the defects.
//! A defect is a code line, a quality line (last token) and either a
//! `Defect geometry ...` line, meaning the whole part has that quality, or a
//! vertex count followed by the defect polygon.

use anyhow::Result;
use log::{debug, info};
use std::path::Path;

use super::lines::Lines;
use super::{InstanceReader, ParsedInstance};
use crate::cleaning::ShapeReport;
use crate::cleaning::dedup::reduce_ring;
use crate::domain::{Bin, Instance, Item, Ring, Shape, Zone};

pub const PROBLEM_FILE: &str = "problem.dat";

/// Object defect type that marks a hole rather than a quality zone
const HOLE_DEFECT: u32 = 0;

/// Parse the instance in `dir` (the folder containing `problem.dat`)
pub fn read_instance(reader: &InstanceReader, dir: &Path) -> Result<ParsedInstance> {
    let mut problem = Lines::open(&dir.join(PROBLEM_FILE))?;

    let name = problem.labeled_value()?;
    problem.skip(1)?; // scale factor
    let mut parsed = ParsedInstance::new(Instance::new(name));

    let object_count: usize = problem.last_token()?;
    for _ in 0..object_count {
        let file = problem.next_line()?;
        let (bin, mut bin_reports) = read_bin(reader, &dir.join(&file))?;
        parsed.instance.bins.push(bin);
        parsed.reports.append(&mut bin_reports);
    }

    let item_count: usize = problem.last_token()?;
    for _ in 0..item_count {
        let line_no = problem.line_no();
        let line = problem.next_line()?;
        let (file, demand) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| problem.error(line_no, "expected '<file> <demand>'"))?;
        let demand: u32 = problem.parse_last_token(demand, line_no)?;

        let (item, mut item_reports) = read_item(reader, &dir.join(file), demand)?;
        parsed.add_item(item, file);
        parsed.reports.append(&mut item_reports);
    }

    let instance = &parsed.instance;
    info!(
        "Parsed instance {}: {} items ({} pieces), {} objects",
        instance.name,
        instance.items.len(),
        instance.total_demand(),
        instance.bins.len()
    );
    Ok(parsed)
}

/// Parse one item file; zones are snapped onto the cleaned outline
pub fn read_item(
    reader: &InstanceReader,
    path: &Path,
    demand: u32,
) -> Result<(Item, Vec<ShapeReport>)> {
    debug!("Parsing item {}", path.display());
    let mut lines = Lines::open(path)?;
    let label = file_label(path);

    lines.skip(3)?;
    let vertex_count: usize = lines.last_token()?;
    let outline = Ring::new(lines.points(vertex_count)?);

    let defect_count: usize = lines.last_token()?;
    let mut quality: Option<u32> = None;
    let mut raw_zones = Vec::new();
    for i in 0..defect_count {
        lines.skip(1)?; // defect code
        let defect_quality: u32 = lines.last_token()?;
        let line_no = lines.line_no();
        let geometry_line = lines.next_line()?;

        if geometry_line.starts_with("Defect geometry") {
            quality = Some(defect_quality);
            continue;
        }
        let count: usize = lines.parse_last_token(&geometry_line, line_no)?;
        let ring = Ring::new(lines.points(count)?);
        if same_outline(&ring, &outline) {
            // zone covering the whole part grades the part itself
            quality = Some(quality.map_or(defect_quality, |q| q.min(defect_quality)));
        } else {
            raw_zones.push((i, Zone::new(defect_quality, Shape::new(ring))));
        }
    }

    let mut reports = Vec::new();
    let shape = reader.clean_shape(Shape::new(outline), &label, &mut reports)?;
    let mut item = Item::new(demand, shape);
    item.quality = quality;
    for (i, zone) in raw_zones {
        let zone = reader.clean_zone(zone, i, Some(&item.shape.outer), &label, &mut reports)?;
        item.zones.insert(format!("zone {}", i), zone);
    }
    Ok((item, reports))
}

/// Parse one object (bin) file; type 0 defects become holes
pub fn read_bin(reader: &InstanceReader, path: &Path) -> Result<(Bin, Vec<ShapeReport>)> {
    debug!("Parsing bin {}", path.display());
    let mut lines = Lines::open(path)?;
    let label = file_label(path);

    lines.skip(3)?;
    let vertex_count: usize = lines.last_token()?;
    let outer = Ring::new(lines.points(vertex_count)?);

    let defect_count: usize = lines.last_token()?;
    let mut holes = Vec::new();
    let mut raw_zones = Vec::new();
    for i in 0..defect_count {
        lines.skip(1)?;
        let defect_type: u32 = lines.last_token()?;
        let count: usize = lines.last_token()?;
        let ring = Ring::new(lines.points(count)?);
        if defect_type == HOLE_DEFECT {
            holes.push(ring);
        } else {
            raw_zones.push((i, Zone::new(defect_type, Shape::new(ring))));
        }
    }

    let mut reports = Vec::new();
    let shape = reader.clean_shape(Shape::with_holes(outer, holes), &label, &mut reports)?;
    let mut bin = Bin::new(shape);
    for (i, zone) in raw_zones {
        let reference = reader.snap_bin_zones.then_some(&bin.shape.outer);
        let zone = reader.clean_zone(zone, i, reference, &label, &mut reports)?;
        bin.zones.insert(format!("zone {}", i), zone);
    }
    Ok((bin, reports))
}

/// Ring equality ignoring repeated consecutive points
fn same_outline(a: &Ring, b: &Ring) -> bool {
    reduce_ring(a.clone()).0 == reduce_ring(b.clone()).0
}

pub(crate) fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
