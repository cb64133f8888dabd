//! Reader for the plain-text piece lists of the shirts and swim benchmarks
//!
//! Both files are a sequence of blocks separated by blank lines:
//!
//! ```text
//! PIECE 1
//! QUANTITY
//! 8
//! NUMBER OF VERTICES
//! 4
//! VERTICES (X,Y)
//! 0 0
//! 5 0
//! 5 3
//! 0 3
//! ```
//!
//! Neither file describes its stock. Shirts are cut from one fixed 63 x 40
//! bin; swim is a strip packing instance of fixed height.

use anyhow::Result;
use log::info;
use std::path::Path;

use super::lines::Lines;
use super::{HALF_TURN_ORIENTATIONS, InstanceReader, ParsedInstance};
use crate::domain::{Bin, Instance, Item, Point, Ring, Shape, Strip};

pub const SHIRTS_FILE: &str = "shirts.txt";
pub const SWIM_FILE: &str = "swim.txt";

const SHIRTS_BIN_WIDTH: f64 = 63.0;
const SHIRTS_BIN_HEIGHT: f64 = 40.0;
const SWIM_STRIP_HEIGHT: f64 = 5752.0;

/// Parse `shirts.txt`; the single bin costs its area
pub fn read_shirts(reader: &InstanceReader, path: &Path) -> Result<ParsedInstance> {
    let mut parsed = read_pieces(reader, path, "shirts")?;
    parsed.instance.bins.push(shirts_bin());
    Ok(parsed)
}

/// Parse `swim.txt` as a strip packing instance
pub fn read_swim(reader: &InstanceReader, path: &Path) -> Result<ParsedInstance> {
    let mut parsed = read_pieces(reader, path, "swim")?;
    parsed.instance.strip = Some(Strip {
        height: SWIM_STRIP_HEIGHT,
    });
    Ok(parsed)
}

fn shirts_bin() -> Bin {
    let outline = Ring::new(vec![
        Point::new(0.0, 0.0),
        Point::new(SHIRTS_BIN_WIDTH, 0.0),
        Point::new(SHIRTS_BIN_WIDTH, SHIRTS_BIN_HEIGHT),
        Point::new(0.0, SHIRTS_BIN_HEIGHT),
    ]);
    let mut bin = Bin::new(Shape::new(outline));
    bin.cost = SHIRTS_BIN_WIDTH * SHIRTS_BIN_HEIGHT;
    bin
}

fn read_pieces(reader: &InstanceReader, path: &Path, name: &str) -> Result<ParsedInstance> {
    let mut lines = Lines::open(path)?;
    let mut parsed = ParsedInstance::new(Instance::new(name));

    while let Some(header) = lines.next_non_blank() {
        lines.skip(1)?; // QUANTITY
        let demand: u32 = lines.last_token()?;
        lines.skip(1)?; // NUMBER OF VERTICES
        let vertex_count: usize = lines.last_token()?;
        lines.skip(1)?; // VERTICES (X,Y)
        let outline = Ring::new(lines.points(vertex_count)?);

        let label = format!("{}/{}", name, header.to_lowercase().replace(' ', "_"));
        let shape = reader.clean_shape(Shape::new(outline), &label, &mut parsed.reports)?;
        let mut item = Item::new(demand, shape);
        item.allowed_orientations = Some(HALF_TURN_ORIENTATIONS.to_vec());
        parsed.add_item(item, &label);
    }

    info!(
        "Parsed instance {}: {} items ({} pieces)",
        name,
        parsed.instance.items.len(),
        parsed.instance.total_demand()
    );
    Ok(parsed)
}
