use anyhow::{Context, Result, bail};
use dxf::entities::{Entity, EntityType, LwPolyline};
use dxf::enums::AcadVersion;
use dxf::tables::Layer;
use dxf::{Color, Drawing, LwPolylineVertex};
use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::{Ring, Shape, Zone};

/// Layer for outer rings and holes
pub const OUTLINE_LAYER: &str = "0";

/// AutoCAD colour index for a quality grade
///
/// 0 red, 1 orange, 2 yellow, 3 green, 4 blue.
pub fn quality_color(quality: u32) -> Result<u8> {
    let color = match quality {
        0 => 1,
        1 => 30,
        2 => 2,
        3 => 3,
        4 => 5,
        other => bail!("No drawing colour for quality grade {}", other),
    };
    Ok(color)
}

/// DXF layer names may not contain spaces
fn layer_name(zone_key: &str) -> String {
    zone_key.replace(char::is_whitespace, "_")
}

/// Closed lightweight polyline over the ring's distinct vertices
fn polyline_entity(ring: &Ring, layer: &str) -> Entity {
    let mut polyline = LwPolyline::default();
    polyline.set_is_closed(true);
    polyline.vertices = ring
        .vertices()
        .iter()
        .map(|p| LwPolylineVertex {
            x: p.x,
            y: p.y,
            ..Default::default()
        })
        .collect();

    let mut entity = Entity::new(EntityType::LwPolyline(polyline));
    entity.common.layer = layer.to_string();
    entity
}

/// Build the drawing for a shape and its zones
///
/// The outline and holes go on layer `0`. Each zone gets its own layer,
/// declared in the layer table with the colour of its quality grade.
pub fn build_drawing(shape: &Shape, zones: &BTreeMap<String, Zone>) -> Result<Drawing> {
    let mut drawing = Drawing::new();
    drawing.header.version = AcadVersion::R2000;

    for ring in shape.rings() {
        drawing.add_entity(polyline_entity(ring, OUTLINE_LAYER));
    }

    for (key, zone) in zones {
        let name = layer_name(key);
        let mut layer = Layer::default();
        layer.name = name.clone();
        layer.color = Color::from_index(quality_color(zone.quality)?);
        drawing.add_layer(layer);

        for ring in zone.shape.rings() {
            drawing.add_entity(polyline_entity(ring, &name));
        }
    }

    Ok(drawing)
}

/// Write a shape and its zones as a DXF drawing
pub fn write_dxf(path: &Path, shape: &Shape, zones: &BTreeMap<String, Zone>) -> Result<()> {
    // build first so a bad quality grade leaves no partial file behind
    let drawing = build_drawing(shape, zones)?;

    drawing
        .save_file(path)
        .with_context(|| format!("Failed to write DXF file: {}", path.display()))
}
