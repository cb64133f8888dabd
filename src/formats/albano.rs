//! Reader for ESICUP XML strip packing instances (`albano.xml`)
//!
//! Only the first `<lot>` is read. Each `<piece>` in it names its demand and
//! points at a `<polygon>` through its first `<component idPolygon=..>`; the
//! polygon's vertices are the `x0`/`y0` starts of its `<segment>` lines.
//!
//! ```xml
//! <lot>
//!   <piece id="piece0" quantity="2">
//!     <orientation><enumeration angle="0"/><enumeration angle="180"/></orientation>
//!     <component idPolygon="polygon1" type="0" xOffset="0" yOffset="0"/>
//!   </piece>
//! </lot>
//! <polygons>
//!   <polygon id="polygon1" nVertices="3">
//!     <lines>
//!       <segment n="1" x0="0" y0="0" x1="10" y1="0"/>
//!       ...
//! ```

use anyhow::{Context, Result, anyhow, bail};
use log::info;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use super::{HALF_TURN_ORIENTATIONS, InstanceReader, ParsedInstance};
use crate::domain::{Instance, Item, Point, Ring, Shape, Strip};

pub const ALBANO_FILE: &str = "albano.xml";

const ALBANO_STRIP_HEIGHT: f64 = 4900.0;

#[derive(Debug, Default)]
struct Piece {
    id: String,
    quantity: u32,
    polygon_id: Option<String>,
    orientations: Vec<f64>,
}

/// Pieces of the first lot and every polygon, collected in one pass since
/// pieces usually reference polygons defined further down
#[derive(Debug, Default)]
struct Document {
    pieces: Vec<Piece>,
    polygons: HashMap<String, Vec<Point>>,
}

/// Parse `albano.xml` into a strip packing instance
pub fn read_instance(reader: &InstanceReader, path: &Path) -> Result<ParsedInstance> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document =
        parse_document(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

    let mut parsed = ParsedInstance::new(Instance::new("albano"));
    for piece in document.pieces {
        let label = format!("albano/{}", piece.id);
        let polygon_id = piece
            .polygon_id
            .ok_or_else(|| anyhow!("{}: piece has no component polygon", label))?;
        let points = document
            .polygons
            .get(&polygon_id)
            .ok_or_else(|| anyhow!("{}: unknown polygon '{}'", label, polygon_id))?;

        let outline = Ring::new(points.clone());
        let shape = reader.clean_shape(Shape::new(outline), &label, &mut parsed.reports)?;
        let mut item = Item::new(piece.quantity, shape);
        item.allowed_orientations = Some(if piece.orientations.is_empty() {
            HALF_TURN_ORIENTATIONS.to_vec()
        } else {
            piece.orientations
        });
        parsed.add_item(item, &label);
    }
    parsed.instance.strip = Some(Strip {
        height: ALBANO_STRIP_HEIGHT,
    });

    info!(
        "Parsed instance albano: {} items ({} pieces), {} polygons",
        parsed.instance.items.len(),
        parsed.instance.total_demand(),
        document.polygons.len()
    );
    Ok(parsed)
}

fn parse_document(content: &str) -> Result<Document> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut document = Document::default();
    let mut in_lot = false;
    let mut lot_done = false;
    let mut piece: Option<Piece> = None;
    let mut polygon: Option<(String, Vec<Point>)> = None;

    let mut buf = Vec::new();
    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| anyhow!("XML error at byte {}: {}", reader.buffer_position(), e))?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                match e.local_name().as_ref() {
                    b"lot" if !lot_done => in_lot = true,
                    b"piece" if in_lot => {
                        let current = Piece {
                            id: attribute(e, b"id")?.unwrap_or_default(),
                            quantity: required(e, b"quantity")?,
                            ..Default::default()
                        };
                        if is_empty {
                            document.pieces.push(current);
                        } else {
                            piece = Some(current);
                        }
                    }
                    b"component" => {
                        if let Some(p) = piece.as_mut()
                            && p.polygon_id.is_none()
                        {
                            p.polygon_id = attribute(e, b"idPolygon")?;
                        }
                    }
                    b"enumeration" => {
                        if let Some(p) = piece.as_mut()
                            && let Some(angle) = attribute(e, b"angle")?
                        {
                            p.orientations.push(angle);
                        }
                    }
                    b"polygon" if !is_empty => {
                        polygon = Some((required(e, b"id")?, Vec::new()));
                    }
                    b"segment" => {
                        if let Some((_, points)) = polygon.as_mut() {
                            points.push(Point::new(required(e, b"x0")?, required(e, b"y0")?));
                        }
                    }
                    _ => {}
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"lot" if in_lot => {
                    in_lot = false;
                    lot_done = true;
                }
                b"piece" => {
                    if let Some(p) = piece.take() {
                        document.pieces.push(p);
                    }
                }
                b"polygon" => {
                    if let Some((id, points)) = polygon.take() {
                        document.polygons.insert(id, points);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !lot_done {
        bail!("no <lot> element found");
    }
    Ok(document)
}

fn attribute<T: FromStr>(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<T>> {
    for attr in element.attributes().flatten() {
        if attr.key.local_name().as_ref() != name {
            continue;
        }
        let value = std::str::from_utf8(&attr.value)?;
        return value.trim().parse().map(Some).map_err(|_| {
            anyhow!(
                "invalid {} attribute '{}'",
                String::from_utf8_lossy(name),
                value
            )
        });
    }
    Ok(None)
}

fn required<T: FromStr>(element: &BytesStart<'_>, name: &[u8]) -> Result<T> {
    attribute(element, name)?.ok_or_else(|| {
        anyhow!(
            "<{}> is missing attribute {}",
            String::from_utf8_lossy(element.local_name().as_ref()),
            String::from_utf8_lossy(name)
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CleaningConfig;
    use std::fs;
    use tempfile::tempdir;

    const ALBANO: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<nesting>
  <name>Albano</name>
  <problem>
    <boards>
      <piece id="board0" quantity="1">
        <component idPolygon="polygon0" type="0" xOffset="0" yOffset="0"/>
      </piece>
    </boards>
    <lot>
      <piece id="piece0" quantity="2">
        <orientation>
          <enumeration angle="0"/>
          <enumeration angle="180"/>
        </orientation>
        <component idPolygon="polygon1" type="0" xOffset="0" yOffset="0"/>
      </piece>
      <piece id="piece1" quantity="3">
        <component idPolygon="polygon2" type="0" xOffset="0" yOffset="0"/>
      </piece>
      <piece id="piece2" quantity="1">
        <orientation>
          <enumeration angle="90"/>
        </orientation>
        <component idPolygon="polygon3" type="0" xOffset="0" yOffset="0"/>
      </piece>
    </lot>
  </problem>
  <polygons>
    <polygon id="polygon0" nVertices="4">
      <lines>
        <segment n="1" x0="0" y0="0" x1="10000" y1="0"/>
        <segment n="2" x0="10000" y0="0" x1="10000" y1="4900"/>
        <segment n="3" x0="10000" y0="4900" x1="0" y1="4900"/>
        <segment n="4" x0="0" y0="4900" x1="0" y1="0"/>
      </lines>
    </polygon>
    <polygon id="polygon1" nVertices="4">
      <lines>
        <segment n="1" x0="0" y0="0" x1="100" y1="0"/>
        <segment n="2" x0="100" y0="0" x1="100" y1="50"/>
        <segment n="3" x0="100" y0="50" x1="0" y1="50"/>
        <segment n="4" x0="0" y0="50" x1="0" y1="0"/>
      </lines>
    </polygon>
    <polygon id="polygon2" nVertices="5">
      <lines>
        <segment n="1" x0="0" y0="0" x1="100" y1="0"/>
        <segment n="2" x0="100" y0="0" x1="100" y1="0"/>
        <segment n="3" x0="100" y0="0" x1="100" y1="50"/>
        <segment n="4" x0="100" y0="50" x1="0" y1="50"/>
        <segment n="5" x0="0" y0="50" x1="0" y1="0"/>
      </lines>
    </polygon>
    <polygon id="polygon3" nVertices="4">
      <lines>
        <segment n="1" x0="0" y0="0" x1="60" y1="0"/>
        <segment n="2" x0="60" y0="0" x1="0" y1="60"/>
        <segment n="3" x0="0" y0="60" x1="60" y1="60"/>
        <segment n="4" x0="60" y0="60" x1="0" y1="0"/>
      </lines>
    </polygon>
  </polygons>
</nesting>
"#;

    fn write(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join(ALBANO_FILE);
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_read_albano() {
        let (_dir, path) = write(ALBANO);
        let reader = InstanceReader::new(&CleaningConfig::default());

        let parsed = read_instance(&reader, &path).unwrap();
        let instance = parsed.instance;

        assert_eq!(instance.name, "albano");
        assert!(instance.bins.is_empty());
        assert_eq!(instance.strip, Some(Strip { height: 4900.0 }));

        // the board polygon is not an item; piece1 only differs by a repeated
        // vertex and merges into piece0
        assert_eq!(instance.items.len(), 2);
        assert_eq!(instance.items[0].demand, 5);
        assert_eq!(instance.items[0].shape.outer.len(), 5);
        assert_eq!(instance.items[0].allowed_orientations, Some(vec![0.0, 180.0]));
        assert_eq!(instance.items[1].allowed_orientations, Some(vec![90.0]));
    }

    #[test]
    fn test_crossed_piece_is_repaired() {
        let (_dir, path) = write(ALBANO);
        let reader = InstanceReader::new(&CleaningConfig::default());

        let parsed = read_instance(&reader, &path).unwrap();

        // polygon3 is a bowtie
        let report = parsed
            .reports
            .iter()
            .find(|r| r.label == "albano/piece2")
            .unwrap();
        assert_eq!(report.outer.reversals, 1);
        assert_eq!(
            parsed.instance.items[1].shape.outer.vertices(),
            &[
                Point::new(0.0, 0.0),
                Point::new(60.0, 0.0),
                Point::new(60.0, 60.0),
                Point::new(0.0, 60.0),
            ]
        );
    }

    #[test]
    fn test_unknown_polygon_is_an_error() {
        let xml = r#"<nesting><lot><piece id="p" quantity="1"><component idPolygon="nope"/></piece></lot></nesting>"#;
        let (_dir, path) = write(xml);
        let reader = InstanceReader::new(&CleaningConfig::default());

        let err = read_instance(&reader, &path).unwrap_err();
        assert!(err.to_string().contains("unknown polygon 'nope'"));
    }

    #[test]
    fn test_missing_quantity_is_an_error() {
        let xml = r#"<nesting><lot><piece id="p"/></lot></nesting>"#;

        let err = parse_document(xml).unwrap_err();
        assert!(err.to_string().contains("missing attribute quantity"));
    }

    #[test]
    fn test_missing_lot_is_an_error() {
        let err = parse_document("<nesting><polygons/></nesting>").unwrap_err();
        assert!(err.to_string().contains("no <lot>"));
    }
}
