//! Benchmark instance readers
//!
//! Every reader turns its raw polygons into domain types, runs them through
//! the [`ShapeCleaner`] and only then merges identical items.

pub mod albano;
pub mod baldacci;
mod lines;
pub mod piece_list;

use anyhow::{Result, bail};
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cleaning::{ShapeCleaner, ShapeReport};
use crate::config::CleaningConfig;
use crate::domain::{Instance, Item, Ring, Shape, Zone};

/// Rotations allowed by the apparel and strip benchmarks
pub const HALF_TURN_ORIENTATIONS: [f64; 2] = [0.0, 180.0];

/// Supported input formats, recognised by the file an instance folder holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Leather hides with quality zones (`problem.dat` + object/item files)
    Baldacci,
    /// Strip packing, ESICUP XML (`albano.xml`)
    Albano,
    /// Apparel pieces on a fixed 63 x 40 bin (`shirts.txt`)
    Shirts,
    /// Strip packing, same piece list layout as shirts (`swim.txt`)
    Swim,
}

impl Format {
    const ALL: [Format; 4] = [Format::Baldacci, Format::Albano, Format::Shirts, Format::Swim];

    /// File that marks a folder as an instance of this format
    pub fn marker_file(self) -> &'static str {
        match self {
            Format::Baldacci => baldacci::PROBLEM_FILE,
            Format::Albano => albano::ALBANO_FILE,
            Format::Shirts => piece_list::SHIRTS_FILE,
            Format::Swim => piece_list::SWIM_FILE,
        }
    }

    pub fn detect(dir: &Path) -> Option<Format> {
        Self::ALL
            .into_iter()
            .find(|f| dir.join(f.marker_file()).is_file())
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Baldacci => "baldacci",
            Format::Albano => "albano",
            Format::Shirts => "shirts",
            Format::Swim => "swim",
        };
        f.write_str(name)
    }
}

/// Whether `dir` looks like a single instance folder of any known format
pub fn is_instance_dir(dir: &Path) -> bool {
    Format::detect(dir).is_some()
}

/// A parsed instance plus the cleaning reports of its shapes
#[derive(Debug)]
pub struct ParsedInstance {
    pub instance: Instance,
    pub reports: Vec<ShapeReport>,
}

impl ParsedInstance {
    fn new(instance: Instance) -> Self {
        Self {
            instance,
            reports: Vec::new(),
        }
    }

    /// Merge an item into the instance, logging when it joins an existing one
    fn add_item(&mut self, item: Item, label: &str) {
        if self.instance.add_item(item) {
            debug!("{}: merged into an existing item with an identical shape", label);
        }
    }
}

/// Reads instances and runs every shape through the cleaner
pub struct InstanceReader {
    cleaner: Option<ShapeCleaner>,
    snap_bin_zones: bool,
}

impl InstanceReader {
    pub fn new(config: &CleaningConfig) -> Self {
        Self {
            cleaner: config
                .enabled
                .then(|| ShapeCleaner::new(config.snap_params())),
            snap_bin_zones: config.snap_bin_zones,
        }
    }

    /// Detect the format of `dir` and parse the instance it holds
    pub fn read(&self, dir: &Path) -> Result<ParsedInstance> {
        let Some(format) = Format::detect(dir) else {
            bail!("{}: no known instance file found", dir.display());
        };
        self.read_as(format, dir)
    }

    pub fn read_as(&self, format: Format, dir: &Path) -> Result<ParsedInstance> {
        debug!("Reading {} as {}", dir.display(), format);
        let path: PathBuf = dir.join(format.marker_file());
        match format {
            Format::Baldacci => baldacci::read_instance(self, dir),
            Format::Albano => albano::read_instance(self, &path),
            Format::Shirts => piece_list::read_shirts(self, &path),
            Format::Swim => piece_list::read_swim(self, &path),
        }
    }

    fn clean_shape(&self, shape: Shape, label: &str, reports: &mut Vec<ShapeReport>) -> Result<Shape> {
        let Some(cleaner) = &self.cleaner else {
            return Ok(shape);
        };
        let (cleaned, report) = cleaner.clean_shape(shape, label)?;
        reports.push(report);
        Ok(cleaned)
    }

    fn clean_zone(
        &self,
        zone: Zone,
        index: usize,
        reference: Option<&Ring>,
        parent_label: &str,
        reports: &mut Vec<ShapeReport>,
    ) -> Result<Zone> {
        let Some(cleaner) = &self.cleaner else {
            return Ok(zone);
        };
        let label = format!("{}/{}", parent_label, zone.label(index));
        let (cleaned, report) = cleaner.clean_zone(zone, reference, &label)?;
        reports.push(report);
        Ok(cleaned)
    }
}
