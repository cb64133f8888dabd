use anyhow::{Context, Result, bail};
use log::debug;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::dxf::write_dxf;
use crate::domain::Instance;

/// Sub-directory of the output folder holding the outline drawings
pub const DXF_DIR: &str = "dxf";

/// JSON file name for an instance, refusing names that would leave `out_dir`
fn instance_file_name(name: &str) -> Result<String> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        bail!("Instance name {:?} cannot be used as a file name", name);
    }
    Ok(format!("{}.json", name))
}

/// Write `<out_dir>/<name>.json` plus one drawing per item and bin
///
/// Sets each item's and bin's drawing path before serializing, so the JSON
/// references the files written next to it. Returns the JSON path.
pub fn write_instance(instance: &mut Instance, out_dir: &Path) -> Result<PathBuf> {
    let json_path = out_dir.join(instance_file_name(&instance.name)?);
    let dxf_dir = out_dir.join(DXF_DIR);
    fs::create_dir_all(&dxf_dir)
        .with_context(|| format!("Failed to create output directory: {}", dxf_dir.display()))?;

    instance.set_dxf_paths(DXF_DIR);
    for (i, item) in instance.items.iter().enumerate() {
        write_dxf(&dxf_dir.join(format!("i_{}.dxf", i)), &item.shape, &item.zones)?;
    }
    for (i, bin) in instance.bins.iter().enumerate() {
        write_dxf(&dxf_dir.join(format!("o_{}.dxf", i)), &bin.shape, &bin.zones)?;
    }
    debug!(
        "Wrote {} drawings to {}",
        instance.items.len() + instance.bins.len(),
        dxf_dir.display()
    );

    let file = File::create(&json_path)
        .with_context(|| format!("Failed to create JSON file: {}", json_path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &*instance)
        .with_context(|| format!("Failed to serialize instance {}", instance.name))?;
    writer.flush()?;

    Ok(json_path)
}
