use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

use shapeclean::config::{CleaningConfig, FileConfig};
use shapeclean::formats::{InstanceReader, is_instance_dir};
use shapeclean::output::write_instance;

/// Clean and convert nesting benchmark instances to JSON + DXF
///
/// Reads Baldacci leather folders (problem.dat), ESICUP XML (albano.xml)
/// and the shirts and swim piece lists (shirts.txt, swim.txt).
///
/// Examples:
///   # Convert one instance folder
///   shapeclean data/leather/0
///
///   # Convert every instance below a folder into out/
///   shapeclean data/leather -o out
///
///   # Tighter snapping, also snapping bin zones
///   shapeclean data/leather --threshold 1.5 --snap-bin-zones
#[derive(Parser, Debug)]
#[command(name = "shapeclean")]
#[command(version, about, long_about = None)]
struct Args {
    /// Instance folder, or a folder whose sub-folders are instances
    input: PathBuf,

    /// Output folder (defaults to <input>_converted)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Path to config file (optional, auto-searches shapeclean.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Distance below which a zone vertex counts as lying on the parent boundary
    #[arg(long)]
    threshold: Option<f64>,

    /// Snap search radius as a multiple of the threshold
    #[arg(long)]
    snap_multiplier: Option<f64>,

    /// Only close rings; skip duplicate removal, uncrossing and snapping
    #[arg(long)]
    no_clean: bool,

    /// Also snap bin zones onto the bin outline
    #[arg(long)]
    snap_bin_zones: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let (file_config, config_errors) = match args.config {
        Some(ref config_path) => {
            if !config_path.exists() {
                bail!("Config file not found: {:?}", config_path);
            }
            (FileConfig::from_path(config_path)?, Vec::new())
        }
        None => {
            let (config, errors) = FileConfig::load();
            (config.unwrap_or_default(), errors)
        }
    };

    let verbose = args.verbose || file_config.verbose;
    init_logging(verbose);
    for e in &config_errors {
        warn!("Skipping config file: {:#}", e);
    }

    let cleaning = merge_cleaning(&args, &file_config.cleaning)?;
    let output_root = args
        .output
        .clone()
        .or_else(|| file_config.output.clone())
        .unwrap_or_else(|| default_output_dir(&args.input));

    let (instances, single) = find_instances(&args.input)?;

    println!("shapeclean - Benchmark Polygon Cleaner");
    println!("======================================");
    println!();
    if verbose {
        println!("Configuration:");
        println!("  Input: {}", args.input.display());
        println!("  Output: {}", output_root.display());
        println!("  Instances: {}", instances.len());
        println!("  Cleaning: {}", if cleaning.enabled { "on" } else { "off" });
        println!("  Threshold: {}", cleaning.threshold);
        println!("  Snap radius: {}", cleaning.snap_params().snap_radius());
        println!("  Snap bin zones: {}", cleaning.snap_bin_zones);
        println!();
    }

    let reader = InstanceReader::new(&cleaning);
    let mut failures = 0;
    for (i, dir) in instances.iter().enumerate() {
        let out_dir = if single {
            output_root.clone()
        } else {
            output_root.join(dir.file_name().unwrap_or(dir.as_os_str()))
        };

        let spinner = create_spinner(i + 1, instances.len(), &format!("Converting {}...", dir.display()));
        let start = Instant::now();
        match convert_instance(&reader, dir, &out_dir) {
            Ok(message) => spinner.finish_with_message(format!(
                "{} ({:.1}s)",
                message,
                start.elapsed().as_secs_f64()
            )),
            Err(e) => {
                spinner.finish_with_message(format!("{} failed", dir.display()));
                error!("{}: {:#}", dir.display(), e);
                failures += 1;
            }
        }
    }

    println!();
    println!(
        "Converted {} of {} instances in {:.1}s",
        instances.len() - failures,
        instances.len(),
        total_start.elapsed().as_secs_f64()
    );
    println!("Output: {}", output_root.display());

    if failures > 0 {
        bail!("{} instance(s) failed to convert", failures);
    }
    Ok(())
}

/// `-v` (or `verbose = true`) shows per-ring decisions; `RUST_LOG` overrides both
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Command-line values win over the config file
fn merge_cleaning(args: &Args, file: &CleaningConfig) -> Result<CleaningConfig> {
    let config = CleaningConfig {
        enabled: file.enabled && !args.no_clean,
        threshold: args.threshold.unwrap_or(file.threshold),
        snap_multiplier: args.snap_multiplier.unwrap_or(file.snap_multiplier),
        snap_bin_zones: args.snap_bin_zones || file.snap_bin_zones,
    };

    if config.threshold.is_nan() || config.threshold <= 0.0 {
        bail!("Threshold must be positive, got {}", config.threshold);
    }
    if config.snap_multiplier.is_nan() || config.snap_multiplier < 1.0 {
        bail!("Snap multiplier must be at least 1, got {}", config.snap_multiplier);
    }
    Ok(config)
}

fn default_output_dir(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "instances".to_string());
    input.with_file_name(format!("{}_converted", name))
}

/// Instance folders to convert, and whether `input` itself is the only one
fn find_instances(input: &Path) -> Result<(Vec<PathBuf>, bool)> {
    if is_instance_dir(input) {
        return Ok((vec![input.to_path_buf()], true));
    }

    let entries = std::fs::read_dir(input)
        .with_context(|| format!("Failed to read input folder: {}", input.display()))?;
    let mut instances = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() && is_instance_dir(&path) {
            instances.push(path);
        }
    }
    instances.sort();

    if instances.is_empty() {
        bail!("No instance folder of a known format found in {}", input.display());
    }
    Ok((instances, false))
}

fn convert_instance(reader: &InstanceReader, dir: &Path, out_dir: &Path) -> Result<String> {
    let mut parsed = reader.read(dir)?;
    let changed = parsed.reports.iter().filter(|r| r.has_changes()).count();
    let json_path = write_instance(&mut parsed.instance, out_dir)?;
    info!("Wrote {}", json_path.display());

    Ok(format!(
        "{}: {} items, {} objects, {} of {} shapes repaired",
        parsed.instance.name,
        parsed.instance.items.len(),
        parsed.instance.bins.len(),
        changed,
        parsed.reports.len()
    ))
}

/// Spinner for instance `index` of `count`, shown as `[index/count]`
fn create_spinner(index: usize, count: usize, message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{prefix:.bold.dim} {spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_prefix(format!("[{}/{}]", index, count));
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
