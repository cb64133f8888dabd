use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cleaning::SnapParams;
use crate::cleaning::snap::{DEFAULT_SNAP_MULTIPLIER, DEFAULT_THRESHOLD};

fn default_enabled() -> bool {
    true
}
fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}
fn default_snap_multiplier() -> f64 {
    DEFAULT_SNAP_MULTIPLIER
}
fn default_verbose() -> bool {
    false
}

/// The `[cleaning]` table
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CleaningConfig {
    /// Run the cleaning pipeline at all; when off, shapes are only closed
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_snap_multiplier")]
    pub snap_multiplier: f64,
    /// Also snap bin zones onto the bin outline (item zones always snap)
    #[serde(default)]
    pub snap_bin_zones: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            threshold: default_threshold(),
            snap_multiplier: default_snap_multiplier(),
            snap_bin_zones: false,
        }
    }
}

impl CleaningConfig {
    pub fn snap_params(&self) -> SnapParams {
        SnapParams {
            threshold: self.threshold,
            snap_multiplier: self.snap_multiplier,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default)]
    pub cleaning: CleaningConfig,
}

/// Searched in the working directory
const LOCAL_FILES: [&str; 2] = ["shapeclean.toml", ".shapeclean.toml"];
/// Searched below the platform config directory
const CONFIG_DIR_FILES: [&str; 2] = ["shapeclean/config.toml", "shapeclean.toml"];
/// Searched below the home directory
const HOME_FILES: [&str; 2] = [".shapeclean.toml", ".config/shapeclean/config.toml"];

impl FileConfig {
    /// First parseable config file from the search path, if any
    ///
    /// Files that exist but fail to read or parse are skipped; their errors
    /// are returned so the caller can report them once logging is up.
    pub fn load() -> (Option<Self>, Vec<anyhow::Error>) {
        Self::load_from(&get_config_paths())
    }

    pub fn load_from(paths: &[PathBuf]) -> (Option<Self>, Vec<anyhow::Error>) {
        let mut errors = Vec::new();
        for path in paths.iter().filter(|p| p.exists()) {
            match Self::from_path(path) {
                Ok(config) => return (Some(config), errors),
                Err(e) => errors.push(e),
            }
        }
        (None, errors)
    }

    /// Load an explicitly requested config file
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = LOCAL_FILES.iter().map(PathBuf::from).collect();

    if let Some(config_dir) = dirs::config_dir() {
        paths.extend(CONFIG_DIR_FILES.iter().map(|f| config_dir.join(f)));
    }
    if let Some(home) = dirs::home_dir() {
        paths.extend(HOME_FILES.iter().map(|f| home.join(f)));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(!config.verbose);
        assert!(config.output.is_none());
        assert_eq!(config.cleaning, CleaningConfig::default());
        assert_eq!(config.cleaning.snap_params(), SnapParams::default());
    }

    #[test]
    fn test_partial_cleaning_table() {
        let config: FileConfig = toml::from_str(
            r#"
verbose = true

[cleaning]
threshold = 1.5
snap_bin_zones = true
"#,
        )
        .unwrap();

        assert!(config.verbose);
        assert!(config.cleaning.enabled);
        assert_eq!(config.cleaning.threshold, 1.5);
        assert_eq!(config.cleaning.snap_multiplier, 10.0);
        assert!(config.cleaning.snap_bin_zones);
        assert_eq!(config.cleaning.snap_params().snap_radius(), 15.0);
    }

    #[test]
    fn test_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shapeclean.toml");
        fs::write(&path, "output = \"out\"\n[cleaning]\nenabled = false\n").unwrap();

        let config = FileConfig::from_path(&path).unwrap();
        assert_eq!(config.output, Some(PathBuf::from("out")));
        assert!(!config.cleaning.enabled);
    }

    #[test]
    fn test_from_path_reports_bad_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[cleaning\nthreshold = ").unwrap();

        let err = FileConfig::from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_paths_start_in_working_dir() {
        let paths = get_config_paths();
        assert_eq!(paths[0], PathBuf::from("shapeclean.toml"));
        assert_eq!(paths[1], PathBuf::from(".shapeclean.toml"));
    }

    #[test]
    fn test_load_from_reports_broken_file_and_falls_through() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("shapeclean.toml");
        let good = dir.path().join(".shapeclean.toml");
        fs::write(&broken, "verbose = tru").unwrap();
        fs::write(&good, "verbose = true\n").unwrap();
        let paths = vec![dir.path().join("missing.toml"), broken, good];

        let (config, errors) = FileConfig::load_from(&paths);

        assert!(config.unwrap().verbose);
        assert_eq!(errors.len(), 1);
        let message = format!("{:#}", errors[0]);
        assert!(message.contains("Failed to parse config file"));
        assert!(message.contains("shapeclean.toml"));
    }

    #[test]
    fn test_load_from_without_files() {
        let dir = tempdir().unwrap();
        let (config, errors) = FileConfig::load_from(&[dir.path().join("shapeclean.toml")]);
        assert!(config.is_none());
        assert!(errors.is_empty());
    }
}
