use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::MergerError;
use crate::logging::parse_level;

/// Location probed when no config file is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "config/segmerge.yaml";

/// Optional overrides loaded from a YAML config file. Absent fields fall
/// through to the command line or the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub output_dir: Option<PathBuf>,
    pub output_file: Option<String>,
    pub enable_logfile: Option<bool>,
    pub logfile_dir: Option<PathBuf>,
    pub logfile_name: Option<String>,
    pub console_level: Option<String>,
    pub logfile_level: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, MergerError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MergerError::config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        serde_yaml::from_str(&content).map_err(|e| {
            MergerError::config(format!("cannot parse config file {}: {e}", path.display()))
        })
    }
}

/// Command-line overrides, already parsed by clap in `main`.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub output_file: Option<String>,
    pub enable_logfile: Option<bool>,
    pub logfile_dir: Option<PathBuf>,
    pub logfile_name: Option<String>,
}

/// Fully resolved runtime configuration: command line over config file
/// over built-in defaults.
#[derive(Debug, Clone)]
pub struct MergerConfig {
    /// Input transcript. Required, command line only.
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub output_file: String,
    pub enable_logfile: bool,
    pub logfile_dir: PathBuf,
    pub logfile_name: String,
    pub console_level: String,
    pub logfile_level: String,
}

impl MergerConfig {
    /// Resolve configuration for one run.
    ///
    /// A config file named on the command line must exist and parse; a
    /// missing default config file falls back to built-in defaults and is
    /// returned as a warning message, to be logged once logging is up.
    pub fn resolve(
        input: PathBuf,
        cli: CliOverrides,
    ) -> Result<(Self, Vec<String>), MergerError> {
        let mut warnings = Vec::new();

        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.is_file() {
                    FileConfig::load(default_path)?
                } else {
                    warnings.push(format!(
                        "config file {DEFAULT_CONFIG_PATH} not found, using built-in defaults"
                    ));
                    FileConfig::default()
                }
            }
        };

        let config = Self {
            input,
            output_dir: cli
                .output_dir
                .or(file.output_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            output_file: cli
                .output_file
                .or(file.output_file)
                .unwrap_or_else(|| "transcript.txt".to_string()),
            enable_logfile: cli.enable_logfile.or(file.enable_logfile).unwrap_or(true),
            logfile_dir: cli
                .logfile_dir
                .or(file.logfile_dir)
                .unwrap_or_else(|| PathBuf::from("logs")),
            logfile_name: cli
                .logfile_name
                .or(file.logfile_name)
                .unwrap_or_else(default_logfile_name),
            console_level: file.console_level.unwrap_or_else(|| "info".to_string()),
            logfile_level: file.logfile_level.unwrap_or_else(|| "warn".to_string()),
        };
        config.validate()?;
        Ok((config, warnings))
    }

    /// Full path of the merged transcript to write.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }

    /// Full path of this run's logfile.
    pub fn logfile_path(&self) -> PathBuf {
        self.logfile_dir.join(&self.logfile_name)
    }

    fn validate(&self) -> Result<(), MergerError> {
        if self.output_file.is_empty() {
            return Err(MergerError::config("output_file must not be empty"));
        }
        if self.enable_logfile && self.logfile_name.is_empty() {
            return Err(MergerError::config(
                "logfile_name must not be empty when the logfile is enabled",
            ));
        }
        parse_level(&self.console_level)?;
        parse_level(&self.logfile_level)?;
        Ok(())
    }
}

/// Timestamped per-run logfile name.
fn default_logfile_name() -> String {
    chrono::Local::now()
        .format("segmerge_%Y_%m_%d_%H_%M_%S.log")
        .to_string()
}
