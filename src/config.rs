//! Service configuration.
//!
//! Loaded from a TOML file (default `dem_water.toml`, overridable with the
//! `DEM_CONFIG` environment variable). Every field has a default, so a
//! missing file or an empty one yields a working configuration.
//!
//! ```toml
//! [estimate]
//! limit = 0.0
//!
//! [output]
//! directory = "."
//! suffix = "-corrected"
//! report_json = "report.json"
//!
//! [logging]
//! level = "info"
//! file = "dem_water.log"
//! timestamps = false
//! ```

use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::dem_file::CORRECTED_SUFFIX;
use crate::logging::LogLevel;

pub const DEFAULT_CONFIG_PATH: &str = "dem_water.toml";

// ---------------------------------------------------------------------------
// Configuration sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub estimate: EstimateConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EstimateConfig {
    /// Cells at or below this elevation (meters) count as water.
    pub limit: f64,
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self { limit: 0.0 }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives the corrected DEM.
    pub directory: PathBuf,
    /// Appended to the input file stem.
    pub suffix: String,
    /// Optional JSON run report.
    pub report_json: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            suffix: CORRECTED_SUFFIX.to_string(),
            report_json: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

impl LoggingConfig {
    /// Parsed log level; unknown names fall back to `Info`.
    pub fn min_level(&self) -> LogLevel {
        self.level.parse().unwrap_or(LogLevel::Info)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, message: String },
    Parse { path: PathBuf, message: String },
    InvalidOverride { variable: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, message } => {
                write!(f, "Could not read config {}: {}", path.display(), message)
            }
            ConfigError::Parse { path, message } => {
                write!(f, "Invalid config {}: {}", path.display(), message)
            }
            ConfigError::InvalidOverride { variable, value } => {
                write!(f, "Invalid value '{}' for {}", value, variable)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    pub fn parse(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Reads a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&text, path)
    }

    /// Loads `.env`, then the config file named by `DEM_CONFIG` (or the
    /// default path), then applies `DEM_LOG_LEVEL` and `DEM_WATER_LIMIT`.
    /// A missing default config file is not an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let mut config = match env::var("DEM_CONFIG") {
            Ok(path) => Self::load(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).is_file() => {
                Self::load(Path::new(DEFAULT_CONFIG_PATH))?
            }
            Err(_) => Self::default(),
        };

        config.apply_overrides(
            env::var("DEM_LOG_LEVEL").ok().as_deref(),
            env::var("DEM_WATER_LIMIT").ok().as_deref(),
        )?;
        Ok(config)
    }

    /// Applies environment-style overrides on top of file settings.
    pub fn apply_overrides(
        &mut self,
        log_level: Option<&str>,
        water_limit: Option<&str>,
    ) -> Result<(), ConfigError> {
        if let Some(level) = log_level {
            level
                .parse::<LogLevel>()
                .map_err(|_| ConfigError::InvalidOverride {
                    variable: "DEM_LOG_LEVEL".to_string(),
                    value: level.to_string(),
                })?;
            self.logging.level = level.trim().to_string();
        }
        if let Some(limit) = water_limit {
            self.estimate.limit = limit
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ConfigError::InvalidOverride {
                    variable: "DEM_WATER_LIMIT".to_string(),
                    value: limit.to_string(),
                })?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
