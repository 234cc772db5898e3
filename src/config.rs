//! Run configuration loaded from TOML.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::harmonize::{CalibrationTable, DEFAULT_OUTLIER_THRESHOLD};
use crate::periodogram::{PeriodogramEngine, DEFAULT_DELTA_F, DEFAULT_FAP, DEFAULT_MIN_PERIOD};
use crate::transform::DEFAULT_BIN_WINDOW;

/// Settings shared by every star of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Root holding the catalog and the archive directories.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Catalog file name below `data_dir`.
    #[serde(default = "default_catalog_file")]
    pub catalog_file: String,
    /// Where per-star tables and search artifacts are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_outlier_threshold")]
    pub outlier_threshold: f64,
    /// Bin width in days.
    #[serde(default = "default_bin_window")]
    pub bin_window: f64,
    /// Shortest period searched, in days.
    #[serde(default = "default_min_period")]
    pub min_period: f64,
    /// Frequency grid step in 1/day.
    #[serde(default = "default_delta_f")]
    pub delta_f: f64,
    /// False-alarm probability of detection thresholds.
    #[serde(default = "default_fap")]
    pub fap: f64,
    /// Calibration table TOML; the built-in table when absent.
    #[serde(default)]
    pub calibration: Option<PathBuf>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_catalog_file() -> String {
    "spores_catalog_v1.0.0.csv".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_outlier_threshold() -> f64 {
    DEFAULT_OUTLIER_THRESHOLD
}

fn default_bin_window() -> f64 {
    DEFAULT_BIN_WINDOW
}

fn default_min_period() -> f64 {
    DEFAULT_MIN_PERIOD
}

fn default_delta_f() -> f64 {
    DEFAULT_DELTA_F
}

fn default_fap() -> f64 {
    DEFAULT_FAP
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            catalog_file: default_catalog_file(),
            output_dir: default_output_dir(),
            outlier_threshold: default_outlier_threshold(),
            bin_window: default_bin_window(),
            min_period: default_min_period(),
            delta_f: default_delta_f(),
            fap: default_fap(),
            calibration: None,
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| PipelineError::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    ///
    /// # Arguments
    /// * `path` - Path to the TOML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| PipelineError::io(path, &e))?;
        Self::from_toml_str(&content)
    }

    /// Check every numeric setting is in range.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("outlier_threshold", self.outlier_threshold),
            ("bin_window", self.bin_window),
            ("min_period", self.min_period),
            ("delta_f", self.delta_f),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(PipelineError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(self.fap > 0.0 && self.fap <= 1.0) {
            return Err(PipelineError::Config(format!(
                "fap must lie in (0, 1], got {}",
                self.fap
            )));
        }
        if self.catalog_file.trim().is_empty() {
            return Err(PipelineError::Config("catalog_file is empty".to_string()));
        }
        Ok(())
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(&self.catalog_file)
    }

    /// Per-star output directory.
    pub fn star_output_dir(&self, designation: &str) -> PathBuf {
        self.output_dir.join(designation.split_whitespace().collect::<String>())
    }

    /// The configured calibration table, or the built-in one.
    pub fn load_calibration(&self) -> Result<CalibrationTable> {
        match &self.calibration {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| PipelineError::io(path, &e))?;
                CalibrationTable::from_toml_str(&content)
            }
            None => Ok(CalibrationTable::default()),
        }
    }

    pub fn engine(&self) -> PeriodogramEngine {
        PeriodogramEngine::new(self.min_period, self.delta_f)
    }
}
