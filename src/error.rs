//! Error types for the raphs pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::{Instrument, SeriesKind};

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while harmonizing or analyzing a star.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Catalog lookup found zero or several rows for a designation.
    #[error("catalog resolution failed for '{name}': {matches} matching rows")]
    Resolution { name: String, matches: usize },

    /// No archive exists for an instrument under any alias.
    ///
    /// The loader records this instead of returning it.
    #[error("no {instrument} archive found under any alias")]
    SourceNotFound { instrument: Instrument },

    /// A combined series has no rows after loading and cleaning.
    #[error("no {kind} data left after harmonization")]
    EmptySeries { kind: SeriesKind },

    /// The false-alarm tail fit could not be determined.
    #[error("FAP calibration failed: {0}")]
    Calibration(String),

    /// An archive was loaded for an instrument the calibration table does not know.
    #[error("instrument {0} has no calibration entry")]
    UnknownInstrument(Instrument),

    /// Measurement times are not non-decreasing.
    #[error("times must be non-decreasing (violated at row {index})")]
    UnsortedTimes { index: usize },

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Filesystem access failed.
    #[error("I/O error on {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// A table or artifact could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Whether this error aborts the whole star rather than one series or periodogram.
    pub fn is_fatal_for_star(&self) -> bool {
        matches!(
            self,
            Self::Resolution { .. } | Self::Io { .. } | Self::Parse(_) | Self::Config(_)
        )
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(io) => Self::Io {
                path: PathBuf::new(),
                message: io.to_string(),
            },
            _ => Self::Parse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
