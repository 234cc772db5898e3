//! # raphs
//!
//! Radial-velocity and stellar-activity harmonization for planet searches.
//!
//! Loads HARPS and Keck HIRES archives for catalog stars, splits them into
//! instrument/epoch segments, merges them into clean RV and S-index series,
//! bins them nightly and computes Lomb-Scargle periodograms with empirical
//! false-alarm thresholds.

#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]

pub mod catalog;
pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod harmonize;
pub mod output;
pub mod periodogram;
pub mod pipeline;
pub mod search;
pub mod sources;
pub mod transform;
pub mod utils;

pub use error::{PipelineError, Result};

pub mod prelude {
    pub use crate::catalog::{CatalogEntry, CatalogTable};
    pub use crate::config::PipelineConfig;
    pub use crate::context::StarContext;
    pub use crate::core::{
        Instrument, InstrumentSegment, Measurement, Regime, SeriesKind, TimeSeries,
    };
    pub use crate::error::{PipelineError, Result};
    pub use crate::harmonize::{CalibrationTable, SegmentHarmonizer};
    pub use crate::periodogram::{FapCalibrator, PeriodogramEngine, PeriodogramReport};
    pub use crate::pipeline::{SeriesProducts, StarAnalysis, StarPipeline};
    pub use crate::search::{OrbitalSearch, SearchRequest};
    pub use crate::sources::SourceLoader;
    pub use crate::transform::bin_time_series;
}
