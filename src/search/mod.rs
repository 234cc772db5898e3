//! Boundary of the external orbital search engine.
//!
//! The engine is invoked with a binned series and the stellar mass; it writes
//! its own artifacts under an output directory. The only artifact read back
//! is the RV posterior at [`POSTERIOR_ARTIFACT`].

use std::path::{Path, PathBuf};

use crate::catalog::CatalogEntry;
use crate::core::{SeriesKind, TimeSeries};
use crate::error::{PipelineError, Result};
use crate::periodogram::read_posterior_periods;

/// Posterior of the RV search, relative to the output directory.
pub const POSTERIOR_ARTIFACT: &str = "RV_search/post_final.json";

/// Output subdirectory for a search over `kind`.
pub fn search_subdir(kind: SeriesKind) -> &'static str {
    match kind {
        SeriesKind::RadialVelocity => "RV_search",
        SeriesKind::ActivityIndex => "Sind_search",
    }
}

/// Input of one search run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub designation: String,
    /// Binned series; activity series are searched like RVs.
    pub series: TimeSeries,
    /// Stellar mass in solar masses.
    pub mass: f64,
    pub mass_uncertainty: f64,
}

impl SearchRequest {
    pub fn new(entry: &CatalogEntry, series: TimeSeries) -> Result<Self> {
        if series.is_empty() {
            return Err(PipelineError::EmptySeries {
                kind: series.kind(),
            });
        }
        let (mass, mass_uncertainty) = entry.mass_estimate();
        Ok(Self {
            designation: entry.designation().to_string(),
            series,
            mass,
            mass_uncertainty,
        })
    }

    /// Directory the engine should write into, below `output_dir`.
    pub fn output_dir(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(search_subdir(self.series.kind()))
    }
}

/// External orbital search engine.
pub trait OrbitalSearch {
    type Outcome;

    /// Run a search, writing artifacts below `output_dir`.
    fn run(&self, request: &SearchRequest, output_dir: &Path) -> Result<Self::Outcome>;
}

/// Run an RV search and read its posterior periods back.
pub fn search_and_read_periods<S: OrbitalSearch>(
    search: &S,
    request: &SearchRequest,
    output_dir: &Path,
) -> Result<(S::Outcome, Vec<f64>)> {
    let outcome = search.run(request, output_dir)?;
    let periods = read_posterior_periods(output_dir.join(POSTERIOR_ARTIFACT))?;
    Ok((outcome, periods))
}
