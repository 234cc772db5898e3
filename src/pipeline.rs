//! Per-star composition: resolve, load, harmonize, bin.
//!
//! Each star runs independently with its own [`StarContext`]. Resolution and
//! unreadable archives abort the star; each series otherwise succeeds or
//! fails on its own.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::catalog::{CatalogEntry, CatalogTable};
use crate::config::PipelineConfig;
use crate::context::StarContext;
use crate::core::{SeriesKind, TimeSeries};
use crate::error::{PipelineError, Result};
use crate::harmonize::{CalibrationTable, SegmentHarmonizer};
use crate::output::save_series_csv;
use crate::periodogram::{FapCalibrator, PeriodogramEngine, PeriodogramReport};
use crate::search::SearchRequest;
use crate::sources::{LoadedSources, RawArchive, SourceLoader};
use crate::transform::bin_time_series;

/// Which version of a series to analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesStage {
    #[default]
    Harmonized,
    Binned,
}

/// A harmonized series and its binned counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesProducts {
    pub harmonized: TimeSeries,
    pub binned: TimeSeries,
}

impl SeriesProducts {
    pub fn get(&self, stage: SeriesStage) -> &TimeSeries {
        match stage {
            SeriesStage::Harmonized => &self.harmonized,
            SeriesStage::Binned => &self.binned,
        }
    }
}

/// Everything derived for one star before the external search.
#[derive(Debug, Clone)]
pub struct StarAnalysis {
    pub entry: CatalogEntry,
    pub context: StarContext,
    pub sources: LoadedSources,
    pub rv: Result<SeriesProducts>,
    pub activity: Result<SeriesProducts>,
}

impl StarAnalysis {
    pub fn designation(&self) -> &str {
        self.entry.designation()
    }

    pub fn products(&self, kind: SeriesKind) -> &Result<SeriesProducts> {
        match kind {
            SeriesKind::RadialVelocity => &self.rv,
            SeriesKind::ActivityIndex => &self.activity,
        }
    }

    /// Search engine input from the binned RV series.
    pub fn search_request(&self) -> Result<SearchRequest> {
        self.request_for(SeriesKind::RadialVelocity)
    }

    /// Search engine input from the binned activity series.
    pub fn activity_search_request(&self) -> Result<SearchRequest> {
        self.request_for(SeriesKind::ActivityIndex)
    }

    fn request_for(&self, kind: SeriesKind) -> Result<SearchRequest> {
        let products = self.products(kind).as_ref().map_err(PipelineError::clone)?;
        SearchRequest::new(&self.entry, products.binned.clone())
    }

    /// Write harmonized and binned tables of every available series to `dir`.
    ///
    /// Returns the written paths.
    pub fn save_tables(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let stem: String = self.designation().split_whitespace().collect();
        let mut written = Vec::new();
        let tags = [
            (SeriesKind::RadialVelocity, "rv"),
            (SeriesKind::ActivityIndex, "sind"),
        ];
        for (kind, tag) in tags {
            let Ok(products) = self.products(kind) else {
                continue;
            };
            for (series, suffix) in [(&products.harmonized, ""), (&products.binned, "_binned")] {
                let path = dir.join(format!("{stem}_{tag}{suffix}.csv"));
                save_series_csv(series, &path)?;
                written.push(path);
            }
        }
        Ok(written)
    }
}

/// Runs the per-star stages with shared, read-only settings.
#[derive(Debug)]
pub struct StarPipeline<'a> {
    config: PipelineConfig,
    catalog: &'a CatalogTable,
    loader: SourceLoader,
    harmonizer: SegmentHarmonizer,
    engine: PeriodogramEngine,
    calibrator: FapCalibrator,
}

impl<'a> StarPipeline<'a> {
    pub fn new(
        config: PipelineConfig,
        catalog: &'a CatalogTable,
        calibration: CalibrationTable,
    ) -> Self {
        let loader = SourceLoader::new(&config.data_dir);
        let harmonizer =
            SegmentHarmonizer::new(calibration).with_outlier_threshold(config.outlier_threshold);
        let engine = config.engine();
        Self {
            config,
            catalog,
            loader,
            harmonizer,
            engine,
            calibrator: FapCalibrator::default(),
        }
    }

    /// Replace the archive loader.
    pub fn with_loader(mut self, loader: SourceLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_calibrator(mut self, calibrator: FapCalibrator) -> Self {
        self.calibrator = calibrator;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Resolve, load, harmonize and bin one star.
    pub fn run(&self, name: &str) -> Result<StarAnalysis> {
        let context = StarContext::new(name);
        let entry = self.catalog.resolve(name)?;
        let sources = self.loader.load(&entry, &context)?;

        let archives: Vec<&RawArchive> = sources.raw().collect();
        let harmonized = self.harmonizer.harmonize(&archives, &entry, &context);
        let rv = harmonized.rv.and_then(|s| self.bin(s));
        let activity = harmonized.activity.and_then(|s| self.bin(s));

        context.in_scope(|| {
            let results = [
                (SeriesKind::RadialVelocity, &rv),
                (SeriesKind::ActivityIndex, &activity),
            ];
            for (kind, result) in results {
                match result {
                    Ok(products) => info!(
                        %kind,
                        harmonized = products.harmonized.len(),
                        binned = products.binned.len(),
                        "series ready"
                    ),
                    Err(e) => warn!(%kind, error = %e, "series unavailable"),
                }
            }
        });

        Ok(StarAnalysis {
            entry,
            context,
            sources,
            rv,
            activity,
        })
    }

    fn bin(&self, harmonized: TimeSeries) -> Result<SeriesProducts> {
        let binned = bin_time_series(&harmonized, self.config.bin_window)?;
        Ok(SeriesProducts { harmonized, binned })
    }

    /// Periodogram report of the harmonized series.
    pub fn periodograms(
        &self,
        analysis: &StarAnalysis,
        posterior_periods: Vec<f64>,
    ) -> PeriodogramReport {
        self.periodograms_of(analysis, SeriesStage::Harmonized, posterior_periods)
    }

    /// Periodogram report of either series stage.
    ///
    /// A series that failed upstream is carried into the report as its error.
    pub fn periodograms_of(
        &self,
        analysis: &StarAnalysis,
        stage: SeriesStage,
        posterior_periods: Vec<f64>,
    ) -> PeriodogramReport {
        fn series(
            products: &Result<SeriesProducts>,
            stage: SeriesStage,
        ) -> Result<&TimeSeries> {
            products
                .as_ref()
                .map(|p| p.get(stage))
                .map_err(PipelineError::clone)
        }
        let _span = analysis.context.span().enter();
        PeriodogramReport::build(
            series(&analysis.rv, stage),
            series(&analysis.activity, stage),
            &self.engine,
            &self.calibrator,
            self.config.fap,
            posterior_periods,
        )
    }
}
