//! Periodograms of both series with thresholds and overlay periods.
//!
//! This is everything a plotting front end needs for one star.

use super::engine::{Peak, Periodogram, PeriodogramEngine};
use super::fap::{FapCalibrator, FapThreshold};
use crate::core::{InstrumentSegment, SeriesKind, TimeSeries};
use crate::error::Result;

/// One-year sampling alias, in days.
pub const YEAR_ALIAS_PERIOD: f64 = 365.25;
/// Lunar-cycle sampling alias, in days.
pub const LUNAR_ALIAS_PERIOD: f64 = 29.5;

/// A periodogram with its own detection threshold.
///
/// Calibration failure affects this periodogram only.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibratedPeriodogram {
    pub periodogram: Periodogram,
    pub threshold: Result<FapThreshold>,
}

impl CalibratedPeriodogram {
    pub fn new(periodogram: Periodogram, calibrator: &FapCalibrator, fap: f64) -> Self {
        let threshold = calibrator.threshold(&periodogram.power, fap);
        Self {
            periodogram,
            threshold,
        }
    }

    /// Highest peak, when it clears a calibrated threshold.
    pub fn significant_peak(&self) -> Option<Peak> {
        let threshold = self.threshold.as_ref().ok()?;
        self.periodogram
            .peak()
            .filter(|p| p.power >= threshold.power_threshold)
    }
}

/// Signal and window periodograms of one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentReport {
    pub segment: InstrumentSegment,
    pub signal: CalibratedPeriodogram,
    pub window: CalibratedPeriodogram,
}

/// Calibrated periodograms of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesReport {
    pub kind: SeriesKind,
    pub combined: CalibratedPeriodogram,
    pub segments: Vec<SegmentReport>,
}

impl SeriesReport {
    pub fn build(
        series: &TimeSeries,
        engine: &PeriodogramEngine,
        calibrator: &FapCalibrator,
        fap: f64,
    ) -> Result<Self> {
        let set = engine.compute(series)?;
        Ok(Self {
            kind: set.kind,
            combined: CalibratedPeriodogram::new(set.combined, calibrator, fap),
            segments: set
                .segments
                .into_iter()
                .map(|s| SegmentReport {
                    segment: s.segment,
                    signal: CalibratedPeriodogram::new(s.signal, calibrator, fap),
                    window: CalibratedPeriodogram::new(s.window, calibrator, fap),
                })
                .collect(),
        })
    }

    pub fn segment(&self, segment: InstrumentSegment) -> Option<&SegmentReport> {
        self.segments.iter().find(|s| s.segment == segment)
    }
}

/// RV and activity periodograms of one star.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodogramReport {
    pub fap: f64,
    pub rv: Result<SeriesReport>,
    pub activity: Result<SeriesReport>,
    /// Orbital periods from the search posterior.
    pub posterior_periods: Vec<f64>,
    /// Known sampling aliases to mark.
    pub alias_periods: Vec<f64>,
}

impl PeriodogramReport {
    /// Report of whichever series are available.
    ///
    /// A series passed as an error stays that error in the report.
    pub fn build(
        rv: Result<&TimeSeries>,
        activity: Result<&TimeSeries>,
        engine: &PeriodogramEngine,
        calibrator: &FapCalibrator,
        fap: f64,
        posterior_periods: Vec<f64>,
    ) -> Self {
        let report = |series: Result<&TimeSeries>| {
            series.and_then(|s| SeriesReport::build(s, engine, calibrator, fap))
        };
        Self {
            fap,
            rv: report(rv),
            activity: report(activity),
            posterior_periods,
            alias_periods: vec![YEAR_ALIAS_PERIOD, LUNAR_ALIAS_PERIOD],
        }
    }

    /// Shortest and longest period across the combined RV grid.
    pub fn period_range(&self) -> Option<(f64, f64)> {
        let rv = self.rv.as_ref().ok()?;
        let f = &rv.combined.periodogram.frequencies;
        let max = f.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = f.iter().copied().fold(f64::INFINITY, f64::min);
        (min.is_finite() && max.is_finite()).then(|| (1.0 / max, 1.0 / min))
    }
}
