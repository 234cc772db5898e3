//! Combined and per-segment periodograms of a harmonized series.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::grid::{FrequencyGrid, DEFAULT_DELTA_F, DEFAULT_MIN_PERIOD};
use super::lomb_scargle::{lomb_scargle, window_power, LombScargleOptions};
use crate::core::{InstrumentSegment, SeriesKind, TimeSeries};
use crate::error::{PipelineError, Result};

/// What a periodogram was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodogramKind {
    /// Power of the measured values.
    Signal,
    /// Spectral window of the sampling times.
    Window,
}

/// Highest point of a periodogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub frequency: f64,
    pub period: f64,
    pub power: f64,
}

/// Power sampled on a frequency grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Periodogram {
    pub frequencies: Vec<f64>,
    pub power: Vec<f64>,
    pub kind: PeriodogramKind,
}

impl Periodogram {
    pub fn len(&self) -> usize {
        self.power.len()
    }

    pub fn is_empty(&self) -> bool {
        self.power.is_empty()
    }

    pub fn periods(&self) -> Vec<f64> {
        self.frequencies.iter().map(|f| 1.0 / f).collect()
    }

    /// Frequency of maximum power, ignoring NaN.
    pub fn peak(&self) -> Option<Peak> {
        self.frequencies
            .iter()
            .zip(&self.power)
            .filter(|(_, p)| !p.is_nan())
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(&frequency, &power)| Peak {
                frequency,
                period: 1.0 / frequency,
                power,
            })
    }
}

/// Signal and window periodograms of one segment, on that segment's grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentPeriodograms {
    pub segment: InstrumentSegment,
    pub signal: Periodogram,
    pub window: Periodogram,
}

/// Periodograms of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodogramSet {
    pub kind: SeriesKind,
    /// All segments together on the full-baseline grid.
    pub combined: Periodogram,
    /// Segments in label order; segments too short for a grid are absent.
    pub segments: Vec<SegmentPeriodograms>,
}

impl PeriodogramSet {
    pub fn segment(&self, segment: InstrumentSegment) -> Option<&SegmentPeriodograms> {
        self.segments.iter().find(|s| s.segment == segment)
    }
}

/// Lomb-Scargle engine with a baseline-derived frequency grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodogramEngine {
    /// Shortest period searched, in days.
    pub min_period: f64,
    /// Frequency step in 1/day.
    pub delta_f: f64,
}

impl Default for PeriodogramEngine {
    fn default() -> Self {
        Self {
            min_period: DEFAULT_MIN_PERIOD,
            delta_f: DEFAULT_DELTA_F,
        }
    }
}

impl PeriodogramEngine {
    pub fn new(min_period: f64, delta_f: f64) -> Self {
        Self {
            min_period,
            delta_f,
        }
    }

    /// Set the shortest period searched.
    pub fn with_min_period(mut self, min_period: f64) -> Self {
        self.min_period = min_period;
        self
    }

    /// Set the frequency step.
    pub fn with_delta_f(mut self, delta_f: f64) -> Self {
        self.delta_f = delta_f;
        self
    }

    /// Frequency grid for the time span of `series`.
    pub fn grid(&self, series: &TimeSeries) -> Result<FrequencyGrid> {
        let baseline = series
            .time_baseline()
            .ok_or(PipelineError::InsufficientData { needed: 2, got: 0 })?;
        FrequencyGrid::from_baseline(baseline, self.min_period, self.delta_f)
    }

    /// Error-weighted floating-mean periodogram of the series values.
    pub fn signal(&self, series: &TimeSeries) -> Result<Periodogram> {
        let grid = self.grid(series)?;
        self.signal_on(series, grid)
    }

    fn signal_on(&self, series: &TimeSeries, grid: FrequencyGrid) -> Result<Periodogram> {
        let power = lomb_scargle(
            &series.times(),
            &series.values(),
            Some(&series.uncertainties()),
            grid.frequencies(),
            LombScargleOptions::default(),
        )?;
        Ok(Periodogram {
            frequencies: grid.into_frequencies(),
            power,
            kind: PeriodogramKind::Signal,
        })
    }

    fn window_on(&self, series: &TimeSeries, grid: FrequencyGrid) -> Result<Periodogram> {
        let power = window_power(&series.times(), grid.frequencies())?;
        Ok(Periodogram {
            frequencies: grid.into_frequencies(),
            power,
            kind: PeriodogramKind::Window,
        })
    }

    /// Spectral window of the series sampling.
    pub fn window(&self, series: &TimeSeries) -> Result<Periodogram> {
        let grid = self.grid(series)?;
        self.window_on(series, grid)
    }

    /// Combined periodogram plus signal and window for every segment.
    ///
    /// A segment with fewer than two distinct times, or a baseline too short
    /// to reach `min_period`, has no grid and is skipped with a warning. The
    /// combined periodogram must succeed.
    pub fn compute(&self, series: &TimeSeries) -> Result<PeriodogramSet> {
        let combined = self.signal(series)?;
        debug!(
            kind = %series.kind(),
            points = series.len(),
            frequencies = combined.len(),
            "combined periodogram"
        );

        let mut segments = Vec::new();
        for segment in series.segments() {
            let sub = series.segment(segment);
            if !sub.time_baseline().is_some_and(|b| b > 0.0) {
                warn!(
                    kind = %series.kind(),
                    %segment,
                    points = sub.len(),
                    "segment has fewer than two distinct times, skipping periodogram"
                );
                continue;
            }
            let grid = match self.grid(&sub) {
                Ok(grid) => grid,
                Err(error) => {
                    warn!(
                        kind = %series.kind(),
                        %segment,
                        points = sub.len(),
                        %error,
                        "segment baseline too short for a frequency grid, skipping periodogram"
                    );
                    continue;
                }
            };
            let signal = self.signal_on(&sub, grid.clone())?;
            let window = self.window_on(&sub, grid)?;
            segments.push(SegmentPeriodograms {
                segment,
                signal,
                window,
            });
        }

        Ok(PeriodogramSet {
            kind: series.kind(),
            combined,
            segments,
        })
    }
}
