//! Linear frequency grids bounded by the observing baseline.

use crate::error::{PipelineError, Result};

/// Default shortest period searched, in days.
pub const DEFAULT_MIN_PERIOD: f64 = 3.1;
/// Default frequency step, in 1/day.
pub const DEFAULT_DELTA_F: f64 = 1e-5;
/// Longest period searched as a multiple of the baseline.
pub const BASELINE_FACTOR: f64 = 1.5;

/// Evenly spaced frequencies `f_i = f_min + i * delta_f` with `f_i < f_max`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyGrid {
    frequencies: Vec<f64>,
    delta_f: f64,
}

impl FrequencyGrid {
    /// Grid from `1 / (1.5 * baseline)` up to, not including, `1 / min_period`.
    ///
    /// # Arguments
    /// * `baseline` - Time span of the data in days
    /// * `min_period` - Shortest period of interest in days
    /// * `delta_f` - Frequency step in 1/day
    pub fn from_baseline(baseline: f64, min_period: f64, delta_f: f64) -> Result<Self> {
        if !(baseline.is_finite() && baseline > 0.0) {
            return Err(PipelineError::InvalidParameter(format!(
                "baseline must be positive, got {baseline}"
            )));
        }
        Self::linear(1.0 / (BASELINE_FACTOR * baseline), 1.0 / min_period, delta_f)
    }

    /// Half-open linear grid `[start, stop)` with step `delta_f`.
    pub fn linear(start: f64, stop: f64, delta_f: f64) -> Result<Self> {
        if !(delta_f.is_finite() && delta_f > 0.0) {
            return Err(PipelineError::InvalidParameter(format!(
                "frequency step must be positive, got {delta_f}"
            )));
        }
        if !(start.is_finite() && stop.is_finite()) {
            return Err(PipelineError::InvalidParameter(format!(
                "grid bounds must be finite, got [{start}, {stop})"
            )));
        }

        let n = ((stop - start) / delta_f).ceil();
        if n < 1.0 {
            return Err(PipelineError::InsufficientData { needed: 1, got: 0 });
        }
        let frequencies = (0..n as usize)
            .map(|i| start + i as f64 * delta_f)
            .collect();
        Ok(Self {
            frequencies,
            delta_f,
        })
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn into_frequencies(self) -> Vec<f64> {
        self.frequencies
    }

    pub fn delta_f(&self) -> f64 {
        self.delta_f
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Periods `1/f` in the grid order (longest first).
    pub fn periods(&self) -> Vec<f64> {
        self.frequencies.iter().map(|f| 1.0 / f).collect()
    }
}
