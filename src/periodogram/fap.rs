//! Empirical false-alarm thresholds from the periodogram power distribution.
//!
//! The upper-middle part of the sorted power values is histogrammed and the
//! log-counts fitted with a line, giving an exponential tail
//! `N(z) ~ B exp(-A z)` above the median. The tail is then extrapolated to the
//! power whose expected number of chance exceedances equals the requested FAP.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::utils::fit_line;

/// Default false-alarm probability for detection thresholds.
pub const DEFAULT_FAP: f64 = 0.001;

/// Exponential tail fitted to a power distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TailFit {
    /// Decay rate `A` of the tail.
    pub decay_rate: f64,
    /// Amplitude `B` at the crop minimum.
    pub amplitude: f64,
    /// Power at the start of the crop (the median).
    pub offset: f64,
    /// Largest power value.
    pub max_power: f64,
    /// Number of power values.
    pub samples: usize,
}

impl TailFit {
    /// Power exceeded by chance with probability `fap`.
    pub fn threshold(&self, fap: f64) -> f64 {
        (fap / self.samples as f64).ln() / -self.decay_rate + self.offset
    }

    /// FAP of the highest observed peak.
    pub fn fap_min(&self) -> f64 {
        self.samples as f64 * (-self.decay_rate * (self.max_power - self.offset)).exp()
    }
}

/// Detection threshold for one periodogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FapThreshold {
    pub fap: f64,
    pub power_threshold: f64,
    pub fap_min: f64,
}

/// Histogram-based tail calibrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FapCalibrator {
    /// Quantile where the crop starts.
    pub lower_quantile: f64,
    /// Quantile where the crop ends (exclusive).
    pub upper_quantile: f64,
    /// Number of histogram bins.
    pub bins: usize,
}

impl Default for FapCalibrator {
    fn default() -> Self {
        Self {
            lower_quantile: 0.5,
            upper_quantile: 0.95,
            bins: 10,
        }
    }
}

impl FapCalibrator {
    /// Fit the exponential tail of `power`.
    ///
    /// Non-finite power values are ignored.
    pub fn fit(&self, power: &[f64]) -> Result<TailFit> {
        if self.bins < 2 {
            return Err(PipelineError::InvalidParameter(format!(
                "tail fit needs at least 2 histogram bins, got {}",
                self.bins
            )));
        }
        let mut sorted: Vec<f64> = power.iter().copied().filter(|p| p.is_finite()).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let n = sorted.len();

        let lo = (self.lower_quantile * n as f64) as usize;
        let hi = (self.upper_quantile * n as f64) as usize;
        if hi <= lo {
            return Err(PipelineError::Calibration(format!(
                "power crop is empty for {n} values"
            )));
        }
        let crop = &sorted[lo..hi];
        let offset = crop[0];
        let shifted: Vec<f64> = crop.iter().map(|p| p - offset).collect();

        let (centers, counts) = histogram(&shifted, self.bins);
        let (x, y): (Vec<f64>, Vec<f64>) = centers
            .into_iter()
            .zip(counts)
            .map(|(c, k)| (c, (k as f64).log10()))
            .filter(|(_, l)| l.is_finite())
            .unzip();
        if x.len() < 2 {
            return Err(PipelineError::Calibration(format!(
                "{} populated histogram bins, need 2",
                x.len()
            )));
        }

        let line = fit_line(&x, &y).map_err(|e| PipelineError::Calibration(e.to_string()))?;
        let decay_rate = -line.slope * std::f64::consts::LN_10;
        if !(decay_rate.is_finite() && decay_rate > 0.0) {
            return Err(PipelineError::Calibration(format!(
                "power distribution does not decay (rate {decay_rate})"
            )));
        }

        Ok(TailFit {
            decay_rate,
            amplitude: 10f64.powf(line.intercept),
            offset,
            max_power: sorted[n - 1],
            samples: n,
        })
    }

    /// Power threshold and minimum FAP for `power` at false-alarm level `fap`.
    pub fn threshold(&self, power: &[f64], fap: f64) -> Result<FapThreshold> {
        if !(fap > 0.0 && fap <= 1.0) {
            return Err(PipelineError::InvalidParameter(format!(
                "FAP must lie in (0, 1], got {fap}"
            )));
        }
        let tail = self.fit(power)?;
        Ok(FapThreshold {
            fap,
            power_threshold: tail.threshold(fap),
            fap_min: tail.fap_min(),
        })
    }
}

/// Equal-width histogram over the data range, last bin closed.
///
/// Returns bin centers and counts. A zero-width range is widened to
/// `[v - 0.5, v + 0.5]`.
fn histogram(values: &[f64], bins: usize) -> (Vec<f64>, Vec<usize>) {
    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let centers = (0..bins)
        .map(|i| lo + (i as f64 + 0.5) * width)
        .collect();
    (centers, counts)
}
