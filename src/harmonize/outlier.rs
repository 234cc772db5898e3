//! Sigma-clipping of a combined series.
//!
//! One pass: the mean and sample standard deviation are computed once over
//! the full series, outliers included, and never recomputed.

use crate::core::Measurement;
use crate::utils::stats::{mean, std_dev};

/// Default rejection threshold in standard deviations.
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 5.0;

/// Result of outlier rejection.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierRejection {
    /// Rows that survived, in input order.
    pub kept: Vec<Measurement>,
    /// Input positions of dropped rows.
    pub rejected: Vec<usize>,
    /// Mean of the values before rejection.
    pub mean: f64,
    /// Sample standard deviation before rejection.
    pub std_dev: f64,
    /// Threshold in standard deviations.
    pub threshold: f64,
}

impl OutlierRejection {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    pub fn is_rejected(&self, index: usize) -> bool {
        self.rejected.contains(&index)
    }

    /// Absolute deviation above which a value was dropped.
    pub fn limit(&self) -> f64 {
        self.threshold * self.std_dev
    }
}

/// Drop every row whose value deviates from the mean by more than
/// `threshold` standard deviations.
///
/// With fewer than two rows the standard deviation is undefined and nothing
/// is dropped.
pub fn reject_outliers(measurements: Vec<Measurement>, threshold: f64) -> OutlierRejection {
    let values: Vec<f64> = measurements.iter().map(|m| m.value).collect();
    let mu = mean(&values);
    let sigma = std_dev(&values);
    let limit = threshold * sigma;

    let mut kept = Vec::with_capacity(measurements.len());
    let mut rejected = Vec::new();
    for (i, m) in measurements.into_iter().enumerate() {
        // NaN limits compare false, so undefined spreads keep everything.
        if (m.value - mu).abs() > limit {
            rejected.push(i);
        } else {
            kept.push(m);
        }
    }

    OutlierRejection {
        kept,
        rejected,
        mean: mu,
        std_dev: sigma,
        threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Instrument, InstrumentSegment, Regime};

    const SEG: InstrumentSegment = InstrumentSegment::new(Instrument::Harps, Regime::Pre);

    fn series(values: &[f64]) -> Vec<Measurement> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Measurement::new(i as f64, v, 1.0, SEG))
            .collect()
    }

    #[test]
    fn removes_only_the_ten_sigma_point() {
        let mut values: Vec<f64> = (0..200)
            .map(|i| 10.0 + (i as f64 * 0.37).sin())
            .collect();
        let base_mean = mean(&values);
        let base_std = std_dev(&values);
        values.push(base_mean + 10.0 * base_std);

        let result = reject_outliers(series(&values), DEFAULT_OUTLIER_THRESHOLD);

        assert_eq!(result.rejected, vec![200]);
        assert_eq!(result.kept.len(), 200);
    }

    #[test]
    fn statistics_include_the_outliers() {
        let mut values = vec![0.0; 99];
        values.push(100.0);
        let result = reject_outliers(series(&values), 5.0);
        assert!((result.mean - 1.0).abs() < 1e-9);
        assert!((result.std_dev - 10.0).abs() < 1e-9);
        // 9.9 inflated sigmas from the inflated mean.
        assert!(result.is_rejected(99));
        assert_eq!(result.rejected_count(), 1);
    }

    #[test]
    fn constant_series_keeps_everything() {
        let result = reject_outliers(series(&[3.0; 20]), 5.0);
        assert_eq!(result.rejected_count(), 0);
        assert_eq!(result.kept.len(), 20);
    }

    #[test]
    fn single_point_is_kept() {
        let result = reject_outliers(series(&[1.0]), 5.0);
        assert!(result.std_dev.is_nan());
        assert_eq!(result.kept.len(), 1);
    }

    #[test]
    fn empty_input_is_empty_output() {
        let result = reject_outliers(Vec::new(), 5.0);
        assert!(result.kept.is_empty());
        assert!(result.rejected.is_empty());
    }

    #[test]
    fn kept_rows_preserve_order() {
        let values = [1.0, 50.0, 2.0, 3.0, 1.5, 2.5, 1.0, 2.0, 3.0, 2.0];
        let result = reject_outliers(series(&values), 2.0);
        assert!(result.is_rejected(1));
        let times: Vec<f64> = result.kept.iter().map(|m| m.time).collect();
        let mut sorted = times.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(times, sorted);
    }
}
