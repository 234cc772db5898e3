//! Property-based tests for harmonized and binned series.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated measurements.

use proptest::prelude::*;
use raphs::core::{Instrument, InstrumentSegment, Measurement, Regime, SeriesKind, TimeSeries};
use raphs::harmonize::reject_outliers;
use raphs::periodogram::FapCalibrator;
use raphs::transform::bin_time_series;

const SEGMENTS: [InstrumentSegment; 4] = [
    InstrumentSegment::new(Instrument::Harps, Regime::Pre),
    InstrumentSegment::new(Instrument::Harps, Regime::Post),
    InstrumentSegment::new(Instrument::Hires, Regime::Pre),
    InstrumentSegment::new(Instrument::Hires, Regime::Post),
];

/// Strategy for unsorted measurements spread over a few segments.
fn measurements_strategy(max_len: usize) -> impl Strategy<Value = Vec<Measurement>> {
    prop::collection::vec(
        (0.0..200.0_f64, -50.0..50.0_f64, 0.1..5.0_f64, 0..SEGMENTS.len()),
        1..max_len,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(t, v, e, s)| Measurement::new(t, v, e, SEGMENTS[s]))
            .collect()
    })
}

/// Strategy for exponentially distributed power values.
fn power_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1e-9..1.0_f64, 400..1500)
        .prop_map(|u| u.into_iter().map(|u| -u.ln() / 40.0).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn from_unsorted_orders_by_time(points in measurements_strategy(80)) {
        let series = TimeSeries::from_unsorted(SeriesKind::RadialVelocity, points.clone());
        prop_assert_eq!(series.len(), points.len());
        prop_assert!(series.times().windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(TimeSeries::new(SeriesKind::RadialVelocity, series.into_measurements()).is_ok());
    }

    #[test]
    fn binning_never_adds_rows_per_segment(
        points in measurements_strategy(120),
        window in 0.05..5.0_f64,
    ) {
        let series = TimeSeries::from_unsorted(SeriesKind::RadialVelocity, points);
        let binned = bin_time_series(&series, window).unwrap();
        prop_assert!(binned.times().windows(2).all(|w| w[0] <= w[1]));
        for segment in SEGMENTS {
            prop_assert!(binned.segment_len(segment) <= series.segment_len(segment));
            prop_assert_eq!(
                binned.segment_len(segment) > 0,
                series.segment_len(segment) > 0
            );
        }
    }

    #[test]
    fn single_window_bin_is_at_least_as_precise(
        errors in prop::collection::vec(0.1..5.0_f64, 1..20),
    ) {
        let seg = SEGMENTS[0];
        let points: Vec<Measurement> = errors
            .iter()
            .enumerate()
            .map(|(i, &e)| Measurement::new(100.0 + 0.01 * i as f64, 1.0, e, seg))
            .collect();
        let series = TimeSeries::from_unsorted(SeriesKind::ActivityIndex, points);
        let binned = bin_time_series(&series, 0.5).unwrap();
        prop_assert_eq!(binned.len(), 1);

        let bin = binned.measurements()[0];
        let expected = 1.0 / errors.iter().map(|e| 1.0 / (e * e)).sum::<f64>().sqrt();
        let min_err = errors.iter().copied().fold(f64::INFINITY, f64::min);
        prop_assert!((bin.uncertainty - expected).abs() <= 1e-12 * expected);
        prop_assert!(bin.uncertainty <= min_err * (1.0 + 1e-12));
    }

    #[test]
    fn outlier_rejection_partitions_input(
        points in measurements_strategy(100),
        threshold in 1.0..6.0_f64,
    ) {
        let n = points.len();
        let result = reject_outliers(points, threshold);
        prop_assert_eq!(result.kept.len() + result.rejected.len(), n);
        for m in &result.kept {
            if result.std_dev.is_finite() {
                prop_assert!((m.value - result.mean).abs() <= threshold * result.std_dev);
            }
        }
    }

    #[test]
    fn stricter_fap_never_lowers_threshold(
        power in power_strategy(),
        loose in 0.01..1.0_f64,
        factor in 0.001..1.0_f64,
    ) {
        let calibrator = FapCalibrator::default();
        if let Ok(tail) = calibrator.fit(&power) {
            let strict = loose * factor;
            prop_assert!(tail.threshold(strict) >= tail.threshold(loose));
        }
    }
}
