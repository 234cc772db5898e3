//! Nightly binning of dense observation runs.

use crate::core::{Measurement, TimeSeries};
use crate::error::{PipelineError, Result};
use crate::utils::stats::{inverse_variance_mean, mean};

/// Default bin width in days.
pub const DEFAULT_BIN_WINDOW: f64 = 0.5;

/// Bin a series into windows of width `window` days, segment by segment.
///
/// Within a segment a bin opens at its earliest point and takes every later
/// point with `t - t_open < window`. Each bin becomes one measurement: the mean
/// time, the inverse-variance weighted value and `1/sqrt(sum w)`. Points of
/// different segments never share a bin.
///
/// # Arguments
/// * `series` - Time-sorted series to bin
/// * `window` - Bin width in days, must be positive
///
/// # Example
/// ```
/// use raphs::core::{Instrument, InstrumentSegment, Measurement, Regime, SeriesKind, TimeSeries};
/// use raphs::transform::bin_time_series;
///
/// let seg = InstrumentSegment::new(Instrument::Harps, Regime::Pre);
/// let series = TimeSeries::from_unsorted(
///     SeriesKind::RadialVelocity,
///     vec![
///         Measurement::new(10.0, 1.0, 1.0, seg),
///         Measurement::new(10.2, 3.0, 1.0, seg),
///         Measurement::new(12.0, 5.0, 1.0, seg),
///     ],
/// );
/// let binned = bin_time_series(&series, 0.5).unwrap();
/// assert_eq!(binned.values(), vec![2.0, 5.0]);
/// ```
pub fn bin_time_series(series: &TimeSeries, window: f64) -> Result<TimeSeries> {
    if !(window.is_finite() && window > 0.0) {
        return Err(PipelineError::InvalidParameter(format!(
            "bin window must be positive, got {window}"
        )));
    }

    let mut binned = Vec::with_capacity(series.len());
    for segment in series.segments() {
        let points = series.segment(segment);
        let points = points.measurements();

        let mut start = 0;
        while start < points.len() {
            let open = points[start].time;
            let end = start
                + points[start..]
                    .iter()
                    .take_while(|m| m.time - open < window)
                    .count();
            binned.push(combine(&points[start..end])?);
            start = end;
        }
    }

    Ok(TimeSeries::from_unsorted(series.kind(), binned))
}

fn combine(bin: &[Measurement]) -> Result<Measurement> {
    let times: Vec<f64> = bin.iter().map(|m| m.time).collect();
    let values: Vec<f64> = bin.iter().map(|m| m.value).collect();
    let errors: Vec<f64> = bin.iter().map(|m| m.uncertainty).collect();

    let (value, uncertainty) = inverse_variance_mean(&values, &errors).ok_or_else(|| {
        PipelineError::InvalidParameter(format!(
            "bin at t={} has a zero or non-finite uncertainty",
            times[0]
        ))
    })?;
    Ok(Measurement::new(mean(&times), value, uncertainty, bin[0].segment))
}
