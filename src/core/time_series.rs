//! Measurement series in canonical (time, value, uncertainty, segment) form.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::segment::InstrumentSegment;
use crate::error::{PipelineError, Result};

/// Which physical quantity a series carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    /// Radial velocities.
    RadialVelocity,
    /// Mount-Wilson S-index values.
    ActivityIndex,
}

impl SeriesKind {
    /// Column names `(value, uncertainty)` used in tabular output.
    pub fn columns(&self) -> (&'static str, &'static str) {
        match self {
            SeriesKind::RadialVelocity => ("mnvel", "errvel"),
            SeriesKind::ActivityIndex => ("sind", "errs"),
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesKind::RadialVelocity => f.write_str("RV"),
            SeriesKind::ActivityIndex => f.write_str("S-index"),
        }
    }
}

/// A single observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Julian date (barycentric where the archive provides it).
    pub time: f64,
    pub value: f64,
    pub uncertainty: f64,
    pub segment: InstrumentSegment,
}

impl Measurement {
    pub fn new(time: f64, value: f64, uncertainty: f64, segment: InstrumentSegment) -> Self {
        Self {
            time,
            value,
            uncertainty,
            segment,
        }
    }

    /// Whether time, value and uncertainty are all finite.
    pub fn is_finite(&self) -> bool {
        self.time.is_finite() && self.value.is_finite() && self.uncertainty.is_finite()
    }
}

/// Time-ordered sequence of measurements.
///
/// Times are non-decreasing; the position of a measurement is its row index.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    kind: SeriesKind,
    measurements: Vec<Measurement>,
}

impl TimeSeries {
    /// Create a series from measurements already sorted by time.
    pub fn new(kind: SeriesKind, measurements: Vec<Measurement>) -> Result<Self> {
        if let Some(index) = measurements
            .windows(2)
            .position(|pair| pair[1].time < pair[0].time)
        {
            return Err(PipelineError::UnsortedTimes { index: index + 1 });
        }
        Ok(Self { kind, measurements })
    }

    /// Create a series by stable-sorting measurements ascending in time.
    ///
    /// Equal times keep their input order.
    pub fn from_unsorted(kind: SeriesKind, mut measurements: Vec<Measurement>) -> Self {
        measurements.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { kind, measurements }
    }

    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Measurement> {
        self.measurements.iter()
    }

    pub fn into_measurements(self) -> Vec<Measurement> {
        self.measurements
    }

    pub fn times(&self) -> Vec<f64> {
        self.measurements.iter().map(|m| m.time).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.measurements.iter().map(|m| m.value).collect()
    }

    pub fn uncertainties(&self) -> Vec<f64> {
        self.measurements.iter().map(|m| m.uncertainty).collect()
    }

    /// Distinct segments present, in ascending order.
    pub fn segments(&self) -> Vec<InstrumentSegment> {
        let mut segments: Vec<InstrumentSegment> =
            self.measurements.iter().map(|m| m.segment).collect();
        segments.sort();
        segments.dedup();
        segments
    }

    /// Number of measurements belonging to `segment`.
    pub fn segment_len(&self, segment: InstrumentSegment) -> usize {
        self.measurements
            .iter()
            .filter(|m| m.segment == segment)
            .count()
    }

    /// Sub-series holding only `segment`, order preserved.
    pub fn segment(&self, segment: InstrumentSegment) -> TimeSeries {
        TimeSeries {
            kind: self.kind,
            measurements: self
                .measurements
                .iter()
                .filter(|m| m.segment == segment)
                .copied()
                .collect(),
        }
    }

    /// Span between first and last time, `None` for an empty series.
    pub fn time_baseline(&self) -> Option<f64> {
        match (self.measurements.first(), self.measurements.last()) {
            (Some(first), Some(last)) => Some(last.time - first.time),
            _ => None,
        }
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = &'a Measurement;
    type IntoIter = std::slice::Iter<'a, Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.measurements.iter()
    }
}
