//! Core data structures: instruments, segments and measurement series.

mod segment;
mod time_series;

pub use segment::{Instrument, InstrumentSegment, Regime};
pub use time_series::{Measurement, SeriesKind, TimeSeries};
