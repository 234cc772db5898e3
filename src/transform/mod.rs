//! Transformations of harmonized series.

pub mod binning;

pub use binning::{bin_time_series, DEFAULT_BIN_WINDOW};
