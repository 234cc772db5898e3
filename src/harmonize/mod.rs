//! Segment harmonization of raw archives into combined series.
//!
//! Each archive is split into epoch regimes by a [`CalibrationTable`], mapped
//! onto a common column layout, concatenated, sigma-clipped once and sorted.

pub mod activity;
pub mod calibration;
mod harmonizer;
pub mod outlier;

pub use activity::{rhk_prime_to_s_index, BolometricCoefficients};
pub use calibration::{Boundary, CalibrationTable, InstrumentCalibration, RegimeWindow};
pub use harmonizer::{HarmonizedSeries, SegmentHarmonizer};
pub use outlier::{reject_outliers, OutlierRejection, DEFAULT_OUTLIER_THRESHOLD};
