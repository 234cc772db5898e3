//! Lomb-Scargle periodograms and their empirical significance.
//!
//! - [`FrequencyGrid`]: linear grid bounded by the observing baseline
//! - [`lomb_scargle`] / [`window_power`]: generalized weighted periodogram
//! - [`PeriodogramEngine`]: combined and per-segment periodograms of a series
//! - [`FapCalibrator`]: exponential-tail false-alarm thresholds
//! - [`PeriodogramReport`]: both series, thresholds and overlay periods

pub mod engine;
pub mod fap;
pub mod grid;
pub mod lomb_scargle;
pub mod posterior;
pub mod report;

pub use engine::{
    Peak, Periodogram, PeriodogramEngine, PeriodogramKind, PeriodogramSet, SegmentPeriodograms,
};
pub use fap::{FapCalibrator, FapThreshold, TailFit, DEFAULT_FAP};
pub use grid::{FrequencyGrid, DEFAULT_DELTA_F, DEFAULT_MIN_PERIOD};
pub use lomb_scargle::{lomb_scargle, window_power, LombScargleOptions};
pub use posterior::{parse_posterior_periods, read_posterior_periods, PERIOD_PREFIX};
pub use report::{
    CalibratedPeriodogram, PeriodogramReport, SegmentReport, SeriesReport, LUNAR_ALIAS_PERIOD,
    YEAR_ALIAS_PERIOD,
};
