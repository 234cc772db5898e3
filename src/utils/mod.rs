//! Numerical and time utilities shared by the pipeline stages.

pub mod de;
pub mod julian;
pub mod ols;
pub mod stats;

pub use julian::{datetime_to_jd, jd_to_datetime};
pub use ols::{fit_line, LineFit};
pub use stats::{inverse_variance_mean, mean, std_dev};
