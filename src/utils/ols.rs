//! Ordinary least squares for a straight line.

use crate::error::{PipelineError, Result};

/// Fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    /// Number of points used in the fit.
    pub n: usize,
}

impl LineFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit a degree-one polynomial by least squares.
///
/// Solves the normal equations on centered data. Needs at least two points
/// with distinct `x`.
pub fn fit_line(x: &[f64], y: &[f64]) -> Result<LineFit> {
    if x.len() != y.len() {
        return Err(PipelineError::InvalidParameter(format!(
            "line fit needs equal lengths, got {} and {}",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    if n < 2 {
        return Err(PipelineError::InsufficientData { needed: 2, got: n });
    }

    let x_mean = x.iter().sum::<f64>() / n as f64;
    let y_mean = y.iter().sum::<f64>() / n as f64;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        sxx += dx * dx;
        sxy += dx * (yi - y_mean);
    }

    if sxx <= f64::EPSILON * n as f64 * x_mean.abs().max(1.0) {
        return Err(PipelineError::InvalidParameter(
            "line fit needs at least two distinct x values".into(),
        ));
    }

    let slope = sxy / sxx;
    Ok(LineFit {
        slope,
        intercept: y_mean - slope * x_mean,
        n,
    })
}
