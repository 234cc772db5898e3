//! Statistical utility functions.

use statrs::statistics::Statistics;

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.mean()
}

/// Calculate the sample standard deviation (n-1 denominator).
///
/// Returns NaN for fewer than two values.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    values.std_dev()
}

/// Inverse-variance weighted mean and its uncertainty `1/sqrt(sum w)`.
///
/// Returns `None` when no finite positive weight exists.
pub fn inverse_variance_mean(values: &[f64], uncertainties: &[f64]) -> Option<(f64, f64)> {
    let mut weight_sum = 0.0;
    let mut weighted = 0.0;
    for (&v, &err) in values.iter().zip(uncertainties) {
        let w = 1.0 / (err * err);
        if !w.is_finite() {
            return None;
        }
        weight_sum += w;
        weighted += w * v;
    }
    if weight_sum <= 0.0 {
        return None;
    }
    Some((weighted / weight_sum, 1.0 / weight_sum.sqrt()))
}
