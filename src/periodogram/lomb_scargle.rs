//! Generalized Lomb-Scargle periodogram.
//!
//! Floating-mean, error-weighted formulation with the time shift `tau`
//! (Zechmeister & Kürster 2009), normalized so that power lies in `[0, 1]`.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Model options for a Lomb-Scargle fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LombScargleOptions {
    /// Fit a constant offset together with the sinusoid.
    pub fit_mean: bool,
    /// Subtract the weighted mean before fitting.
    pub center_data: bool,
}

impl Default for LombScargleOptions {
    fn default() -> Self {
        Self {
            fit_mean: true,
            center_data: true,
        }
    }
}

impl LombScargleOptions {
    /// Options for the sampling window: no mean fit, no centering.
    pub const WINDOW: Self = Self {
        fit_mean: false,
        center_data: false,
    };
}

const DENOMINATOR_EPS: f64 = 1e-300;
const CONSTANT_RTOL: f64 = 1e-20;

/// Lomb-Scargle power at each frequency.
///
/// # Arguments
/// * `times` - Observation times
/// * `values` - Observed values
/// * `uncertainties` - Per-point uncertainties; unit weights when `None`
/// * `frequencies` - Frequencies in cycles per time unit
/// * `options` - Mean handling
///
/// A fit term whose normalizing sum vanishes (e.g. the sine term at zero
/// frequency) contributes no power.
pub fn lomb_scargle(
    times: &[f64],
    values: &[f64],
    uncertainties: Option<&[f64]>,
    frequencies: &[f64],
    options: LombScargleOptions,
) -> Result<Vec<f64>> {
    let n = times.len();
    if values.len() != n || uncertainties.is_some_and(|dy| dy.len() != n) {
        return Err(PipelineError::InvalidParameter(
            "times, values and uncertainties must have equal length".to_string(),
        ));
    }
    if n < 2 {
        return Err(PipelineError::InsufficientData { needed: 2, got: n });
    }

    let mut weights: Vec<f64> = match uncertainties {
        Some(dy) => dy.iter().map(|e| 1.0 / (e * e)).collect(),
        None => vec![1.0; n],
    };
    let weight_sum: f64 = weights.iter().sum();
    if !(weight_sum.is_finite() && weight_sum > 0.0) {
        return Err(PipelineError::InvalidParameter(
            "uncertainties must be finite and positive".to_string(),
        ));
    }
    weights.iter_mut().for_each(|w| *w /= weight_sum);

    let mut y = values.to_vec();
    let raw_yy: f64 = weights.iter().zip(&y).map(|(w, v)| w * v * v).sum();
    if options.fit_mean || options.center_data {
        let offset: f64 = weights.iter().zip(&y).map(|(w, v)| w * v).sum();
        y.iter_mut().for_each(|v| *v -= offset);
    }
    let yy: f64 = weights.iter().zip(&y).map(|(w, v)| w * v * v).sum();
    // Constant input: nothing left to explain after the offset.
    if yy <= CONSTANT_RTOL * raw_yy {
        return Ok(vec![0.0; frequencies.len()]);
    }
    let y_mean: f64 = weights.iter().zip(&y).map(|(w, v)| w * v).sum();

    Ok(frequencies
        .iter()
        .map(|&f| power_at(times, &y, &weights, y_mean, yy, TAU * f, options.fit_mean))
        .collect())
}

fn power_at(
    times: &[f64],
    y: &[f64],
    w: &[f64],
    y_mean: f64,
    yy: f64,
    omega: f64,
    fit_mean: bool,
) -> f64 {
    let (mut s2, mut c2, mut s, mut c) = (0.0, 0.0, 0.0, 0.0);
    for (&t, &wi) in times.iter().zip(w) {
        let (sin, cos) = (omega * t).sin_cos();
        s2 += wi * 2.0 * sin * cos;
        c2 += wi * (cos * cos - sin * sin);
        s += wi * sin;
        c += wi * cos;
    }
    if fit_mean {
        s2 -= 2.0 * s * c;
        c2 -= c * c - s * s;
    }
    let tau = 0.5 * s2.atan2(c2);

    let (mut yc, mut ys, mut cc, mut ss, mut ct, mut st) = (0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    for ((&t, &wi), &yi) in times.iter().zip(w).zip(y) {
        let (sin, cos) = (omega * t - tau).sin_cos();
        yc += wi * yi * cos;
        ys += wi * yi * sin;
        cc += wi * cos * cos;
        ss += wi * sin * sin;
        ct += wi * cos;
        st += wi * sin;
    }
    if fit_mean {
        yc -= y_mean * ct;
        ys -= y_mean * st;
        cc -= ct * ct;
        ss -= st * st;
    }

    let term = |num: f64, den: f64| {
        if den.abs() > DENOMINATOR_EPS {
            num * num / den
        } else {
            0.0
        }
    };
    (term(yc, cc) + term(ys, ss)) / yy
}

/// Spectral window of the sampling times: power of a constant series with
/// unit weights, no centering and no mean fit.
pub fn window_power(times: &[f64], frequencies: &[f64]) -> Result<Vec<f64>> {
    let ones = vec![1.0; times.len()];
    lomb_scargle(times, &ones, None, frequencies, LombScargleOptions::WINDOW)
}
