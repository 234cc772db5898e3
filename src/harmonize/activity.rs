//! R'_HK to Mount-Wilson S-index conversion (Gomes da Silva et al. 2021).

/// Scale factor between Ca II H&K flux and the S-index.
pub const ALPHA: f64 = 1.34e-4;

/// Photospheric term coefficients `(A, B, C)` of `log R_phot = A + B c^2 + C c^3`.
pub const PHOTOSPHERIC: (f64, f64, f64) = (-4.898, 1.918, -2.893);

/// Bolometric correction coefficients `(D, E, F, G)` of
/// `log C_cf = D c^3 + E c^2 + F c + G`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BolometricCoefficients {
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub g: f64,
}

pub const MAIN_SEQUENCE: BolometricCoefficients = BolometricCoefficients {
    d: 0.25,
    e: -1.33,
    f: 0.43,
    g: 0.24,
};

pub const SUBGIANT: BolometricCoefficients = BolometricCoefficients {
    d: -0.066,
    e: -0.25,
    f: -0.49,
    g: 0.45,
};

impl BolometricCoefficients {
    pub fn for_luminosity_class(subgiant: bool) -> Self {
        if subgiant {
            SUBGIANT
        } else {
            MAIN_SEQUENCE
        }
    }

    /// `log10` of the bolometric correction factor for color index `c`.
    pub fn log_ccf(&self, c: f64) -> f64 {
        self.d * c.powi(3) + self.e * c.powi(2) + self.f * c + self.g
    }
}

/// `log10` of the photospheric contribution for color index `c`.
pub fn log_r_phot(c: f64) -> f64 {
    let (a, b, cc) = PHOTOSPHERIC;
    a + b * c.powi(2) + cc * c.powi(3)
}

/// Convert an R'_HK proxy to the Mount-Wilson S-index.
///
/// # Arguments
/// * `rhk_prime` - Activity proxy as reported by the archive
/// * `color_index` - B-V color of the star
/// * `subgiant` - Use the subgiant bolometric correction
pub fn rhk_prime_to_s_index(rhk_prime: f64, color_index: f64, subgiant: bool) -> f64 {
    let coefficients = BolometricCoefficients::for_luminosity_class(subgiant);
    let r_phot = 10f64.powf(log_r_phot(color_index));
    let c_cf = 10f64.powf(coefficients.log_ccf(color_index));
    (rhk_prime + r_phot) / (ALPHA * c_cf)
}
