//! One star's catalog row.

use serde::{Deserialize, Serialize};

use crate::utils::de::float_or_nan;

/// Luminosity-class marker for subgiants in a spectral type string.
pub const SUBGIANT_MARKER: &str = "IV";

/// Catalog fields consumed by the pipeline.
///
/// Field names follow the catalog CSV header; other columns are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Primary designation, e.g. `"HD 75732 A"`.
    pub hd_name: String,
    /// Secondary catalog (Gliese/GJ) designation.
    #[serde(default)]
    pub gj_name: Option<String>,
    /// Hipparcos designation, e.g. `"HIP 43587"`.
    #[serde(default)]
    pub hip_name: Option<String>,
    /// Tycho-2 identifier without the `TYC` prefix.
    #[serde(default)]
    pub tycho2_id: Option<String>,
    /// Stellar mass in solar masses.
    #[serde(deserialize_with = "float_or_nan")]
    pub sed_grav_mass: f64,
    /// Upper mass uncertainty.
    #[serde(deserialize_with = "float_or_nan")]
    pub sed_grav_masserr1: f64,
    /// Lower mass uncertainty.
    #[serde(deserialize_with = "float_or_nan")]
    pub sed_grav_masserr2: f64,
    /// B-V color index in magnitudes.
    #[serde(deserialize_with = "float_or_nan")]
    pub sy_bvmag: f64,
    /// Spectral type, e.g. `"G8V"` or `"K0IV"`.
    #[serde(default)]
    pub st_spectype: String,
}

impl CatalogEntry {
    pub fn designation(&self) -> &str {
        &self.hd_name
    }

    pub fn color_index(&self) -> f64 {
        self.sy_bvmag
    }

    /// Whether the spectral type carries the subgiant luminosity class.
    pub fn is_subgiant(&self) -> bool {
        self.st_spectype.contains(SUBGIANT_MARKER)
    }

    /// Mass and symmetric uncertainty (mean of the two asymmetric errors).
    pub fn mass_estimate(&self) -> (f64, f64) {
        let err = (self.sed_grav_masserr1.abs() + self.sed_grav_masserr2.abs()) / 2.0;
        (self.sed_grav_mass, err)
    }
}

#[cfg(test)]
pub(crate) fn sample_entry(name: &str) -> CatalogEntry {
    CatalogEntry {
        hd_name: name.to_string(),
        gj_name: Some("GJ 324 A".to_string()),
        hip_name: Some("HIP 43587".to_string()),
        tycho2_id: Some("1949-1837-1".to_string()),
        sed_grav_mass: 0.91,
        sed_grav_masserr1: 0.03,
        sed_grav_masserr2: 0.05,
        sy_bvmag: 0.87,
        st_spectype: "K0IV-V".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn subgiant_detection_uses_luminosity_class() {
        let mut entry = sample_entry("HD 75732 A");
        assert!(entry.is_subgiant());
        entry.st_spectype = "G2V".to_string();
        assert!(!entry.is_subgiant());
    }

    #[test]
    fn mass_uncertainty_is_mean_of_errors() {
        let entry = sample_entry("HD 75732 A");
        let (mass, err) = entry.mass_estimate();
        assert_relative_eq!(mass, 0.91, epsilon = 1e-12);
        assert_relative_eq!(err, 0.04, epsilon = 1e-12);
    }
}
