//! Versioned per-instrument epoch calibration table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Instrument, InstrumentSegment, Regime};
use crate::error::{PipelineError, Result};
use crate::utils::datetime_to_jd;

/// Epoch boundary, given either as a Julian date or an RFC 3339 timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Boundary {
    JulianDate(f64),
    Timestamp(DateTime<Utc>),
}

impl Boundary {
    pub fn jd(&self) -> f64 {
        match self {
            Boundary::JulianDate(jd) => *jd,
            Boundary::Timestamp(ts) => datetime_to_jd(ts),
        }
    }
}

impl From<f64> for Boundary {
    fn from(jd: f64) -> Self {
        Boundary::JulianDate(jd)
    }
}

/// Time window of one regime, inclusive at both ends.
///
/// Windows of the same instrument may overlap (a row on a shared boundary
/// lands in both regimes) or leave a gap (rows inside it are dropped).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeWindow {
    pub regime: Regime,
    #[serde(default)]
    pub start: Option<Boundary>,
    #[serde(default)]
    pub end: Option<Boundary>,
    /// Empirical S-index uncertainty assigned to every activity row of this regime.
    pub activity_uncertainty: f64,
}

impl RegimeWindow {
    pub fn contains(&self, time: f64) -> bool {
        self.start.map_or(true, |b| time >= b.jd()) && self.end.map_or(true, |b| time <= b.jd())
    }
}

/// Regimes of one instrument, in concatenation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentCalibration {
    pub instrument: Instrument,
    pub regimes: Vec<RegimeWindow>,
}

impl InstrumentCalibration {
    pub fn segments(&self) -> impl Iterator<Item = InstrumentSegment> + '_ {
        self.regimes
            .iter()
            .map(move |w| InstrumentSegment::new(self.instrument, w.regime))
    }
}

/// Instrument → ordered regime windows, tagged with a version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationTable {
    pub version: String,
    #[serde(rename = "instrument")]
    pub instruments: Vec<InstrumentCalibration>,
}

/// HARPS fibre upgrade, last pre-upgrade night (Trifonov et al. 2020).
pub const HARPS_PRE_END_JD: f64 = 2_457_163.0;
/// HARPS fibre upgrade, first post-upgrade night.
pub const HARPS_POST_START_JD: f64 = 2_457_173.0;
/// HIRES CCD upgrade, 2004-08-18.
pub const HIRES_UPGRADE_JD: f64 = 2_453_236.0;

impl Default for CalibrationTable {
    fn default() -> Self {
        Self {
            version: "v1".to_string(),
            instruments: vec![
                InstrumentCalibration {
                    instrument: Instrument::Harps,
                    regimes: vec![
                        RegimeWindow {
                            regime: Regime::Pre,
                            start: None,
                            end: Some(HARPS_PRE_END_JD.into()),
                            activity_uncertainty: 0.007,
                        },
                        RegimeWindow {
                            regime: Regime::Post,
                            start: Some(HARPS_POST_START_JD.into()),
                            end: None,
                            activity_uncertainty: 0.006,
                        },
                    ],
                },
                InstrumentCalibration {
                    instrument: Instrument::Hires,
                    regimes: vec![
                        RegimeWindow {
                            regime: Regime::Pre,
                            start: None,
                            end: Some(HIRES_UPGRADE_JD.into()),
                            activity_uncertainty: 0.01,
                        },
                        RegimeWindow {
                            regime: Regime::Post,
                            start: Some(HIRES_UPGRADE_JD.into()),
                            end: None,
                            activity_uncertainty: 0.009,
                        },
                    ],
                },
            ],
        }
    }
}

impl CalibrationTable {
    /// Parse and validate a TOML calibration table.
    ///
    /// ```
    /// use raphs::harmonize::CalibrationTable;
    ///
    /// let table = CalibrationTable::from_toml_str(r#"
    ///     version = "v2"
    ///
    ///     [[instrument]]
    ///     instrument = "hires"
    ///
    ///     [[instrument.regimes]]
    ///     regime = "pre"
    ///     end = "2004-08-18T12:00:00Z"
    ///     activity_uncertainty = 0.01
    ///
    ///     [[instrument.regimes]]
    ///     regime = "post"
    ///     start = 2453236.0
    ///     activity_uncertainty = 0.009
    /// "#).unwrap();
    /// assert_eq!(table.version, "v2");
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: Self =
            toml::from_str(content).map_err(|e| PipelineError::Config(e.to_string()))?;
        table.validate()?;
        Ok(table)
    }

    /// Check each instrument appears once with distinct, well-formed regimes.
    pub fn validate(&self) -> Result<()> {
        for (i, cal) in self.instruments.iter().enumerate() {
            if self.instruments[..i]
                .iter()
                .any(|c| c.instrument == cal.instrument)
            {
                return Err(PipelineError::Config(format!(
                    "instrument {} listed twice",
                    cal.instrument
                )));
            }
            if cal.regimes.is_empty() {
                return Err(PipelineError::Config(format!(
                    "instrument {} has no regimes",
                    cal.instrument
                )));
            }
            for (j, window) in cal.regimes.iter().enumerate() {
                if cal.regimes[..j].iter().any(|w| w.regime == window.regime) {
                    return Err(PipelineError::Config(format!(
                        "regime {}_{} listed twice",
                        cal.instrument,
                        window.regime.label()
                    )));
                }
                if let (Some(start), Some(end)) = (window.start, window.end) {
                    if start.jd() > end.jd() {
                        return Err(PipelineError::Config(format!(
                            "regime {}_{} starts after it ends",
                            cal.instrument,
                            window.regime.label()
                        )));
                    }
                }
                if !(window.activity_uncertainty.is_finite() && window.activity_uncertainty > 0.0)
                {
                    return Err(PipelineError::Config(format!(
                        "regime {}_{} needs a positive activity uncertainty",
                        cal.instrument,
                        window.regime.label()
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, instrument: Instrument) -> Option<&InstrumentCalibration> {
        self.instruments.iter().find(|c| c.instrument == instrument)
    }

    /// Every segment label this table can produce.
    pub fn segments(&self) -> Vec<InstrumentSegment> {
        self.instruments.iter().flat_map(|c| c.segments()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_table_preserves_harps_gap() {
        let table = CalibrationTable::default();
        let harps = table.get(Instrument::Harps).unwrap();
        let inside_gap = 2_457_168.0;
        assert!(harps.regimes.iter().all(|w| !w.contains(inside_gap)));
        assert!(harps.regimes[0].contains(HARPS_PRE_END_JD));
        assert!(harps.regimes[1].contains(HARPS_POST_START_JD));
    }

    #[test]
    fn default_table_shares_hires_boundary() {
        let table = CalibrationTable::default();
        let hires = table.get(Instrument::Hires).unwrap();
        assert!(hires.regimes.iter().all(|w| w.contains(HIRES_UPGRADE_JD)));
        assert!(!hires.regimes[1].contains(HIRES_UPGRADE_JD - 1e-6));
    }

    #[test]
    fn default_table_lists_four_segments() {
        let labels: Vec<String> = CalibrationTable::default()
            .segments()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(labels, vec!["harps_pre", "harps_post", "hires_pre", "hires_post"]);
    }

    #[test]
    fn timestamp_boundaries_convert_to_jd() {
        let table = CalibrationTable::from_toml_str(
            r#"
            version = "test"

            [[instrument]]
            instrument = "hires"

            [[instrument.regimes]]
            regime = "pre"
            end = "2004-08-18T12:00:00Z"
            activity_uncertainty = 0.01
            "#,
        )
        .unwrap();
        let window = table.get(Instrument::Hires).unwrap().regimes[0];
        assert_relative_eq!(window.end.unwrap().jd(), HIRES_UPGRADE_JD, epsilon = 1e-9);
        assert!(table.get(Instrument::Harps).is_none());
    }

    #[test]
    fn integer_boundaries_are_accepted() {
        let table = CalibrationTable::from_toml_str(
            r#"
            version = "test"

            [[instrument]]
            instrument = "harps"

            [[instrument.regimes]]
            regime = "post"
            start = 2457173
            activity_uncertainty = 0.006
            "#,
        )
        .unwrap();
        let window = table.get(Instrument::Harps).unwrap().regimes[0];
        assert_eq!(window.start.unwrap().jd(), HARPS_POST_START_JD);
    }

    #[test]
    fn duplicate_regimes_are_rejected() {
        let result = CalibrationTable::from_toml_str(
            r#"
            version = "bad"

            [[instrument]]
            instrument = "harps"

            [[instrument.regimes]]
            regime = "pre"
            activity_uncertainty = 0.007

            [[instrument.regimes]]
            regime = "pre"
            activity_uncertainty = 0.006
            "#,
        );
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[test]
    fn unknown_instruments_fail_to_parse() {
        let result = CalibrationTable::from_toml_str(
            r#"
            version = "bad"

            [[instrument]]
            instrument = "espresso"
            regimes = []
            "#,
        );
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }
}
