//! Instruments and their epoch regimes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Spectrograph contributing an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    /// ESO HARPS, as published in the RVBank archive.
    Harps,
    /// Keck HIRES, as published in the EBPS archive.
    Hires,
}

impl Instrument {
    /// Lowercase label used in segment names and configuration files.
    pub fn label(&self) -> &'static str {
        match self {
            Instrument::Harps => "harps",
            Instrument::Hires => "hires",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Epoch regime of an instrument relative to a hardware or calibration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Before the upgrade.
    Pre,
    /// After the upgrade.
    Post,
}

impl Regime {
    pub fn label(&self) -> &'static str {
        match self {
            Regime::Pre => "pre",
            Regime::Post => "post",
        }
    }
}

/// One instrument/epoch partition with its own systemic offset.
///
/// Rendered as `"<instrument>_<regime>"`, e.g. `harps_pre`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstrumentSegment {
    pub instrument: Instrument,
    pub regime: Regime,
}

impl InstrumentSegment {
    pub const fn new(instrument: Instrument, regime: Regime) -> Self {
        Self { instrument, regime }
    }
}

impl fmt::Display for InstrumentSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.instrument.label(), self.regime.label())
    }
}

impl FromStr for InstrumentSegment {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || PipelineError::InvalidParameter(format!("unknown segment label '{s}'"));
        let (instrument, regime) = s.split_once('_').ok_or_else(unknown)?;
        let instrument = match instrument {
            "harps" => Instrument::Harps,
            "hires" => Instrument::Hires,
            _ => return Err(unknown()),
        };
        let regime = match regime {
            "pre" => Regime::Pre,
            "post" => Regime::Post,
            _ => return Err(unknown()),
        };
        Ok(Self { instrument, regime })
    }
}

impl Serialize for InstrumentSegment {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for InstrumentSegment {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}
