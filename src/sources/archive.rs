//! Per-instrument archive schemas.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::alias::AliasStrategy;
use crate::core::Instrument;
use crate::error::{PipelineError, Result};
use crate::utils::de::float_or_nan;

/// What the activity column of an archive measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    /// Bolometric-corrected R'_HK, converted to S-index during harmonization.
    RhkPrime,
    /// Mount-Wilson S-index, used as-is.
    SIndex,
}

/// One archive row mapped onto canonical columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawRow {
    pub time: f64,
    pub rv: f64,
    pub rv_uncertainty: f64,
    pub activity: f64,
}

/// Rows read from one instrument archive for one star.
#[derive(Debug, Clone, PartialEq)]
pub struct RawArchive {
    pub instrument: Instrument,
    pub activity: ActivityKind,
    pub source: PathBuf,
    pub rows: Vec<RawRow>,
}

impl RawArchive {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Schema and naming conventions of one instrument's archive.
pub trait ArchiveFormat: Send + Sync {
    fn instrument(&self) -> Instrument;

    /// Directory under the data root holding this archive.
    fn directory(&self) -> &str;

    /// Alias strategies to try, in priority order.
    fn aliases(&self) -> &[AliasStrategy];

    /// File name for a compacted designation.
    fn file_name(&self, designation: &str) -> String;

    /// Parse an existing archive file.
    fn read(&self, path: &Path) -> Result<RawArchive>;

    /// Full path for a designation under `data_dir`.
    fn path_for(&self, data_dir: &Path, designation: &str) -> PathBuf {
        data_dir
            .join(self.directory())
            .join(self.file_name(designation))
    }
}

/// HARPS RVBank CSV export (header row, named columns).
#[derive(Debug, Clone, Default)]
pub struct HarpsRvBank;

const HARPS_ALIASES: [AliasStrategy; 5] = [
    AliasStrategy::PrimaryDesignation,
    AliasStrategy::StripComponentSuffix,
    AliasStrategy::SecondaryCatalog,
    AliasStrategy::Hipparcos,
    AliasStrategy::Tycho,
];

#[derive(Debug, Deserialize)]
struct HarpsRecord {
    #[serde(rename = "BJD")]
    bjd: f64,
    #[serde(rename = "RV_mlc_nzp", deserialize_with = "float_or_nan")]
    rv: f64,
    #[serde(rename = "e_RV_mlc_nzp", deserialize_with = "float_or_nan")]
    rv_err: f64,
    #[serde(rename = "RHKp", deserialize_with = "float_or_nan")]
    rhk_prime: f64,
}

impl ArchiveFormat for HarpsRvBank {
    fn instrument(&self) -> Instrument {
        Instrument::Harps
    }

    fn directory(&self) -> &str {
        "harps_rv_bank"
    }

    fn aliases(&self) -> &[AliasStrategy] {
        &HARPS_ALIASES
    }

    fn file_name(&self, designation: &str) -> String {
        format!("{designation}.csv")
    }

    fn read(&self, path: &Path) -> Result<RawArchive> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| with_path(e, path))?;
        let rows = rdr
            .deserialize::<HarpsRecord>()
            .map(|record| {
                let r = record.map_err(|e| with_path(e, path))?;
                Ok(RawRow {
                    time: r.bjd,
                    rv: r.rv,
                    rv_uncertainty: r.rv_err,
                    activity: r.rhk_prime,
                })
            })
            .collect::<Result<Vec<RawRow>>>()?;
        Ok(RawArchive {
            instrument: Instrument::Harps,
            activity: ActivityKind::RhkPrime,
            source: path.to_path_buf(),
            rows,
        })
    }
}

/// Keck HIRES EBPS `.vels` file: headerless, whitespace-delimited.
///
/// Columns: `JD RVel e_RVel S_value Halpha phot_per_pix t_exp`.
#[derive(Debug, Clone, Default)]
pub struct HiresEbps;

const HIRES_ALIASES: [AliasStrategy; 3] = [
    AliasStrategy::PrimaryDesignation,
    AliasStrategy::StripComponentSuffix,
    AliasStrategy::Hipparcos,
];

/// Number of columns in an EBPS `.vels` row.
pub const HIRES_COLUMNS: usize = 7;

impl HiresEbps {
    /// Parse `.vels` content; `origin` names the source in error messages.
    pub fn parse(content: &str, origin: &Path) -> Result<Vec<RawRow>> {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(lineno, line)| {
                let fields: Vec<&str> = line.split_whitespace().collect();
                if fields.len() != HIRES_COLUMNS {
                    return Err(PipelineError::Parse(format!(
                        "{}:{}: expected {} columns, found {}",
                        origin.display(),
                        lineno + 1,
                        HIRES_COLUMNS,
                        fields.len()
                    )));
                }
                let column = |i: usize| -> Result<f64> {
                    fields[i].parse::<f64>().map_err(|e| {
                        PipelineError::Parse(format!(
                            "{}:{}: column {}: {}",
                            origin.display(),
                            lineno + 1,
                            i + 1,
                            e
                        ))
                    })
                };
                Ok(RawRow {
                    time: column(0)?,
                    rv: column(1)?,
                    rv_uncertainty: column(2)?,
                    activity: column(3)?,
                })
            })
            .collect()
    }
}

impl ArchiveFormat for HiresEbps {
    fn instrument(&self) -> Instrument {
        Instrument::Hires
    }

    fn directory(&self) -> &str {
        "ebps_keck_hires"
    }

    fn aliases(&self) -> &[AliasStrategy] {
        &HIRES_ALIASES
    }

    fn file_name(&self, designation: &str) -> String {
        format!("{designation}_KECK.vels")
    }

    fn read(&self, path: &Path) -> Result<RawArchive> {
        let content = fs::read_to_string(path).map_err(|e| PipelineError::io(path, &e))?;
        Ok(RawArchive {
            instrument: Instrument::Hires,
            activity: ActivityKind::SIndex,
            source: path.to_path_buf(),
            rows: Self::parse(&content, path)?,
        })
    }
}

fn with_path(err: csv::Error, path: &Path) -> PipelineError {
    match PipelineError::from(err) {
        PipelineError::Io { message, .. } => PipelineError::Io {
            path: path.to_path_buf(),
            message,
        },
        PipelineError::Parse(message) => {
            PipelineError::Parse(format!("{}: {}", path.display(), message))
        }
        other => other,
    }
}
