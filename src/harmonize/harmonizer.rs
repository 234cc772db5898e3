//! Segment splitting, column mapping and cleaning of combined series.

use tracing::{debug, info};

use super::activity::rhk_prime_to_s_index;
use super::calibration::{CalibrationTable, InstrumentCalibration};
use super::outlier::{reject_outliers, DEFAULT_OUTLIER_THRESHOLD};
use crate::catalog::CatalogEntry;
use crate::context::StarContext;
use crate::core::{InstrumentSegment, Measurement, SeriesKind, TimeSeries};
use crate::error::{PipelineError, Result};
use crate::sources::{ActivityKind, RawArchive, RawRow};
use crate::utils::jd_to_datetime;

/// RV and activity series harmonized for one star.
///
/// Each series fails on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonizedSeries {
    pub rv: Result<TimeSeries>,
    pub activity: Result<TimeSeries>,
}

/// Splits archives into epoch segments and merges them into clean series.
#[derive(Debug, Clone)]
pub struct SegmentHarmonizer {
    calibration: CalibrationTable,
    outlier_threshold: f64,
}

impl Default for SegmentHarmonizer {
    fn default() -> Self {
        Self::new(CalibrationTable::default())
    }
}

impl SegmentHarmonizer {
    pub fn new(calibration: CalibrationTable) -> Self {
        Self {
            calibration,
            outlier_threshold: DEFAULT_OUTLIER_THRESHOLD,
        }
    }

    /// Set the outlier rejection threshold in standard deviations.
    pub fn with_outlier_threshold(mut self, threshold: f64) -> Self {
        self.outlier_threshold = threshold;
        self
    }

    pub fn calibration(&self) -> &CalibrationTable {
        &self.calibration
    }

    pub fn outlier_threshold(&self) -> f64 {
        self.outlier_threshold
    }

    fn calibration_for(&self, archive: &RawArchive) -> Result<&InstrumentCalibration> {
        self.calibration
            .get(archive.instrument)
            .ok_or(PipelineError::UnknownInstrument(archive.instrument))
    }

    /// Rows of `archive` grouped by regime window, in table order.
    ///
    /// A row on a shared boundary appears in every window containing it; a row
    /// in a gap between windows appears in none.
    pub fn split_segments<'a>(
        &self,
        archive: &'a RawArchive,
    ) -> Result<Vec<(InstrumentSegment, f64, Vec<&'a RawRow>)>> {
        let calibration = self.calibration_for(archive)?;
        Ok(calibration
            .regimes
            .iter()
            .map(|window| {
                let rows = archive
                    .rows
                    .iter()
                    .filter(|row| window.contains(row.time))
                    .collect();
                (
                    InstrumentSegment::new(archive.instrument, window.regime),
                    window.activity_uncertainty,
                    rows,
                )
            })
            .collect())
    }

    /// Concatenate RV rows of all archives, segment by segment.
    pub fn combine_rv<'a>(
        &self,
        archives: impl IntoIterator<Item = &'a RawArchive>,
    ) -> Result<Vec<Measurement>> {
        let mut combined = Vec::new();
        for archive in archives {
            for (segment, _, rows) in self.split_segments(archive)? {
                combined.extend(
                    rows.into_iter()
                        .map(|r| Measurement::new(r.time, r.rv, r.rv_uncertainty, segment))
                        .filter(Measurement::is_finite),
                );
            }
        }
        Ok(combined)
    }

    /// Concatenate activity rows of all archives as S-index values.
    ///
    /// R'_HK archives are converted with the star's color index and
    /// luminosity class. Negative S-index values are dropped.
    pub fn combine_activity<'a>(
        &self,
        archives: impl IntoIterator<Item = &'a RawArchive>,
        entry: &CatalogEntry,
    ) -> Result<Vec<Measurement>> {
        let color_index = entry.color_index();
        let subgiant = entry.is_subgiant();
        let mut combined = Vec::new();
        for archive in archives {
            for (segment, uncertainty, rows) in self.split_segments(archive)? {
                combined.extend(
                    rows.into_iter()
                        .map(|r| {
                            let s_index = match archive.activity {
                                ActivityKind::RhkPrime => {
                                    rhk_prime_to_s_index(r.activity, color_index, subgiant)
                                }
                                ActivityKind::SIndex => r.activity,
                            };
                            Measurement::new(r.time, s_index, uncertainty, segment)
                        })
                        .filter(|m| m.is_finite() && m.value >= 0.0),
                );
            }
        }
        Ok(combined)
    }

    /// Outlier rejection, stable time sort and empty check.
    fn finish(
        &self,
        kind: SeriesKind,
        combined: Vec<Measurement>,
        ctx: &StarContext,
    ) -> Result<TimeSeries> {
        let _span = ctx.span().enter();
        let input = combined.len();
        let rejection = reject_outliers(combined, self.outlier_threshold);
        debug!(
            %kind,
            mean = rejection.mean,
            std_dev = rejection.std_dev,
            limit = rejection.limit(),
            "outlier statistics"
        );

        let series = TimeSeries::from_unsorted(kind, rejection.kept);
        if series.is_empty() {
            return Err(PipelineError::EmptySeries { kind });
        }
        let date = |m: Option<&Measurement>| {
            m.and_then(|m| jd_to_datetime(m.time))
                .map(|d| d.date_naive().to_string())
                .unwrap_or_default()
        };
        info!(
            %kind,
            rows = series.len(),
            input,
            rejected = rejection.rejected.len(),
            segments = series.segments().len(),
            first = %date(series.measurements().first()),
            last = %date(series.measurements().last()),
            "harmonized series"
        );
        Ok(series)
    }

    /// Harmonized radial-velocity series.
    pub fn harmonize_rv<'a>(
        &self,
        archives: impl IntoIterator<Item = &'a RawArchive>,
        ctx: &StarContext,
    ) -> Result<TimeSeries> {
        let combined = self.combine_rv(archives)?;
        self.finish(SeriesKind::RadialVelocity, combined, ctx)
    }

    /// Harmonized S-index series.
    pub fn harmonize_activity<'a>(
        &self,
        archives: impl IntoIterator<Item = &'a RawArchive>,
        entry: &CatalogEntry,
        ctx: &StarContext,
    ) -> Result<TimeSeries> {
        let combined = self.combine_activity(archives, entry)?;
        self.finish(SeriesKind::ActivityIndex, combined, ctx)
    }

    /// Both series from the same archives.
    pub fn harmonize(
        &self,
        archives: &[&RawArchive],
        entry: &CatalogEntry,
        ctx: &StarContext,
    ) -> HarmonizedSeries {
        HarmonizedSeries {
            rv: self.harmonize_rv(archives.iter().copied(), ctx),
            activity: self.harmonize_activity(archives.iter().copied(), entry, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_entry;
    use crate::core::{Instrument, Regime};
    use crate::harmonize::calibration::{HARPS_POST_START_JD, HARPS_PRE_END_JD, HIRES_UPGRADE_JD};
    use std::path::PathBuf;

    fn archive(instrument: Instrument, activity: ActivityKind, rows: Vec<RawRow>) -> RawArchive {
        RawArchive {
            instrument,
            activity,
            source: PathBuf::from("test"),
            rows,
        }
    }

    fn row(time: f64, rv: f64, activity: f64) -> RawRow {
        RawRow {
            time,
            rv,
            rv_uncertainty: 1.0,
            activity,
        }
    }

    fn ctx() -> StarContext {
        StarContext::new("HD 75732 A")
    }

    #[test]
    fn harps_gap_rows_are_dropped() {
        let harps = archive(
            Instrument::Harps,
            ActivityKind::RhkPrime,
            vec![
                row(HARPS_PRE_END_JD, 1.0, 1e-5),
                row(HARPS_PRE_END_JD + 5.0, 2.0, 1e-5),
                row(HARPS_POST_START_JD, 3.0, 1e-5),
            ],
        );
        let harmonizer = SegmentHarmonizer::default();
        let rv = harmonizer.harmonize_rv([&harps], &ctx()).unwrap();
        assert_eq!(rv.values(), vec![1.0, 3.0]);
        assert_eq!(
            rv.measurements()[0].segment,
            InstrumentSegment::new(Instrument::Harps, Regime::Pre)
        );
        assert_eq!(
            rv.measurements()[1].segment,
            InstrumentSegment::new(Instrument::Harps, Regime::Post)
        );
    }

    #[test]
    fn hires_boundary_row_lands_in_both_segments() {
        let hires = archive(
            Instrument::Hires,
            ActivityKind::SIndex,
            vec![
                row(HIRES_UPGRADE_JD - 10.0, 1.0, 0.17),
                row(HIRES_UPGRADE_JD, 2.0, 0.18),
                row(HIRES_UPGRADE_JD + 10.0, 3.0, 0.19),
            ],
        );
        let harmonizer = SegmentHarmonizer::default();
        let rv = harmonizer.harmonize_rv([&hires], &ctx()).unwrap();
        assert_eq!(rv.len(), 4);
        assert_eq!(rv.segment_len(InstrumentSegment::new(Instrument::Hires, Regime::Pre)), 2);
        assert_eq!(rv.segment_len(InstrumentSegment::new(Instrument::Hires, Regime::Post)), 2);
        // Stable sort keeps the pre copy first.
        assert_eq!(rv.measurements()[1].segment.regime, Regime::Pre);
        assert_eq!(rv.measurements()[2].segment.regime, Regime::Post);
    }

    #[test]
    fn activity_uses_fixed_regime_uncertainties() {
        let hires = archive(
            Instrument::Hires,
            ActivityKind::SIndex,
            vec![row(HIRES_UPGRADE_JD - 1.0, 0.0, 0.17), row(HIRES_UPGRADE_JD + 1.0, 0.0, 0.18)],
        );
        let harmonizer = SegmentHarmonizer::default();
        let activity = harmonizer
            .harmonize_activity([&hires], &sample_entry("HD 1"), &ctx())
            .unwrap();
        assert_eq!(activity.uncertainties(), vec![0.01, 0.009]);
        assert_eq!(activity.values(), vec![0.17, 0.18]);
    }

    #[test]
    fn rhk_prime_is_converted_with_luminosity_class() {
        let harps = archive(
            Instrument::Harps,
            ActivityKind::RhkPrime,
            vec![row(2_455_000.0, 0.0, 2e-5)],
        );
        let harmonizer = SegmentHarmonizer::default();
        let mut entry = sample_entry("HD 1");
        entry.st_spectype = "G2V".to_string();
        let ms = harmonizer
            .harmonize_activity([&harps], &entry, &ctx())
            .unwrap();
        entry.st_spectype = "G2IV".to_string();
        let sg = harmonizer
            .harmonize_activity([&harps], &entry, &ctx())
            .unwrap();

        let expected = rhk_prime_to_s_index(2e-5, entry.sy_bvmag, false);
        assert_eq!(ms.values(), vec![expected]);
        assert_ne!(ms.values(), sg.values());
        assert_eq!(ms.uncertainties(), vec![0.007]);
    }

    #[test]
    fn negative_s_index_values_are_dropped() {
        let hires = archive(
            Instrument::Hires,
            ActivityKind::SIndex,
            vec![row(2_452_000.0, 0.0, -1.0), row(2_452_001.0, 0.0, 0.2)],
        );
        let activity = SegmentHarmonizer::default()
            .harmonize_activity([&hires], &sample_entry("HD 1"), &ctx())
            .unwrap();
        assert_eq!(activity.values(), vec![0.2]);
    }

    #[test]
    fn non_finite_rows_are_skipped() {
        let harps = archive(
            Instrument::Harps,
            ActivityKind::RhkPrime,
            vec![row(2_455_000.0, f64::NAN, f64::NAN), row(2_455_001.0, 4.0, f64::NAN)],
        );
        let harmonizer = SegmentHarmonizer::default();
        let rv = harmonizer.harmonize_rv([&harps], &ctx()).unwrap();
        assert_eq!(rv.values(), vec![4.0]);
        let activity = harmonizer.harmonize_activity([&harps], &sample_entry("HD 1"), &ctx());
        assert_eq!(
            activity,
            Err(PipelineError::EmptySeries {
                kind: SeriesKind::ActivityIndex
            })
        );
    }

    #[test]
    fn no_archives_is_empty_series_error() {
        let harmonizer = SegmentHarmonizer::default();
        let out = harmonizer.harmonize(&[], &sample_entry("HD 1"), &ctx());
        assert_eq!(
            out.rv,
            Err(PipelineError::EmptySeries {
                kind: SeriesKind::RadialVelocity
            })
        );
        assert!(out.activity.is_err());
    }

    #[test]
    fn uncalibrated_instrument_is_rejected() {
        let table = CalibrationTable {
            version: "harps-only".to_string(),
            instruments: CalibrationTable::default()
                .instruments
                .into_iter()
                .filter(|c| c.instrument == Instrument::Harps)
                .collect(),
        };
        let hires = archive(Instrument::Hires, ActivityKind::SIndex, vec![row(1.0, 1.0, 0.1)]);
        let result = SegmentHarmonizer::new(table).harmonize_rv([&hires], &ctx());
        assert_eq!(result, Err(PipelineError::UnknownInstrument(Instrument::Hires)));
    }

    #[test]
    fn combined_series_is_sorted_across_instruments() {
        let harps = archive(
            Instrument::Harps,
            ActivityKind::RhkPrime,
            vec![row(2_455_010.0, 1.0, 1e-5), row(2_455_000.0, 2.0, 1e-5)],
        );
        let hires = archive(
            Instrument::Hires,
            ActivityKind::SIndex,
            vec![row(2_455_005.0, 3.0, 0.2)],
        );
        let out = SegmentHarmonizer::default().harmonize(
            &[&harps, &hires],
            &sample_entry("HD 1"),
            &ctx(),
        );
        let rv = out.rv.unwrap();
        assert_eq!(rv.values(), vec![2.0, 3.0, 1.0]);
        assert_eq!(rv.segments().len(), 2);
    }

    #[test]
    fn harmonization_is_idempotent() {
        let harps = archive(
            Instrument::Harps,
            ActivityKind::RhkPrime,
            (0..50)
                .map(|i| row(2_455_000.0 + (i * 7 % 50) as f64, (i as f64).sin(), 1e-5))
                .collect(),
        );
        let harmonizer = SegmentHarmonizer::default();
        let entry = sample_entry("HD 1");
        let first = harmonizer.harmonize(&[&harps], &entry, &ctx());
        let second = harmonizer.harmonize(&[&harps], &entry, &ctx());
        assert_eq!(first, second);
    }
}
