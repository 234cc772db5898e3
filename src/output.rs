//! CSV tables of harmonized and binned series.
//!
//! Columns are `index, jd, <value>, <uncertainty>, tel`, with the value and
//! uncertainty names taken from the series kind (`mnvel`/`errvel` or
//! `sind`/`errs`) and `tel` holding the segment label.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;

use crate::core::{InstrumentSegment, Measurement, SeriesKind, TimeSeries};
use crate::error::{PipelineError, Result};

/// Write `series` as CSV to `writer`.
pub fn write_series_csv<W: Write>(series: &TimeSeries, writer: W) -> Result<()> {
    let (value_col, err_col) = series.kind().columns();
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["index", "jd", value_col, err_col, "tel"])?;
    for (i, m) in series.iter().enumerate() {
        csv.write_record([
            i.to_string(),
            m.time.to_string(),
            m.value.to_string(),
            m.uncertainty.to_string(),
            m.segment.to_string(),
        ])?;
    }
    csv.flush().map_err(|e| PipelineError::io("<csv writer>", &e))?;
    Ok(())
}

/// Write `series` to a CSV file, creating parent directories.
pub fn save_series_csv(series: &TimeSeries, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, &e))?;
    }
    let file = File::create(path).map_err(|e| PipelineError::io(path, &e))?;
    write_series_csv(series, file)?;
    debug!(kind = %series.kind(), rows = series.len(), path = %path.display(), "saved series");
    Ok(())
}

/// Read a table written by [`write_series_csv`].
pub fn read_series_csv<R: Read>(kind: SeriesKind, reader: R) -> Result<TimeSeries> {
    let (value_col, err_col) = kind.columns();
    let mut csv = csv::Reader::from_reader(reader);
    let headers = csv.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PipelineError::Parse(format!("missing column '{name}'")))
    };
    let (jd, value, err, tel) = (
        column("jd")?,
        column(value_col)?,
        column(err_col)?,
        column("tel")?,
    );

    let mut measurements = Vec::new();
    for (line, record) in csv.records().enumerate() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or_default();
        let number = |idx: usize| {
            field(idx).parse::<f64>().map_err(|e| {
                PipelineError::Parse(format!("row {}: {}: {e}", line + 1, field(idx)))
            })
        };
        let segment: InstrumentSegment = field(tel).parse()?;
        measurements.push(Measurement::new(number(jd)?, number(value)?, number(err)?, segment));
    }
    TimeSeries::new(kind, measurements)
}
