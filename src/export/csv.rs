use crate::flight_control::TelemetrySample;
use crate::warn;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use std::{
    fs,
    io::{self, Write},
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
};

/// Reasons a telemetry export did not produce a file.
#[derive(Debug)]
pub enum ExportError {
    /// Fewer than two samples, nothing worth exporting.
    NotEnoughSamples(usize),
    Io(io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::NotEnoughSamples(n) => write!(f, "only {n} sample(s) recorded, need {MIN_SAMPLES}"),
            ExportError::Io(e) => write!(f, "I/O failure: {e}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            ExportError::NotEnoughSamples(_) => None,
        }
    }
}

impl From<io::Error> for ExportError {
    fn from(value: io::Error) -> Self { ExportError::Io(value) }
}

/// Minimum number of samples for an export.
const MIN_SAMPLES: usize = 2;

/// Writes `telemetry` as CSV: a header row of field names, then one row per sample
/// with every value at 4 decimals. Rows are `\n`-separated without a trailing newline.
pub fn write_telemetry<W: Write>(writer: &mut W, telemetry: &[TelemetrySample]) -> Result<(), ExportError> {
    if telemetry.len() < MIN_SAMPLES {
        return Err(ExportError::NotEnoughSamples(telemetry.len()));
    }
    let header = TelemetrySample::FIELDS.iter().join(",");
    let rows = telemetry.iter().map(|sample| sample.values().iter().map(|v| format!("{v:.4}")).join(","));
    let content = std::iter::once(header).chain(rows).join("\n");
    writer.write_all(content.as_bytes())?;
    Ok(())
}

/// File name of an export taken at `now`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("klu-r1-flight-data-{}.csv", now.format("%Y-%m-%dT%H:%M:%S%.3fZ"))
}

/// Writes `telemetry` to a timestamped CSV file in `dir`, creating the directory if needed.
///
/// # Returns
/// * `Ok(path)` of the written file.
/// * `Err(ExportError::NotEnoughSamples)` if there is no flight data yet, no file is created.
pub fn export_telemetry(
    dir: &Path,
    telemetry: &[TelemetrySample],
    now: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    if telemetry.len() < MIN_SAMPLES {
        warn!("No flight data to export.");
        return Err(ExportError::NotEnoughSamples(telemetry.len()));
    }
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(now));
    let mut file = io::BufWriter::new(fs::File::create(&path)?);
    write_telemetry(&mut file, telemetry)?;
    file.flush()?;
    Ok(path)
}
