//! CSV trajectory loading.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use spgen_core::errors::{ErrorInfo, SpError};
use spgen_core::{ChannelSet, TimeSeriesRow};
use tracing::debug;

/// A fully loaded phase trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// Channel labels with their wrapping notation removed.
    pub channels: ChannelSet,
    /// Samples in file order.
    pub rows: Vec<TimeSeriesRow>,
}

/// Removes the probe notation around a column label: `P(B1)` becomes `B1`.
/// Labels without parentheses are returned unchanged.
pub fn strip_label(raw: &str) -> &str {
    let raw = raw.trim();
    let Some(open) = raw.find('(') else {
        return raw;
    };
    match raw[open + 1..].find(')') {
        Some(close) => &raw[open + 1..open + 1 + close],
        None => raw,
    }
}

/// Loads a comma separated trajectory from disk.
pub fn load_csv(path: &Path) -> Result<Trajectory, SpError> {
    let file = File::open(path).map_err(|err| SpError::io("spgen.io.open", path, err))?;
    let trajectory = read_trajectory(file)?;
    debug!(
        path = %path.display(),
        channels = trajectory.channels.len(),
        rows = trajectory.rows.len(),
        "trajectory loaded"
    );
    Ok(trajectory)
}

/// Parses a trajectory whose first column is `time` and whose remaining
/// columns each hold one channel's phase.
pub fn read_trajectory<R: Read>(reader: R) -> Result<Trajectory, SpError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|err| wrap_csv("spgen.input.header", err))?
        .clone();
    let channels = channel_set(&headers)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| wrap_csv("spgen.input.record", err))?;
        rows.push(parse_row(&record, &headers)?);
    }
    Ok(Trajectory { channels, rows })
}

fn channel_set(headers: &StringRecord) -> Result<ChannelSet, SpError> {
    match headers.get(0) {
        Some(first) if first.eq_ignore_ascii_case("time") => {}
        other => {
            return Err(SpError::Input(
                ErrorInfo::new("spgen.input.time_column", "first column must be `time`")
                    .with_context("found", other.unwrap_or("").to_string()),
            ))
        }
    }
    if headers.len() < 2 {
        return Err(SpError::Input(ErrorInfo::new(
            "spgen.input.no_channels",
            "trajectory has no phase columns",
        )));
    }
    ChannelSet::new(headers.iter().skip(1).map(strip_label))
}

fn parse_row(record: &StringRecord, headers: &StringRecord) -> Result<TimeSeriesRow, SpError> {
    let line = record
        .position()
        .map(|pos| pos.line().to_string())
        .unwrap_or_else(|| "?".into());
    let mut values = Vec::with_capacity(record.len());
    for (cell, column) in record.iter().zip(headers.iter()) {
        let value: f64 = cell.parse().map_err(|_| {
            SpError::Input(
                ErrorInfo::new("spgen.input.parse", "cell is not a number")
                    .with_context("line", line.clone())
                    .with_context("column", column.to_string())
                    .with_context("value", cell.to_string()),
            )
        })?;
        if !value.is_finite() {
            return Err(SpError::Input(
                ErrorInfo::new("spgen.input.non_finite", "cell is not finite")
                    .with_context("line", line.clone())
                    .with_context("column", column.to_string()),
            ));
        }
        values.push(value);
    }
    let time = values.remove(0);
    Ok(TimeSeriesRow::new(time, values))
}

fn wrap_csv(code: &str, err: csv::Error) -> SpError {
    let mut info = ErrorInfo::new(code, "malformed CSV trajectory").with_hint(err.to_string());
    if let Some(pos) = err.position() {
        info = info.with_context("line", pos.line().to_string());
    }
    SpError::Input(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_probe_notation() {
        assert_eq!(strip_label("P(B1)"), "B1");
        assert_eq!(strip_label(" P(XI1.B02) "), "XI1.B02");
        assert_eq!(strip_label("B3"), "B3");
        assert_eq!(strip_label("P(B4"), "P(B4");
    }

    #[test]
    fn header_must_start_with_time() {
        let err = read_trajectory("t,P(B1)\n0,0\n".as_bytes()).unwrap_err();
        assert_eq!(err.info().code, "spgen.input.time_column");
    }

    #[test]
    fn empty_cell_reports_line() {
        let err = read_trajectory("time,P(B1)\n0,0\n1e-12,\n".as_bytes()).unwrap_err();
        assert_eq!(err.info().code, "spgen.input.parse");
        assert_eq!(err.info().context["line"], "3");
        assert_eq!(err.info().context["column"], "P(B1)");
    }

    #[test]
    fn non_finite_cells_rejected() {
        for cell in ["NaN", "inf", "-inf"] {
            let raw = format!("time,P(B1),P(B2)\n0,0,0\n1e-12,0.5,{cell}\n");
            let err = read_trajectory(raw.as_bytes()).unwrap_err();
            assert_eq!(err.info().code, "spgen.input.non_finite", "{cell}");
            assert_eq!(err.info().context["line"], "3");
            assert_eq!(err.info().context["column"], "P(B2)");
        }
    }
}
